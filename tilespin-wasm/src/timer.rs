use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use tilespin_core::constants::TICK_INTERVAL_MS;
use tilespin_core::{RunId, TickOutcome};

use crate::state::State;
use crate::view::flush;

/// Arm the next one-second tick for `run`. Replacing the stored handle
/// cancels whatever was pending before.
pub fn schedule_tick(state: &Rc<RefCell<State>>, run: RunId) {
    let st = state.clone();
    let handle = Timeout::new(TICK_INTERVAL_MS, move || on_tick(&st, run));
    state.borrow_mut().tick = Some(handle);
}

pub fn cancel_tick(state: &mut State) {
    // dropping the handle clears the timeout
    state.tick = None;
}

/// Continue the countdown after the exit conditions were checked.
pub fn follow_up(state: &Rc<RefCell<State>>, run: RunId, outcome: TickOutcome) {
    if outcome == TickOutcome::Continue {
        schedule_tick(state, run);
    }
}

fn on_tick(state: &Rc<RefCell<State>>, run: RunId) {
    let outcome = state.borrow_mut().session.tick(run);
    flush(state);
    follow_up(state, run, outcome);
}
