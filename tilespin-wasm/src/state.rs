use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use tilespin_core::GameSession;
use web_sys::{Document, Window};

/// Object URLs currently shown on the page. Each one is revoked as soon as
/// the raster it points at is superseded.
#[derive(Default)]
pub struct ShownUrls {
    pub original: Option<String>,
    pub tiles: Vec<Option<String>>,
}

/// Global application state stored behind an `Rc<RefCell<_>>` so it can be
/// shared across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub session: GameSession,
    /// Pending countdown tick; dropping it cancels the timeout.
    pub tick: Option<Timeout>,
    pub urls: ShownUrls,
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}
