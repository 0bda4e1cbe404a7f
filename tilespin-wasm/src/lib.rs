use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, MouseEvent};

use tilespin_core::{GameConfig, GameSession, board_png};

mod state;
mod timer;
mod upload;
mod utils;
mod view;

use crate::state::{STATE, ShownUrls, State};
use crate::timer::follow_up;
use crate::utils::{element, log, random_seed, save_png_as_file};
use crate::view::{flush, sync_controls, update_timer_dom};

fn start_game(state: &Rc<RefCell<State>>) {
    let started = {
        let mut s = state.borrow_mut();
        match s.session.start() {
            Ok(run) => Some((run, s.session.check())),
            Err(e) => {
                log(&format!("Start refused: {e}"));
                None
            }
        }
    };
    flush(state);
    if let Some((run, outcome)) = started {
        follow_up(state, run, outcome);
    }
}

fn click_tile(state: &Rc<RefCell<State>>, idx: usize) {
    let turned = state.borrow_mut().session.click_tile(idx);
    if turned.is_some() {
        flush(state);
    }
}

fn export_board_png(state: &State) -> Result<(), JsValue> {
    let bytes =
        board_png(state.session.tiles()).map_err(|e| JsValue::from_str(&e.to_string()))?;
    save_png_as_file(&state.document, "board.png", &bytes)
}

/// Tile index of the `<img>` under a click, read from its `data-idx`.
fn clicked_tile_index(e: &MouseEvent) -> Option<usize> {
    let target = e.target()?.dyn_into::<Element>().ok()?;
    target.get_attribute("data-idx")?.parse().ok()
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    // File input
    upload::attach_file_input(state.clone())?;

    // Game start
    if let Some(btn) = element::<HtmlElement>(&doc, "start") {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            start_game(&st);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // One listener on the grid; tiles are rebuilt on every start.
    if let Some(grid) = element::<HtmlElement>(&doc, "tiles") {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            if let Some(idx) = clicked_tile_index(&e) {
                click_tile(&st, idx);
            }
        }));
        grid.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    // Board snapshot download
    if let Some(btn) = element::<HtmlElement>(&doc, "save") {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            if let Err(e) = export_board_png(&st.borrow()) {
                log(&format!("Board export failed: {:?}", e));
            }
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    Ok(())
}

/// Current session summary as JSON, for the host page.
#[wasm_bindgen]
pub fn status_json() -> Option<String> {
    STATE.with(|st| {
        let st = st.borrow();
        let s = st.as_ref()?.borrow();
        serde_json::to_string(&s.session.status()).ok()
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    // ?time=<secs>&seed=<u64>
    let cfg = window
        .location()
        .search()
        .map(|search| GameConfig::from_query(&search))
        .unwrap_or_default();
    log(&format!(
        "Tilespin ready: {}s per run, seed {}",
        cfg.total_time_secs,
        cfg.seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "random".to_string())
    ));

    let session = GameSession::from_config(&cfg, random_seed());
    let state = Rc::new(RefCell::new(State {
        window,
        document,
        session,
        tick: None,
        urls: ShownUrls::default(),
    }));

    STATE.with(|st| st.replace(Some(state.clone())));
    {
        let s = state.borrow();
        update_timer_dom(&s, s.session.remaining_secs());
        sync_controls(&s);
    }

    attach_ui(state)?;
    Ok(())
}
