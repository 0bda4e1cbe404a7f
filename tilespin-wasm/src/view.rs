use std::cell::RefCell;
use std::rc::Rc;

use tilespin_core::{Notice, PuzzleState, SessionEvent};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlButtonElement, HtmlElement, HtmlImageElement, HtmlInputElement};

use crate::state::State;
use crate::timer::cancel_tick;
use crate::utils::{element, log, png_object_url, revoke_url};

/// Apply everything the session queued since the last call, then show any
/// notices. Alerts run after the state borrow is released.
pub fn flush(state: &Rc<RefCell<State>>) {
    let (window, notices) = {
        let mut s = state.borrow_mut();
        let events = s.session.drain_events();
        let notices = apply_events(&mut s, &events);
        (s.window.clone(), notices)
    };
    for n in notices {
        log(n.message());
        let _ = window.alert_with_message(n.message());
    }
}

fn apply_events(s: &mut State, events: &[SessionEvent]) -> Vec<Notice> {
    let mut notices = Vec::new();
    for ev in events {
        let res = match ev {
            SessionEvent::ImageLoaded => show_original(s),
            SessionEvent::TilesReset => rebuild_tiles(s),
            SessionEvent::TileChanged(idx) => update_tile(s, *idx),
            SessionEvent::Countdown(secs) => {
                update_timer_dom(s, *secs);
                Ok(())
            }
            SessionEvent::StateChanged(st) => {
                if !st.is_running() {
                    cancel_tick(s);
                }
                sync_controls(s);
                Ok(())
            }
            SessionEvent::Notice(n) => {
                notices.push(*n);
                Ok(())
            }
        };
        if let Err(e) = res {
            gloo::console::warn!("display update failed", e);
        }
    }
    notices
}

fn show_original(s: &mut State) -> Result<(), JsValue> {
    let Some(image) = s.session.image() else {
        return Ok(());
    };
    let png = image
        .to_png()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let url = png_object_url(&png)?;
    if let Some(img) = element::<HtmlImageElement>(&s.document, "original") {
        img.set_src(&url);
        img.set_hidden(false);
    }
    if let Some(p) = element::<HtmlElement>(&s.document, "originalEmpty") {
        p.set_hidden(true);
    }
    revoke_url(s.urls.original.replace(url));
    Ok(())
}

fn rebuild_tiles(s: &mut State) -> Result<(), JsValue> {
    for url in s.urls.tiles.drain(..) {
        revoke_url(url);
    }
    let Some(grid) = element::<HtmlElement>(&s.document, "tiles") else {
        return Ok(());
    };
    grid.set_inner_html("");
    for idx in 0..s.session.tiles().len() {
        let img = s
            .document
            .create_element("img")?
            .dyn_into::<HtmlImageElement>()?;
        img.set_alt(&format!("tile-{idx}"));
        img.set_draggable(false);
        img.dataset().set("idx", &idx.to_string())?;
        grid.append_child(&img)?;
        s.urls.tiles.push(None);
        update_tile(s, idx)?;
    }
    Ok(())
}

fn update_tile(s: &mut State, idx: usize) -> Result<(), JsValue> {
    let Some(tile) = s.session.tiles().get(idx) else {
        return Ok(());
    };
    let png = tilespin_core::encode_png(&tile.raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let url = png_object_url(&png)?;
    let selector = format!("#tiles img[data-idx=\"{idx}\"]");
    if let Some(img) = s
        .document
        .query_selector(&selector)?
        .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
    {
        img.set_src(&url);
    }
    if let Some(slot) = s.urls.tiles.get_mut(idx) {
        revoke_url(slot.replace(url));
    } else {
        revoke_url(Some(url));
    }
    Ok(())
}

pub fn update_timer_dom(s: &State, secs: u32) {
    if let Some(el) = element::<HtmlElement>(&s.document, "timer") {
        el.set_inner_text(&format!("시간 남음: {secs}초"));
    }
}

/// Enable or disable the inputs for the current lifecycle state.
pub fn sync_controls(s: &State) {
    let state = s.session.state();
    let running = state.is_running();
    if let Some(input) = element::<HtmlInputElement>(&s.document, "file") {
        input.set_disabled(running);
    }
    if let Some(btn) = element::<HtmlButtonElement>(&s.document, "start") {
        btn.set_disabled(s.session.image().is_none() || running);
    }
    if let Some(btn) = element::<HtmlButtonElement>(&s.document, "save") {
        btn.set_disabled(s.session.tiles().is_empty());
    }
    if let Some(grid) = element::<HtmlElement>(&s.document, "tiles") {
        let cursor = if running { "pointer" } else { "default" };
        let _ = grid.style().set_property("cursor", cursor);
        let _ = grid.set_attribute("data-state", state_name(state));
    }
}

fn state_name(state: PuzzleState) -> &'static str {
    match state {
        PuzzleState::Idle => "idle",
        PuzzleState::Ready => "ready",
        PuzzleState::Running => "running",
        PuzzleState::Solved => "solved",
        PuzzleState::TimedOut => "timed_out",
    }
}
