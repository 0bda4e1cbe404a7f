use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Uint8Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, File, HtmlInputElement};

use tilespin_core::{PuzzleError, SquareImage, decode, prepare};

use crate::state::State;
use crate::utils::{element, log};
use crate::view::flush;

// Wires up the file input handler for loading the puzzle image.
pub fn attach_file_input(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    let Some(input) = element::<HtmlInputElement>(&doc, "file") else {
        gloo::console::warn!("file input #file not found");
        return Ok(());
    };
    let st = state.clone();
    let input_for_closure = input.clone();
    let onchange = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
        let Some(file) = input_for_closure.files().and_then(|files| files.item(0)) else {
            log("No file selected");
            return;
        };
        let st2 = st.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match read_square_image(&file).await {
                Ok(square) => {
                    log(&format!(
                        "Loaded {} as {}px square",
                        file.name(),
                        square.size()
                    ));
                    st2.borrow_mut().session.load_image(Some(square));
                    flush(&st2);
                }
                Err(e) => {
                    log(&format!("Failed to load image '{}': {e}", file.name()));
                    let _ = st2
                        .borrow()
                        .window
                        .alert_with_message("이미지를 읽을 수 없습니다.");
                }
            }
        });
    }));
    input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
    onchange.forget();
    Ok(())
}

async fn read_square_image(file: &File) -> Result<SquareImage, PuzzleError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| PuzzleError::Decode(format!("{e:?}")))?;
    let bytes = Uint8Array::new(&buffer).to_vec();
    let img = decode(&bytes)?;
    prepare(&img)
}
