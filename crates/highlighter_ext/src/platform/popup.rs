//! Popup: checkbox and action buttons.
use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Context};
use ext_logging::{ext_debug, ext_warn};
use highlighter_engine::{Controller, PopupWindow};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, HtmlElement, HtmlInputElement, Window};

use super::chrome::{ChromeStorage, ChromeTabs};
use super::{js_anyhow, js_error};
use crate::bundled_config;

const CHECKBOX_ID: &str = "toggleHighlighter";
const COPY_ID: &str = "copyAllText";
const COPY_WITH_INSTRUCTIONS_ID: &str = "copyWithInstructions";
const OPEN_ASSISTANT_ID: &str = "openAssistant";

type PopupController = Controller<ChromeStorage, ChromeTabs>;
type SharedController = Rc<RefCell<PopupController>>;

struct BrowserPopup(Window);

impl PopupWindow for BrowserPopup {
    fn close(&self) {
        if let Err(err) = self.0.close() {
            ext_warn!("closing popup failed: {}", js_error(err));
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum PopupEvent {
    Opened,
    CheckboxChanged(bool),
    Copy,
    CopyWithInstructions,
    OpenAssistant,
}

pub fn start() -> anyhow::Result<()> {
    let config = bundled_config()?;
    let window = web_sys::window().context("popup has no window")?;
    let document = window.document().context("popup has no document")?;
    let checkbox: HtmlInputElement = element(&document, CHECKBOX_ID)?;

    let controller: SharedController = Rc::new(RefCell::new(Controller::popup(
        config.controller_options(),
        ChromeStorage,
        ChromeTabs,
        &config.settings_key,
        Box::new(BrowserPopup(window)),
    )));

    {
        let controller = Rc::clone(&controller);
        let target = checkbox.clone();
        listen(&checkbox, "change", move || {
            let event = PopupEvent::CheckboxChanged(target.checked());
            spawn_local(serve(Rc::clone(&controller), event, target.clone()));
        })?;
    }

    for (id, event) in [
        (COPY_ID, PopupEvent::Copy),
        (COPY_WITH_INSTRUCTIONS_ID, PopupEvent::CopyWithInstructions),
        (OPEN_ASSISTANT_ID, PopupEvent::OpenAssistant),
    ] {
        let button: HtmlElement = element(&document, id)?;
        let controller = Rc::clone(&controller);
        let checkbox = checkbox.clone();
        listen(&button, "click", move || {
            spawn_local(serve(Rc::clone(&controller), event, checkbox.clone()));
        })?;
    }

    spawn_local(serve(controller, PopupEvent::Opened, checkbox));
    Ok(())
}

fn element<T: JsCast>(document: &Document, id: &str) -> anyhow::Result<T> {
    document
        .get_element_by_id(id)
        .with_context(|| format!("popup is missing #{id}"))?
        .dyn_into::<T>()
        .map_err(|_| anyhow!("#{id} has an unexpected element type"))
}

fn listen(
    target: &web_sys::EventTarget,
    kind: &str,
    mut handler: impl FnMut() + 'static,
) -> anyhow::Result<()> {
    let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| handler());
    target
        .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        .map_err(js_anyhow)?;
    closure.forget();
    Ok(())
}

// One controller action at a time; a second click while a request is in
// flight is dropped.
#[allow(clippy::await_holding_refcell_ref)]
async fn serve(controller: SharedController, event: PopupEvent, checkbox: HtmlInputElement) {
    let Ok(mut controller) = controller.try_borrow_mut() else {
        ext_debug!("{event:?} ignored, controller busy");
        if let PopupEvent::CheckboxChanged(checked) = event {
            checkbox.set_checked(!checked);
        }
        return;
    };
    match event {
        PopupEvent::Opened => checkbox.set_checked(controller.popup_opened().await),
        PopupEvent::CheckboxChanged(checked) => controller.on_checkbox_changed(checked).await,
        PopupEvent::Copy => controller.copy_clicked().await,
        PopupEvent::CopyWithInstructions => controller.copy_with_instructions_clicked().await,
        PopupEvent::OpenAssistant => controller.open_assistant_clicked().await,
    }
}
