//! Content script: one page agent per tab.
use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use ext_logging::{ext_debug, ext_info, ext_warn};
use highlighter_core::{ActionMessage, AgentResponse};
use highlighter_engine::{read_flag, Dispatch, PageAgent};
use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::Event;

use super::chrome::{self, to_js, ChromeStorage};
use super::dom::{DomClipboard, DomPage, FetchAssetLoader};
use super::{js_anyhow, js_error};
use crate::bundled_config;

type ContentAgent = PageAgent<DomPage, DomClipboard, FetchAssetLoader>;
type SharedAgent = Rc<RefCell<ContentAgent>>;

pub fn start() -> anyhow::Result<()> {
    let config = bundled_config()?;
    let window = web_sys::window().context("content script has no window")?;
    let document = window.document().context("content script has no document")?;

    let agent = PageAgent::new(
        config.agent_options(),
        DomPage::new(window.clone(), document.clone()),
        DomClipboard::new(document.clone()),
        FetchAssetLoader::new(window),
        Box::new(config.extractor()),
    );
    let agent: SharedAgent = Rc::new(RefCell::new(agent));

    let on_mouseup = {
        let agent = Rc::clone(&agent);
        Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            run_or_defer(&agent, |agent| agent.pointer_released());
        })
    };
    document
        .add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref())
        .map_err(js_anyhow)?;
    on_mouseup.forget();

    {
        let agent = Rc::clone(&agent);
        chrome::on_message(move |message, _sender, send_response| {
            on_message(&agent, message, send_response)
        });
    }

    let key = config.settings_key;
    spawn_local(async move {
        let stored = match read_flag(&ChromeStorage, &key).await {
            Ok(stored) => stored,
            Err(err) => {
                ext_warn!("reading {key} failed, using default: {err}");
                None
            }
        };
        with_agent(&agent, |agent| agent.settings_loaded(stored)).await;
    });

    ext_info!("page agent ready");
    Ok(())
}

/// Returns `true` when the reply is sent after the listener returns.
fn on_message(agent: &SharedAgent, message: JsValue, send_response: Function) -> bool {
    let message: ActionMessage = match serde_wasm_bindgen::from_value(message) {
        Ok(message) => message,
        Err(err) => {
            ext_debug!("ignoring unknown message: {err}");
            return false;
        }
    };

    let Ok(mut borrowed) = agent.try_borrow_mut() else {
        ext_debug!("{} queued, agent busy", message.name());
        let agent = Rc::clone(agent);
        spawn_local(async move {
            let dispatch = with_agent(&agent, |agent| agent.dispatch(message)).await;
            respond(&agent, dispatch, send_response);
        });
        return true;
    };
    let dispatch = borrowed.dispatch(message);
    drop(borrowed);
    respond(agent, dispatch, send_response)
}

/// Sends the reply for `dispatch`. Returns `true` when it goes out later.
fn respond(agent: &SharedAgent, dispatch: Dispatch, send_response: Function) -> bool {
    match dispatch {
        Dispatch::Immediate(response) => {
            if response.is_some() {
                reply(&send_response, response);
            }
            false
        }
        Dispatch::Deferred(pending) => {
            let agent = Rc::clone(agent);
            spawn_local(async move {
                let loaded = pending.loaded().await;
                let response = with_agent(&agent, |agent| agent.complete_copy(loaded)).await;
                reply(&send_response, response);
            });
            true
        }
    }
}

/// Runs `job` now, or from a task once the agent is free.
fn run_or_defer(agent: &SharedAgent, job: impl FnOnce(&mut ContentAgent) + 'static) {
    match agent.try_borrow_mut() {
        Ok(mut borrowed) => job(&mut borrowed),
        Err(_) => {
            let agent = Rc::clone(agent);
            spawn_local(async move { with_agent(&agent, job).await });
        }
    }
}

/// Runs `job` once the agent is free. Borrows never span an await, so a busy
/// agent is released by the end of the current task.
async fn with_agent<T>(agent: &SharedAgent, job: impl FnOnce(&mut ContentAgent) -> T) -> T {
    loop {
        if let Ok(mut borrowed) = agent.try_borrow_mut() {
            return job(&mut borrowed);
        }
        // Yield to the microtask queue.
        let tick = JsFuture::from(Promise::resolve(&JsValue::UNDEFINED)).await;
        if let Err(err) = tick {
            ext_debug!("yield failed: {}", js_error(err));
        }
    }
}

fn reply(send_response: &Function, response: Option<AgentResponse>) {
    let value = match response.as_ref().map(to_js).transpose() {
        Ok(value) => value.unwrap_or(JsValue::UNDEFINED),
        Err(err) => {
            ext_warn!("reply not encoded: {err}");
            JsValue::UNDEFINED
        }
    };
    if let Err(err) = send_response.call1(&JsValue::UNDEFINED, &value) {
        ext_debug!("reply not delivered: {}", js_error(err));
    }
}
