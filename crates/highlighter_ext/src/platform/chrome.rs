//! `chrome.*` extension APIs and the engine seams built on them.
use async_trait::async_trait;
use ext_logging::ext_debug;
use highlighter_core::{ActionMessage, AgentResponse};
use highlighter_engine::{SettingsStore, StoreError, TabId, TabMessenger, TransportError};
use js_sys::{Function, Object, Reflect};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use super::js_error;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = get)]
    async fn storage_get(keys: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = set)]
    async fn storage_set(items: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = query)]
    async fn tabs_query(query: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = sendMessage)]
    async fn tabs_send_message(tab: TabId, message: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = create)]
    async fn tabs_create(properties: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    fn add_message_listener(callback: &Function);

    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = getURL)]
    fn runtime_get_url(path: &str) -> String;
}

/// Plain JSON objects on the JS side, not `Map`s.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

/// Absolute URL of a file packaged with the extension.
pub fn runtime_url(path: &str) -> String {
    runtime_get_url(path.trim_start_matches('/'))
}

/// Registers a `runtime.onMessage` handler. The handler returns `true` when
/// it will call `sendResponse` after returning.
pub fn on_message(handler: impl FnMut(JsValue, JsValue, Function) -> bool + 'static) {
    let closure = Closure::<dyn FnMut(JsValue, JsValue, Function) -> bool>::new(handler);
    add_message_listener(closure.as_ref().unchecked_ref());
    // Listeners live as long as the context.
    closure.forget();
}

/// `chrome.storage.sync`.
pub struct ChromeStorage;

#[async_trait(?Send)]
impl SettingsStore for ChromeStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let items = storage_get(&JsValue::from_str(key))
            .await
            .map_err(|err| StoreError::Unavailable(js_error(err)))?;
        let value = Reflect::get(&items, &JsValue::from_str(key))
            .map_err(|err| StoreError::Unavailable(js_error(err)))?;
        if value.is_undefined() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(value)
            .map(Some)
            .map_err(|err| StoreError::Encoding {
                key: key.to_string(),
                message: err.to_string(),
            })
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let encoding = |message: String| StoreError::Encoding {
            key: key.to_string(),
            message,
        };
        let value = to_js(&value).map_err(|err| encoding(err.to_string()))?;
        let items = Object::new();
        Reflect::set(&items, &JsValue::from_str(key), &value)
            .map_err(|err| encoding(js_error(err)))?;
        storage_set(&items)
            .await
            .map_err(|err| StoreError::Unavailable(js_error(err)))?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct TabInfo {
    id: Option<TabId>,
}

/// `chrome.tabs`, addressing the content script of each tab.
pub struct ChromeTabs;

fn encode_message(message: &ActionMessage) -> Result<JsValue, TransportError> {
    to_js(message).map_err(|err| TransportError::Platform(err.to_string()))
}

#[async_trait(?Send)]
impl TabMessenger for ChromeTabs {
    async fn active_tab(&self) -> Result<TabId, TransportError> {
        let query = to_js(&json!({ "active": true, "currentWindow": true }))
            .map_err(|err| TransportError::Platform(err.to_string()))?;
        let tabs = tabs_query(&query)
            .await
            .map_err(|err| TransportError::Platform(js_error(err)))?;
        let tabs: Vec<TabInfo> = serde_wasm_bindgen::from_value(tabs)
            .map_err(|err| TransportError::Platform(err.to_string()))?;
        tabs.into_iter()
            .find_map(|tab| tab.id)
            .ok_or(TransportError::NoActiveTab)
    }

    async fn post(&self, tab: TabId, message: ActionMessage) -> Result<(), TransportError> {
        let payload = encode_message(&message)?;
        let name = message.name();
        spawn_local(async move {
            // Pages without the agent (e.g. browser pages) reject the send.
            if let Err(err) = tabs_send_message(tab, &payload).await {
                ext_debug!("{name} not delivered to tab {tab}: {}", js_error(err));
            }
        });
        Ok(())
    }

    async fn request(
        &self,
        tab: TabId,
        message: ActionMessage,
    ) -> Result<Option<AgentResponse>, TransportError> {
        let payload = encode_message(&message)?;
        let reply = tabs_send_message(tab, &payload)
            .await
            .map_err(|err| TransportError::Platform(js_error(err)))?;
        if reply.is_undefined() || reply.is_null() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(reply)
            .map(Some)
            .map_err(|err| TransportError::Platform(err.to_string()))
    }

    async fn open_tab(&self, url: &str) -> Result<(), TransportError> {
        let properties = to_js(&json!({ "url": url }))
            .map_err(|err| TransportError::Platform(err.to_string()))?;
        tabs_create(&properties)
            .await
            .map_err(|err| TransportError::Platform(js_error(err)))?;
        Ok(())
    }
}
