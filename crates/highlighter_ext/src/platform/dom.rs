//! DOM-backed page, clipboard and asset access for the content script.
use async_trait::async_trait;
use ext_logging::{ext_debug, ext_warn};
use highlighter_core::{Banner, HighlightMarker};
use highlighter_engine::{
    AssetError, AssetLoader, Clipboard, ClipboardError, PageError, PageSurface,
};
use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, HtmlDocument, HtmlElement, HtmlTextAreaElement, Response, Selection, Window,
};

use super::chrome::runtime_url;
use super::js_error;

const BANNER_STYLE: &str = "position: fixed; top: 20px; right: 20px; z-index: 2147483647; \
    padding: 12px 16px; border-radius: 6px; background: #323232; color: #fff; \
    font: 14px/1.4 sans-serif; box-shadow: 0 2px 8px rgba(0, 0, 0, 0.3);";

const STAGING_STYLE: &str = "position: fixed; top: 0; left: -9999px; opacity: 0;";

/// The live document of the tab.
pub struct DomPage {
    window: Window,
    document: Document,
}

impl DomPage {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    fn selection(&self) -> Option<Selection> {
        self.window.get_selection().ok().flatten()
    }

    fn html_element(&self, tag: &str) -> Result<HtmlElement, JsValue> {
        self.document
            .create_element(tag)?
            .dyn_into::<HtmlElement>()
            .map_err(JsValue::from)
    }

    fn append_banner(&self, banner: &Banner) -> Result<(), JsValue> {
        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        let element = self.html_element("div")?;
        element.set_attribute("style", BANNER_STYLE)?;
        element.set_text_content(Some(&banner.message));
        body.append_child(&element)?;

        let dismiss = Closure::once_into_js(move || element.remove());
        let delay = i32::try_from(banner.duration_ms).unwrap_or(i32::MAX);
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                dismiss.unchecked_ref::<Function>(),
                delay,
            )?;
        Ok(())
    }
}

impl PageSurface for DomPage {
    fn selected_text(&self) -> Option<String> {
        let selection = self.selection()?;
        if selection.range_count() == 0 {
            return None;
        }
        Some(String::from(selection.to_string()))
    }

    fn mark_selection(&mut self, marker: &HighlightMarker) -> Result<(), PageError> {
        let selection = self.selection().ok_or(PageError::NoSelection)?;
        if selection.range_count() == 0 {
            return Err(PageError::NoSelection);
        }
        let dom = |err: JsValue| PageError::Dom(js_error(err));

        let range = selection.get_range_at(0).map_err(dom)?;
        let span = self.html_element("span").map_err(dom)?;
        span.set_class_name(&marker.class_name);
        span.style()
            .set_property("background-color", &marker.background)
            .map_err(dom)?;
        span.set_text_content(Some(&marker.decorated));

        range.delete_contents().map_err(dom)?;
        range.insert_node(&span).map_err(dom)?;
        Ok(())
    }

    fn clear_selection(&mut self) {
        if let Some(selection) = self.selection() {
            if let Err(err) = selection.remove_all_ranges() {
                ext_debug!("clearing selection failed: {}", js_error(err));
            }
        }
    }

    fn document_html(&self) -> String {
        self.document
            .document_element()
            .map(|root| root.outer_html())
            .unwrap_or_default()
    }

    fn show_banner(&mut self, banner: &Banner) {
        if let Err(err) = self.append_banner(banner) {
            ext_warn!("banner not shown: {}", js_error(err));
        }
    }
}

/// Copies through a hidden textarea and the `copy` editing command, which
/// works from content scripts without the async clipboard permission.
pub struct DomClipboard {
    document: Document,
}

impl DomClipboard {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn exec_copy(&self) -> Result<bool, JsValue> {
        self.document
            .dyn_ref::<HtmlDocument>()
            .ok_or_else(|| JsValue::from_str("document does not support editing commands"))?
            .exec_command("copy")
    }
}

impl Clipboard for DomClipboard {
    fn copy_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let staging = |err: JsValue| ClipboardError::StagingUnavailable(js_error(err));

        let body = self.document.body().ok_or_else(|| {
            ClipboardError::StagingUnavailable("document has no body".to_string())
        })?;
        let area = self
            .document
            .create_element("textarea")
            .map_err(staging)?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(|_| ClipboardError::StagingUnavailable("not a textarea".to_string()))?;
        area.set_attribute("style", STAGING_STYLE).map_err(staging)?;
        area.set_value(text);
        body.append_child(&area).map_err(staging)?;
        area.select();

        let copied = self.exec_copy();
        area.remove();

        match copied {
            Ok(true) => Ok(()),
            Ok(false) => Err(ClipboardError::CopyRejected(
                "the browser refused the copy command".to_string(),
            )),
            Err(err) => Err(ClipboardError::CopyRejected(js_error(err))),
        }
    }
}

/// Fetches files packaged with the extension.
pub struct FetchAssetLoader {
    window: Window,
}

impl FetchAssetLoader {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

#[async_trait(?Send)]
impl AssetLoader for FetchAssetLoader {
    async fn load_text(&self, path: &str) -> Result<String, AssetError> {
        let url = runtime_url(path);
        ext_debug!("fetching asset {url}");
        let network = |err: JsValue| AssetError::Network(js_error(err));

        let response: Response = JsFuture::from(self.window.fetch_with_str(&url))
            .await
            .map_err(network)?
            .dyn_into()
            .map_err(network)?;

        let status = response.status();
        if status == 404 {
            return Err(AssetError::NotFound(path.to_string()));
        }
        if !response.ok() {
            return Err(AssetError::HttpStatus {
                path: path.to_string(),
                status,
            });
        }

        let text = JsFuture::from(response.text().map_err(network)?)
            .await
            .map_err(network)?;
        text.as_string().ok_or_else(|| AssetError::Decode {
            path: path.to_string(),
            encoding: "utf-8".to_string(),
        })
    }
}
