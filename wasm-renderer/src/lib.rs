//! Browser binding: paints the heat overlay straight into the page's DOM.
//!
//! The page is expected to contain a `#code` container. Once the listing is
//! injected, each row is a `[data-line="N"]` marker followed by a `.code`
//! sibling.

use glance::render::{LineScoreRenderer, RenderError, RenderPort, CONTAINER_SELECTOR};
use glance::source::{decode_payload, SourceError};
use glance::RenderPayload;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, DocumentReadyState, HtmlElement, Response, UrlSearchParams};

const GLANCE_PATH: &str = "/glance";

/// [`RenderPort`] over a live document.
pub struct DomPort {
    document: Document,
}

impl DomPort {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl RenderPort for DomPort {
    fn set_container_markup(&mut self, html: &str) -> Result<(), RenderError> {
        let container = self
            .document
            .query_selector(CONTAINER_SELECTOR)
            .ok()
            .flatten()
            .ok_or_else(|| RenderError::MissingContainer(CONTAINER_SELECTOR.to_string()))?;
        container.set_inner_html(html);
        Ok(())
    }

    fn set_row_color(&mut self, line_number: usize, color: &str) -> bool {
        let selector = format!("[data-line=\"{}\"] + .code", line_number);
        let row = match self.document.query_selector(&selector) {
            Ok(Some(row)) => row,
            _ => return false,
        };
        match row.dyn_into::<HtmlElement>() {
            Ok(row) => row.style().set_property("background-color", color).is_ok(),
            Err(_) => false,
        }
    }
}

/// Payloads fetched from the page's own origin.
pub struct FetchSource {
    path: String,
}

impl Default for FetchSource {
    fn default() -> Self {
        Self { path: GLANCE_PATH.to_string() }
    }
}

impl FetchSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    fn request_url(&self, file: &str) -> String {
        let encoded: String = js_sys::encode_uri_component(file).into();
        format!("{}?file={}", self.path, encoded)
    }

    /// Async counterpart of `LineScoreSource::fetch_line_scores`.
    pub async fn fetch_line_scores(&self, file: &str) -> Result<RenderPayload, SourceError> {
        let window = web_sys::window().ok_or_else(|| network("window unavailable"))?;
        let url = self.request_url(file);

        let response = JsFuture::from(window.fetch_with_str(&url))
            .await
            .map_err(|e| network(&describe(&e)))?;
        let response: Response = response
            .dyn_into()
            .map_err(|_| network("fetch did not return a Response"))?;

        let text = response.text().map_err(|e| network(&describe(&e)))?;
        let body = JsFuture::from(text)
            .await
            .map_err(|e| network(&describe(&e)))?
            .as_string()
            .ok_or_else(|| SourceError::Decode("response body is not text".to_string()))?;

        decode_payload(&body)
    }
}

fn network(msg: &str) -> SourceError {
    SourceError::Network(msg.to_string())
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))
}

/// Render a payload object (same shape as the `/glance` response) into the
/// current document. Returns `{ scored, painted, skipped }`.
#[wasm_bindgen(js_name = render)]
pub fn render_payload(payload: JsValue) -> Result<JsValue, JsValue> {
    let payload: RenderPayload = serde_wasm_bindgen::from_value(payload)?;
    let mut port = DomPort::new(document()?);
    let outcome = LineScoreRenderer::new()
        .render(&payload, &mut port)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let summary = js_sys::Object::new();
    js_sys::Reflect::set(&summary, &"scored".into(), &(outcome.scored_lines as u32).into())?;
    js_sys::Reflect::set(&summary, &"painted".into(), &(outcome.painted_rows as u32).into())?;
    js_sys::Reflect::set(&summary, &"skipped".into(), &(outcome.skipped_rows as u32).into())?;
    Ok(summary.into())
}

/// The `file` parameter of a location search string, unvalidated. Empty
/// when absent.
fn requested_file(search: &str) -> Result<String, JsValue> {
    Ok(UrlSearchParams::new_with_str(search)?
        .get("file")
        .unwrap_or_default())
}

/// Read `?file=`, fetch its scores and paint them.
#[wasm_bindgen]
pub async fn initialize() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
    let file = requested_file(&window.location().search()?)?;

    let payload = FetchSource::default()
        .fetch_line_scores(&file)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let mut port = DomPort::new(document()?);
    LineScoreRenderer::new()
        .render(&payload, &mut port)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(())
}

fn spawn_initialize() {
    spawn_local(async {
        if let Err(e) = initialize().await {
            web_sys::console::error_2(&"glance:".into(), &e);
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let document = document()?;
    if document.ready_state() != DocumentReadyState::Loading {
        spawn_initialize();
        return Ok(());
    }

    let on_ready = Closure::once(spawn_initialize);
    document.add_event_listener_with_callback(
        "DOMContentLoaded",
        on_ready.as_ref().unchecked_ref(),
    )?;
    on_ready.forget();
    Ok(())
}
