//! Browser implementations of the navigation seams.

use async_trait::async_trait;
use mark_nav::{
    Cancellation, Fetch, FetchError, FetchResponse, History, NavigationState, Scroll,
    SiteDescriptors,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Document, Element, RequestInit, Response, Window};

fn transport(err: JsValue) -> FetchError {
    FetchError::Transport(format!("{:?}", err))
}

/// `window.fetch`, aborted through an `AbortController` on cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserFetch;

// Note: Using ?Send because WASM is single-threaded and JsFuture is not Send
#[async_trait(?Send)]
impl Fetch for BrowserFetch {
    async fn get(&self, url: &str, token: &Cancellation) -> Result<FetchResponse, FetchError> {
        let window = web_sys::window().ok_or_else(|| FetchError::Transport("no window".into()))?;

        let controller = AbortController::new().map_err(transport)?;
        let init = RequestInit::new();
        init.set_signal(Some(&controller.signal()));
        token.on_cancel(move || controller.abort());

        let response = match JsFuture::from(window.fetch_with_str_and_init(url, &init)).await {
            Ok(response) => response,
            Err(_) if token.is_cancelled() => return Err(FetchError::Cancelled),
            Err(err) => return Err(transport(err)),
        };
        let response: Response = response.dyn_into().map_err(transport)?;
        let status = response.status();

        let text = JsFuture::from(response.text().map_err(transport)?)
            .await
            .map_err(|err| {
                if token.is_cancelled() {
                    FetchError::Cancelled
                } else {
                    transport(err)
                }
            })?;

        Ok(FetchResponse {
            status,
            text: text.as_string().unwrap_or_default(),
        })
    }
}

/// The window's session history.
#[derive(Debug, Clone)]
pub struct BrowserHistory {
    window: Window,
}

impl BrowserHistory {
    /// Wraps the history of `window`.
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl History for BrowserHistory {
    fn current(&self) -> NavigationState {
        let location = self.window.location();
        let path = location.pathname().unwrap_or_else(|_| "/".to_string());
        let hash = location.hash().unwrap_or_default();
        NavigationState::new(path, &hash)
    }

    fn push(&mut self, state: &NavigationState) {
        let title = self
            .window
            .document()
            .map(|document| document.title())
            .unwrap_or_default();
        let href = state.href();
        let pushed = self.window.history().and_then(|history| {
            history.push_state_with_url(&JsValue::NULL, &title, Some(href.as_str()))
        });
        if let Err(err) = pushed {
            log::warn!("history.pushState failed: {:?}", err);
        }
    }
}

fn query_attribute(document: &Document, selector: &str, attribute: &str) -> Option<String> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.get_attribute(attribute))
}

fn meta(document: &Document, name: &str) -> Option<String> {
    query_attribute(document, &format!("meta[name=\"{}\"]", name), "content")
}

/// Reads the site descriptors declared in the page head.
pub fn read_descriptors(document: &Document) -> SiteDescriptors {
    SiteDescriptors {
        title: Some(document.title()),
        icon: query_attribute(document, "link[rel=\"icon\"]", "href"),
        home: query_attribute(document, "link[rel=\"home\"]", "href"),
        description: meta(document, "description"),
        version: meta(document, "version"),
        creator: meta(document, "creator"),
        publisher: meta(document, "publisher"),
        copyright: meta(document, "copyright"),
        license: meta(document, "license"),
        license_uri: meta(document, "license:uri"),
        sections: document
            .query_selector("script[type=\"application/json\"]")
            .ok()
            .flatten()
            .and_then(|script| script.text_content()),
    }
}

/// The nearest element, starting at `element`, whose content overflows it.
fn scrolling_container(element: Element) -> Option<Element> {
    let mut current = Some(element);
    while let Some(element) = current {
        if element.scroll_height() > element.client_height() {
            return Some(element);
        }
        current = element.parent_element();
    }
    None
}

fn apply_scroll(scroll: &Scroll, container_id: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    match scroll {
        Scroll::Anchor(id) => {
            let id = js_sys::decode_uri_component(id)
                .map(String::from)
                .unwrap_or_else(|_| id.clone());
            let target = window
                .document()
                .and_then(|document| document.get_element_by_id(&id));
            match target {
                Some(element) => element.scroll_into_view(),
                None => log::debug!("No anchor #{} in document", id),
            }
        }
        Scroll::Top => {
            let container = window
                .document()
                .and_then(|document| document.get_element_by_id(container_id))
                .and_then(scrolling_container);
            match container {
                Some(container) => container.set_scroll_top(0),
                None => window.scroll_to_with_x_and_y(0.0, 0.0),
            }
        }
    }
}

/// Runs a scroll on the next task, after the document has been replaced.
/// `Scroll::Top` scrolls the element `container_id`, or its nearest
/// scrolling ancestor.
pub fn defer_scroll(scroll: Scroll, container_id: String) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(move || apply_scroll(&scroll, &container_id));
    if let Err(err) = window.set_timeout_with_callback(callback.unchecked_ref()) {
        log::warn!("setTimeout failed: {:?}", err);
    }
}
