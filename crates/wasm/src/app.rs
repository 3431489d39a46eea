//! The browser application: navigator, DOM listeners and page updates.

use crate::browser::{BrowserFetch, BrowserHistory, defer_scroll, read_descriptors};
use crate::config::{SiteConfig, from_js};
use mark_nav::{
    Click, ClickTarget, Effect, Intent, LOADING_TITLE, Modifiers, Navigator, Site, View, classify,
    load,
};
use mark_render::{Element as TreeElement, Node, render_document, render_toc, to_html};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, MouseEvent, Window};

struct App {
    navigator: Navigator<BrowserHistory>,
    config: SiteConfig,
    site: Site,
    window: Window,
    document: Document,
}

type Shared = Rc<RefCell<App>>;

fn js_error(context: &str, err: JsValue) -> JsError {
    JsError::new(&format!("{}: {:?}", context, err))
}

/// A markdown site mounted in the current page.
#[wasm_bindgen]
pub struct MarkApp {
    app: Shared,
}

#[wasm_bindgen]
impl MarkApp {
    /// Reads the site descriptors and prepares the navigator. Nothing is
    /// fetched until [`MarkApp::start`].
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<MarkApp, JsError> {
        let config: SiteConfig = from_js(config)?;
        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("no document"))?;
        let site = Site::from_descriptors(read_descriptors(&document));
        let navigator = Navigator::new(BrowserHistory::new(window.clone()));

        Ok(MarkApp {
            app: Rc::new(RefCell::new(App {
                navigator,
                config,
                site,
                window,
                document,
            })),
        })
    }

    /// Subscribes to clicks and history changes and loads the current
    /// location.
    pub fn start(&self) -> Result<(), JsError> {
        let (window, document) = {
            let app = self.app.borrow();
            (app.window.clone(), app.document.clone())
        };

        let app = Rc::clone(&self.app);
        let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            handle_click(&app, &event);
        });
        document
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            .map_err(|e| js_error("click listener", e))?;
        on_click.forget();

        let app = Rc::clone(&self.app);
        let on_popstate = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            let effects = app.borrow_mut().navigator.dispatch(Intent::HistoryRestore);
            run_effects(&app, effects, None);
        });
        window
            .add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref())
            .map_err(|e| js_error("popstate listener", e))?;
        on_popstate.forget();

        let effects = self.app.borrow_mut().navigator.start();
        run_effects(&self.app, effects, None);
        Ok(())
    }

    /// Navigates to `href` as if a link to it was clicked.
    pub fn navigate(&self, href: &str) {
        let effects = self.app.borrow_mut().navigator.dispatch(Intent::InternalLink {
            href: href.to_string(),
        });
        run_effects(&self.app, effects, None);
    }

    /// The normalized site descriptors.
    pub fn site(&self) -> Result<JsValue, JsError> {
        self.app
            .borrow()
            .site
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }
}

fn click_target(element: &Element) -> (ClickTarget, Option<Element>) {
    let anchor = element.closest("a[href]").ok().flatten().map(|anchor| {
        (
            anchor.get_attribute("href").unwrap_or_default(),
            anchor.get_attribute("target"),
        )
    });
    let image = element
        .tag_name()
        .eq_ignore_ascii_case("img")
        .then(|| element.has_attribute("active"));

    let target = ClickTarget::pick(anchor, image);
    let image = matches!(target, ClickTarget::Image { .. }).then(|| element.clone());
    (target, image)
}

fn handle_click(app: &Shared, event: &MouseEvent) {
    let Some(element) = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
    else {
        return;
    };
    let (target, image) = click_target(&element);
    let click = Click {
        target,
        modifiers: Modifiers {
            alt: event.alt_key(),
            ctrl: event.ctrl_key(),
            meta: event.meta_key(),
            shift: event.shift_key(),
        },
        default_prevented: event.default_prevented(),
    };

    let Some(intent) = classify(&click) else {
        return;
    };
    event.prevent_default();
    let effects = app.borrow_mut().navigator.dispatch(intent);
    run_effects(app, effects, image.as_ref());
}

fn run_effects(app: &Shared, effects: Vec<Effect>, image: Option<&Element>) {
    for effect in effects {
        match effect {
            Effect::Fetch { ticket, url, token } => {
                show(&app.borrow());
                let app = Rc::clone(app);
                spawn_local(async move {
                    let result = load(&BrowserFetch, &url, &token).await;
                    let effects = app.borrow_mut().navigator.complete(ticket, result);
                    if !effects.is_empty() {
                        show(&app.borrow());
                    }
                    run_effects(&app, effects, None);
                });
            }
            Effect::Scroll(scroll) => {
                defer_scroll(scroll, app.borrow().config.content_id.clone())
            }
            Effect::OpenExternal { href, target } => {
                let opened = app
                    .borrow()
                    .window
                    .open_with_url_and_target(&href, &target);
                if let Err(err) = opened {
                    log::warn!("window.open failed for {}: {:?}", href, err);
                }
            }
            Effect::SetImageActive(active) => {
                let Some(image) = image else { continue };
                let toggled = if active {
                    image.set_attribute("active", "")
                } else {
                    image.remove_attribute("active")
                };
                if let Err(err) = toggled {
                    log::warn!("Toggling image failed: {:?}", err);
                }
            }
        }
    }
}

/// Replaces the page content with the navigator's current view.
fn show(app: &App) {
    let Some(content) = app.document.get_element_by_id(&app.config.content_id) else {
        log::warn!("No #{} element to render into", app.config.content_id);
        return;
    };
    let toc = app
        .config
        .toc_id
        .as_deref()
        .and_then(|id| app.document.get_element_by_id(id));

    match app.navigator.view() {
        View::Document { source } => {
            let document = render_document(source, &app.config.render);
            for diagnostic in &document.diagnostics.entries {
                log::warn!(
                    "{}:{}: {}",
                    diagnostic.location.line,
                    diagnostic.location.column,
                    diagnostic.message
                );
            }
            content.set_inner_html(&to_html(&document.tree));
            if let Some(toc) = toc {
                toc.set_inner_html(&to_html(&render_toc(source, &app.config.render)));
            }
            set_title(app, app.site.page_title(document.title()));
        }
        view => {
            let placeholder = view.placeholder().unwrap_or(LOADING_TITLE);
            let heading: Node = TreeElement::new("h1").child(Node::text(placeholder)).into();
            content.set_inner_html(&to_html(&[heading]));
            if let Some(toc) = toc {
                toc.set_inner_html("");
            }
            set_title(app, Some(placeholder));
        }
    }
}

fn set_title(app: &App, page: Option<&str>) {
    let title = match (page, app.site.title.as_deref()) {
        (Some(page), Some(site)) if page != site => format!("{} | {}", page, site),
        (Some(page), _) => page.to_string(),
        (None, Some(site)) => site.to_string(),
        (None, None) => return,
    };
    app.document.set_title(&title);
}
