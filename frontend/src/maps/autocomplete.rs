use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::json;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Function;
use web_sys::HtmlInputElement;

use crate::config;
use crate::maps::bindings::{self, Autocomplete, AutocompleteService};

pub const MIN_QUERY_CHARS: usize = 3;
pub const MAX_SUGGESTIONS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutocompleteMode {
    Widget,
    Fallback,
}

pub fn is_phone(viewport_width: f64) -> bool {
    viewport_width <= config::PHONE_MAX_WIDTH
}

/// Phones always get the fallback panel. Elsewhere the widget is tried first
/// and the panel only steps in when `try_widget` reports failure.
pub fn choose_mode(viewport_width: f64, try_widget: impl FnOnce() -> bool) -> AutocompleteMode {
    if is_phone(viewport_width) {
        return AutocompleteMode::Fallback;
    }
    if try_widget() {
        AutocompleteMode::Widget
    } else {
        AutocompleteMode::Fallback
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressSuggestion {
    pub description: String,
}

/// State of one input's floating suggestion list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionPanel {
    latest_query: String,
    suggestions: Vec<AddressSuggestion>,
}

impl SuggestionPanel {
    pub fn is_open(&self) -> bool {
        !self.suggestions.is_empty()
    }

    pub fn suggestions(&self) -> &[AddressSuggestion] {
        &self.suggestions
    }

    /// Records the latest input. Returns the query to send, if it is long
    /// enough to be worth asking about.
    pub fn on_input(&mut self, raw: &str) -> Option<String> {
        let query = raw.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            self.latest_query.clear();
            self.close();
            return None;
        }
        self.latest_query = query.to_string();
        Some(self.latest_query.clone())
    }

    /// Applies an answer unless the input moved on since it was asked.
    pub fn on_response(&mut self, query: &str, answer: Result<Vec<AddressSuggestion>, String>) -> bool {
        if query != self.latest_query {
            debug!("Ignoring suggestions for outdated query {:?}", query);
            return false;
        }
        match answer {
            Ok(mut suggestions) => {
                suggestions.truncate(MAX_SUGGESTIONS);
                self.suggestions = suggestions;
            }
            Err(status) => {
                debug!("Place predictions status {}", status);
                self.close();
            }
        }
        true
    }

    pub fn select(&mut self, index: usize) -> Option<String> {
        let picked = self.suggestions.get(index).map(|s| s.description.clone());
        if picked.is_some() {
            self.close();
        }
        picked
    }

    pub fn close(&mut self) {
        self.suggestions.clear();
    }
}

/// Free-text address predictions. `Err` carries the service status.
pub trait SuggestionSource {
    fn predictions(&self, query: &str) -> LocalBoxFuture<'static, Result<Vec<AddressSuggestion>, String>>;
}

pub struct GooglePredictions {
    service: AutocompleteService,
}

impl GooglePredictions {
    pub fn new() -> Option<Self> {
        if !bindings::places_service_available() {
            return None;
        }
        match AutocompleteService::new() {
            Ok(service) => Some(Self { service }),
            Err(e) => {
                warn!("AutocompleteService unavailable: {:?}", e);
                None
            }
        }
    }
}

impl SuggestionSource for GooglePredictions {
    fn predictions(&self, query: &str) -> LocalBoxFuture<'static, Result<Vec<AddressSuggestion>, String>> {
        let request = serde_wasm_bindgen::to_value(&json!({
            "input": query,
            "types": ["address"],
            "componentRestrictions": { "country": config::MAPS_COUNTRY },
        }));
        let request = match request {
            Ok(request) => request,
            Err(e) => return futures::future::ready(Err(e.to_string())).boxed_local(),
        };

        let (tx, rx) = oneshot::channel();
        let callback = Closure::once_into_js(move |predictions: JsValue, status: JsValue| {
            let status = status.as_string().unwrap_or_default();
            let answer = if status == "OK" {
                serde_wasm_bindgen::from_value::<Option<Vec<AddressSuggestion>>>(predictions)
                    .map(Option::unwrap_or_default)
                    .map_err(|e| e.to_string())
            } else {
                Err(status)
            };
            let _ = tx.send(answer);
        });
        let sent = self
            .service
            .get_place_predictions(&request, callback.unchecked_ref::<Function>());

        async move {
            if let Err(e) = sent {
                return Err(format!("{:?}", e));
            }
            rx.await.unwrap_or_else(|_| Err("CANCELLED".to_string()))
        }
        .boxed_local()
    }
}

#[derive(Deserialize)]
struct PlaceResult {
    formatted_address: Option<String>,
}

/// Hooks the Places widget onto `input`. `on_place` receives the formatted
/// address of each picked place. Returns false if the widget could not be
/// attached.
pub fn attach_widget(input: &HtmlInputElement, on_place: Rc<dyn Fn(String)>) -> bool {
    if !bindings::places_widget_available() {
        return false;
    }
    let options = serde_wasm_bindgen::to_value(&json!({
        "fields": ["place_id", "formatted_address", "geometry"],
        "types": ["address"],
        "componentRestrictions": { "country": [config::MAPS_COUNTRY] },
    }));
    let Ok(options) = options else {
        return false;
    };

    let _ = input.set_attribute("autocomplete", "off");
    let widget = match Autocomplete::new(input, &options) {
        Ok(widget) => widget,
        Err(e) => {
            warn!("Places widget failed to attach: {:?}", e);
            return false;
        }
    };

    let listener_widget = widget.clone();
    let listener = Closure::<dyn Fn()>::new(move || {
        let place = serde_wasm_bindgen::from_value::<PlaceResult>(listener_widget.get_place());
        if let Ok(PlaceResult { formatted_address: Some(address) }) = place {
            on_place(address);
        }
    });
    widget.add_listener("place_changed", listener.as_ref().unchecked_ref());
    listener.forget();
    true
}
