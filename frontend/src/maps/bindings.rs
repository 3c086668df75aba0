//! Hand-written bindings for the slice of the Google Maps JS API the site
//! uses. Constructors are `catch` so a half-loaded library surfaces as an
//! `Err` instead of a JS exception.

use wasm_bindgen::prelude::*;
use web_sys::js_sys::{Function, Reflect};
use web_sys::{window, Element, HtmlInputElement};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["google", "maps"])]
    #[derive(Clone, Debug)]
    pub type DirectionsService;

    #[wasm_bindgen(constructor, catch, js_namespace = ["google", "maps"])]
    pub fn new() -> Result<DirectionsService, JsValue>;

    /// `callback(result, status)`
    #[wasm_bindgen(method, catch)]
    pub fn route(this: &DirectionsService, request: &JsValue, callback: &Function) -> Result<JsValue, JsValue>;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["google", "maps"])]
    #[derive(Clone, Debug)]
    pub type DirectionsRenderer;

    #[wasm_bindgen(constructor, catch, js_namespace = ["google", "maps"])]
    pub fn new() -> Result<DirectionsRenderer, JsValue>;

    #[wasm_bindgen(method, js_name = setMap)]
    pub fn set_map(this: &DirectionsRenderer, map: &Map);

    #[wasm_bindgen(method, js_name = setDirections)]
    pub fn set_directions(this: &DirectionsRenderer, directions: &JsValue);
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["google", "maps"])]
    #[derive(Clone, Debug)]
    pub type Map;

    #[wasm_bindgen(constructor, catch, js_namespace = ["google", "maps"])]
    pub fn new(element: &Element, options: &JsValue) -> Result<Map, JsValue>;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["google", "maps", "places"])]
    #[derive(Clone, Debug)]
    pub type Autocomplete;

    #[wasm_bindgen(constructor, catch, js_namespace = ["google", "maps", "places"])]
    pub fn new(input: &HtmlInputElement, options: &JsValue) -> Result<Autocomplete, JsValue>;

    #[wasm_bindgen(method, js_name = addListener)]
    pub fn add_listener(this: &Autocomplete, event: &str, handler: &Function) -> JsValue;

    #[wasm_bindgen(method, js_name = getPlace)]
    pub fn get_place(this: &Autocomplete) -> JsValue;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["google", "maps", "places"])]
    #[derive(Clone, Debug)]
    pub type AutocompleteService;

    #[wasm_bindgen(constructor, catch, js_namespace = ["google", "maps", "places"])]
    pub fn new() -> Result<AutocompleteService, JsValue>;

    /// `callback(predictions, status)`
    #[wasm_bindgen(method, catch, js_name = getPlacePredictions)]
    pub fn get_place_predictions(
        this: &AutocompleteService,
        request: &JsValue,
        callback: &Function,
    ) -> Result<JsValue, JsValue>;
}

/// Walks `window.<path...>`, stopping at the first missing segment.
fn lookup(path: &[&str]) -> Option<JsValue> {
    let mut current: JsValue = window()?.into();
    for key in path {
        current = Reflect::get(&current, &JsValue::from_str(key)).ok()?;
        if current.is_undefined() || current.is_null() {
            return None;
        }
    }
    Some(current)
}

pub fn maps_loaded() -> bool {
    lookup(&["google", "maps"]).is_some()
}

pub fn places_widget_available() -> bool {
    lookup(&["google", "maps", "places", "Autocomplete"]).is_some()
}

pub fn places_service_available() -> bool {
    lookup(&["google", "maps", "places", "AutocompleteService"]).is_some()
}
