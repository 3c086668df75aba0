use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use log::{error, warn};
use serde::Deserialize;
use serde_json::json;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Function;
use web_sys::{window, HtmlElement};

use crate::config;
use crate::fare::route::{RouteResolver, RouteResult};
use crate::maps::bindings::{self, DirectionsRenderer, DirectionsService, Map};
use crate::maps::loader::MapsHandle;

const STATUS_OK: &str = "OK";

#[derive(Debug, Default, Deserialize)]
pub struct DirectionsPayload {
    #[serde(default)]
    pub routes: Vec<RoutePayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RoutePayload {
    #[serde(default)]
    pub legs: Vec<LegPayload>,
}

#[derive(Debug, Deserialize)]
pub struct LegPayload {
    pub distance: Measure,
    pub duration: Measure,
}

#[derive(Debug, Deserialize)]
pub struct Measure {
    pub value: f64,
}

/// Reads the first leg of the first route out of a directions answer.
pub fn route_from_response(status: &str, payload: Option<DirectionsPayload>) -> Option<RouteResult> {
    if status != STATUS_OK {
        error!("DirectionsService status: {}", status);
        return None;
    }
    let leg = payload?.routes.into_iter().next()?.legs.into_iter().next();
    let Some(leg) = leg else {
        error!("DirectionsService returned OK without a route leg");
        return None;
    };
    let route = RouteResult::from_leg(leg.distance.value, leg.duration.value);
    if route.is_none() {
        warn!(
            "Discarding unusable leg: {} m, {} s",
            leg.distance.value, leg.duration.value
        );
    }
    route
}

fn driving_request(origin: &str, destination: &str) -> Result<JsValue, serde_wasm_bindgen::Error> {
    serde_wasm_bindgen::to_value(&json!({
        "origin": origin,
        "destination": destination,
        "travelMode": "DRIVING",
    }))
}

/// Calls `DirectionsService.route` and hands back the raw `(result, status)`.
async fn request_directions(origin: &str, destination: &str) -> Option<(JsValue, String)> {
    let service = match DirectionsService::new() {
        Ok(service) => service,
        Err(e) => {
            error!("DirectionsService unavailable: {:?}", e);
            return None;
        }
    };
    let request = match driving_request(origin, destination) {
        Ok(request) => request,
        Err(e) => {
            error!("Could not build directions request: {}", e);
            return None;
        }
    };

    let (tx, rx) = oneshot::channel();
    let callback = Closure::once_into_js(move |result: JsValue, status: JsValue| {
        let status = status.as_string().unwrap_or_default();
        let _ = tx.send((result, status));
    });
    if let Err(e) = service.route(&request, callback.unchecked_ref::<Function>()) {
        error!("DirectionsService.route threw: {:?}", e);
        return None;
    }
    rx.await.ok()
}

/// Routing backed by the Google Maps directions service.
pub struct GoogleDirections {
    maps: MapsHandle,
}

impl GoogleDirections {
    pub fn new(maps: MapsHandle) -> Self {
        Self { maps }
    }
}

impl RouteResolver for GoogleDirections {
    fn resolve_route(&self, origin: &str, destination: &str) -> LocalBoxFuture<'static, Option<RouteResult>> {
        let maps = self.maps.clone();
        let origin = origin.to_string();
        let destination = destination.to_string();
        async move {
            maps.wait_ready().await;
            if !bindings::maps_loaded() {
                warn!("Maps library missing, cannot route {} -> {}", origin, destination);
                return None;
            }
            let (result, status) = request_directions(&origin, &destination).await?;
            let payload = if status == STATUS_OK {
                match serde_wasm_bindgen::from_value::<DirectionsPayload>(result) {
                    Ok(payload) => Some(payload),
                    Err(e) => {
                        error!("Unreadable directions result: {}", e);
                        None
                    }
                }
            } else {
                None
            };
            route_from_response(&status, payload)
        }
        .boxed_local()
    }
}

/// Draws the driving route into `#map`. Purely cosmetic, failures are logged.
pub fn show_route(origin: &str, destination: &str) {
    if !bindings::maps_loaded() {
        warn!("Maps niet geladen");
        return;
    }
    let Some(map_el) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("map"))
    else {
        return;
    };
    if let Some(el) = map_el.dyn_ref::<HtmlElement>() {
        let style = el.style();
        if style.get_property_value("height").unwrap_or_default().is_empty() {
            let _ = style.set_property("height", "360px");
        }
    }

    let options = json!({
        "zoom": config::MAP_ZOOM,
        "center": { "lat": config::MAP_CENTER_LAT, "lng": config::MAP_CENTER_LNG },
    });
    let (Ok(options), Ok(request)) = (
        serde_wasm_bindgen::to_value(&options),
        driving_request(origin, destination),
    ) else {
        error!("Could not serialize map options");
        return;
    };

    let (map, service, renderer) = match (
        Map::new(&map_el, &options),
        DirectionsService::new(),
        DirectionsRenderer::new(),
    ) {
        (Ok(map), Ok(service), Ok(renderer)) => (map, service, renderer),
        _ => {
            error!("Could not create map objects");
            return;
        }
    };
    renderer.set_map(&map);

    let callback = Closure::once_into_js(move |result: JsValue, status: JsValue| {
        if status.as_string().as_deref() == Some(STATUS_OK) {
            renderer.set_directions(&result);
        } else {
            error!("❌ {:?}", status);
        }
    });
    if let Err(e) = service.route(&request, callback.unchecked_ref::<Function>()) {
        error!("DirectionsService.route threw: {:?}", e);
    }
}
