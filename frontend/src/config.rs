use log::info;

/// Google Maps browser key, baked in at build time. An empty key still
/// loads the page, the maps integration just never becomes usable.
pub const MAPS_API_KEY: &str = match option_env!("GOOGLE_MAPS_API_KEY") {
    Some(key) => key,
    None => "",
};

/// Global callback name the maps script invokes once it is ready.
pub const MAPS_READY_CALLBACK: &str = "__mapsReady";
/// Id of the injected `<script>` tag, doubles as the "already loading" marker.
pub const MAPS_LOADER_ID: &str = "gmap-loader";
pub const MAPS_COUNTRY: &str = "nl";

pub const MAP_CENTER_LAT: f64 = 52.379189;
pub const MAP_CENTER_LNG: f64 = 4.899431;
pub const MAP_ZOOM: u8 = 13;

pub const PHONE: &str = "0650680749";
pub const PHONE_HREF: &str = "tel:0650680749";
pub const WHATSAPP_HREF: &str = "https://wa.me/31650680749";
pub const EMAIL: &str = "info@taxi951.nl";
pub const EMAIL_HREF: &str = "mailto:info@taxi951.nl";

/// Viewports at or below this width count as phones.
pub const PHONE_MAX_WIDTH: f64 = 480.0;
/// Above this width the hamburger menu is never shown.
pub const MENU_COLLAPSE_WIDTH: f64 = 768.0;

pub fn maps_script_url() -> String {
    format!(
        "https://maps.googleapis.com/maps/api/js?key={}&libraries=places&callback={}",
        urlencoding::encode(MAPS_API_KEY),
        MAPS_READY_CALLBACK
    )
}

#[cfg(debug_assertions)]
pub fn log_maps_key() {
    let prefix: String = MAPS_API_KEY.chars().take(6).collect();
    info!("GMAPS KEY OK: {}", prefix);
}

#[cfg(not(debug_assertions))]
pub fn log_maps_key() {
    if MAPS_API_KEY.is_empty() {
        info!("No maps key configured, address lookups are disabled");
    }
}
