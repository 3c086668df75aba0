use wasm_bindgen::JsCast;
use web_sys::{window, HtmlElement, ScrollBehavior, ScrollToOptions};
use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::config;

pub fn scroll_button_visible(scroll_y: f64, viewport_height: f64) -> bool {
    scroll_y > viewport_height / 2.0
}

/// Bottom offset in px: snug on phones, clear of the footer elsewhere.
pub fn scroll_button_offset(viewport_width: f64, footer_height: f64) -> f64 {
    if viewport_width <= config::PHONE_MAX_WIDTH {
        20.0
    } else {
        footer_height + 40.0
    }
}

fn footer_height() -> f64 {
    window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector("footer").ok().flatten())
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .map(|el| f64::from(el.offset_height()))
        .unwrap_or(0.0)
}

#[function_component(ScrollTop)]
pub fn scroll_top() -> Html {
    let (_, scroll_y) = use_window_scroll();
    let (width, height) = use_window_size();

    let onclick = Callback::from(|_: MouseEvent| {
        if let Some(window) = window() {
            let options = ScrollToOptions::new();
            options.set_top(0.0);
            options.set_behavior(ScrollBehavior::Smooth);
            window.scroll_to_with_scroll_to_options(&options);
        }
    });

    let class = if scroll_button_visible(scroll_y, height) { "show" } else { "" };
    let style = format!("bottom: {}px;", scroll_button_offset(width, footer_height()));

    html! {
        <button id="scrollTopBtn" title="Terug naar boven" aria-label="Terug naar boven"
            type="button" {class} {style} {onclick}>
            <svg xmlns="http://www.w3.org/2000/svg" width="22" height="22" fill="white"
                viewBox="0 0 24 24" aria-hidden="true">
                <path d="M12 2L5 9h4v7h6V9h4z" />
            </svg>
        </button>
    }
}
