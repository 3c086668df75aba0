use yew::prelude::*;
use yew_router::prelude::*;
use yew_hooks::prelude::*;
use log::{info, Level};
use web_sys::{window, Node, ScrollRestoration};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

mod config;
mod fare {
    pub mod pricing;
    pub mod time_slot;
    pub mod query;
    pub mod error;
    pub mod route;
    pub mod estimator;
}
mod maps {
    pub mod bindings;
    pub mod loader;
    pub mod directions;
    pub mod autocomplete;
}
mod components {
    pub mod calculator;
    pub mod address_input;
    pub mod gallery;
    pub mod newsletter;
    pub mod scroll_top;
}
mod pages {
    pub mod home;
    pub mod not_found;
}

use maps::loader::MapsHandle;
use pages::{
    home::{scroll_to_section, Home, RESERVATION_HREF},
    not_found::NotFound,
};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route, maps: &MapsHandle) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Home maps={maps.clone()} /> }
        },
        Route::NotFound => {
            info!("Rendering NotFound page");
            html! { <NotFound /> }
        },
    }
}

/// `/` and any `.../index.html` count as the home page.
pub fn is_home_path(path: &str) -> bool {
    path == "/" || path.to_ascii_lowercase().ends_with("/index.html")
}

fn set_manual_scroll_restoration() {
    if let Some(history) = window().and_then(|w| w.history().ok()) {
        let _ = history.set_scroll_restoration(ScrollRestoration::Manual);
    }
}

/// Jumps to the top without smooth scrolling and reloads the page.
fn reload_at_top() {
    let Some(window) = window() else {
        return;
    };
    set_manual_scroll_restoration();
    let root = window
        .document()
        .and_then(|d| d.document_element())
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
    let previous = root
        .as_ref()
        .and_then(|el| el.style().get_property_value("scroll-behavior").ok())
        .unwrap_or_default();
    if let Some(root) = &root {
        let _ = root.style().set_property("scroll-behavior", "auto");
    }
    window.scroll_to_with_x_and_y(0.0, 0.0);
    if let Some(root) = &root {
        let _ = root.style().set_property("scroll-behavior", &previous);
    }
    let _ = window.location().reload();
}

fn inside(node_ref: &NodeRef, target: Option<&Node>) -> bool {
    node_ref.get().map(|node| node.contains(target)).unwrap_or(false)
}

#[function_component(Nav)]
pub fn nav() -> Html {
    let menu_open = use_state(|| false);
    let is_scrolled = use_state(|| false);
    let menu_ref = use_node_ref();
    let hamburger_ref = use_node_ref();
    let navigator = use_navigator();

    {
        let is_scrolled = is_scrolled.clone();
        use_effect_with_deps(move |_| {
            let listener = window().map(|window| {
                let scrolled_window = window.clone();
                let scroll_callback = Closure::wrap(Box::new(move || {
                    let scroll_y = scrolled_window.scroll_y().unwrap_or(0.0);
                    is_scrolled.set(scroll_y > 50.0);
                }) as Box<dyn FnMut()>);
                let _ = window.add_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref());
                (window, scroll_callback)
            });

            move || {
                if let Some((window, scroll_callback)) = listener {
                    let _ = window.remove_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref());
                }
            }
        }, ());
    }

    {
        let menu_open = menu_open.clone();
        let menu_ref = menu_ref.clone();
        let hamburger_ref = hamburger_ref.clone();
        use_event_with_window("click", move |e: MouseEvent| {
            let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
            if inside(&menu_ref, target.as_ref()) || inside(&hamburger_ref, target.as_ref()) {
                return;
            }
            if *menu_open {
                menu_open.set(false);
            }
        });
    }
    {
        let menu_open = menu_open.clone();
        use_event_with_window("keydown", move |e: KeyboardEvent| {
            if e.key() == "Escape" && *menu_open {
                menu_open.set(false);
            }
        });
    }
    {
        let menu_open = menu_open.clone();
        use_event_with_window("resize", move |_: Event| {
            let width = window()
                .and_then(|w| w.inner_width().ok())
                .and_then(|w| w.as_f64())
                .unwrap_or(0.0);
            if width > config::MENU_COLLAPSE_WIDTH && *menu_open {
                menu_open.set(false);
            }
        });
    }

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(!*menu_open);
        })
    };

    let go_home = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            // let the browser open a new tab
            if e.meta_key() || e.ctrl_key() || e.button() == 1 {
                return;
            }
            e.prevent_default();
            menu_open.set(false);

            let path = window()
                .and_then(|w| w.location().pathname().ok())
                .unwrap_or_default();
            if is_home_path(&path) {
                info!("Reloading home");
                reload_at_top();
            } else if let Some(navigator) = &navigator {
                navigator.push(&Route::Home);
            }
        })
    };

    let anchor = |id: &'static str| {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(false);
            scroll_to_section(id);
        })
    };

    html! {
        <nav class={classes!("nav-main", (*is_scrolled).then(|| "scrolled"))} aria-label="Hoofdnavigatie">
            <div class="nav-container">
                <a href="/" class="brand" onclick={go_home.clone()}>{"Taxi 951"}</a>

                <button
                    ref={hamburger_ref}
                    class="hamburger"
                    aria-label="Menu openen"
                    aria-controls="hoofdmenu"
                    aria-expanded={if *menu_open { "true" } else { "false" }}
                    type="button"
                    onclick={toggle_menu}
                >
                    <svg class="hamburger-icon" viewBox="0 0 24 24" aria-hidden="true">
                        <path d="M3 6h18v2H3zM3 11h18v2H3zM3 16h18v2H3z"></path>
                    </svg>
                </button>

                <ul id="hoofdmenu" ref={menu_ref} class={classes!("nav-links", (*menu_open).then(|| "open"))}>
                    <li><a href="/" onclick={go_home}>{"Home"}</a></li>
                    <li><a href="#diensten" onclick={anchor("diensten")}>{"Diensten"}</a></li>
                    <li><a href="#tarieven" onclick={anchor("tarieven")}>{"Tarieven"}</a></li>
                    <li><a href="#contact" onclick={anchor("contact")}>{"Contact"}</a></li>
                    <li><a href={RESERVATION_HREF}>{"Reserveren"}</a></li>
                    <li><a href="#overons" onclick={anchor("overons")}>{"Over Ons"}</a></li>
                </ul>
            </div>
            <style>
                {r#"
                .nav-main { position: fixed; top: 0; left: 0; right: 0; z-index: 1000; background: rgba(17, 17, 17, 0.85); transition: background 0.3s ease; }
                .nav-main.scrolled { background: #111; box-shadow: 0 2px 12px rgba(0, 0, 0, 0.4); }
                .nav-container { max-width: 1100px; margin: 0 auto; display: flex; align-items: center; justify-content: space-between; padding: 0.8rem 1.5rem; }
                .brand { color: #f5c518; font-weight: 800; font-size: 1.4rem; text-decoration: none; }
                .hamburger { display: none; background: none; border: none; cursor: pointer; }
                .hamburger-icon { width: 28px; height: 28px; fill: #fff; }
                .nav-links { list-style: none; display: flex; gap: 1.4rem; margin: 0; padding: 0; }
                .nav-links a { color: #fff; text-decoration: none; }
                .nav-links a:hover { color: #f5c518; }
                @media (max-width: 768px) {
                    .hamburger { display: block; }
                    .nav-links { display: none; position: absolute; top: 100%; left: 0; right: 0; flex-direction: column; background: #111; padding: 1rem 1.5rem; }
                    .nav-links.open { display: flex; }
                }
                "#}
            </style>
        </nav>
    }
}

#[function_component]
fn App() -> Html {
    let maps = use_memo(|_| MapsHandle::browser(), ());
    let render = {
        let maps = (*maps).clone();
        Callback::from(move |route: Route| switch(route, &maps))
    };

    html! {
        <BrowserRouter>
            <Nav />
            <Switch<Route> {render} />
        </BrowserRouter>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(Level::Info).expect("error initializing log");

    config::log_maps_key();
    set_manual_scroll_restoration();

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_paths() {
        assert!(is_home_path("/"));
        assert!(is_home_path("/index.html"));
        assert!(is_home_path("/nl/INDEX.HTML"));
        assert!(!is_home_path("/pages/reserveren.html"));
        assert!(!is_home_path("/index.html/extra"));
        assert!(!is_home_path(""));
    }
}
