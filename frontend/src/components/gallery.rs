use log::info;
use web_sys::window;
use yew::prelude::*;
use yew_hooks::prelude::*;

pub const GALLERY: [&str; 7] = [
    "/assets/img/Day-Image-1",
    "/assets/img/Day-Image-2",
    "/assets/img/Day-Image-3",
    "/assets/img/Day-Image-4",
    "/assets/img/Night-Image-1",
    "/assets/img/Night-Image-2",
    "/assets/img/Night-Image-3",
];

const NOSCROLL: &str = "noscroll";

/// Carousel position plus the lightbox, which keeps its own index so paging
/// inside it leaves the carousel where it was.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GalleryState {
    pub index: usize,
    pub lightbox: Option<usize>,
}

fn step(index: usize, forward: bool) -> usize {
    let len = GALLERY.len();
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

impl GalleryState {
    pub fn next(self) -> Self {
        Self { index: step(self.index, true), ..self }
    }

    pub fn prev(self) -> Self {
        Self { index: step(self.index, false), ..self }
    }

    pub fn open(self) -> Self {
        Self { lightbox: Some(self.index), ..self }
    }

    pub fn close(self) -> Self {
        Self { lightbox: None, ..self }
    }

    pub fn lightbox_next(self) -> Self {
        Self { lightbox: self.lightbox.map(|i| step(i, true)), ..self }
    }

    pub fn lightbox_prev(self) -> Self {
        Self { lightbox: self.lightbox.map(|i| step(i, false)), ..self }
    }

    /// Keyboard handling while the lightbox is open. Returns `None` for keys
    /// that mean nothing here.
    pub fn on_key(self, key: &str) -> Option<Self> {
        self.lightbox?;
        match key {
            "Escape" => Some(self.close()),
            "ArrowRight" => Some(self.lightbox_next()),
            "ArrowLeft" => Some(self.lightbox_prev()),
            _ => None,
        }
    }
}

fn set_noscroll(on: bool) {
    let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) else {
        return;
    };
    let classes = body.class_list();
    let _ = if on {
        classes.add_1(NOSCROLL)
    } else {
        classes.remove_1(NOSCROLL)
    };
}

#[function_component(Gallery)]
pub fn gallery() -> Html {
    let state = use_state(GalleryState::default);

    {
        let open = state.lightbox.is_some();
        use_effect_with_deps(
            move |open| {
                set_noscroll(*open);
                || set_noscroll(false)
            },
            open,
        );
    }

    {
        let state = state.clone();
        use_event_with_window("keydown", move |e: KeyboardEvent| {
            if let Some(next) = state.on_key(&e.key()) {
                state.set(next);
            }
        });
    }

    let update = |f: fn(GalleryState) -> GalleryState| {
        let state = state.clone();
        Callback::from(move |_: MouseEvent| state.set(f(*state)))
    };

    let current = state.index;
    let lightbox = match state.lightbox {
        Some(index) => {
            let body = window().and_then(|w| w.document()).and_then(|d| d.body());
            match body {
                Some(body) => create_portal(
                    html! {
                        <div id="lightboxOverlay" class="lightbox-overlay active" aria-hidden="false">
                            <button
                                type="button"
                                class="lightbox-backdrop"
                                aria-label="Sluit lightbox (klik buiten de foto)"
                                onclick={update(GalleryState::close)}
                            />
                            <div id="lightboxDialog" class="lightbox-dialog" role="dialog" aria-modal="true" aria-label="Vergrote foto" tabindex="-1">
                                <button id="lightboxClose" class="lightbox-close" aria-label="Sluiten" type="button" onclick={update(GalleryState::close)}>
                                    {"×"}
                                </button>
                                <button id="lightboxPrev" class="lightbox-nav" aria-label="Vorige" type="button" onclick={update(GalleryState::lightbox_prev)}>
                                    {"❮"}
                                </button>
                                <img
                                    id="lightboxImage"
                                    src={format!("{}.webp", GALLERY[index])}
                                    alt={format!("Vergrote foto Taxi 951 - {}", index + 1)}
                                />
                                <button id="lightboxNext" class="lightbox-nav" aria-label="Volgende" type="button" onclick={update(GalleryState::lightbox_next)}>
                                    {"❯"}
                                </button>
                            </div>
                        </div>
                    },
                    body.into(),
                ),
                None => html! {},
            }
        }
        None => html! {},
    };

    let open = {
        let state = state.clone();
        Callback::from(move |_: MouseEvent| {
            info!("Opening photo {} in lightbox", state.index + 1);
            state.set(state.open());
        })
    };

    html! {
        <>
            <div class="manual-gallery" aria-label="Fotogalerij Taxi 951">
                <button class="nav-btn left" id="prevBtn" aria-label="Vorige foto" type="button" onclick={update(GalleryState::prev)}>
                    {"❮"}
                </button>
                <button
                    type="button"
                    class="lightbox-img-btn"
                    aria-label={format!("Open foto {} in lightbox", current + 1)}
                    onclick={open}
                >
                    <picture>
                        <source srcset={format!("{}.webp", GALLERY[current])} type="image/webp" />
                        <source srcset={format!("{}.png", GALLERY[current])} type="image/png" />
                        <img
                            id="galleryImage"
                            src={format!("{}.png", GALLERY[current])}
                            loading="lazy"
                            alt={format!("Taxi 951 - foto {}", current + 1)}
                        />
                    </picture>
                </button>
                <button class="nav-btn right" id="nextBtn" aria-label="Volgende foto" type="button" onclick={update(GalleryState::next)}>
                    {"❯"}
                </button>
            </div>
            {lightbox}
        </>
    }
}
