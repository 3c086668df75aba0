use gloo_timers::callback::Timeout;
use web_sys::{window, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};
use yew::prelude::*;

use crate::components::{
    calculator::FareCalculator, gallery::Gallery, newsletter::Newsletter, scroll_top::ScrollTop,
};
use crate::config;
use crate::fare::pricing::{format_rate, BASE_FARE, PRICE_PER_KM, PRICE_PER_MINUTE};
use crate::maps::loader::MapsHandle;

pub const RESERVATION_HREF: &str = "/pages/reserveren.html";

/// Smooth-scrolls to the element with `id`, top-aligned.
pub fn scroll_to_section(id: &str) {
    let Some(el) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    else {
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    el.scroll_into_view_with_scroll_into_view_options(&options);
}

fn anchor(id: &'static str) -> Callback<MouseEvent> {
    Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        scroll_to_section(id);
    })
}

const SERVICES: [(&str, &str); 5] = [
    ("Stadsritten Amsterdam", "M3 13h2v-2H3v2zm0-4h2V7H3v2zm0 8h2v-2H3v2zm4 0h2v-2H7v2zm0-4h2v-2H7v2zm0-4h2V7H7v2zm4 8h2v-2h-2v2zm0-4h2v-2h-2v2zm0-4h2V7h-2v2zm4 8h6V3h-6v16z"),
    ("Luchthavenvervoer", "M21 16v-2l-8-5V3.5a1.5 1.5 0 0 0-3 0V9L2 14v2l8-2.5v3.5l-2 1v1l3-.5 3 .5v-1l-2-1v-3.5l8 2.5z"),
    ("Groepsvervoer", "M16 11c1.66 0 2.99-1.34 2.99-3S17.66 5 16 5s-3 1.34-3 3 1.34 3 3 3zM8 11c1.66 0 2.99-1.34 2.99-3S9.66 5 8 5 5 6.34 5 8s1.34 3 3 3zm0 2c-2.33 0-7 1.17-7 3.5V19h14v-2.5C15 14.17 10.33 13 8 13zm8 0c-.29 0-.62.02-.97.05 1.16.84 1.97 1.97 1.97 3.45V19h6v-2.5c0-2.33-4.67-3.5-7-3.5z"),
    ("Nachttaxi", "M20.742 13.045A8.088 8.088 0 0 1 12 20a8 8 0 0 1-7.984-8.938A8.001 8.001 0 0 0 12 4a8.088 8.088 0 0 1 8.742 9.045z"),
    ("Online reserveren", "M19 4h-1V2h-2v2H8V2H6v2H5c-1.1 0-2 .9-2 2v14c0 1.1.9 2 2 2h14c1.1 0 2-.9 2-2V6c0-1.1-.9-2-2-2zm0 16H5V10h14v10zm0-12H5V6h14v2z"),
];

#[derive(Properties, PartialEq)]
pub struct HomeProps {
    pub maps: MapsHandle,
}

#[function_component(Home)]
pub fn home(props: &HomeProps) -> Html {
    let page_visible = use_state(|| false);
    let hero_visible = use_state(|| false);

    {
        let page_visible = page_visible.clone();
        let hero_visible = hero_visible.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(window) = window() {
                    window.scroll_to_with_x_and_y(0.0, 0.0);
                }
                Timeout::new(100, move || page_visible.set(true)).forget();
                Timeout::new(200, move || hero_visible.set(true)).forget();
                || ()
            },
            (),
        );
    }

    let book_now = Callback::from(|_: MouseEvent| scroll_to_section("calculator"));

    html! {
        <div class={classes!("page-wrapper", "fade-in", (*page_visible).then(|| "visible"))}>
            <main id="main">
                <section id="home" class={classes!("hero", "hero-fade", (*hero_visible).then(|| "visible"))}>
                    <h1 class="hero-title">{"Taxi 951"}</h1>
                    <p class="hero-subtitle">
                        {"Altijd betrouwbaar vervoer in Amsterdam, 24/7 beschikbaar."}
                    </p>
                    <div class="hero-buttons">
                        <button id="boekNuBtn" class="btn btn-outline" type="button" onclick={book_now}>
                            {"Boek nu"}
                        </button>
                        <a href={RESERVATION_HREF} class="btn btn-outline">{"Reserveren"}</a>
                    </div>
                </section>

                <FareCalculator maps={props.maps.clone()} />

                <section id="tarieven" class="section">
                    <h2>{"Tarieven"}</h2>
                    <p>
                        {"De kosten bestaan uit een instaptarief van "}
                        <span class="tarief-bedrag">{format_rate(BASE_FARE)}</span>
                        {" plus:"}
                    </p>
                    <div class="tarieven-lijst">
                        <div class="tarief-item">
                            <span class="tarief-bedrag">{format_rate(PRICE_PER_KM)}</span>
                            <span class="tarief-omschrijving">{"per kilometer"}</span>
                        </div>
                        <div class="tarief-item">
                            <span class="tarief-bedrag">{format_rate(PRICE_PER_MINUTE)}</span>
                            <span class="tarief-omschrijving">{"per minuut"}</span>
                        </div>
                    </div>
                    <p class="nacht-melding">
                        {"Tijdens nachtritten (na 20:00) worden de tarieven besproken met de chauffeur. "}
                        <a href="#contact" onclick={anchor("contact")}>{"Neem contact met ons op"}</a>
                        {"."}
                    </p>
                </section>

                <section id="diensten" class="section">
                    <h2>{"Diensten"}</h2>
                    <ul class="diensten-lijst">
                        { for SERVICES.iter().map(|(label, icon)| html! {
                            <li>
                                <span class="icoon" aria-hidden="true">
                                    <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="24" height="24">
                                        <path d={*icon} />
                                    </svg>
                                </span>
                                {*label}
                            </li>
                        }) }
                    </ul>
                </section>

                <section id="overons" class="section">
                    <h2>{"Over Taxi 951"}</h2>
                    <p>
                        {"Taxi 951 is jouw vertrouwde vervoerspartner in Amsterdam. Wij staan bekend om onze \
                          stiptheid, nette voertuigen en chauffeurs met uitstekende kennis van de stad. Of je nu \
                          snel van A naar B wilt, 's nachts thuiskomt of een luchthavenrit nodig hebt, wij zorgen \
                          voor een comfortabele en veilige reis, 24/7."}
                    </p>
                </section>

                <Gallery />

                <section id="contact" class="section">
                    <h2>{"Contact"}</h2>
                    <div class="contact-item">
                        <span class="contact-icon" aria-hidden="true">{"📞"}</span>
                        <a href={config::PHONE_HREF}>{format!("Bel ons: {}", config::PHONE)}</a>
                    </div>
                    <div class="contact-item">
                        <span class="contact-icon" aria-hidden="true">{"💬"}</span>
                        <a href={config::WHATSAPP_HREF} target="_blank" rel="noopener noreferrer">{"WhatsApp ons"}</a>
                    </div>
                    <div class="contact-item">
                        <span class="contact-icon" aria-hidden="true">{"✉️"}</span>
                        <a href={config::EMAIL_HREF}>{config::EMAIL}</a>
                    </div>
                </section>

                <Newsletter />
                <ScrollTop />

                <footer>
                    <div class="footer-container">
                        <p>{"© 2025 Taxi 951. Alle rechten voorbehouden."}</p>
                        <div class="footer-links">
                            <a href="/pages/privacy.html">{"Privacybeleid"}</a>
                            <a href="/pages/voorwaarden.html">{"Algemene voorwaarden"}</a>
                            <a class="link-underline" href={config::EMAIL_HREF}>{config::EMAIL}</a>
                            <a class="link-underline" href={config::PHONE_HREF}>{format!("Bel: {}", config::PHONE)}</a>
                            <a class="link-underline" href={config::WHATSAPP_HREF} target="_blank" rel="noopener">{"WhatsApp"}</a>
                        </div>
                    </div>
                </footer>
            </main>
            <style>
                {r#"
                .fade-in { opacity: 0; transition: opacity 0.6s ease; }
                .fade-in.visible { opacity: 1; }
                .hero-fade { opacity: 0; transform: translateY(12px); transition: opacity 0.8s ease, transform 0.8s ease; }
                .hero-fade.visible { opacity: 1; transform: none; }
                .hero {
                    min-height: 70vh;
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    justify-content: center;
                    text-align: center;
                    padding: 6rem 1.5rem 3rem;
                    background: linear-gradient(180deg, #111 0%, #1d1d1d 100%);
                    color: #fff;
                }
                .hero-title { font-size: 3rem; margin: 0 0 0.5rem; color: #f5c518; }
                .hero-subtitle { font-size: 1.2rem; margin-bottom: 2rem; }
                .hero-buttons { display: flex; gap: 1rem; flex-wrap: wrap; justify-content: center; }
                .btn { padding: 0.8rem 1.6rem; border-radius: 8px; cursor: pointer; text-decoration: none; font-size: 1rem; }
                .btn-outline { background: transparent; border: 2px solid #f5c518; color: #f5c518; }
                .btn-outline:hover { background: #f5c518; color: #111; }
                .btn-primary { background: #f5c518; border: none; color: #111; }
                .section { max-width: 960px; margin: 0 auto; padding: 3rem 1.5rem; }
                .section h2 { color: #f5c518; }
                .form-row { display: flex; flex-direction: column; gap: 0.3rem; margin-bottom: 0.9rem; }
                .form-row input, .form-row select { padding: 0.6rem; border-radius: 6px; border: 1px solid #444; background: #1a1a1a; color: #fff; }
                .cta-button { padding: 0.7rem 1.4rem; border: none; border-radius: 8px; background: #f5c518; color: #111; cursor: pointer; }
                .cta-button:disabled { opacity: 0.6; cursor: not-allowed; }
                .hidden { display: none; }
                .nacht-melding { color: #ff6b6b; }
                .prijs-output { font-weight: 600; }
                .samenvatting-kaart { background: #1a1a1a; border-radius: 10px; padding: 0.8rem 1rem; }
                .map-canvas { width: 100%; height: 360px; margin-top: 16px; border-radius: 12px; overflow: hidden; }
                .addr-suggest {
                    position: fixed;
                    z-index: 9999;
                    list-style: none;
                    margin: 0;
                    padding: 0.25rem 0;
                    background: #fff;
                    color: #111;
                    border-radius: 8px;
                    box-shadow: 0 8px 24px rgba(0, 0, 0, 0.25);
                    max-height: 50vh;
                    overflow-y: auto;
                }
                .addr-suggest li { padding: 0.6rem 0.8rem; cursor: pointer; }
                .addr-suggest li:hover { background: #f2f2f2; }
                .tarieven-lijst { display: flex; gap: 1.5rem; flex-wrap: wrap; }
                .tarief-bedrag { color: #f5c518; font-weight: 700; }
                .tarief-omschrijving { margin-left: 0.4rem; }
                .diensten-lijst { list-style: none; padding: 0; display: grid; gap: 0.8rem; }
                .icoon svg { fill: #f5c518; vertical-align: middle; margin-right: 0.5rem; }
                .manual-gallery { position: relative; max-width: 960px; margin: 0 auto; display: flex; align-items: center; }
                .manual-gallery img { width: 100%; border-radius: 12px; display: block; }
                .lightbox-img-btn { border: none; padding: 0; background: none; cursor: zoom-in; flex: 1; }
                .nav-btn { background: rgba(0, 0, 0, 0.5); color: #fff; border: none; font-size: 1.5rem; padding: 0.5rem 0.8rem; cursor: pointer; }
                .lightbox-overlay { position: fixed; inset: 0; z-index: 10000; display: flex; align-items: center; justify-content: center; }
                .lightbox-backdrop { position: absolute; inset: 0; background: rgba(0, 0, 0, 0.85); border: none; }
                .lightbox-dialog { position: relative; display: flex; align-items: center; gap: 0.5rem; max-width: 92vw; }
                .lightbox-dialog img { max-width: 80vw; max-height: 85vh; border-radius: 8px; }
                .lightbox-close { position: absolute; top: -2.5rem; right: 0; font-size: 2rem; background: none; border: none; color: #fff; cursor: pointer; }
                .lightbox-nav { background: none; border: none; color: #fff; font-size: 2rem; cursor: pointer; }
                body.noscroll { overflow: hidden; }
                .contact-item { display: flex; gap: 0.6rem; align-items: center; margin-bottom: 0.6rem; }
                .field { display: flex; flex-direction: column; gap: 0.3rem; margin-bottom: 0.8rem; }
                .formulier-feedback.ok { color: #4caf50; }
                .formulier-feedback.err { color: #ff6b6b; }
                #scrollTopBtn {
                    position: fixed;
                    right: 20px;
                    width: 44px;
                    height: 44px;
                    border-radius: 50%;
                    border: none;
                    background: #f5c518;
                    cursor: pointer;
                    opacity: 0;
                    pointer-events: none;
                    transition: opacity 0.3s ease;
                }
                #scrollTopBtn.show { opacity: 1; pointer-events: auto; }
                footer { background: #0d0d0d; color: #aaa; padding: 2rem 1.5rem; }
                .footer-container { max-width: 960px; margin: 0 auto; display: flex; flex-wrap: wrap; justify-content: space-between; gap: 1rem; }
                .footer-links { display: flex; flex-wrap: wrap; gap: 1rem; }
                .footer-links a { color: #ccc; }
                @media (max-width: 480px) {
                    .hero-title { font-size: 2.2rem; }
                    #scrollTopBtn { right: 12px; }
                }
                "#}
            </style>
        </div>
    }
}
