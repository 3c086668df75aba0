use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::js_sys::Array;
use web_sys::{
    window, HtmlInputElement, HtmlSelectElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};
use yew::prelude::*;

use crate::components::address_input::AddressInput;
use crate::config;
use crate::fare::estimator::{CalculatorView, Estimator, Tone};
use crate::fare::query::{TripForm, TripQuery};
use crate::fare::time_slot::{local_hour, SlotSelection, TimeSlot};
use crate::maps::directions::{self, GoogleDirections};
use crate::maps::loader::MapsHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Pickup,
    Destination,
    Distance,
    Minutes,
}

pub enum CalculatorAction {
    Edit(Field, String),
    ChooseSlot(String),
    ClockHour(u32),
    Show(CalculatorView),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculatorState {
    pub form: TripForm,
    pub selection: SlotSelection,
    pub view: CalculatorView,
}

impl Reducible for CalculatorState {
    type Action = CalculatorAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            CalculatorAction::Edit(field, value) => {
                let slot = match field {
                    Field::Pickup => &mut next.form.pickup,
                    Field::Destination => &mut next.form.destination,
                    Field::Distance => &mut next.form.distance,
                    Field::Minutes => &mut next.form.minutes,
                };
                *slot = value;
                next.view.clear_for_edit(next.selection.slot);
            }
            CalculatorAction::ChooseSlot(raw) => {
                let slot = next.selection.choose(&raw);
                next.view.apply_slot(slot);
            }
            CalculatorAction::ClockHour(hour) => match next.selection.follow_clock(hour) {
                Some(slot) => next.view.apply_slot(slot),
                None => return self,
            },
            CalculatorAction::Show(view) => {
                // A day result must not land on a form that has since gone night.
                if next.selection.slot.is_night() && !view.night_notice {
                    return self;
                }
                next.view = view;
            }
        }
        Rc::new(next)
    }
}

fn tone_color(tone: Tone) -> &'static str {
    match tone {
        Tone::Normal => "#222",
        Tone::Muted => "#444",
        Tone::Alert => "red",
    }
}

fn follow_clock(dispatcher: &UseReducerDispatcher<CalculatorState>) {
    let hour = local_hour();
    info!("Clock check: local hour {}", hour);
    dispatcher.dispatch(CalculatorAction::ClockHour(hour));
}

#[derive(Properties, PartialEq)]
pub struct FareCalculatorProps {
    pub maps: MapsHandle,
}

#[function_component(FareCalculator)]
pub fn fare_calculator(props: &FareCalculatorProps) -> Html {
    let state = use_reducer(CalculatorState::default);
    let map_ref = use_node_ref();
    let estimator = {
        let maps = props.maps.clone();
        use_memo(move |_| Estimator::new(GoogleDirections::new(maps)), ())
    };

    // Pre-select day/night from the clock, again whenever the tab comes back.
    {
        let dispatcher = state.dispatcher();
        use_effect_with_deps(
            move |_| {
                follow_clock(&dispatcher);
                let document = window().and_then(|w| w.document());
                let listener = document.clone().map(|document| {
                    Closure::wrap(Box::new(move || {
                        if !document.hidden() {
                            follow_clock(&dispatcher);
                        }
                    }) as Box<dyn FnMut()>)
                });
                if let (Some(document), Some(listener)) = (&document, &listener) {
                    if let Err(e) = document.add_event_listener_with_callback(
                        "visibilitychange",
                        listener.as_ref().unchecked_ref(),
                    ) {
                        warn!("visibilitychange listener failed: {:?}", e);
                    }
                }
                move || {
                    if let (Some(document), Some(listener)) = (document, listener) {
                        let _ = document.remove_event_listener_with_callback(
                            "visibilitychange",
                            listener.as_ref().unchecked_ref(),
                        );
                    }
                }
            },
            (),
        );
    }

    // Start loading maps once the map area scrolls into view.
    {
        let map_ref = map_ref.clone();
        let maps = props.maps.clone();
        use_effect_with_deps(
            move |_| {
                let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
                    let visible = entries
                        .iter()
                        .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                        .any(|entry| entry.is_intersecting());
                    if visible {
                        maps.load();
                        observer.disconnect();
                    }
                }) as Box<dyn FnMut(Array, IntersectionObserver)>);

                let init = IntersectionObserverInit::new();
                init.set_threshold(&JsValue::from_f64(0.1));
                let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init).ok();
                if let (Some(observer), Some(target)) = (&observer, map_ref.cast::<web_sys::Element>()) {
                    observer.observe(&target);
                }
                move || {
                    if let Some(observer) = observer {
                        observer.disconnect();
                    }
                    drop(callback);
                }
            },
            (),
        );
    }

    let on_edit = |field: Field| {
        let dispatcher = state.dispatcher();
        let estimator = estimator.clone();
        Callback::from(move |value: String| {
            estimator.invalidate();
            dispatcher.dispatch(CalculatorAction::Edit(field, value));
        })
    };

    let on_number = |field: Field| {
        let on_edit = on_edit(field);
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_edit.emit(input.value());
        })
    };

    let on_slot = {
        let dispatcher = state.dispatcher();
        let estimator = estimator.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            estimator.invalidate();
            dispatcher.dispatch(CalculatorAction::ChooseSlot(select.value()));
        })
    };

    let compute = {
        let state = state.clone();
        let estimator = estimator.clone();
        Callback::from(move |_: ()| {
            let query = TripQuery::from_form(&state.form, state.selection.slot);
            let dispatcher = state.dispatcher();
            let estimator = estimator.clone();
            spawn_local(async move {
                let progress = dispatcher.clone();
                let settled = estimator
                    .estimate(&query, move |view| progress.dispatch(CalculatorAction::Show(view)))
                    .await;
                if let Some(view) = settled {
                    let route = view
                        .summary
                        .as_ref()
                        .map(|s| (s.pickup.clone(), s.destination.clone()));
                    dispatcher.dispatch(CalculatorAction::Show(view));
                    if let Some((pickup, destination)) = route {
                        directions::show_route(&pickup, &destination);
                    }
                }
            });
        })
    };

    let onclick = {
        let compute = compute.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            compute.emit(());
        })
    };
    let onsubmit = Callback::from(move |e: SubmitEvent| {
        e.prevent_default();
        compute.emit(());
    });

    let view = &state.view;
    let slot = state.selection.slot;

    html! {
        <section class="section calculator" id="calculator">
            <h2>{"Bereken je ritprijs"}</h2>
            <form id="calcForm" {onsubmit}>
                <AddressInput
                    id="ophaal"
                    label="Ophaallocatie:"
                    placeholder="Bv. Damrak 1, Amsterdam"
                    value={state.form.pickup.clone()}
                    on_change={on_edit(Field::Pickup)}
                    maps={props.maps.clone()}
                />
                <AddressInput
                    id="bestemming"
                    label="Bestemming:"
                    placeholder="Bv. Schiphol"
                    value={state.form.destination.clone()}
                    on_change={on_edit(Field::Destination)}
                    maps={props.maps.clone()}
                />

                <div class="form-row">
                    <label for="tijdstip">{"Tijdstip:"}</label>
                    <select id="tijdstip" onchange={on_slot}>
                        { for [TimeSlot::Day, TimeSlot::Night].into_iter().map(|option| html! {
                            <option value={option.value()} selected={option == slot}>{option.label()}</option>
                        }) }
                    </select>
                </div>

                <div id="nachtMelding" class={classes!("nacht-melding", (!view.night_notice).then_some("hidden"))} aria-live="polite">
                    {"❌ Berekening is niet mogelijk tijdens nachtritten."}
                    <br />
                    {"Neem contact op via "}
                    <a href={config::WHATSAPP_HREF} target="_blank" rel="noopener noreferrer">{"WhatsApp"}</a>
                    {" of "}
                    <a href={config::PHONE_HREF}>{"bel de chauffeur"}</a>
                    {"."}
                </div>

                <div class="form-row">
                    <label for="afstand">{"Afstand (km):"}</label>
                    <input id="afstand" placeholder="bv. 10" value={state.form.distance.clone()} oninput={on_number(Field::Distance)} />
                </div>

                <div class="form-row">
                    <label for="minuten">{"Minuten:"}</label>
                    <input id="minuten" placeholder="bv. 15" value={state.form.minutes.clone()} oninput={on_number(Field::Minutes)} />
                </div>

                <button id="berekenBtn" type="button" class="cta-button" disabled={view.button.disabled()} {onclick}>
                    {view.button.label()}
                </button>

                <div id="prijsOutput" class="prijs-output" style={format!("margin-top: 12px; color: {};", tone_color(view.price.tone()))}>
                    {view.price.text()}
                </div>
                {
                    if let Some(summary) = &view.summary {
                        html! {
                            <div id="ritSamenvatting" style="margin-top: 12px;">
                                <div class="samenvatting-kaart">
                                    <h4>{"🧾 Ritoverzicht"}</h4>
                                    <ul>
                                        <li><strong>{"📍 Ophaaladres:"}</strong>{" "}{&summary.pickup}</li>
                                        <li><strong>{"📍 Bestemming:"}</strong>{" "}{&summary.destination}</li>
                                        <li><strong>{"Afstand:"}</strong>{" "}{summary.distance_text()}</li>
                                        <li><strong>{"Rittijd:"}</strong>{" "}{summary.duration_text()}</li>
                                        <li><strong>{"Tijdstip:"}</strong>{" "}{summary.time_slot.title()}</li>
                                    </ul>
                                </div>
                            </div>
                        }
                    } else {
                        html! { <div id="ritSamenvatting" class="hidden"></div> }
                    }
                }
            </form>

            <div id="map" class="map-canvas" ref={map_ref}></div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fare::error::FareError;
    use crate::fare::estimator::{ComputeButton, PriceLine};
    use crate::fare::pricing::PriceQuote;

    fn reduce(state: CalculatorState, action: CalculatorAction) -> CalculatorState {
        (*Rc::new(state).reduce(action)).clone()
    }

    fn priced() -> CalculatorView {
        CalculatorView {
            price: PriceLine::Quote(PriceQuote::for_trip(10.0, 15.0)),
            ..CalculatorView::default()
        }
    }

    #[test]
    fn editing_any_field_clears_the_result() {
        let state = reduce(CalculatorState::default(), CalculatorAction::Show(priced()));
        let state = reduce(state, CalculatorAction::Edit(Field::Minutes, "20".into()));
        assert_eq!(state.form.minutes, "20");
        assert_eq!(state.view, CalculatorView::default());
    }

    #[test]
    fn choosing_night_locks_and_stops_the_clock() {
        let state = reduce(CalculatorState::default(), CalculatorAction::Show(priced()));
        let state = reduce(state, CalculatorAction::ChooseSlot("nacht".into()));
        assert_eq!(state.view.button, ComputeButton::Blocked);
        assert!(state.view.night_notice);
        assert_eq!(state.view.price, PriceLine::Cleared);

        let state = reduce(state, CalculatorAction::ClockHour(12));
        assert_eq!(state.selection.slot, TimeSlot::Night);
    }

    #[test]
    fn clock_selects_night_until_the_visitor_chooses() {
        let state = reduce(CalculatorState::default(), CalculatorAction::ClockHour(21));
        assert_eq!(state.selection.slot, TimeSlot::Night);
        assert!(state.view.button.disabled());

        let state = reduce(state, CalculatorAction::ClockHour(9));
        assert_eq!(state.selection.slot, TimeSlot::Day);
        assert!(!state.view.button.disabled());
    }

    #[test]
    fn clock_check_during_a_lookup_keeps_the_button_busy() {
        let calculating = CalculatorView {
            price: PriceLine::Calculating,
            summary: None,
            button: ComputeButton::Busy,
            night_notice: false,
        };
        let state = reduce(CalculatorState::default(), CalculatorAction::Show(calculating));
        let state = reduce(state, CalculatorAction::ClockHour(10));
        assert_eq!(state.view.price, PriceLine::Calculating);
        assert_eq!(state.view.button, ComputeButton::Busy);
        assert_eq!(state.view.button.label(), "Bezig…");
    }

    #[test]
    fn late_day_result_is_dropped_once_night_is_selected() {
        let state = reduce(CalculatorState::default(), CalculatorAction::ChooseSlot("nacht".into()));
        let state = reduce(state, CalculatorAction::Show(priced()));
        assert_eq!(state.view.price, PriceLine::Cleared);

        let blocked = CalculatorView {
            price: PriceLine::Error(FareError::NightTrip),
            summary: None,
            button: ComputeButton::Blocked,
            night_notice: true,
        };
        let state = reduce(state, CalculatorAction::Show(blocked.clone()));
        assert_eq!(state.view, blocked);
    }
}
