use std::rc::Rc;

use log::info;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, Event, HtmlInputElement, Node};
use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::maps::autocomplete::{
    attach_widget, choose_mode, AutocompleteMode, GooglePredictions, SuggestionPanel,
    SuggestionSource,
};
use crate::maps::loader::MapsHandle;

#[derive(Properties, PartialEq)]
pub struct AddressInputProps {
    pub id: AttrValue,
    pub label: AttrValue,
    pub placeholder: AttrValue,
    pub value: String,
    pub on_change: Callback<String>,
    pub maps: MapsHandle,
}

fn viewport_width() -> f64 {
    window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|w| w.as_f64())
        .unwrap_or(f64::MAX)
}

fn panel_position(input: &NodeRef) -> String {
    match input.cast::<HtmlInputElement>() {
        Some(input) => {
            let rect = input.get_bounding_client_rect();
            format!(
                "left: {}px; top: {}px; width: {}px;",
                rect.left().round(),
                (rect.bottom() + 4.0).round(),
                rect.width().round()
            )
        }
        None => String::new(),
    }
}

fn contains(node_ref: &NodeRef, target: Option<&Node>) -> bool {
    node_ref
        .get()
        .map(|node| node.contains(target))
        .unwrap_or(false)
}

/// Address field with suggestions: the Places widget where it fits, a
/// floating list of predictions everywhere else.
#[function_component(AddressInput)]
pub fn address_input(props: &AddressInputProps) -> Html {
    let input_ref = use_node_ref();
    let panel_ref = use_node_ref();
    let mode = use_state(|| None::<AutocompleteMode>);
    let panel = use_mut_ref(SuggestionPanel::default);
    let source = use_mut_ref(|| None::<Rc<dyn SuggestionSource>>);
    let redraw = use_force_update();

    {
        let maps = props.maps.clone();
        let input_ref = input_ref.clone();
        let mode = mode.clone();
        let source = source.clone();
        let on_change = props.on_change.clone();
        let id = props.id.clone();
        use_effect_with_deps(
            move |_| {
                maps.on_ready(move || {
                    let Some(input) = input_ref.cast::<HtmlInputElement>() else {
                        return;
                    };
                    let on_place: Rc<dyn Fn(String)> = Rc::new(move |address| on_change.emit(address));
                    let chosen = choose_mode(viewport_width(), || attach_widget(&input, on_place));
                    if chosen == AutocompleteMode::Fallback {
                        *source.borrow_mut() = GooglePredictions::new()
                            .map(|predictions| Rc::new(predictions) as Rc<dyn SuggestionSource>);
                    }
                    info!("Autocomplete for #{}: {:?}", id, chosen);
                    mode.set(Some(chosen));
                });
                || ()
            },
            (),
        );
    }

    let query = {
        let panel = panel.clone();
        let source = source.clone();
        let redraw = redraw.clone();
        Callback::from(move |raw: String| {
            let Some(source) = source.borrow().clone() else {
                return;
            };
            let query = panel.borrow_mut().on_input(&raw);
            let Some(query) = query else {
                redraw.force_update();
                return;
            };
            let panel = panel.clone();
            let redraw = redraw.clone();
            spawn_local(async move {
                let answer = source.predictions(&query).await;
                if panel.borrow_mut().on_response(&query, answer) {
                    redraw.force_update();
                }
            });
        })
    };

    let fallback = *mode == Some(AutocompleteMode::Fallback);

    let onfocus = {
        let maps = props.maps.clone();
        let query = query.clone();
        Callback::from(move |e: FocusEvent| {
            maps.load();
            if fallback {
                let input: HtmlInputElement = e.target_unchecked_into();
                query.emit(input.value());
            }
        })
    };

    let oninput = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let value = input.value();
            on_change.emit(value.clone());
            if fallback {
                query.emit(value);
            }
        })
    };

    {
        let redraw = redraw.clone();
        let panel = panel.clone();
        let reposition = move |_: Event| {
            if panel.borrow().is_open() {
                redraw.force_update();
            }
        };
        use_event_with_window("scroll", reposition.clone());
        use_event_with_window("resize", reposition);
    }

    {
        let input_ref = input_ref.clone();
        let panel_ref = panel_ref.clone();
        let panel = panel.clone();
        let redraw = redraw.clone();
        use_event_with_window("click", move |e: MouseEvent| {
            let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
            if contains(&input_ref, target.as_ref()) || contains(&panel_ref, target.as_ref()) {
                return;
            }
            if panel.borrow().is_open() {
                panel.borrow_mut().close();
                redraw.force_update();
            }
        });
    }

    let suggestions = panel.borrow().suggestions().to_vec();
    let list = if fallback && !suggestions.is_empty() {
        html! {
            <ul ref={panel_ref} class="addr-suggest" data-for={props.id.clone()} style={panel_position(&input_ref)}>
                { for suggestions.iter().enumerate().map(|(index, suggestion)| {
                    let on_change = props.on_change.clone();
                    let panel = panel.clone();
                    let redraw = redraw.clone();
                    let onclick = Callback::from(move |_: MouseEvent| {
                        let picked = panel.borrow_mut().select(index);
                        if let Some(address) = picked {
                            on_change.emit(address);
                        }
                        redraw.force_update();
                    });
                    html! { <li {onclick}>{suggestion.description.clone()}</li> }
                }) }
            </ul>
        }
    } else {
        html! {}
    };

    html! {
        <div class="form-row">
            <label for={props.id.clone()}>{props.label.clone()}</label>
            <input
                ref={input_ref}
                id={props.id.clone()}
                placeholder={props.placeholder.clone()}
                autocomplete="off"
                value={props.value.clone()}
                {onfocus}
                {oninput}
            />
            {list}
        </div>
    }
}
