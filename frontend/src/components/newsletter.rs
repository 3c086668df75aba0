use log::info;
use thiserror::Error;
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub const SIGNUP_OK: &str = "✅ Bedankt! Je aanmelding is ontvangen.";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupError {
    #[error("❌ Vul je naam en e-mailadres in en geef toestemming.")]
    MissingFields,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsletterForm {
    pub name: String,
    pub email: String,
    pub consent: bool,
}

impl NewsletterForm {
    pub fn validate(&self) -> Result<(), SignupError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || !self.consent {
            return Err(SignupError::MissingFields);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Feedback {
    None,
    Ok,
    Err(SignupError),
}

#[function_component(Newsletter)]
pub fn newsletter() -> Html {
    let form = use_state(NewsletterForm::default);
    let feedback = use_state(|| Feedback::None);

    let on_name = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            form.set(NewsletterForm { name: input.value(), ..(*form).clone() });
        })
    };
    let on_email = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            form.set(NewsletterForm { email: input.value(), ..(*form).clone() });
        })
    };
    let on_consent = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            form.set(NewsletterForm { consent: input.checked(), ..(*form).clone() });
        })
    };

    let onsubmit = {
        let form = form.clone();
        let feedback = feedback.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match form.validate() {
                Ok(()) => {
                    info!("Newsletter signup accepted");
                    feedback.set(Feedback::Ok);
                    form.set(NewsletterForm::default());
                }
                Err(err) => feedback.set(Feedback::Err(err)),
            }
        })
    };

    let (class, message) = match &*feedback {
        Feedback::None => ("formulier-feedback", String::new()),
        Feedback::Ok => ("formulier-feedback ok", SIGNUP_OK.to_string()),
        Feedback::Err(err) => ("formulier-feedback err", err.to_string()),
    };

    html! {
        <section id="nieuwsbrief" class="section">
            <h2>{"Schrijf je in voor onze nieuwsbrief"}</h2>
            <div class="nieuwsbrief-form">
                <form id="nieuwsbriefForm" class="form-nieuwsbrief" {onsubmit}>
                    <div class="field">
                        <label for="naam"><strong>{"Naam *"}</strong></label>
                        <input type="text" id="naam" name="naam" placeholder="Bijv. Jan Jansen"
                            value={form.name.clone()} oninput={on_name} />
                    </div>
                    <div class="field">
                        <label for="email"><strong>{"Emailadres *"}</strong></label>
                        <input type="email" id="email" name="email" placeholder="jouw@email.nl"
                            value={form.email.clone()} oninput={on_email} />
                    </div>
                    <div class="toestemming">
                        <input type="checkbox" id="toestemming" name="toestemming"
                            checked={form.consent} onchange={on_consent} />
                        <label for="toestemming">
                            {"Ja, ik geef toestemming om e-mails te ontvangen van Taxi 951."}
                        </label>
                    </div>
                    <button type="submit" class="btn btn-primary">{"Aanmelden"}</button>
                    <p id="formulierFeedback" {class} role="status" aria-live="polite">{message}</p>
                </form>
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> NewsletterForm {
        NewsletterForm {
            name: "Jan Jansen".into(),
            email: "jan@example.nl".into(),
            consent: true,
        }
    }

    #[test]
    fn complete_form_is_accepted() {
        assert_eq!(filled().validate(), Ok(()));
    }

    #[test]
    fn any_missing_part_is_rejected() {
        let cases = [
            NewsletterForm { name: "   ".into(), ..filled() },
            NewsletterForm { email: String::new(), ..filled() },
            NewsletterForm { consent: false, ..filled() },
            NewsletterForm::default(),
        ];
        for form in cases {
            assert_eq!(form.validate(), Err(SignupError::MissingFields));
        }
    }

    #[test]
    fn rejection_message_is_dutch() {
        assert_eq!(
            SignupError::MissingFields.to_string(),
            "❌ Vul je naam en e-mailadres in en geef toestemming."
        );
    }
}
