use std::cell::Cell;

use log::{debug, info};

use crate::fare::error::FareError;
use crate::fare::pricing::{to_fixed, PriceQuote};
use crate::fare::query::{Branch, TripQuery};
use crate::fare::route::RouteResolver;
use crate::fare::time_slot::TimeSlot;

/// What the price output line currently says.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceLine {
    Cleared,
    Calculating,
    Quote(PriceQuote),
    Error(FareError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Muted,
    Alert,
}

impl PriceLine {
    pub fn text(&self) -> String {
        match self {
            PriceLine::Cleared => String::new(),
            PriceLine::Calculating => "⏳ Route en prijs worden berekend...".to_string(),
            PriceLine::Quote(quote) => quote.to_string(),
            PriceLine::Error(err) => err.to_string(),
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            PriceLine::Cleared | PriceLine::Quote(_) => Tone::Normal,
            PriceLine::Calculating => Tone::Muted,
            PriceLine::Error(_) => Tone::Alert,
        }
    }

    pub fn quote(&self) -> Option<PriceQuote> {
        match self {
            PriceLine::Quote(quote) => Some(*quote),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripSummary {
    pub pickup: String,
    pub destination: String,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub time_slot: TimeSlot,
}

impl TripSummary {
    pub fn distance_text(&self) -> String {
        format!("{} km", to_fixed(self.distance_km, 1))
    }

    pub fn duration_text(&self) -> String {
        format!("{} minuten", self.duration_minutes.round() as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeButton {
    Ready,
    Busy,
    Blocked,
}

impl ComputeButton {
    pub fn disabled(self) -> bool {
        self != ComputeButton::Ready
    }

    pub fn label(self) -> &'static str {
        match self {
            ComputeButton::Busy => "Bezig…",
            ComputeButton::Ready | ComputeButton::Blocked => "Bereken",
        }
    }
}

/// Everything the result area renders, independent of the DOM.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorView {
    pub price: PriceLine,
    pub summary: Option<TripSummary>,
    pub button: ComputeButton,
    pub night_notice: bool,
}

impl Default for CalculatorView {
    fn default() -> Self {
        Self {
            price: PriceLine::Cleared,
            summary: None,
            button: ComputeButton::Ready,
            night_notice: false,
        }
    }
}

impl CalculatorView {
    fn showing(price: PriceLine) -> Self {
        Self { price, ..Self::default() }
    }

    fn night_blocked(price: PriceLine) -> Self {
        Self {
            price,
            summary: None,
            button: ComputeButton::Blocked,
            night_notice: true,
        }
    }

    /// Selector moved. Night wipes the result and locks the button; day only
    /// lifts the night lock and leaves a running lookup busy.
    pub fn apply_slot(&mut self, slot: TimeSlot) {
        if slot.is_night() {
            *self = Self::night_blocked(PriceLine::Cleared);
        } else {
            self.night_notice = false;
            if self.button == ComputeButton::Blocked {
                self.button = ComputeButton::Ready;
            }
        }
    }

    /// Any edit makes the shown result stale.
    pub fn clear_for_edit(&mut self, slot: TimeSlot) {
        if slot.is_night() {
            *self = Self::night_blocked(PriceLine::Cleared);
        } else {
            *self = Self::default();
        }
    }
}

/// Runs estimation attempts. Each attempt takes a new generation number and
/// an attempt that settles after a newer one started is dropped.
pub struct Estimator<R> {
    resolver: R,
    generation: Cell<u64>,
}

impl<R: RouteResolver> Estimator<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            generation: Cell::new(0),
        }
    }

    /// Makes any in-flight attempt stale.
    pub fn invalidate(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    /// `on_progress` receives the interim "calculating" view of an address
    /// lookup. Returns the final view, or `None` when a newer attempt took
    /// over while this one was waiting on the route.
    pub async fn estimate(
        &self,
        query: &TripQuery,
        on_progress: impl FnOnce(CalculatorView),
    ) -> Option<CalculatorView> {
        let generation = self.invalidate();

        let (pickup, destination) = match query.branch() {
            Branch::NightBlocked => {
                return Some(CalculatorView::night_blocked(PriceLine::Error(FareError::NightTrip)));
            }
            Branch::ManualNumeric { distance_km, minutes } => {
                let valid = |v: f64| v.is_finite() && v >= 0.0;
                let price = if valid(distance_km) && valid(minutes) {
                    PriceLine::Quote(PriceQuote::for_trip(distance_km, minutes))
                } else {
                    PriceLine::Error(FareError::InvalidManualInput)
                };
                return Some(CalculatorView::showing(price));
            }
            Branch::Empty => return Some(CalculatorView::default()),
            Branch::Partial => {
                return Some(CalculatorView::showing(PriceLine::Error(FareError::IncompleteInput)));
            }
            Branch::AddressLookup { pickup, destination } => (pickup, destination),
        };

        on_progress(CalculatorView {
            price: PriceLine::Calculating,
            summary: None,
            button: ComputeButton::Busy,
            night_notice: false,
        });

        let route = self.resolver.resolve_route(&pickup, &destination).await;
        if !self.is_current(generation) {
            debug!("Dropping route for attempt {} after a newer attempt started", generation);
            return None;
        }

        let view = match route {
            None => CalculatorView::showing(PriceLine::Error(FareError::RouteUnavailable)),
            Some(route) if route.distance_km < 0.0 || route.duration_minutes < 0.0 => {
                CalculatorView::showing(PriceLine::Error(FareError::NegativeRoute))
            }
            Some(route) => {
                info!(
                    "Route {:.1} km / {:.0} min for attempt {}",
                    route.distance_km, route.duration_minutes, generation
                );
                CalculatorView {
                    price: PriceLine::Quote(PriceQuote::for_trip(
                        route.distance_km,
                        route.duration_minutes,
                    )),
                    summary: Some(TripSummary {
                        pickup,
                        destination,
                        distance_km: route.distance_km,
                        duration_minutes: route.duration_minutes,
                        time_slot: query.time_slot,
                    }),
                    button: ComputeButton::Ready,
                    night_notice: false,
                }
            }
        };
        Some(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fare::query::TripForm;
    use crate::fare::route::RouteResult;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::future::{self, LocalBoxFuture};
    use futures::FutureExt;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::task::Context;

    /// Hands out scripted answers in call order.
    struct ScriptedResolver {
        answers: RefCell<VecDeque<Option<RouteResult>>>,
        calls: Cell<usize>,
    }

    impl ScriptedResolver {
        fn new(answers: Vec<Option<RouteResult>>) -> Self {
            Self {
                answers: RefCell::new(answers.into()),
                calls: Cell::new(0),
            }
        }
    }

    impl RouteResolver for ScriptedResolver {
        fn resolve_route(&self, _: &str, _: &str) -> LocalBoxFuture<'static, Option<RouteResult>> {
            self.calls.set(self.calls.get() + 1);
            let answer = self.answers.borrow_mut().pop_front().flatten();
            future::ready(answer).boxed_local()
        }
    }

    fn query(pickup: &str, destination: &str, distance: &str, minutes: &str, slot: TimeSlot) -> TripQuery {
        TripQuery::from_form(
            &TripForm {
                pickup: pickup.into(),
                destination: destination.into(),
                distance: distance.into(),
                minutes: minutes.into(),
            },
            slot,
        )
    }

    fn run(estimator: &Estimator<ScriptedResolver>, q: &TripQuery) -> (Vec<CalculatorView>, Option<CalculatorView>) {
        let mut progress = Vec::new();
        let result = block_on(estimator.estimate(q, |view| progress.push(view)));
        (progress, result)
    }

    #[test]
    fn night_never_prices_and_keeps_the_button_locked() {
        let estimator = Estimator::new(ScriptedResolver::new(vec![]));
        for q in [
            query("Damrak 1", "Schiphol", "", "", TimeSlot::Night),
            query("", "", "10", "15", TimeSlot::Night),
            query("", "", "", "", TimeSlot::Night),
        ] {
            let (progress, view) = run(&estimator, &q);
            let view = view.unwrap();
            assert!(progress.is_empty());
            assert_eq!(view.price, PriceLine::Error(FareError::NightTrip));
            assert_eq!(view.price.quote(), None);
            assert!(view.button.disabled());
            assert!(view.night_notice);
            assert!(view.summary.is_none());
        }
        assert_eq!(estimator.resolver.calls.get(), 0);
    }

    #[test]
    fn manual_numbers_price_without_a_summary() {
        let estimator = Estimator::new(ScriptedResolver::new(vec![]));
        let (_, view) = run(&estimator, &query("", "", "10", "15", TimeSlot::Day));
        let view = view.unwrap();
        let quote = view.price.quote().unwrap();
        assert!((quote.amount - 29.80).abs() < 1e-9);
        assert!(view.summary.is_none());
        assert_eq!(view.button, ComputeButton::Ready);
    }

    #[test]
    fn negative_or_garbage_manual_values_are_rejected() {
        let estimator = Estimator::new(ScriptedResolver::new(vec![]));
        for (d, m) in [("-1", "15"), ("10", "-1"), ("tien", "15"), ("10", "inf")] {
            let (_, view) = run(&estimator, &query("", "", d, m, TimeSlot::Day));
            let view = view.unwrap();
            assert_eq!(view.price, PriceLine::Error(FareError::InvalidManualInput), "{d} / {m}");
            assert_eq!(view.price.text(), "❌ Ongeldige afstand of tijd.");
        }
    }

    #[test]
    fn empty_form_clears_silently() {
        let estimator = Estimator::new(ScriptedResolver::new(vec![]));
        let (progress, view) = run(&estimator, &query("", "", "", "", TimeSlot::Day));
        assert!(progress.is_empty());
        let view = view.unwrap();
        assert_eq!(view, CalculatorView::default());
        assert_eq!(view.price.text(), "");
    }

    #[test]
    fn partial_input_gets_a_hint() {
        let estimator = Estimator::new(ScriptedResolver::new(vec![]));
        let (_, view) = run(&estimator, &query("Damrak 1", "", "", "", TimeSlot::Day));
        assert_eq!(view.unwrap().price, PriceLine::Error(FareError::IncompleteInput));
        assert_eq!(estimator.resolver.calls.get(), 0);
    }

    #[test]
    fn failed_lookup_reports_and_releases_the_button() {
        let estimator = Estimator::new(ScriptedResolver::new(vec![None]));
        let (progress, view) = run(&estimator, &query("Nergens 0", "Schiphol", "", "", TimeSlot::Day));

        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].price, PriceLine::Calculating);
        assert_eq!(progress[0].button, ComputeButton::Busy);
        assert_eq!(progress[0].button.label(), "Bezig…");

        let view = view.unwrap();
        assert_eq!(view.price, PriceLine::Error(FareError::RouteUnavailable));
        assert_eq!(view.button, ComputeButton::Ready);
        assert!(!view.button.disabled());
        assert!(view.summary.is_none());
    }

    #[test]
    fn negative_route_is_caught_even_if_the_client_let_it_through() {
        let bogus = RouteResult { distance_km: -3.0, duration_minutes: 4.0 };
        let estimator = Estimator::new(ScriptedResolver::new(vec![Some(bogus)]));
        let (_, view) = run(&estimator, &query("A", "B", "", "", TimeSlot::Day));
        let view = view.unwrap();
        assert_eq!(view.price, PriceLine::Error(FareError::NegativeRoute));
        assert_eq!(view.button, ComputeButton::Ready);
    }

    #[test]
    fn successful_lookup_prices_and_summarizes() {
        let route = RouteResult::from_leg(17_460.0, 1_510.0).unwrap();
        let estimator = Estimator::new(ScriptedResolver::new(vec![Some(route)]));
        let (_, view) = run(&estimator, &query("Damrak 1", "Schiphol", "99", "", TimeSlot::Day));
        let view = view.unwrap();

        let expected = 3.50 + route.distance_km * 2.00 + route.duration_minutes * 0.42;
        assert_eq!(view.price.quote().unwrap().amount, expected);

        let summary = view.summary.unwrap();
        assert_eq!(summary.pickup, "Damrak 1");
        assert_eq!(summary.destination, "Schiphol");
        assert_eq!(summary.distance_text(), "17.5 km");
        assert_eq!(summary.duration_text(), "25 minuten");
        assert_eq!(summary.time_slot.title(), "Dag");
    }

    struct PendingResolver {
        pending: RefCell<Option<oneshot::Receiver<Option<RouteResult>>>>,
    }

    impl RouteResolver for PendingResolver {
        fn resolve_route(&self, _: &str, _: &str) -> LocalBoxFuture<'static, Option<RouteResult>> {
            match self.pending.borrow_mut().take() {
                Some(rx) => rx.map(|answer| answer.ok().flatten()).boxed_local(),
                None => future::ready(RouteResult::new(1.0, 1.0)).boxed_local(),
            }
        }
    }

    #[test]
    fn a_newer_attempt_wins_over_a_slow_older_one() {
        let (tx, rx) = oneshot::channel();
        let estimator = Estimator::new(PendingResolver {
            pending: RefCell::new(Some(rx)),
        });
        let lookup = query("A", "B", "", "", TimeSlot::Day);

        let mut slow = Box::pin(estimator.estimate(&lookup, |_| {}));
        let waker = futures::task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        assert!(slow.as_mut().poll(&mut cx).is_pending());

        let fast = block_on(estimator.estimate(&query("", "", "2", "3", TimeSlot::Day), |_| {}));
        assert!(fast.unwrap().price.quote().is_some());

        tx.send(RouteResult::new(50.0, 60.0)).unwrap();
        assert_eq!(block_on(slow), None);
    }

    #[test]
    fn night_selection_wipes_results_and_day_unlocks() {
        let mut view = CalculatorView::showing(PriceLine::Quote(PriceQuote::for_trip(1.0, 1.0)));
        view.apply_slot(TimeSlot::Night);
        assert_eq!(view.price, PriceLine::Cleared);
        assert_eq!(view.button, ComputeButton::Blocked);
        assert!(view.night_notice);

        view.apply_slot(TimeSlot::Day);
        assert_eq!(view.button, ComputeButton::Ready);
        assert!(!view.night_notice);
    }

    #[test]
    fn quarter_kilometre_rounds_up_like_the_browser() {
        let route = RouteResult::from_leg(250.0, 60.0).unwrap();
        let summary = TripSummary {
            pickup: "A".into(),
            destination: "B".into(),
            distance_km: route.distance_km,
            duration_minutes: route.duration_minutes,
            time_slot: TimeSlot::Day,
        };
        assert_eq!(summary.distance_text(), "0.3 km");
    }

    #[test]
    fn day_slot_keeps_a_running_lookup_busy() {
        let mut view = CalculatorView {
            price: PriceLine::Calculating,
            summary: None,
            button: ComputeButton::Busy,
            night_notice: false,
        };
        view.apply_slot(TimeSlot::Day);
        assert_eq!(view.button, ComputeButton::Busy);
        assert_eq!(view.price, PriceLine::Calculating);
    }

    #[test]
    fn editing_clears_a_stale_result() {
        let mut view = CalculatorView::showing(PriceLine::Error(FareError::RouteUnavailable));
        view.clear_for_edit(TimeSlot::Day);
        assert_eq!(view, CalculatorView::default());
    }
}
