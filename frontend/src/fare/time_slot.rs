use chrono::{Local, Timelike, Utc};
use chrono_tz::Tz;

const NIGHT_MARKERS: [&str; 3] = ["nacht", "20:", "na 20"];
const NIGHT_STARTS_AT: u32 = 20;
const NIGHT_ENDS_AT: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeSlot {
    #[default]
    Day,
    Night,
}

impl TimeSlot {
    /// Classifies a raw `<select>` value or option label.
    pub fn normalize(raw: &str) -> Self {
        let raw = raw.to_lowercase();
        if NIGHT_MARKERS.iter().any(|marker| raw.contains(marker)) {
            TimeSlot::Night
        } else {
            TimeSlot::Day
        }
    }

    pub fn from_hour(hour: u32) -> Self {
        if hour >= NIGHT_STARTS_AT || hour < NIGHT_ENDS_AT {
            TimeSlot::Night
        } else {
            TimeSlot::Day
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            TimeSlot::Day => "dag",
            TimeSlot::Night => "nacht",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::Day => "06:00-20:00(dag)",
            TimeSlot::Night => "Na 20:00(nacht)",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TimeSlot::Day => "Dag",
            TimeSlot::Night => "Nacht",
        }
    }

    pub fn is_night(self) -> bool {
        self == TimeSlot::Night
    }
}

/// Selector state. Once the visitor picks a slot the clock stops steering it
/// for the rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotSelection {
    pub slot: TimeSlot,
    pub user_changed: bool,
}

impl SlotSelection {
    pub fn choose(&mut self, raw: &str) -> TimeSlot {
        self.user_changed = true;
        self.slot = TimeSlot::normalize(raw);
        self.slot
    }

    /// Returns the new slot if the clock was allowed to change it.
    pub fn follow_clock(&mut self, hour: u32) -> Option<TimeSlot> {
        if self.user_changed {
            return None;
        }
        self.slot = TimeSlot::from_hour(hour);
        Some(self.slot)
    }
}

/// Current hour in the browser's timezone, or the system clock when the
/// zone cannot be resolved.
pub fn local_hour() -> u32 {
    match browser_timezone().and_then(|name| name.parse::<Tz>().ok()) {
        Some(tz) => Utc::now().with_timezone(&tz).hour(),
        None => Local::now().hour(),
    }
}

#[cfg(target_arch = "wasm32")]
fn browser_timezone() -> Option<String> {
    use web_sys::js_sys::{Array, Intl, Object, Reflect};
    use wasm_bindgen::JsValue;

    let options = Intl::DateTimeFormat::new(&Array::new(), &Object::new()).resolved_options();
    Reflect::get(&options, &JsValue::from_str("timeZone"))
        .ok()
        .and_then(|zone| zone.as_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn browser_timezone() -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_labels_normalize_to_night() {
        for raw in ["Na 20:00(nacht)", "20:", "nacht", "NACHT", "Nacht", "na 20 uur"] {
            assert_eq!(TimeSlot::normalize(raw), TimeSlot::Night, "{raw}");
        }
    }

    #[test]
    fn everything_else_is_day() {
        for raw in ["dag", "Dag", "", "night", "19:59"] {
            assert_eq!(TimeSlot::normalize(raw), TimeSlot::Day, "{raw}");
        }
    }

    #[test]
    fn day_option_label_mentions_20_but_value_wins() {
        // The day label contains "20:00" too; the selector hands us its value.
        assert_eq!(TimeSlot::normalize(TimeSlot::Day.value()), TimeSlot::Day);
        assert_eq!(TimeSlot::normalize(TimeSlot::Night.value()), TimeSlot::Night);
    }

    #[test]
    fn night_runs_from_twenty_to_six() {
        assert_eq!(TimeSlot::from_hour(20), TimeSlot::Night);
        assert_eq!(TimeSlot::from_hour(23), TimeSlot::Night);
        assert_eq!(TimeSlot::from_hour(0), TimeSlot::Night);
        assert_eq!(TimeSlot::from_hour(5), TimeSlot::Night);
        assert_eq!(TimeSlot::from_hour(6), TimeSlot::Day);
        assert_eq!(TimeSlot::from_hour(19), TimeSlot::Day);
    }

    #[test]
    fn clock_stops_after_a_manual_choice() {
        let mut selection = SlotSelection::default();
        assert_eq!(selection.follow_clock(22), Some(TimeSlot::Night));
        assert_eq!(selection.choose("dag"), TimeSlot::Day);
        assert_eq!(selection.follow_clock(23), None);
        assert_eq!(selection.slot, TimeSlot::Day);
    }

    #[test]
    fn local_hour_is_a_valid_hour() {
        assert!(local_hour() < 24);
    }
}
