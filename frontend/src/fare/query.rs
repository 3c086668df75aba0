use crate::fare::time_slot::TimeSlot;

/// Raw calculator fields exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripForm {
    pub pickup: String,
    pub destination: String,
    pub distance: String,
    pub minutes: String,
}

/// One estimation attempt's input, rebuilt from the form on every click.
#[derive(Debug, Clone, PartialEq)]
pub struct TripQuery {
    pub pickup: Option<String>,
    pub destination: Option<String>,
    pub manual_distance_km: Option<f64>,
    pub manual_minutes: Option<f64>,
    pub time_slot: TimeSlot,
}

/// Which path an attempt takes, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum Branch {
    NightBlocked,
    ManualNumeric { distance_km: f64, minutes: f64 },
    Empty,
    AddressLookup { pickup: String, destination: String },
    Partial,
}

impl TripQuery {
    pub fn from_form(form: &TripForm, time_slot: TimeSlot) -> Self {
        Self {
            pickup: text_field(&form.pickup),
            destination: text_field(&form.destination),
            manual_distance_km: number_field(&form.distance),
            manual_minutes: number_field(&form.minutes),
            time_slot,
        }
    }

    pub fn branch(&self) -> Branch {
        if self.time_slot.is_night() {
            return Branch::NightBlocked;
        }

        let no_addresses = self.pickup.is_none() && self.destination.is_none();
        match (self.manual_distance_km, self.manual_minutes) {
            (Some(distance_km), Some(minutes)) if no_addresses => {
                return Branch::ManualNumeric { distance_km, minutes };
            }
            (None, None) if no_addresses => return Branch::Empty,
            _ => {}
        }

        match (&self.pickup, &self.destination) {
            (Some(pickup), Some(destination)) => Branch::AddressLookup {
                pickup: pickup.clone(),
                destination: destination.clone(),
            },
            _ => Branch::Partial,
        }
    }
}

fn text_field(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Empty means absent. Anything typed is present; text that is not a number
/// comes back as NaN so validation can reject it. The whole field must parse:
/// unlike `parseFloat`, a unit suffix such as `"10km"` is not read as 10.
fn number_field(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.replacen(',', ".", 1).parse::<f64>().unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pickup: &str, destination: &str, distance: &str, minutes: &str) -> TripForm {
        TripForm {
            pickup: pickup.into(),
            destination: destination.into(),
            distance: distance.into(),
            minutes: minutes.into(),
        }
    }

    #[test]
    fn night_wins_over_everything() {
        let query = TripQuery::from_form(&form("Damrak 1", "Schiphol", "10", "15"), TimeSlot::Night);
        assert_eq!(query.branch(), Branch::NightBlocked);
    }

    #[test]
    fn manual_numbers_accept_a_decimal_comma() {
        let query = TripQuery::from_form(&form("", "", "7,5", " 12 "), TimeSlot::Day);
        assert_eq!(
            query.branch(),
            Branch::ManualNumeric { distance_km: 7.5, minutes: 12.0 }
        );
    }

    #[test]
    fn garbage_numbers_are_present_but_nan() {
        let query = TripQuery::from_form(&form("", "", "tien", "15"), TimeSlot::Day);
        match query.branch() {
            Branch::ManualNumeric { distance_km, minutes } => {
                assert!(distance_km.is_nan());
                assert_eq!(minutes, 15.0);
            }
            other => panic!("unexpected branch {other:?}"),
        }
    }

    #[test]
    fn unit_suffix_is_not_stripped() {
        let query = TripQuery::from_form(&form("", "", "10km", "15"), TimeSlot::Day);
        assert!(query.manual_distance_km.is_some_and(f64::is_nan));
    }

    #[test]
    fn blank_form_is_empty() {
        let query = TripQuery::from_form(&form("  ", "", " ", ""), TimeSlot::Day);
        assert_eq!(query.branch(), Branch::Empty);
    }

    #[test]
    fn addresses_are_trimmed_and_take_priority_over_manual_fields() {
        let query = TripQuery::from_form(&form(" Damrak 1 ", "Schiphol", "10", ""), TimeSlot::Day);
        assert_eq!(
            query.branch(),
            Branch::AddressLookup {
                pickup: "Damrak 1".into(),
                destination: "Schiphol".into(),
            }
        );
    }

    #[test]
    fn half_filled_combinations_are_partial() {
        for f in [
            form("Damrak 1", "", "", ""),
            form("", "Schiphol", "10", "15"),
            form("", "", "10", ""),
            form("Damrak 1", "", "10", "15"),
        ] {
            assert_eq!(TripQuery::from_form(&f, TimeSlot::Day).branch(), Branch::Partial);
        }
    }
}
