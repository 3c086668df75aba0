use std::fmt;

pub const BASE_FARE: f64 = 3.50;
pub const PRICE_PER_KM: f64 = 2.00;
pub const PRICE_PER_MINUTE: f64 = 0.42;

/// Linear day tariff. Callers must reject negative or non-finite input first.
pub fn price(distance_km: f64, minutes: f64) -> f64 {
    BASE_FARE + distance_km * PRICE_PER_KM + minutes * PRICE_PER_MINUTE
}

/// Estimated fare in euros.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub amount: f64,
}

impl PriceQuote {
    pub fn for_trip(distance_km: f64, minutes: f64) -> Self {
        Self { amount: price(distance_km, minutes) }
    }
}

impl fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Geschatte prijs: €{}", to_fixed(self.amount, 2))
    }
}

/// Fixed-point text with ties rounded away from zero, the way browsers
/// round `toFixed`. `{:.n}` alone rounds exact ties to even.
pub fn to_fixed(value: f64, digits: u32) -> String {
    let scale = 10f64.powi(digits as i32);
    let scaled = value * scale;
    let rounded = if scaled.is_finite() {
        scaled.round() / scale
    } else {
        value
    };
    format!("{:.*}", digits as usize, rounded)
}

/// Dutch notation used on the rates section, e.g. `€3,50`.
pub fn format_rate(amount: f64) -> String {
    format!("€{}", to_fixed(amount, 2)).replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_trip_costs_the_base_fare() {
        assert_eq!(price(0.0, 0.0), 3.50);
    }

    #[test]
    fn follows_the_linear_tariff_exactly() {
        for (d, m) in [(1.0, 1.0), (2.5, 7.0), (12.345, 14.9), (100.0, 0.0)] {
            assert_eq!(price(d, m), 3.50 + d * 2.00 + m * 0.42);
        }
    }

    #[test]
    fn half_cent_ties_round_up() {
        assert_eq!(PriceQuote::for_trip(0.0625, 0.0).to_string(), "Geschatte prijs: €3.63");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(2.5, 0), "3");
    }

    #[test]
    fn values_just_below_a_tie_round_down() {
        // 1.005 is stored as 1.00499999...
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(3.5, 2), "3.50");
    }

    #[test]
    fn ten_km_fifteen_minutes() {
        assert!((price(10.0, 15.0) - 29.80).abs() < 1e-9);
        assert_eq!(
            PriceQuote::for_trip(10.0, 15.0).to_string(),
            "Geschatte prijs: €29.80"
        );
    }

    #[test]
    fn rates_use_a_decimal_comma() {
        assert_eq!(format_rate(BASE_FARE), "€3,50");
        assert_eq!(format_rate(PRICE_PER_KM), "€2,00");
        assert_eq!(format_rate(PRICE_PER_MINUTE), "€0,42");
    }
}
