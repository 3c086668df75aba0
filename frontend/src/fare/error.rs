use thiserror::Error;

/// Everything the calculator can tell the visitor instead of a price.
/// The `Display` text is what ends up in the price output.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FareError {
    #[error("❌ Berekening is niet mogelijk tijdens nachtritten. Neem contact op met de chauffeur.")]
    NightTrip,

    #[error("❌ Ongeldige afstand of tijd.")]
    InvalidManualInput,

    #[error("❌ Ongeldig ophaal- of bestemmingsadres (of Maps kon niet laden).")]
    RouteUnavailable,

    #[error("❌ Afstand of tijd mag niet negatief zijn.")]
    NegativeRoute,

    #[error("❌ Vul beide adressen in, of alleen afstand en minuten.")]
    IncompleteInput,
}
