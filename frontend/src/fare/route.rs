use futures::future::LocalBoxFuture;

/// Driving distance and time between two addresses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteResult {
    pub distance_km: f64,
    pub duration_minutes: f64,
}

impl RouteResult {
    /// Rejects negative or non-finite figures, whatever the service claims.
    pub fn new(distance_km: f64, duration_minutes: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        (valid(distance_km) && valid(duration_minutes)).then_some(Self {
            distance_km,
            duration_minutes,
        })
    }

    pub fn from_leg(meters: f64, seconds: f64) -> Option<Self> {
        Self::new(meters / 1000.0, seconds / 60.0)
    }
}

/// Turns two free-text addresses into a route. One attempt, no retries;
/// `None` covers both "not found" and "service unavailable".
pub trait RouteResolver {
    fn resolve_route(&self, origin: &str, destination: &str)
        -> LocalBoxFuture<'static, Option<RouteResult>>;
}
