use tracing::warn;

pub mod customers;
pub mod dashboard;
pub mod financial;
pub mod health;
pub mod index;
pub mod operational;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 1000;

/// `?limit=` for the ranking endpoints. Extracted from the raw query pairs
/// so a bad or repeated value falls back instead of rejecting the request.
#[derive(Debug, Default)]
pub struct LimitQ {
    pub limit: Option<String>,
}

impl LimitQ {
    /// First `limit` wins when the key is repeated.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let limit = pairs
            .into_iter()
            .find(|(k, _)| k == "limit")
            .map(|(_, v)| v);
        Self { limit }
    }

    pub fn resolve(&self) -> i64 {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_LIMIT,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) => n.clamp(1, MAX_LIMIT),
                Err(_) => {
                    warn!(limit = raw, "ignoring non-integer limit");
                    DEFAULT_LIMIT
                }
            },
        }
    }
}
