pub mod wordlist;

pub use wordlist::WordlistLemmatizer;

/// Reduces a lower-cased token to its lemma. The full implementation is
/// backed by a word list loaded at startup; when that resource is missing
/// the service runs with [`Passthrough`] and matching loses precision but
/// keeps working.
pub trait Lemmatizer: Send + Sync {
    fn reduce(&self, token: &str) -> String;
}

/// Degraded mode: tokens pass through unreduced.
pub struct Passthrough;

impl Lemmatizer for Passthrough {
    fn reduce(&self, token: &str) -> String {
        token.to_string()
    }
}
