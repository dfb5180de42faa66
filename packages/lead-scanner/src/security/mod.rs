//! URL safety checks applied before any outbound fetch.

mod url_gate;

pub use url_gate::UrlGate;
