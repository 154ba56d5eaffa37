//! Analysis providers.
//!
//! [`ChatProvider`] is the seam between the analyzer and the language model;
//! [`GroqClient`] is the HTTP implementation used by the daemon.

pub mod groq;
pub mod traits;

pub use groq::GroqClient;
pub use traits::ChatProvider;
