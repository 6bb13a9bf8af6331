//! Advisory adapters
//!
//! - **GeminiAdvisory**: calls the Generative Language API
//! - **OfflineAdvisory**: used when no API key is configured; every call
//!   fails, so the gateway's fallbacks apply
//! - **ScriptedAdvisory**: scripted test double (re-exported from the ports
//!   module behind the `mock` feature)

pub mod gemini;
pub mod offline;

pub use gemini::{GeminiAdvisory, GeminiConfig};
pub use offline::OfflineAdvisory;
