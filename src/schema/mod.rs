//! Schema module - Recorded cube states and playback configuration.

mod config;
mod score;
mod state;

pub use config::*;
pub use score::*;
pub use state::*;
