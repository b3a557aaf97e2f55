//! Cube Replay - Scrubbable playback of recorded magic cube search traces.
//!
//! This crate loads the sequence of cube states produced by a local search
//! run and replays it as a speed-controllable animation, independent of
//! whatever draws each frame.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Cube states, the state log, playback configuration and scoring
//! - `replay`: Loading, the playback engine, recording and shared handles
//!
//! # Example
//!
//! ```rust,no_run
//! use cube_replay::{PlaybackEngine, StateLog};
//!
//! let bytes = std::fs::read("steepest_ascent_state.json").unwrap();
//! let log = StateLog::load(&bytes).unwrap();
//!
//! let mut engine = PlaybackEngine::default();
//! engine.attach(log);
//! engine.play();
//!
//! // Feed timestamps from any clock; one frame per 33.3ms at 1x speed.
//! for step in 0..100 {
//!     if engine.tick(step as f64 * 10.0) {
//!         println!("{}", engine.current_state().unwrap());
//!     }
//! }
//! ```

pub mod replay;
pub mod schema;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use replay::{PlaybackEngine, PlaybackError, SharedEngine};
pub use schema::{BASE_FRAME_MS, CubeState, LoadError, PlaybackConfig, StateLog};
