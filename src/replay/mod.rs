//! Loading, playback and recording of cube state logs.
//!
//! A state log is loaded once per session and replayed by a
//! [`PlaybackEngine`], which the host drives with timestamps:
//!
//! ```text
//! raw bytes --StateLog::load--> StateLog --attach--> PlaybackEngine
//!                                                      |  tick(now_ms)
//!                                                      v
//!                                              current_state() -> renderer
//! ```
//!
//! # Timing
//!
//! The engine runs at a logical 30 frames per second at 1x speed
//! (`BASE_FRAME_MS` = 33.3ms). A tick advances at most one frame, so a slow
//! or bursty host slows the replay down rather than skipping states.

mod format;
mod player;
mod recorder;
mod shared;

pub use format::{STATES_FIELD, TEXT_STATE_SEPARATOR};
pub use player::{
    PlaybackDirection, PlaybackEngine, PlaybackError, PlaybackSnapshot, PlaybackStatus,
};
pub use recorder::{RecorderConfig, RecordingStats, StateRecorder};
pub use shared::SharedEngine;
