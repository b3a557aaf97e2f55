//! Playback engine turning wall-clock time into cursor advances over a state log.

use log::{debug, trace};
use serde::Serialize;

use crate::schema::{BASE_FRAME_MS, ConfigError, CubeState, PlaybackConfig, StateLog};

/// Slack applied when comparing elapsed time against the frame interval, so
/// ticks spaced exactly one interval apart are not lost to rounding.
const TIMING_EPSILON_MS: f64 = 1e-6;

/// Direction of autonomous playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlaybackDirection {
    #[default]
    Forward,
    Backward,
}

/// Coarse engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// No log attached.
    Unloaded,
    Paused,
    Playing,
}

/// Playback errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    #[error("Speed multiplier must be positive and finite, got {0}")]
    InvalidSpeed(f64),
    #[error("No state log attached")]
    NoData,
}

/// Read-only view of the engine for hosts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub current_frame: Option<usize>,
    pub total_frames: usize,
    pub is_playing: bool,
    pub speed_multiplier: f64,
    pub direction: PlaybackDirection,
}

/// Cursor over a [`StateLog`] driven by external `tick` calls.
///
/// The engine never reads a clock. The host calls [`tick`](Self::tick) with
/// a monotonic timestamp in milliseconds at whatever cadence it likes, and
/// the engine advances at most one frame per call once a full frame interval
/// (`base_frame_ms / speed`) has elapsed since the last advance.
///
/// Usage:
/// ```ignore
/// let mut engine = PlaybackEngine::default();
/// engine.attach(StateLog::load(&bytes)?);
/// engine.play();
/// loop {
///     if engine.tick(now_ms()) {
///         render(engine.current_state()?);
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PlaybackEngine {
    log: Option<StateLog>,
    current_frame: usize,
    is_playing: bool,
    direction: PlaybackDirection,
    speed_multiplier: f64,
    base_frame_ms: f64,
    /// Time of the last frame advance (or baseline), not of the last call.
    last_tick_timestamp: Option<f64>,
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self {
            log: None,
            current_frame: 0,
            is_playing: false,
            direction: PlaybackDirection::Forward,
            speed_multiplier: 1.0,
            base_frame_ms: BASE_FRAME_MS,
            last_tick_timestamp: None,
        }
    }
}

impl PlaybackEngine {
    /// Create an engine from a validated configuration.
    pub fn new(config: &PlaybackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            speed_multiplier: config.default_speed,
            base_frame_ms: config.base_frame_ms(),
            ..Self::default()
        })
    }

    /// Bind a new log, rewinding to frame 0 and pausing.
    pub fn attach(&mut self, log: StateLog) {
        debug!("Attaching state log with {} frames", log.total_frames());
        self.log = Some(log);
        self.current_frame = 0;
        self.direction = PlaybackDirection::Forward;
        self.stop();
    }

    /// Start forward playback. No-op at the last frame.
    pub fn play(&mut self) {
        self.start(PlaybackDirection::Forward);
    }

    /// Start backward playback. No-op at frame 0.
    pub fn play_backward(&mut self) {
        self.start(PlaybackDirection::Backward);
    }

    pub fn pause(&mut self) {
        self.stop();
    }

    /// Toggle between playing forward and paused.
    pub fn toggle(&mut self) {
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Rewind to frame 0 and pause.
    pub fn reset(&mut self) {
        self.current_frame = 0;
        self.stop();
    }

    /// Jump to `frame_index`, clamped into the log, and pause.
    ///
    /// Does nothing when no log is attached.
    pub fn seek(&mut self, frame_index: i64) {
        let Some(log) = &self.log else {
            return;
        };
        let clamped = frame_index.clamp(0, log.last_index() as i64) as usize;
        if clamped as i64 != frame_index {
            debug!("Seek to {frame_index} clamped to {clamped}");
        }
        self.current_frame = clamped;
        self.stop();
    }

    /// Move one frame forward, saturating at the end. Pauses playback.
    pub fn step_forward(&mut self) {
        self.seek(self.current_frame as i64 + 1);
    }

    /// Move one frame backward, saturating at 0. Pauses playback.
    pub fn step_backward(&mut self) {
        self.seek(self.current_frame as i64 - 1);
    }

    /// Change the speed multiplier. Applies from the next tick.
    pub fn set_speed(&mut self, multiplier: f64) -> Result<(), PlaybackError> {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(PlaybackError::InvalidSpeed(multiplier));
        }
        debug!("Playback speed {} -> {}", self.speed_multiplier, multiplier);
        self.speed_multiplier = multiplier;
        Ok(())
    }

    /// Advance playback to time `now_ms`.
    ///
    /// Returns true if the current frame or the playing flag changed.
    /// Non-finite timestamps are ignored.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(log) = &self.log else {
            return false;
        };
        if !self.is_playing {
            return false;
        }
        if !now_ms.is_finite() {
            trace!("Ignoring non-finite tick timestamp {now_ms}");
            return false;
        }

        let Some(last) = self.last_tick_timestamp else {
            self.last_tick_timestamp = Some(now_ms);
            return false;
        };

        let elapsed = now_ms - last;
        if elapsed + TIMING_EPSILON_MS < self.frame_interval_ms() {
            return false;
        }

        let end = match self.direction {
            PlaybackDirection::Forward => log.last_index(),
            PlaybackDirection::Backward => 0,
        };
        if self.current_frame == end {
            self.stop();
            return true;
        }

        match self.direction {
            PlaybackDirection::Forward => self.current_frame += 1,
            PlaybackDirection::Backward => self.current_frame -= 1,
        }
        self.last_tick_timestamp = Some(now_ms);
        trace!("Advanced to frame {}", self.current_frame);

        if self.current_frame == end {
            debug!("Playback reached frame {end}");
            self.stop();
        }
        true
    }

    /// State under the cursor.
    pub fn current_state(&self) -> Result<&CubeState, PlaybackError> {
        self.log
            .as_ref()
            .and_then(|log| log.get(self.current_frame))
            .ok_or(PlaybackError::NoData)
    }

    /// Cursor position, absent when no log is attached.
    pub fn current_frame(&self) -> Option<usize> {
        self.log.as_ref().map(|_| self.current_frame)
    }

    /// Frames in the attached log, 0 when unloaded.
    pub fn total_frames(&self) -> usize {
        self.log.as_ref().map_or(0, StateLog::total_frames)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn direction(&self) -> PlaybackDirection {
        self.direction
    }

    pub fn log(&self) -> Option<&StateLog> {
        self.log.as_ref()
    }

    /// Milliseconds between frame advances at the current speed.
    #[inline]
    pub fn frame_interval_ms(&self) -> f64 {
        self.base_frame_ms / self.speed_multiplier
    }

    pub fn status(&self) -> PlaybackStatus {
        match (&self.log, self.is_playing) {
            (None, _) => PlaybackStatus::Unloaded,
            (Some(_), false) => PlaybackStatus::Paused,
            (Some(_), true) => PlaybackStatus::Playing,
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_frame: self.current_frame(),
            total_frames: self.total_frames(),
            is_playing: self.is_playing,
            speed_multiplier: self.speed_multiplier,
            direction: self.direction,
        }
    }

    fn start(&mut self, direction: PlaybackDirection) {
        let Some(log) = &self.log else {
            return;
        };
        let at_end = match direction {
            PlaybackDirection::Forward => self.current_frame >= log.last_index(),
            PlaybackDirection::Backward => self.current_frame == 0,
        };
        if at_end {
            debug!("Play {direction:?} ignored at frame {}", self.current_frame);
            return;
        }
        self.direction = direction;
        self.is_playing = true;
        self.last_tick_timestamp = None;
    }

    fn stop(&mut self) {
        self.is_playing = false;
        self.last_tick_timestamp = None;
    }
}
