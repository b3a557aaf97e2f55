//! State recorder for capturing search states into a loadable log file.

use std::fs::File;
use std::io::{self, BufWriter, Seek, Write};
use std::path::Path;

use log::debug;

use super::format::STATES_FIELD;
use crate::schema::CubeState;

/// Configuration for state recording.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Record every Nth state (1 = every state).
    pub frame_skip: u32,
    /// Maximum states to record (0 = unlimited).
    pub max_frames: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            frame_skip: 1,
            max_frames: 0,
        }
    }
}

/// Streams states into a JSON state document.
///
/// Usage:
/// ```ignore
/// let mut recorder = StateRecorder::new("steepest_ascent.json", Default::default())?;
/// for state in search {
///     recorder.record_state(&state)?;
/// }
/// recorder.finalize()?;
/// ```
///
/// A file finalized with no states is valid JSON but loads as an empty log.
pub struct StateRecorder {
    writer: BufWriter<File>,
    config: RecorderConfig,
    frames_written: u64,
    step_counter: u32,
}

impl StateRecorder {
    /// Create a new recorder, writing the document opening immediately.
    pub fn new<P: AsRef<Path>>(path: P, config: RecorderConfig) -> io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        write!(writer, "{{\"{STATES_FIELD}\":[")?;

        Ok(Self {
            writer,
            config,
            frames_written: 0,
            step_counter: 0,
        })
    }

    /// Record a state.
    ///
    /// Returns true if the state was actually written (may skip based on config).
    pub fn record_state(&mut self, state: &CubeState) -> io::Result<bool> {
        self.step_counter += 1;

        if self.step_counter < self.config.frame_skip {
            return Ok(false);
        }
        self.step_counter = 0;

        if self.config.max_frames > 0 && self.frames_written >= self.config.max_frames {
            return Ok(false);
        }

        if self.frames_written > 0 {
            self.writer.write_all(b",")?;
        }
        serde_json::to_writer(&mut self.writer, state)?;
        self.frames_written += 1;

        Ok(true)
    }

    /// Close the document and flush it to disk.
    pub fn finalize(mut self) -> io::Result<RecordingStats> {
        self.writer.write_all(b"]}")?;
        self.writer.flush()?;
        let total_bytes = self.writer.stream_position()?;

        debug!(
            "Recorded {} states ({} bytes)",
            self.frames_written, total_bytes
        );

        Ok(RecordingStats {
            frame_count: self.frames_written,
            total_bytes,
        })
    }

    /// Get number of states recorded so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

/// Statistics from a recording session.
#[derive(Debug, Clone)]
pub struct RecordingStats {
    /// Total states recorded.
    pub frame_count: u64,
    /// Total file size in bytes.
    pub total_bytes: u64,
}

impl std::fmt::Display for RecordingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} states, {} bytes total",
            self.frame_count, self.total_bytes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LoadError;
    use crate::schema::StateLog;
    use std::fs;
    use tempfile::tempdir;

    fn state(i: u64) -> CubeState {
        CubeState::new(i as i64, vec![vec![vec![i as i64; 2]; 2]; 2]).with_iteration(i)
    }

    #[test]
    fn test_recorder_output_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trace.json");

        let mut recorder = StateRecorder::new(&path, RecorderConfig::default()).unwrap();
        for i in 0..10 {
            assert!(recorder.record_state(&state(i)).unwrap());
        }
        let stats = recorder.finalize().unwrap();
        assert_eq!(stats.frame_count, 10);
        assert_eq!(stats.total_bytes, fs::metadata(&path).unwrap().len());

        let log = StateLog::load(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(log.total_frames(), 10);
        assert_eq!(log.get(7), Some(&state(7)));
    }

    #[test]
    fn test_recorder_frame_skip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("skip.json");

        let config = RecorderConfig {
            frame_skip: 5,
            ..Default::default()
        };
        let mut recorder = StateRecorder::new(&path, config).unwrap();

        // 20 states with skip 5 keeps the 5th, 10th, 15th and 20th.
        for i in 1..=20 {
            recorder.record_state(&state(i)).unwrap();
        }
        assert_eq!(recorder.finalize().unwrap().frame_count, 4);

        let log = StateLog::open(&path).unwrap();
        let iterations: Vec<_> = log.iter().filter_map(CubeState::iteration).collect();
        assert_eq!(iterations, vec![5, 10, 15, 20]);
    }

    #[test]
    fn test_recorder_max_frames() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("max.json");

        let config = RecorderConfig {
            max_frames: 5,
            ..Default::default()
        };
        let mut recorder = StateRecorder::new(&path, config).unwrap();

        for i in 0..100 {
            recorder.record_state(&state(i)).unwrap();
        }
        assert_eq!(recorder.frames_written(), 5);
        assert_eq!(recorder.finalize().unwrap().frame_count, 5);
    }

    #[test]
    fn test_empty_recording_loads_as_empty_log() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");

        let recorder = StateRecorder::new(&path, RecorderConfig::default()).unwrap();
        recorder.finalize().unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(StateLog::load(&bytes), Err(LoadError::EmptyLog));
    }
}
