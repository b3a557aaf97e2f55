//! Thread-safe handle around a [`PlaybackEngine`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::player::{PlaybackEngine, PlaybackError, PlaybackSnapshot};
use crate::schema::{CubeState, StateLog};

/// Cloneable engine handle for hosts that tick from one thread and take
/// input on another.
///
/// Every call takes the lock once, so a tick's cursor and baseline updates
/// land together.
#[derive(Debug, Clone, Default)]
pub struct SharedEngine {
    inner: Arc<Mutex<PlaybackEngine>>,
}

impl SharedEngine {
    pub fn new(engine: PlaybackEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PlaybackEngine> {
        // Engine operations cannot leave partial state behind, so a poisoned
        // lock still guards a consistent engine.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run several operations under a single lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut PlaybackEngine) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn attach(&self, log: StateLog) {
        self.lock().attach(log);
    }

    pub fn play(&self) {
        self.lock().play();
    }

    pub fn play_backward(&self) {
        self.lock().play_backward();
    }

    pub fn pause(&self) {
        self.lock().pause();
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn seek(&self, frame_index: i64) {
        self.lock().seek(frame_index);
    }

    pub fn set_speed(&self, multiplier: f64) -> Result<(), PlaybackError> {
        self.lock().set_speed(multiplier)
    }

    pub fn tick(&self, now_ms: f64) -> bool {
        self.lock().tick(now_ms)
    }

    /// Copy of the state under the cursor.
    pub fn current_state(&self) -> Result<CubeState, PlaybackError> {
        self.lock().current_state().cloned()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.lock().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::BASE_FRAME_MS;
    use std::thread;

    fn log_of(frames: usize) -> StateLog {
        StateLog::from_states(
            (0..frames)
                .map(|i| CubeState::new(i as i64, vec![]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_shared_handles_see_same_engine() {
        let engine = SharedEngine::default();
        let other = engine.clone();

        engine.attach(log_of(4));
        other.play();
        assert!(engine.snapshot().is_playing);

        engine.tick(0.0);
        other.tick(BASE_FRAME_MS);
        assert_eq!(engine.current_state().unwrap().value(), 1);

        other.seek(3);
        assert_eq!(engine.snapshot().current_frame, Some(3));
        assert!(!engine.snapshot().is_playing);
    }

    #[test]
    fn test_ticks_and_input_from_threads() {
        let engine = SharedEngine::default();
        engine.attach(log_of(1000));
        engine.play();

        let ticker = {
            let engine = engine.clone();
            thread::spawn(move || {
                for k in 0..500 {
                    engine.tick(k as f64 * BASE_FRAME_MS);
                }
            })
        };
        let input = {
            let engine = engine.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    engine.with(|e| {
                        if !e.is_playing() {
                            e.play();
                        }
                    });
                }
            })
        };
        ticker.join().unwrap();
        input.join().unwrap();

        let snapshot = engine.snapshot();
        let frame = snapshot.current_frame.unwrap();
        assert!(frame < 500);
        assert_eq!(engine.current_state().unwrap().value(), frame as i64);
    }

    #[test]
    fn test_invalid_speed_through_handle() {
        let engine = SharedEngine::new(PlaybackEngine::default());
        assert_eq!(
            engine.set_speed(0.0),
            Err(PlaybackError::InvalidSpeed(0.0))
        );
        assert_eq!(engine.snapshot().speed_multiplier, 1.0);
        assert_eq!(engine.current_state(), Err(PlaybackError::NoData));
    }
}
