//! WebAssembly bindings for Cube Replay.
//!
//! Provides a thin wrapper around `PlaybackEngine` for browser hosts. The page
//! drives `tick` from `requestAnimationFrame` and redraws when it returns true.

use wasm_bindgen::prelude::*;

use crate::{PlaybackConfig, PlaybackEngine, StateLog};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

/// WebAssembly wrapper for the playback engine.
#[wasm_bindgen]
pub struct WasmPlayer {
    engine: PlaybackEngine,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player, optionally from a JSON `PlaybackConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmPlayer, JsValue> {
        let config = match config_json {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?,
            None => PlaybackConfig::default(),
        };

        let engine = PlaybackEngine::new(&config)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;

        Ok(WasmPlayer { engine })
    }

    /// Load a JSON state document and attach it.
    ///
    /// On failure the previously attached log stays in place.
    #[wasm_bindgen]
    pub fn load(&mut self, document: &str) -> Result<(), JsValue> {
        let log = StateLog::load(document.as_bytes())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.engine.attach(log);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn play(&mut self) {
        self.engine.play();
    }

    #[wasm_bindgen(js_name = playBackward)]
    pub fn play_backward(&mut self) {
        self.engine.play_backward();
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) {
        self.engine.pause();
    }

    #[wasm_bindgen]
    pub fn toggle(&mut self) {
        self.engine.toggle();
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// Jump to a frame (clamped) and pause.
    #[wasm_bindgen]
    pub fn seek(&mut self, frame_index: f64) {
        self.engine.seek(frame_index as i64);
    }

    #[wasm_bindgen(js_name = stepForward)]
    pub fn step_forward(&mut self) {
        self.engine.step_forward();
    }

    #[wasm_bindgen(js_name = stepBackward)]
    pub fn step_backward(&mut self) {
        self.engine.step_backward();
    }

    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&mut self, multiplier: f64) -> Result<(), JsValue> {
        self.engine
            .set_speed(multiplier)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Advance to `now_ms` (e.g. the `requestAnimationFrame` timestamp).
    ///
    /// Returns true when the host should redraw.
    #[wasm_bindgen]
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.engine.tick(now_ms)
    }

    /// Get the current cube state as a JS object.
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        let state = self
            .engine
            .current_state()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        serde_wasm_bindgen::to_value(state)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Get frame, speed and playing flag as a JS object.
    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.engine.snapshot())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    #[wasm_bindgen(js_name = currentFrame)]
    pub fn current_frame(&self) -> Option<u32> {
        self.engine.current_frame().map(|f| f as u32)
    }

    #[wasm_bindgen(js_name = totalFrames)]
    pub fn total_frames(&self) -> usize {
        self.engine.total_frames()
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    #[wasm_bindgen(js_name = speedMultiplier)]
    pub fn speed_multiplier(&self) -> f64 {
        self.engine.speed_multiplier()
    }
}
