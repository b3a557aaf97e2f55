//! State log document formats and loading.
//!
//! Two input formats are understood:
//!
//! ```text
//! JSON document:
//!   { "states": [ { "value": 12, "cube": [[[..], ..], ..],
//!                   "iteration": 0, "temperature": null }, .. ] }
//!
//! Text trace:
//!   one state per `;`-separated block, one line per layer,
//!   each line holding the layer's n*n cells in row-major order
//! ```
//!
//! Only the top-level shape of a JSON document is checked. Nested geometry
//! and cell values are kept exactly as recorded, and an entry that does not
//! look like a cube at all is kept as an empty state rather than failing the
//! load.

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::schema::{CubeState, Layer, LoadError, StateLog, magic_line_count};

/// Top-level field holding the recorded states.
pub const STATES_FIELD: &str = "states";

/// Separator between states in the text trace format.
pub const TEXT_STATE_SEPARATOR: char = ';';

impl From<LoadError> for io::Error {
    fn from(err: LoadError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

impl StateLog {
    /// Parse a JSON state document.
    pub fn load(bytes: &[u8]) -> Result<Self, LoadError> {
        let document: Value = serde_json::from_slice(bytes)
            .map_err(|e| LoadError::MalformedInput(e.to_string()))?;

        let entries = document
            .get(STATES_FIELD)
            .and_then(Value::as_array)
            .ok_or(LoadError::MissingStates)?;

        if entries.is_empty() {
            return Err(LoadError::EmptyLog);
        }

        let states: Vec<CubeState> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| entry_state(i, entry))
            .collect();

        info!("Loaded {} states from JSON document", states.len());
        Self::from_states(states)
    }

    /// Parse a text trace. Each state's value is its magic line count.
    pub fn load_text(bytes: &[u8]) -> Result<Self, LoadError> {
        let text =
            std::str::from_utf8(bytes).map_err(|e| LoadError::MalformedInput(e.to_string()))?;

        let states = text
            .split(TEXT_STATE_SEPARATOR)
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .enumerate()
            .map(|(i, block)| {
                parse_text_state(block)
                    .map_err(|msg| LoadError::MalformedInput(format!("state {i}: {msg}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!("Loaded {} states from text trace", states.len());
        Self::from_states(states)
    }

    /// Read a state log from disk.
    ///
    /// `.json` files use the document format, anything else the text trace.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        debug!(
            "Opening {} as {}",
            path.display(),
            if is_json { "JSON" } else { "text" }
        );

        let log = if is_json {
            Self::load(&bytes)?
        } else {
            Self::load_text(&bytes)?
        };
        Ok(log)
    }
}

/// Wrap one `states` entry. Entries that do not deserialize keep whatever
/// numeric `value` they carry and no layers.
fn entry_state(index: usize, entry: &Value) -> CubeState {
    CubeState::deserialize(entry).unwrap_or_else(|e| {
        warn!("State {index} has no readable cube, keeping it empty: {e}");
        let value = entry
            .get("value")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64)))
            .unwrap_or_default();
        CubeState::new(value, Vec::new())
    })
}

fn parse_text_state(block: &str) -> Result<CubeState, String> {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let n = lines.len();

    let mut cube: Vec<Layer> = Vec::with_capacity(n);
    for (i, line) in lines.iter().enumerate() {
        let cells = line
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<i64>()
                    .map_err(|e| format!("layer {i}: invalid cell {token:?}: {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if cells.len() != n * n {
            return Err(format!(
                "layer {i}: expected {} cells, found {}",
                n * n,
                cells.len()
            ));
        }
        cube.push(cells.chunks(n).map(<[i64]>::to_vec).collect());
    }

    let value = i64::from(magic_line_count(&cube));
    Ok(CubeState::new(value, cube))
}
