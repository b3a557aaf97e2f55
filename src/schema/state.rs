//! Recorded cube states and the ordered log that holds them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::{cube_order, max_line_count};

/// One row of cell values.
pub type Row = Vec<i64>;

/// One layer of the cube: an ordered sequence of rows.
pub type Layer = Vec<Row>;

/// A single recorded snapshot of the search.
///
/// Geometry is not validated: layers are expected to share a shape, but a
/// state is kept exactly as it was recorded. A missing `value` or `cube`
/// deserializes as 0 or no layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeState {
    /// Fractional scores are rounded to the nearest integer.
    #[serde(default, deserialize_with = "any_number")]
    value: i64,
    #[serde(default)]
    cube: Vec<Layer>,
    /// Search iteration that produced this state, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iteration: Option<u64>,
    /// Annealing temperature at this state, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

impl CubeState {
    /// Create a state from its score and layers.
    pub fn new(value: i64, cube: Vec<Layer>) -> Self {
        Self {
            value,
            cube,
            iteration: None,
            temperature: None,
        }
    }

    /// Attach the search iteration this state was taken at.
    pub fn with_iteration(mut self, iteration: u64) -> Self {
        self.iteration = Some(iteration);
        self
    }

    /// Attach the annealing temperature this state was taken at.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Domain score of this state (display metadata).
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Layers of the cube.
    pub fn cube(&self) -> &[Layer] {
        &self.cube
    }

    pub fn iteration(&self) -> Option<u64> {
        self.iteration
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.cube.len()
    }

    /// Shape as (layers, rows, columns), read from the first layer and row.
    pub fn dimensions(&self) -> (usize, usize, usize) {
        let rows = self.cube.first().map_or(0, |layer| layer.len());
        let cols = self
            .cube
            .first()
            .and_then(|layer| layer.first())
            .map_or(0, |row| row.len());
        (self.cube.len(), rows, cols)
    }
}

fn any_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Integer(i64),
        Float(f64),
    }

    Ok(match Number::deserialize(deserializer)? {
        Number::Integer(v) => v,
        Number::Float(v) => v.round() as i64,
    })
}

impl fmt::Display for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, layer) in self.cube.iter().enumerate() {
            writeln!(f, "Layer {}:", i + 1)?;
            for row in layer {
                for cell in row {
                    write!(f, "{cell:4}")?;
                }
                writeln!(f)?;
            }
        }
        write!(f, "Value: {}", self.value)?;
        if let Some(n) = cube_order(&self.cube) {
            write!(f, " / {}", max_line_count(n))?;
        }
        Ok(())
    }
}

/// Errors raised while turning raw bytes into a [`StateLog`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Document has no `states` sequence")]
    MissingStates,
    #[error("State log contains no states")]
    EmptyLog,
}

/// Ordered, non-empty sequence of recorded states.
///
/// Construct with [`StateLog::load`], [`StateLog::load_text`] or
/// [`StateLog::from_states`]; an empty log cannot exist.
#[derive(Debug, Clone, PartialEq)]
pub struct StateLog {
    states: Vec<CubeState>,
}

impl StateLog {
    /// Wrap already-built states, rejecting an empty sequence.
    pub fn from_states(states: Vec<CubeState>) -> Result<Self, LoadError> {
        if states.is_empty() {
            return Err(LoadError::EmptyLog);
        }
        Ok(Self { states })
    }

    /// Number of frames in the log (always at least 1).
    #[inline]
    pub fn total_frames(&self) -> usize {
        self.states.len()
    }

    /// Index of the final frame.
    #[inline]
    pub fn last_index(&self) -> usize {
        self.states.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&CubeState> {
        self.states.get(index)
    }

    pub fn states(&self) -> &[CubeState] {
        &self.states
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CubeState> {
        self.states.iter()
    }

    /// Lowest and highest `value` across the log.
    pub fn value_range(&self) -> (i64, i64) {
        self.states
            .iter()
            .fold((i64::MAX, i64::MIN), |(lo, hi), s| {
                (lo.min(s.value), hi.max(s.value))
            })
    }
}

impl<'a> IntoIterator for &'a StateLog {
    type Item = &'a CubeState;
    type IntoIter = std::slice::Iter<'a, CubeState>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(n: usize, fill: i64) -> Layer {
        vec![vec![fill; n]; n]
    }

    #[test]
    fn test_dimensions() {
        let state = CubeState::new(3, vec![layer(2, 1), layer(2, 2), layer(2, 3)]);
        assert_eq!(state.dimensions(), (3, 2, 2));
        assert_eq!(state.layer_count(), 3);

        let empty = CubeState::new(0, vec![]);
        assert_eq!(empty.dimensions(), (0, 0, 0));
    }

    #[test]
    fn test_metadata_builders() {
        let state = CubeState::new(7, vec![layer(1, 0)])
            .with_iteration(12)
            .with_temperature(0.5);
        assert_eq!(state.iteration(), Some(12));
        assert_eq!(state.temperature(), Some(0.5));
    }

    #[test]
    fn test_display_lists_layers_and_value() {
        let state = CubeState::new(42, vec![vec![vec![1, 2], vec![3, 4]]]);
        let text = state.to_string();
        assert!(text.starts_with("Layer 1:\n"));
        assert!(text.contains("   1   2\n"));
        assert!(text.ends_with("Value: 42"));
    }

    #[test]
    fn test_display_shows_line_total_for_cubes() {
        let state = CubeState::new(5, vec![layer(3, 1), layer(3, 2), layer(3, 3)]);
        assert!(state.to_string().ends_with("Value: 5 / 49"));
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let state: CubeState = serde_json::from_str(r#"{"cube": [[[1]]]}"#).unwrap();
        assert_eq!(state.value(), 0);
        assert_eq!(state.dimensions(), (1, 1, 1));

        let state: CubeState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.value(), 0);
        assert!(state.cube().is_empty());
    }

    #[test]
    fn test_deserialize_rounds_fractional_value() {
        let state: CubeState = serde_json::from_str(r#"{"value": 12.5, "cube": []}"#).unwrap();
        assert_eq!(state.value(), 13);
        let state: CubeState = serde_json::from_str(r#"{"value": -3.2}"#).unwrap();
        assert_eq!(state.value(), -3);
    }

    #[test]
    fn test_empty_log_rejected() {
        assert_eq!(StateLog::from_states(vec![]), Err(LoadError::EmptyLog));
    }

    #[test]
    fn test_value_range() {
        let log = StateLog::from_states(vec![
            CubeState::new(10, vec![]),
            CubeState::new(-2, vec![]),
            CubeState::new(55, vec![]),
        ])
        .unwrap();
        assert_eq!(log.total_frames(), 3);
        assert_eq!(log.last_index(), 2);
        assert_eq!(log.value_range(), (-2, 55));
        assert_eq!((&log).into_iter().count(), 3);
    }
}
