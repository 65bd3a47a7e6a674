use serde::Deserialize;

/// Octave layout of a noise field.
///
/// Deserializes from the data-pack shape:
///
/// ```json
/// { "firstOctave": -7, "amplitudes": [1.0, 1.0, 0.0, 1.0] }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NoiseParameters {
    /// Exponent of the lowest frequency octave; frequency is `2^first_octave`.
    #[serde(rename = "firstOctave")]
    pub first_octave: i32,
    /// One amplitude per octave, lowest frequency first. Zero elides the octave.
    pub amplitudes: Vec<f64>,
}

impl NoiseParameters {
    /// Create noise parameters.
    #[must_use]
    pub fn new(first_octave: i32, amplitudes: impl Into<Vec<f64>>) -> Self {
        Self {
            first_octave,
            amplitudes: amplitudes.into(),
        }
    }
}
