//! Hard-Knee-Kompressor
//!
//! Pro Sample und ohne Gedaechtnis: Ueber dem Schwellenwert wird der
//! Ueberschuss durch `ratio` geteilt, das Vorzeichen bleibt erhalten.

use super::AudioProcessor;
use crate::error::{AudioError, AudioResult};
use serde::{Deserialize, Serialize};

/// Konfiguration fuer den Kompressor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorConfig {
    /// Schwellenwert (linear, 0 < threshold <= 1)
    pub threshold: f32,
    /// Kompressionsverhaeltnis (>= 1, 1 = kein Effekt)
    pub ratio: f32,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            ratio: 4.0,
        }
    }
}

impl CompressorConfig {
    /// Validiert die Konfiguration
    pub fn validieren(&self) -> AudioResult<()> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(AudioError::Konfiguration(format!(
                "Kompressor-Schwellenwert muss in (0, 1] liegen (war {})",
                self.threshold
            )));
        }
        if !(self.ratio >= 1.0 && self.ratio.is_finite()) {
            return Err(AudioError::Konfiguration(format!(
                "Kompressionsverhaeltnis muss >= 1 sein (war {})",
                self.ratio
            )));
        }
        Ok(())
    }
}

/// Kompressor-Prozessor
pub struct Compressor {
    config: CompressorConfig,
    enabled: bool,
}

impl Compressor {
    pub fn new(config: CompressorConfig) -> AudioResult<Self> {
        config.validieren()?;
        Ok(Self {
            config,
            enabled: true,
        })
    }

    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    /// Komprimiert ein einzelnes Sample
    #[inline]
    pub fn compress_sample(&self, sample: f32) -> f32 {
        let abs = sample.abs();
        if abs > self.config.threshold {
            let compressed =
                self.config.threshold + (abs - self.config.threshold) / self.config.ratio;
            compressed.copysign(sample)
        } else {
            sample
        }
    }
}

impl AudioProcessor for Compressor {
    fn process(&mut self, samples: &mut [f32]) {
        if !self.enabled {
            return;
        }

        for sample in samples.iter_mut() {
            *sample = self.compress_sample(*sample);
        }
    }

    // Zustandslos
    fn reset(&mut self) {}

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn name(&self) -> &'static str {
        "compressor"
    }
}
