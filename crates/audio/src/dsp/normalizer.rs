//! Block-Normalisierung
//!
//! Skaliert jeden Block anhand seiner Spitzenamplitude. Zwei Strategien:
//! reines Teilen durch den Spitzenwert oder Zielpegel mit begrenzter
//! Verstaerkung. Stille Bloecke (Spitze 0) bleiben unveraendert.

use super::AudioProcessor;
use crate::error::{AudioError, AudioResult};
use serde::{Deserialize, Serialize};

/// Normalisierungs-Strategie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizationStrategy {
    /// Teilt durch die Spitzenamplitude (Spitze wird 1.0)
    Peak,
    /// Skaliert mit `min(target / spitze, max_boost)`
    TargetGain { target: f32, max_boost: f32 },
}

impl NormalizationStrategy {
    /// Zielpegel 0.9, hoechstens 2-fache Verstaerkung
    pub fn sprache() -> Self {
        Self::TargetGain {
            target: 0.9,
            max_boost: 2.0,
        }
    }

    pub fn validieren(&self) -> AudioResult<()> {
        if let Self::TargetGain { target, max_boost } = *self {
            if !(target > 0.0 && target.is_finite()) {
                return Err(AudioError::Konfiguration(format!(
                    "Normalisierungs-Zielpegel muss positiv sein (war {target})"
                )));
            }
            if !(max_boost >= 1.0 && max_boost.is_finite()) {
                return Err(AudioError::Konfiguration(format!(
                    "Maximale Verstaerkung muss >= 1 sein (war {max_boost})"
                )));
            }
        }
        Ok(())
    }

    /// Gain fuer einen Block mit der gegebenen Spitze, `None` bei Stille
    pub fn gain_fuer(&self, spitze: f32) -> Option<f32> {
        if !(spitze > 0.0) {
            return None;
        }
        Some(match *self {
            Self::Peak => 1.0 / spitze,
            Self::TargetGain { target, max_boost } => (target / spitze).min(max_boost),
        })
    }
}

/// Spitzenamplitude eines Blocks
pub fn spitze(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |max, s| max.max(s.abs()))
}

/// Normalisierungs-Prozessor (zustandslos, blocklokal)
pub struct Normalizer {
    strategy: NormalizationStrategy,
    letzter_gain: f32,
    enabled: bool,
}

impl Normalizer {
    pub fn new(strategy: NormalizationStrategy) -> AudioResult<Self> {
        strategy.validieren()?;
        Ok(Self {
            strategy,
            letzter_gain: 1.0,
            enabled: true,
        })
    }

    pub fn strategy(&self) -> NormalizationStrategy {
        self.strategy
    }

    /// Zuletzt angewendeter Gain (1.0 bei Stille)
    pub fn letzter_gain(&self) -> f32 {
        self.letzter_gain
    }
}

impl AudioProcessor for Normalizer {
    fn process(&mut self, samples: &mut [f32]) {
        if !self.enabled {
            return;
        }

        let gain = self.strategy.gain_fuer(spitze(samples)).unwrap_or(1.0);
        self.letzter_gain = gain;
        if gain != 1.0 {
            for sample in samples.iter_mut() {
                *sample *= gain;
            }
        }
    }

    fn reset(&mut self) {
        self.letzter_gain = 1.0;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn name(&self) -> &'static str {
        "normalizer"
    }
}
