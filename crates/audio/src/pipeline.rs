//! Signalaufbereitung
//!
//! Verbindet die DSP-Stufen in fester Reihenfolge:
//! Boost -> Kompressor -> Normalisierung. Die Normalisierung laeuft zuletzt,
//! damit sie jede vorherige Verstaerkung beruecksichtigt. Capture und
//! Playback besitzen je eine eigene Instanz (getrennte Filter-Historie).

use crate::config::ConditionerConfig;
use crate::dsp::{AudioProcessor, Compressor, HighShelfBoost, Normalizer};
use crate::error::AudioResult;

/// Kette von `AudioProcessor`-Stufen
pub struct SignalConditioner {
    processors: Vec<Box<dyn AudioProcessor>>,
}

impl SignalConditioner {
    /// Baut die Kette aus der Konfiguration; nicht gesetzte Stufen entfallen
    pub fn from_config(config: &ConditionerConfig) -> AudioResult<Self> {
        let mut processors: Vec<Box<dyn AudioProcessor>> = Vec::with_capacity(3);
        if let Some(coeff) = config.boost {
            processors.push(Box::new(HighShelfBoost::new(coeff)?));
        }
        if let Some(compressor) = config.compressor {
            processors.push(Box::new(Compressor::new(compressor)?));
        }
        if let Some(strategy) = config.normalization {
            processors.push(Box::new(Normalizer::new(strategy)?));
        }
        Ok(Self { processors })
    }

    /// Leere Kette ohne Stufen
    pub fn empty() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    /// Verarbeitet einen Block in-place durch alle aktiven Stufen
    pub fn process_block(&mut self, samples: &mut [f32]) {
        for processor in self.processors.iter_mut() {
            processor.process(samples);
        }
    }

    /// Namen der Stufen in Ausfuehrungsreihenfolge
    pub fn stufen(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// Anzahl der aktiven Stufen
    pub fn aktive(&self) -> usize {
        self.processors.iter().filter(|p| p.is_enabled()).count()
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Setzt alle Stufen zurueck
    pub fn reset_all(&mut self) {
        for p in self.processors.iter_mut() {
            p.reset();
        }
    }

    /// Aktiviert oder deaktiviert alle Stufen
    pub fn set_all_enabled(&mut self, enabled: bool) {
        for p in self.processors.iter_mut() {
            p.set_enabled(enabled);
        }
    }
}

impl std::fmt::Debug for SignalConditioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalConditioner")
            .field("stufen", &self.stufen())
            .finish()
    }
}
