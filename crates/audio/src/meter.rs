//! Pegelmessung (Spitze und RMS) fuer Trace-Logs und Statistik

use serde::Serialize;

/// Pegel eines Blocks (linear)
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct Pegel {
    pub peak: f32,
    pub rms: f32,
}

impl Pegel {
    /// Misst Spitze und RMS. Leere Bloecke ergeben 0.
    pub fn messen(samples: &[f32]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let (peak, sum_sq) = samples
            .iter()
            .fold((0.0f32, 0.0f32), |(peak, sum), s| (peak.max(s.abs()), sum + s * s));
        Self {
            peak,
            rms: (sum_sq / samples.len() as f32).sqrt(),
        }
    }

    pub fn peak_db(&self) -> f32 {
        linear_to_db(self.peak)
    }

    pub fn rms_db(&self) -> f32 {
        linear_to_db(self.rms)
    }
}

fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        return -100.0;
    }
    20.0 * linear.log10()
}
