//! High-Shelf-Boost (1. Ordnung)
//!
//! `y[n] = x[n] + coeff * (x[n] - x[n-1])`
//!
//! Hebt Hoehen leicht an und gleicht damit die Tiefpass-Faerbung durch
//! Anti-Aliasing und Interpolation aus. Die Filter-Historie lebt ueber
//! Blockgrenzen hinweg, damit an Nahtstellen kein Sprung entsteht.

use super::AudioProcessor;
use crate::error::{AudioError, AudioResult};

/// Einzelner High-Shelf-Boost mit Ein-Sample-Gedaechtnis
pub struct HighShelfBoost {
    coefficient: f32,
    /// Letzter Eingangswert (Filterstate)
    prev_input: f32,
    /// Letzter Ausgangswert (Filterstate)
    prev_output: f32,
    enabled: bool,
}

impl HighShelfBoost {
    /// Erstellt einen Boost; `coefficient` muss in [0, 1) liegen
    pub fn new(coefficient: f32) -> AudioResult<Self> {
        if !(0.0..1.0).contains(&coefficient) {
            return Err(AudioError::Konfiguration(format!(
                "Boost-Koeffizient muss in [0, 1) liegen (war {coefficient})"
            )));
        }
        Ok(Self {
            coefficient,
            prev_input: 0.0,
            prev_output: 0.0,
            enabled: true,
        })
    }

    pub fn coefficient(&self) -> f32 {
        self.coefficient
    }

    /// Letzter verarbeiteter Eingangs- und Ausgangswert
    pub fn state(&self) -> (f32, f32) {
        (self.prev_input, self.prev_output)
    }
}

impl AudioProcessor for HighShelfBoost {
    fn process(&mut self, samples: &mut [f32]) {
        if !self.enabled {
            return;
        }

        for sample in samples.iter_mut() {
            let input = *sample;
            let high = input - self.prev_input;
            self.prev_input = input;
            *sample = input + self.coefficient * high;
            self.prev_output = *sample;
        }
    }

    fn reset(&mut self) {
        self.prev_input = 0.0;
        self.prev_output = 0.0;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn name(&self) -> &'static str {
        "high_shelf_boost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formel_pro_sample() {
        let mut boost = HighShelfBoost::new(0.2).unwrap();
        let mut samples = vec![0.5, 0.5, -0.5];
        boost.process(&mut samples);
        // x_prev startet bei 0
        assert!((samples[0] - 0.6).abs() < 1e-6);
        assert!((samples[1] - 0.5).abs() < 1e-6);
        assert!((samples[2] - (-0.7)).abs() < 1e-6);
        assert_eq!(boost.state(), (-0.5, samples[2]));
    }

    #[test]
    fn zustand_ueber_blockgrenzen() {
        let mut am_stueck = HighShelfBoost::new(0.3).unwrap();
        let mut geteilt = HighShelfBoost::new(0.3).unwrap();
        let signal: Vec<f32> = (0..64).map(|i| (i as f32 * 0.4).sin()).collect();

        let mut a = signal.clone();
        am_stueck.process(&mut a);

        let mut b = signal.clone();
        let (links, rechts) = b.split_at_mut(20);
        geteilt.process(links);
        geteilt.process(rechts);

        assert_eq!(a, b);
    }

    #[test]
    fn gleichspannung_unveraendert() {
        let mut boost = HighShelfBoost::new(0.5).unwrap();
        let mut samples = vec![0.25f32; 16];
        boost.process(&mut samples);
        for s in &samples[1..] {
            assert!((s - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn ungueltiger_koeffizient() {
        assert!(HighShelfBoost::new(1.0).is_err());
        assert!(HighShelfBoost::new(-0.1).is_err());
        assert!(HighShelfBoost::new(f32::NAN).is_err());
        assert!(HighShelfBoost::new(0.0).is_ok());
    }

    #[test]
    fn reset_loescht_historie() {
        let mut boost = HighShelfBoost::new(0.2).unwrap();
        boost.process(&mut [0.9, 0.1]);
        boost.reset();
        assert_eq!(boost.state(), (0.0, 0.0));
    }

    #[test]
    fn deaktiviert_unveraendert() {
        let mut boost = HighShelfBoost::new(0.2).unwrap();
        boost.set_enabled(false);
        let original = vec![0.1f32, 0.9, -0.4];
        let mut samples = original.clone();
        boost.process(&mut samples);
        assert_eq!(samples, original);
    }
}
