//! 3-Tap FIR-Tiefpass gegen Aliasing beim Downsampling
//!
//! Symmetrischer, mittengewichteter Kern, auf Summe 1.0 normiert (Gleichanteil
//! bleibt erhalten). Randsamples werden ungefiltert uebernommen, keine
//! zirkulaere Faltung.

use crate::error::{AudioError, AudioResult};

/// 3-Tap FIR-Filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AntiAliasFilter {
    kernel: [f32; 3],
}

impl AntiAliasFilter {
    /// Breiter Kern: kraeftige Glaettung, fuer hohe Qualitaet bei 48 kHz
    pub const BREIT: [f32; 3] = [0.23, 0.54, 0.23];
    /// Schmaler Kern: laesst mehr Hoehen durch, fuer Sprache
    pub const SCHMAL: [f32; 3] = [0.1, 0.8, 0.1];

    /// Erstellt einen Filter und normiert den Kern auf Summe 1.0.
    ///
    /// Der Kern muss endlich, symmetrisch und positiv summiert sein.
    pub fn new(kernel: [f32; 3]) -> AudioResult<Self> {
        if kernel.iter().any(|k| !k.is_finite()) {
            return Err(AudioError::Konfiguration(format!(
                "Filterkern enthaelt ungueltige Werte: {kernel:?}"
            )));
        }
        if (kernel[0] - kernel[2]).abs() > 1e-6 {
            return Err(AudioError::Konfiguration(format!(
                "Filterkern muss symmetrisch sein: {kernel:?}"
            )));
        }
        let summe: f32 = kernel.iter().sum();
        if summe <= 0.0 {
            return Err(AudioError::Konfiguration(format!(
                "Summe des Filterkerns muss positiv sein (war {summe})"
            )));
        }
        Ok(Self {
            kernel: kernel.map(|k| k / summe),
        })
    }

    pub fn breit() -> Self {
        Self {
            kernel: Self::BREIT,
        }
    }

    pub fn schmal() -> Self {
        Self {
            kernel: Self::SCHMAL,
        }
    }

    /// Der normierte Kern
    pub fn kernel(&self) -> [f32; 3] {
        self.kernel
    }

    /// Filtert `data` und gibt das Ergebnis als neuen Vektor zurueck
    pub fn apply(&self, data: &[f32]) -> Vec<f32> {
        let mut out = Vec::with_capacity(data.len());
        self.apply_into(data, &mut out);
        out
    }

    /// Filtert `data` in `out` (wird vorher geleert)
    pub fn apply_into(&self, data: &[f32], out: &mut Vec<f32>) {
        out.clear();
        let n = data.len();
        if n < 3 {
            out.extend_from_slice(data);
            return;
        }
        let [k0, k1, k2] = self.kernel;
        out.push(data[0]);
        out.extend(
            data.windows(3)
                .map(|w| k0 * w[0] + k1 * w[1] + k2 * w[2]),
        );
        out.push(data[n - 1]);
    }
}

impl Default for AntiAliasFilter {
    fn default() -> Self {
        Self::breit()
    }
}
