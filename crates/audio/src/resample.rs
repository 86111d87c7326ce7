//! Abtastraten-Konvertierung
//!
//! Lineare oder kubische (Catmull-Rom) Interpolation zwischen zwei Raten.
//! Beim Downsampling laeuft optional ein 3-Tap-Tiefpass vorweg; beim
//! Upsampling entsteht kein neuer Inhalt oberhalb der Quell-Nyquistfrequenz,
//! dort wird nie gefiltert.
//!
//! Das Verhaeltnis wird bei jedem Aufruf aus den aktuellen Raten berechnet.

use std::borrow::Cow;

use pcmstream_core::SampleRate;
use serde::{Deserialize, Serialize};

use crate::dsp::AntiAliasFilter;

/// Interpolationsverfahren
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Zwei Stuetzstellen, guenstig
    #[default]
    Linear,
    /// Vier Stuetzstellen (Catmull-Rom), glatter
    Cubic,
}

/// Konvertiert `data` von `from` nach `to`.
///
/// Bei gleichen Raten wird `data` ohne Kopie zurueckgegeben. Die
/// Ausgabelaenge ist `round(len * to / from)`.
pub fn resample<'a>(
    data: &'a [f32],
    from: SampleRate,
    to: SampleRate,
    interpolation: Interpolation,
    anti_alias: Option<&AntiAliasFilter>,
) -> Cow<'a, [f32]> {
    if from == to || data.is_empty() {
        return Cow::Borrowed(data);
    }

    let gefiltert;
    let quelle: &[f32] = match anti_alias {
        Some(filter) if from > to => {
            gefiltert = filter.apply(data);
            &gefiltert
        }
        _ => data,
    };

    let ratio = from.as_f64() / to.as_f64();
    let out_len = (quelle.len() as f64 / ratio).round() as usize;
    let last = quelle.len() - 1;
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let pos = i as f64 * ratio;
        let idx = pos.floor() as usize;
        if idx >= last {
            out.push(quelle[last]);
            continue;
        }
        let frac = (pos - idx as f64) as f32;
        let sample = match interpolation {
            Interpolation::Linear => linear(quelle, idx, frac),
            Interpolation::Cubic => catmull_rom(quelle, idx, frac, last),
        };
        out.push(sample);
    }

    Cow::Owned(out)
}

#[inline]
fn linear(data: &[f32], idx: usize, frac: f32) -> f32 {
    let a = data[idx];
    let b = data[idx + 1];
    a + frac * (b - a)
}

#[inline]
fn catmull_rom(data: &[f32], idx: usize, t: f32, last: usize) -> f32 {
    let p0 = data[idx.saturating_sub(1)];
    let p1 = data[idx];
    let p2 = data[(idx + 1).min(last)];
    let p3 = data[(idx + 2).min(last)];

    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Zustand eines Ratenkonverters
///
/// Quell- und Zielrate sind nur ueber `set_*` aenderbar; der naechste
/// `convert`-Aufruf verwendet sofort die neuen Werte.
#[derive(Debug, Clone)]
pub struct RateConverter {
    source_rate: SampleRate,
    target_rate: SampleRate,
    interpolation: Interpolation,
    anti_alias: Option<AntiAliasFilter>,
}

impl RateConverter {
    pub fn new(
        source_rate: SampleRate,
        target_rate: SampleRate,
        interpolation: Interpolation,
        anti_alias: Option<AntiAliasFilter>,
    ) -> Self {
        Self {
            source_rate,
            target_rate,
            interpolation,
            anti_alias,
        }
    }

    /// Setzt die Quellrate. Gibt `true` zurueck, wenn sich etwas geaendert hat.
    pub fn set_source_rate(&mut self, rate: SampleRate) -> bool {
        let geaendert = self.source_rate != rate;
        self.source_rate = rate;
        geaendert
    }

    /// Setzt die Zielrate. Gibt `true` zurueck, wenn sich etwas geaendert hat.
    pub fn set_target_rate(&mut self, rate: SampleRate) -> bool {
        let geaendert = self.target_rate != rate;
        self.target_rate = rate;
        geaendert
    }

    pub fn source_rate(&self) -> SampleRate {
        self.source_rate
    }

    pub fn target_rate(&self) -> SampleRate {
        self.target_rate
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn anti_alias(&self) -> Option<&AntiAliasFilter> {
        self.anti_alias.as_ref()
    }

    /// Quellrate / Zielrate
    pub fn ratio(&self) -> f64 {
        self.source_rate.as_f64() / self.target_rate.as_f64()
    }

    /// Konvertiert mit den aktuellen Raten
    pub fn convert<'a>(&self, data: &'a [f32]) -> Cow<'a, [f32]> {
        resample(
            data,
            self.source_rate,
            self.target_rate,
            self.interpolation,
            self.anti_alias.as_ref(),
        )
    }
}
