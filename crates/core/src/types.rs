//! Gemeinsame Wert-Typen fuer pcmstream
//!
//! Abtastraten verwenden das Newtype-Pattern, damit ungueltige Werte
//! (negativ, 0, NaN, unendlich) bereits beim Setup abgewiesen werden
//! und der Audio-Callback nie dagegen pruefen muss.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, StreamError};

/// Validierte Abtastrate in Hz (immer > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u32")]
pub struct SampleRate(u32);

impl SampleRate {
    /// 16 kHz – Breitband-Sprache, Standard-Transportrate
    pub const HZ_16000: SampleRate = SampleRate(16_000);
    /// 24 kHz – typische Rate synthetisierter Sprache
    pub const HZ_24000: SampleRate = SampleRate(24_000);
    /// 44.1 kHz – CD-Rate, haeufige Geraeterate
    pub const HZ_44100: SampleRate = SampleRate(44_100);
    /// 48 kHz – Standard-Geraeterate
    pub const HZ_48000: SampleRate = SampleRate(48_000);

    /// Erstellt eine Abtastrate aus einem beliebigen Zahlenwert.
    ///
    /// Nicht-endliche, negative und zu kleine Werte sind Konfigurationsfehler.
    /// Nachkommastellen werden gerundet.
    pub fn neu(hz: f64) -> Result<Self> {
        if !hz.is_finite() || hz < 0.5 || hz > u32::MAX as f64 {
            return Err(StreamError::UngueltigeAbtastrate(hz));
        }
        Ok(Self(hz.round() as u32))
    }

    /// Gibt die Rate in Hz zurueck
    pub fn hz(&self) -> u32 {
        self.0
    }

    /// Gibt die Rate als f64 zurueck (fuer Verhaeltnis-Berechnungen)
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    /// Anzahl Samples fuer die gegebene Dauer in Sekunden (mindestens 1)
    pub fn samples_fuer(&self, sekunden: f64) -> usize {
        ((self.as_f64() * sekunden).round() as usize).max(1)
    }
}

impl TryFrom<f64> for SampleRate {
    type Error = StreamError;

    fn try_from(hz: f64) -> Result<Self> {
        Self::neu(hz)
    }
}

impl TryFrom<u32> for SampleRate {
    type Error = StreamError;

    fn try_from(hz: u32) -> Result<Self> {
        if hz == 0 {
            return Err(StreamError::UngueltigeAbtastrate(0.0));
        }
        Ok(Self(hz))
    }
}

impl From<SampleRate> for u32 {
    fn from(rate: SampleRate) -> Self {
        rate.0
    }
}

impl std::fmt::Display for SampleRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}Hz", self.0)
    }
}

/// Betriebsmodus eines Prozessors
///
/// Bestimmt, welche der beiden Pipelines der periodische Callback antreibt.
/// `input`/`output` werden als Aliase akzeptiert.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Mikrofon -> Transport (sammeln, konvertieren, PCM16 senden)
    #[serde(alias = "input")]
    Capture,
    /// Transport -> Lautsprecher (puffern, konvertieren, ausgeben)
    #[default]
    #[serde(alias = "output")]
    Playback,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Capture => "capture",
            Mode::Playback => "playback",
        }
    }
}

impl FromStr for Mode {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "capture" | "input" => Ok(Mode::Capture),
            "playback" | "output" => Ok(Mode::Playback),
            _ => Err(StreamError::UnbekannterModus(s.to_string())),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
