//! Fehlertypen fuer die Audio-Pipeline
//!
//! Fehler entstehen nur beim Setup (Konfiguration, Modus, Abtastrate)
//! oder an den Port-Kanaelen. Der Audio-Callback selbst ist fehlerfrei.

use pcmstream_core::StreamError;
use thiserror::Error;

/// Alle moeglichen Fehler der Audio-Pipeline
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    #[error("Port getrennt: {0}")]
    PortGetrennt(String),

    #[error("Port-Kanal voll")]
    PortVoll,

    #[error(transparent)]
    Kern(#[from] StreamError),
}

impl AudioError {
    /// Gibt true zurueck wenn der Fehler aus der Konfiguration stammt
    pub fn ist_konfigurationsfehler(&self) -> bool {
        match self {
            Self::Konfiguration(_) => true,
            Self::Kern(e) => e.ist_konfigurationsfehler(),
            _ => false,
        }
    }
}

pub type AudioResult<T> = Result<T, AudioError>;
