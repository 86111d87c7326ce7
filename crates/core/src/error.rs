//! Fehlertypen fuer pcmstream
//!
//! Konfigurationsfehler werden beim Setup gemeldet, nie pro Callback.
//! Untermodule koennen eigene Fehler definieren und via `#[from]` konvertieren.

use thiserror::Error;

/// Globaler Result-Alias fuer pcmstream
pub type Result<T> = std::result::Result<T, StreamError>;

/// Alle Fehler, die an den Aufrufer gemeldet werden
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Ungueltige Abtastrate: {0} (muss endlich und groesser 0 sein)")]
    UngueltigeAbtastrate(f64),

    #[error("Unbekannter Modus: '{0}'")]
    UnbekannterModus(String),
}

impl StreamError {
    /// Gibt true zurueck wenn der Fehler aus der Konfiguration stammt
    pub fn ist_konfigurationsfehler(&self) -> bool {
        matches!(
            self,
            Self::UngueltigeAbtastrate(_) | Self::UnbekannterModus(_)
        )
    }
}
