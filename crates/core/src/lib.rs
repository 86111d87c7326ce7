//! pcmstream-core – Gemeinsame Typen und Fehlertypen
//!
//! Stellt die Bausteine bereit, die von Protokoll, Audio-Pipeline und
//! Host gemeinsam genutzt werden: validierte Abtastraten, den
//! Betriebsmodus und den zentralen Fehler-Enum.

pub mod error;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{Result, StreamError};
pub use types::{Mode, SampleRate};
