//! # pcmstream-observability
//!
//! Structured Logging via tracing-subscriber (Text oder JSON),
//! konfigurierbar ueber Datei und Umgebungsvariablen.

pub mod logging;

pub use logging::{logging_initialisieren, LogFormat, LoggingConfig};
