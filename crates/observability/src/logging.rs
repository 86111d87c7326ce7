//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable:
//! - `PCM_LOG_LEVEL`: Filter-Direktive (z.B. `debug` oder
//!   `pcmstream_audio=trace`), Standard: info
//! - `PCM_LOG_FORMAT`: Format (text/json), Standard: text
//!
//! Umgebungsvariablen haben Vorrang vor der Konfigurationsdatei.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LOG_LEVEL: &str = "PCM_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "PCM_LOG_FORMAT";

/// Ausgabeformat der Logs
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parst ein Format; unbekannte Werte ergeben `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// `[logging]`-Abschnitt der Konfigurationsdatei
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    /// Uebernimmt gesetzte Werte aus `PCM_LOG_LEVEL` / `PCM_LOG_FORMAT`
    pub fn mit_env(self) -> Self {
        self.mit_overrides(
            std::env::var(ENV_LOG_LEVEL).ok(),
            std::env::var(ENV_LOG_FORMAT).ok(),
        )
    }

    /// Uebernimmt die gegebenen Werte, sofern gesetzt und gueltig
    pub fn mit_overrides(mut self, level: Option<String>, format: Option<String>) -> Self {
        if let Some(level) = level.filter(|l| !l.trim().is_empty()) {
            self.level = level;
        }
        if let Some(format) = format.as_deref().and_then(LogFormat::parse) {
            self.format = format;
        }
        self
    }
}

/// Initialisiert das Logging-System.
///
/// Ungueltige Filter-Direktiven fallen auf `info` zurueck. Ein bereits
/// installierter Subscriber wird nicht ersetzt.
pub fn logging_initialisieren(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = match config.format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init(),
    };
}

/// Validiert ob ein einfacher Log-Level-String gueltig ist.
pub fn log_level_gueltig(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error")
}
