//! Steuerkommandos an den Prozessor
//!
//! ## Design
//! - JSON-Serialisierung via serde, Tagged Enum ueber das Feld `type`
//! - Abtastraten werden roh (`f64`) uebertragen und erst im Prozessor
//!   validiert, damit negative oder kaputte Werte als Konfigurationsfehler
//!   gemeldet werden koennen statt still verworfen zu werden

use pcmstream_core::Mode;
use serde::{Deserialize, Serialize};

/// Steuerkommando, asynchron zum Audio-Callback empfangen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Gesammelte Capture-Samples jetzt senden (nur im Capture-Modus)
    GetBuffer,
    /// Neue Geraete-Abtastrate
    SetSampleRate {
        #[serde(rename = "sampleRate")]
        sample_rate: f64,
    },
    /// Neue Transport-Abtastrate
    SetTargetRate {
        #[serde(rename = "sampleRate")]
        sample_rate: f64,
    },
    /// Betriebsmodus wechseln (leert beide Puffer)
    SetMode { mode: Mode },
}

impl ControlMessage {
    /// Serialisiert die Nachricht als JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialisiert eine Nachricht aus JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Kurzname fuer Logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetBuffer => "get_buffer",
            Self::SetSampleRate { .. } => "set_sample_rate",
            Self::SetTargetRate { .. } => "set_target_rate",
            Self::SetMode { .. } => "set_mode",
        }
    }
}
