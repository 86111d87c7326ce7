//! Host-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Host ohne Konfigurationsdatei
//! lauffaehig ist.

use pcmstream_audio::{PipelineConfig, Preset};
use pcmstream_core::{Mode, SampleRate};
use pcmstream_observability::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Vollstaendige Host-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Geraet und Quantum-Schleife
    pub host: HostEinstellungen,
    /// Pipeline; ohne Abschnitt gilt `host.preset`
    pub pipeline: Option<PipelineConfig>,
    /// Logging-Einstellungen
    pub logging: LoggingConfig,
}

/// Einstellungen des simulierten Audio-Geraets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostEinstellungen {
    /// Betriebsmodus beim Start
    pub mode: Mode,
    /// Abtastrate des Geraets
    pub device_rate: SampleRate,
    /// Samples pro Quantum
    pub quantum: usize,
    /// Abstand der `get_buffer`-Anforderungen im Capture-Modus
    pub flush_intervall_ms: u64,
    /// Plaetze je Richtung im Nachrichten-Port
    pub port_kapazitaet: usize,
    /// Preset, falls kein `[pipeline]`-Abschnitt vorhanden ist
    pub preset: Preset,
}

impl Default for HostEinstellungen {
    fn default() -> Self {
        Self {
            mode: Mode::Playback,
            device_rate: SampleRate::HZ_48000,
            quantum: 128,
            flush_intervall_ms: 100,
            port_kapazitaet: 64,
            preset: Preset::Standard,
        }
    }
}

impl HostEinstellungen {
    /// Quanten zwischen zwei Flush-Anforderungen (mindestens 1)
    pub fn quanten_pro_flush(&self) -> u64 {
        let samples = self.device_rate.as_f64() * self.flush_intervall_ms as f64 / 1000.0;
        ((samples / self.quantum.max(1) as f64).round() as u64).max(1)
    }
}

impl HostConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => Self::aus_toml(&inhalt)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Parst und validiert eine Konfiguration
    pub fn aus_toml(inhalt: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(inhalt)?;
        config.validieren()?;
        Ok(config)
    }

    pub fn validieren(&self) -> anyhow::Result<()> {
        if self.host.quantum == 0 {
            anyhow::bail!("host.quantum muss groesser als 0 sein");
        }
        self.pipeline_config().validieren()?;
        Ok(())
    }

    /// Wirksame Pipeline-Konfiguration
    pub fn pipeline_config(&self) -> PipelineConfig {
        self.pipeline
            .clone()
            .unwrap_or_else(|| self.host.preset.config())
    }
}
