//! pcmstream Host – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und startet die
//! Quantum-Schleife ueber stdin/stdout.

use anyhow::Result;
use pcmstream_host::{config::HostConfig, Host};
use pcmstream_observability::logging_initialisieren;

#[tokio::main]
async fn main() -> Result<()> {
    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad =
        std::env::var("PCMSTREAM_CONFIG").unwrap_or_else(|_| "pcmstream.toml".into());

    // Konfiguration laden (Standardwerte falls Datei fehlt)
    let config = HostConfig::laden(&config_pfad)?;

    // Logging auf stderr, stdout traegt die Nutzdaten
    logging_initialisieren(&config.logging.clone().mit_env());

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "pcmstream Host wird initialisiert"
    );

    let host = Host::neu(config)?;
    host.starten().await?;

    Ok(())
}
