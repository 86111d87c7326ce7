//! pcmstream-host – Bibliotheks-Root
//!
//! Simuliert den Audio-Host: treibt einen `AudioNode` Quantum fuer Quantum
//! an und verbindet ihn mit einem Byte-Transport.
//!
//! - Capture: rohe f32-LE-Samples rein, `audio_data`-JSON-Zeilen raus
//! - Playback: JSON-Zeilen (`audio_data` oder Steuerkommandos) rein,
//!   f32-LE-Samples raus

pub mod config;

use anyhow::{Context, Result};
use bytes::{Buf, BufMut, BytesMut};
use config::HostConfig;
use pcmstream_audio::{decode_pcm16, AudioNode, AudioStats, NodePort, PcmProcessor};
use pcmstream_core::{Mode, SampleRate};
use pcmstream_protocol::{ControlMessage, ProcessorEvent};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Haelt Node, Port und Konfiguration zusammen
pub struct Host {
    config: HostConfig,
    node: AudioNode,
    port: NodePort,
}

impl Host {
    /// Erstellt einen Host aus der gegebenen Konfiguration
    pub fn neu(config: HostConfig) -> Result<Self> {
        config.validieren()?;
        let processor = PcmProcessor::new(
            config.pipeline_config(),
            config.host.mode,
            config.host.device_rate,
        )
        .context("Prozessor konnte nicht erstellt werden")?;
        let (node, port) = AudioNode::new(processor, config.host.port_kapazitaet);
        Ok(Self { config, node, port })
    }

    /// Laeuft ueber stdin/stdout bis zum Ende der Eingabe
    pub async fn starten(self) -> Result<AudioStats> {
        tracing::info!(
            modus = %self.config.host.mode,
            geraeterate = %self.config.host.device_rate,
            quantum = self.config.host.quantum,
            "Host startet"
        );
        self.laufen(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Laeuft ueber beliebige Byte-Stroeme bis zum Ende der Eingabe
    pub async fn laufen<R, W>(mut self, eingabe: R, mut ausgabe: W) -> Result<AudioStats>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        match self.node.processor().mode() {
            Mode::Capture => self.capture_laufen(eingabe, &mut ausgabe).await?,
            Mode::Playback => self.playback_laufen(eingabe, &mut ausgabe).await?,
        }
        ausgabe.flush().await?;

        let stats = self.node.stats();
        tracing::info!(
            quanten = stats.quanta_processed,
            bloecke = stats.blocks_emitted,
            unterlaeufe = stats.underruns,
            verworfen = stats.samples_dropped,
            "Host beendet"
        );
        Ok(stats)
    }

    fn device_rate(&self) -> SampleRate {
        self.node.processor().device_rate()
    }

    async fn capture_laufen<R, W>(&mut self, eingabe: R, ausgabe: &mut W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let quantum = self.config.host.quantum;
        let quanten_pro_flush = self.config.host.quanten_pro_flush();
        let mut leser = BufReader::new(eingabe);
        let mut roh = vec![0u8; quantum * 4];
        let mut samples = Vec::with_capacity(quantum);
        let mut stumm = vec![0.0f32; quantum];
        let mut zaehler: u64 = 0;

        loop {
            let gelesen = voll_lesen(&mut leser, &mut roh).await?;
            if gelesen < 4 {
                break;
            }

            samples.clear();
            let mut daten = &roh[..gelesen];
            while daten.remaining() >= 4 {
                samples.push(daten.get_f32_le());
            }

            let rate = self.device_rate();
            self.node
                .process(&samples, &mut stumm[..samples.len()], rate);
            zaehler += 1;

            if zaehler % quanten_pro_flush == 0 {
                self.flush_anfordern()?;
                self.ereignisse_schreiben(ausgabe).await?;
            }
            if gelesen < roh.len() {
                break;
            }
        }

        // Rest nach Ende der Eingabe
        self.flush_anfordern()?;
        self.ereignisse_schreiben(ausgabe).await
    }

    fn flush_anfordern(&mut self) -> Result<()> {
        self.port.send_control(ControlMessage::GetBuffer)?;
        self.node.drain_messages();
        Ok(())
    }

    async fn ereignisse_schreiben<W: AsyncWrite + Unpin>(&mut self, ausgabe: &mut W) -> Result<()> {
        for event in self.port.drain() {
            let mut zeile = event.to_json()?;
            zeile.push('\n');
            ausgabe.write_all(zeile.as_bytes()).await?;
        }
        Ok(())
    }

    async fn playback_laufen<R, W>(&mut self, eingabe: R, ausgabe: &mut W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let quantum = self.config.host.quantum;
        let mut zeilen = BufReader::new(eingabe).lines();
        let mut quantum_puffer = vec![0.0f32; quantum];
        let mut bytes = BytesMut::with_capacity(quantum * 4);

        while let Some(zeile) = zeilen.next_line().await? {
            let zeile = zeile.trim();
            if zeile.is_empty() {
                continue;
            }
            match eingabe_parsen(zeile) {
                Some(Eingabe::Audio(msg)) => {
                    if self.node.processor().transport_rate().hz() != msg.sample_rate {
                        self.port.send_control(ControlMessage::SetTargetRate {
                            sample_rate: msg.sample_rate as f64,
                        })?;
                    }
                    self.port.send_samples(decode_pcm16(&msg.payload))?;
                }
                Some(Eingabe::Steuerung(msg)) => self.port.send_control(msg)?,
                None => {
                    tracing::warn!(zeile = %zeile, "Unbekannte Eingabezeile ignoriert");
                    continue;
                }
            }
            self.node.drain_messages();

            while self.node.processor().playback().len() >= quantum {
                self.quantum_ausgeben(&mut quantum_puffer, &mut bytes, ausgabe)
                    .await?;
            }
        }

        // Rest mit Stille aufgefuellt
        self.node.drain_messages();
        if !self.node.processor().playback().is_empty() {
            self.quantum_ausgeben(&mut quantum_puffer, &mut bytes, ausgabe)
                .await?;
        }
        Ok(())
    }

    async fn quantum_ausgeben<W: AsyncWrite + Unpin>(
        &mut self,
        quantum_puffer: &mut [f32],
        bytes: &mut BytesMut,
        ausgabe: &mut W,
    ) -> Result<()> {
        let rate = self.device_rate();
        self.node.process(&[], quantum_puffer, rate);
        bytes.clear();
        for &sample in quantum_puffer.iter() {
            bytes.put_f32_le(sample);
        }
        ausgabe.write_all(&bytes[..]).await?;
        Ok(())
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }
}

/// Eingabezeile im Playback-Modus
#[derive(Debug)]
enum Eingabe {
    Audio(pcmstream_protocol::AudioDataMessage),
    Steuerung(ControlMessage),
}

fn eingabe_parsen(zeile: &str) -> Option<Eingabe> {
    if let Ok(ProcessorEvent::AudioData(msg)) = ProcessorEvent::from_json(zeile) {
        return Some(Eingabe::Audio(msg));
    }
    ControlMessage::from_json(zeile).ok().map(Eingabe::Steuerung)
}

/// Liest bis `puffer` voll ist oder die Eingabe endet
async fn voll_lesen<R: AsyncRead + Unpin>(leser: &mut R, puffer: &mut [u8]) -> Result<usize> {
    let mut gelesen = 0;
    while gelesen < puffer.len() {
        let n = leser.read(&mut puffer[gelesen..]).await?;
        if n == 0 {
            break;
        }
        gelesen += n;
    }
    Ok(gelesen)
}
