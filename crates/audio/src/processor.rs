//! PcmProcessor – Zentrale Steuerung einer Prozessor-Instanz
//!
//! Besitzt beide Pipelines exklusiv und entscheidet anhand des Modus,
//! welche davon der periodische Callback antreibt. Steuerkommandos und
//! Callback laufen im selben Ausfuehrungskontext; es gibt keine Locks.
//!
//! Die Geraeterate wird dem Callback explizit uebergeben. Weicht sie vom
//! bekannten Wert ab, gilt sie ab sofort (gleicher Pfad wie
//! `set_sample_rate`).

use pcmstream_core::{Mode, SampleRate};
use pcmstream_protocol::{AudioDataMessage, ControlMessage};
use serde::Serialize;
use tracing::{debug, info};

use crate::capture::CapturePipeline;
use crate::config::PipelineConfig;
use crate::error::AudioResult;
use crate::meter::Pegel;
use crate::playback::PlaybackPipeline;

/// Nachricht am Eingangsport eines Prozessors
#[derive(Debug, Clone, PartialEq)]
pub enum PortNachricht {
    Steuerung(ControlMessage),
    /// Dekodierte Samples mit Transportrate (nur Playback)
    Samples(Vec<f32>),
}

impl From<ControlMessage> for PortNachricht {
    fn from(msg: ControlMessage) -> Self {
        Self::Steuerung(msg)
    }
}

/// Statistiken eines Prozessors
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AudioStats {
    /// Anzahl verarbeiteter Quanten seit Start
    pub quanta_processed: u64,
    /// Quanten, die nicht voll aus dem Puffer bedient werden konnten
    pub underruns: u64,
    /// Verworfene Samples (Capture-Obergrenze, Playback-Ueberlauf)
    pub samples_dropped: u64,
    /// Gesendete `audio_data`-Bloecke
    pub blocks_emitted: u64,
    /// Bloecke, die der Port nicht annehmen konnte
    pub emissions_dropped: u64,
    /// Abgewiesene Steuerkommandos (ungueltige Rate)
    pub messages_rejected: u64,
    /// Pegel des letzten Capture-Blocks
    pub input_level: Pegel,
    /// Pegel des letzten Playback-Quantums
    pub output_level: Pegel,
}

/// Ein PCM-Prozessor mit Capture- und Playback-Pipeline
#[derive(Debug)]
pub struct PcmProcessor {
    mode: Mode,
    device_rate: SampleRate,
    transport_rate: SampleRate,
    capture: CapturePipeline,
    playback: PlaybackPipeline,
    stats: AudioStats,
}

impl PcmProcessor {
    /// Erstellt einen Prozessor; ungueltige Konfiguration ist ein Fehler
    pub fn new(config: PipelineConfig, mode: Mode, device_rate: SampleRate) -> AudioResult<Self> {
        config.validieren()?;
        let capture = CapturePipeline::new(&config, device_rate)?;
        let playback = PlaybackPipeline::new(&config, device_rate)?;

        debug!(
            modus = %mode,
            geraeterate = %device_rate,
            transportrate = %config.transport_rate,
            interpolation = ?config.interpolation,
            "PcmProcessor erstellt"
        );

        Ok(Self {
            mode,
            device_rate,
            transport_rate: config.transport_rate,
            capture,
            playback,
            stats: AudioStats::default(),
        })
    }

    /// Verarbeitet eine Port-Nachricht. Ein `get_buffer` im Capture-Modus
    /// liefert den kodierten Block zurueck.
    pub fn handle_message(&mut self, msg: PortNachricht) -> AudioResult<Option<AudioDataMessage>> {
        match msg {
            PortNachricht::Steuerung(ControlMessage::GetBuffer) => Ok(self.flush()),
            PortNachricht::Steuerung(ControlMessage::SetSampleRate { sample_rate }) => {
                self.set_sample_rate(sample_rate)?;
                Ok(None)
            }
            PortNachricht::Steuerung(ControlMessage::SetTargetRate { sample_rate }) => {
                self.set_target_rate(sample_rate)?;
                Ok(None)
            }
            PortNachricht::Steuerung(ControlMessage::SetMode { mode }) => {
                self.set_mode(mode);
                Ok(None)
            }
            PortNachricht::Samples(samples) => {
                self.push_playback(&samples);
                Ok(None)
            }
        }
    }

    /// Wechselt den Modus und leert beide Puffer. `true` bei Aenderung.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if self.mode == mode {
            return false;
        }
        info!(alt = %self.mode, neu = %mode, "Modus gewechselt, Puffer geleert");
        self.mode = mode;
        self.capture.reset();
        self.playback.reset();
        true
    }

    /// Meldet eine neue Geraeterate. Negative, 0 oder nicht-endliche Werte
    /// werden abgewiesen. `true` bei Aenderung.
    pub fn set_sample_rate(&mut self, hz: f64) -> AudioResult<bool> {
        let rate = match SampleRate::neu(hz) {
            Ok(rate) => rate,
            Err(e) => {
                self.stats.messages_rejected += 1;
                return Err(e.into());
            }
        };
        Ok(self.apply_device_rate(rate))
    }

    /// Setzt eine neue Transportrate. `true` bei Aenderung.
    pub fn set_target_rate(&mut self, hz: f64) -> AudioResult<bool> {
        let rate = match SampleRate::neu(hz) {
            Ok(rate) => rate,
            Err(e) => {
                self.stats.messages_rejected += 1;
                return Err(e.into());
            }
        };
        if rate == self.transport_rate {
            return Ok(false);
        }
        debug!(alt = %self.transport_rate, neu = %rate, "Transportrate geaendert");
        self.transport_rate = rate;
        self.capture.set_transport_rate(rate);
        self.playback.set_transport_rate(rate);
        Ok(true)
    }

    fn apply_device_rate(&mut self, rate: SampleRate) -> bool {
        if rate == self.device_rate {
            return false;
        }
        debug!(alt = %self.device_rate, neu = %rate, "Geraeterate geaendert");
        self.device_rate = rate;
        self.capture.set_device_rate(rate);
        self.playback.set_device_rate(rate);
        true
    }

    /// Leert den Capture-Puffer (nur im Capture-Modus)
    pub fn flush(&mut self) -> Option<AudioDataMessage> {
        if self.mode != Mode::Capture {
            debug!("get_buffer im Playback-Modus ignoriert");
            return None;
        }
        let msg = self.capture.flush()?;
        self.stats.blocks_emitted += 1;
        self.stats.input_level = self.capture.letzter_pegel();
        Some(msg)
    }

    /// Nimmt dekodierte Samples fuer die Wiedergabe an (nur im Playback-Modus)
    pub fn push_playback(&mut self, samples: &[f32]) {
        if self.mode != Mode::Playback {
            debug!(samples = samples.len(), "Samples im Capture-Modus ignoriert");
            return;
        }
        self.stats.samples_dropped += self.playback.ingest(samples) as u64;
    }

    /// Verarbeitet ein Quantum.
    ///
    /// `device_rate` gilt ab diesem Quantum und ersetzt eine zuvor per
    /// `set_sample_rate` gemeldete Rate.
    ///
    /// Capture: `eingang` wird gesammelt, `ausgang` bleibt still.
    /// Playback: `ausgang` wird aus dem Puffer gefuellt, `eingang` ignoriert.
    pub fn process(&mut self, eingang: &[f32], ausgang: &mut [f32], device_rate: SampleRate) {
        self.apply_device_rate(device_rate);
        self.stats.quanta_processed += 1;

        match self.mode {
            Mode::Capture => {
                self.stats.samples_dropped += self.capture.push_quantum(eingang) as u64;
                ausgang.fill(0.0);
            }
            Mode::Playback => {
                let ergebnis = self.playback.render(ausgang);
                if ergebnis.ist_unterlauf() {
                    self.stats.underruns += 1;
                }
                if ergebnis.geliefert > 0 {
                    self.stats.output_level = self.playback.letzter_pegel();
                }
            }
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn device_rate(&self) -> SampleRate {
        self.device_rate
    }

    pub fn transport_rate(&self) -> SampleRate {
        self.transport_rate
    }

    pub fn capture(&self) -> &CapturePipeline {
        &self.capture
    }

    pub fn playback(&self) -> &PlaybackPipeline {
        &self.playback
    }

    /// Gibt aktuelle Statistiken zurueck
    pub fn stats(&self) -> &AudioStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prozessor(mode: Mode) -> PcmProcessor {
        PcmProcessor::new(PipelineConfig::standard(), mode, SampleRate::HZ_16000).unwrap()
    }

    #[test]
    fn prozessor_erstellen() {
        let p = prozessor(Mode::Playback);
        assert_eq!(p.mode(), Mode::Playback);
        assert_eq!(p.transport_rate(), SampleRate::HZ_16000);
        assert_eq!(p.stats(), &AudioStats::default());
    }

    #[test]
    fn ungueltige_konfiguration() {
        let config = PipelineConfig {
            max_buffer_size: 0,
            ..Default::default()
        };
        let err = PcmProcessor::new(config, Mode::Capture, SampleRate::HZ_48000).unwrap_err();
        assert!(err.ist_konfigurationsfehler());
    }

    #[test]
    fn capture_get_buffer_liefert_block() {
        let mut p = prozessor(Mode::Capture);
        let mut aus = [1.0f32; 128];
        p.process(&[0.2; 128], &mut aus, SampleRate::HZ_16000);
        assert!(aus.iter().all(|&s| s == 0.0));

        let msg = p
            .handle_message(ControlMessage::GetBuffer.into())
            .unwrap()
            .unwrap();
        assert_eq!(msg.sample_count(), 128);
        assert_eq!(p.stats().blocks_emitted, 1);
        assert!(p.stats().input_level.peak > 0.19);
    }

    #[test]
    fn get_buffer_im_playback_ignoriert() {
        let mut p = prozessor(Mode::Playback);
        assert!(p.handle_message(ControlMessage::GetBuffer.into()).unwrap().is_none());
    }

    #[test]
    fn samples_im_capture_ignoriert() {
        let mut p = prozessor(Mode::Capture);
        p.handle_message(PortNachricht::Samples(vec![0.5; 64])).unwrap();
        assert!(p.playback().is_empty());
    }

    #[test]
    fn modus_wechsel_leert_puffer() {
        let mut p = prozessor(Mode::Playback);
        p.push_playback(&[0.5; 64]);
        assert_eq!(p.playback().len(), 64);

        let msg = ControlMessage::SetMode { mode: Mode::Capture };
        p.handle_message(msg.into()).unwrap();
        assert_eq!(p.mode(), Mode::Capture);
        assert!(p.playback().is_empty());
        assert!(!p.set_mode(Mode::Capture));
    }

    #[test]
    fn abtastrate_idempotent() {
        let mut p = prozessor(Mode::Capture);
        assert!(!p.set_sample_rate(16000.0).unwrap());
        assert!(p.set_sample_rate(48000.0).unwrap());
        assert!(!p.set_sample_rate(48000.0).unwrap());
        assert_eq!(p.device_rate(), SampleRate::HZ_48000);
        assert_eq!(p.capture().converter().ratio(), 3.0);
    }

    #[test]
    fn ungueltige_abtastrate_abgewiesen() {
        let mut p = prozessor(Mode::Capture);
        for hz in [-48000.0, 0.0, f64::NAN, f64::INFINITY] {
            let err = p.set_sample_rate(hz).unwrap_err();
            assert!(err.ist_konfigurationsfehler());
        }
        assert!(p.set_target_rate(-1.0).is_err());
        assert_eq!(p.stats().messages_rejected, 5);
        // Zustand unveraendert
        assert_eq!(p.device_rate(), SampleRate::HZ_16000);
    }

    #[test]
    fn callback_rate_gewinnt() {
        let mut p = prozessor(Mode::Capture);
        let mut aus = [0.0f32; 480];
        p.process(&[0.1; 480], &mut aus, SampleRate::HZ_48000);
        assert_eq!(p.device_rate(), SampleRate::HZ_48000);
        let msg = p.flush().unwrap();
        assert_eq!(msg.sample_count(), 160);
    }

    #[test]
    fn zielrate_aendern() {
        let mut p = prozessor(Mode::Capture);
        assert!(p.set_target_rate(48000.0).unwrap());
        p.process(&[0.1; 100], &mut [0.0; 100], SampleRate::HZ_16000);
        let msg = p.flush().unwrap();
        assert_eq!(msg.sample_rate, 48000);
        assert_eq!(msg.sample_count(), 300);
    }

    #[test]
    fn playback_zaehlt_unterlaeufe() {
        let mut p = prozessor(Mode::Playback);
        p.push_playback(&[0.5; 300]);
        let mut aus = [0.0f32; 256];
        p.process(&[], &mut aus, SampleRate::HZ_16000);
        assert_eq!(p.stats().underruns, 0);
        p.process(&[], &mut aus, SampleRate::HZ_16000);
        assert_eq!(p.stats().underruns, 1);
        assert_eq!(p.stats().quanta_processed, 2);
        assert!(p.stats().output_level.peak > 0.0);
    }
}
