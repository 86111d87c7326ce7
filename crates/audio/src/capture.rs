//! Capture-Pipeline (Geraet -> Transport)
//!
//! Sammelt Quanten im Eingangspuffer, bis ein Flush angefordert wird.
//! Beim Flush: Ratenkonvertierung auf die Transportrate, Aufbereitung,
//! PCM16-Kodierung und genau eine `audio_data`-Nachricht.
//!
//! Der Puffer ist auf `max_buffer_size` Samples begrenzt. Ist er voll,
//! werden weitere Samples bis zum naechsten Flush verworfen.

use pcmstream_core::SampleRate;
use pcmstream_protocol::AudioDataMessage;
use tracing::{trace, warn};

use crate::codec::encode_pcm16;
use crate::config::PipelineConfig;
use crate::error::AudioResult;
use crate::meter::Pegel;
use crate::pipeline::SignalConditioner;
use crate::resample::RateConverter;
use crate::ring_buffer::{SampleRingBuffer, Ueberlauf};

/// Zustand der Capture-Pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureZustand {
    /// Puffer leer
    Idle,
    /// Samples gesammelt, warten auf Flush
    Accumulating,
}

/// Capture-Richtung eines Prozessors
#[derive(Debug)]
pub struct CapturePipeline {
    puffer: SampleRingBuffer,
    /// Quelle = Geraeterate, Ziel = Transportrate
    converter: RateConverter,
    conditioner: SignalConditioner,
    letzter_pegel: Pegel,
    ueberlauf_gemeldet: bool,
}

impl CapturePipeline {
    pub fn new(config: &PipelineConfig, device_rate: SampleRate) -> AudioResult<Self> {
        config.validieren()?;
        Ok(Self {
            puffer: SampleRingBuffer::new(config.max_buffer_size, Ueberlauf::NeueVerwerfen),
            converter: RateConverter::new(
                device_rate,
                config.transport_rate,
                config.interpolation,
                config.anti_alias_filter()?,
            ),
            conditioner: SignalConditioner::from_config(&config.capture)?,
            letzter_pegel: Pegel::default(),
            ueberlauf_gemeldet: false,
        })
    }

    /// Haengt ein Eingangsquantum an. Gibt die Anzahl verworfener Samples zurueck.
    pub fn push_quantum(&mut self, quantum: &[f32]) -> usize {
        let verworfen = self.puffer.append(quantum);
        if verworfen > 0 && !self.ueberlauf_gemeldet {
            warn!(
                kapazitaet = self.puffer.capacity(),
                verworfen, "Capture-Puffer voll, Samples werden bis zum naechsten Flush verworfen"
            );
            self.ueberlauf_gemeldet = true;
        }
        verworfen
    }

    /// Leert den Puffer und kodiert ihn. Leerer Puffer ergibt `None`.
    pub fn flush(&mut self) -> Option<AudioDataMessage> {
        if self.puffer.is_empty() {
            return None;
        }

        let gesammelt = self.puffer.take_all();
        let mut samples = self.converter.convert(&gesammelt).into_owned();
        self.conditioner.process_block(&mut samples);

        self.letzter_pegel = Pegel::messen(&samples);
        trace!(
            samples = samples.len(),
            peak = self.letzter_pegel.peak,
            rms = self.letzter_pegel.rms,
            "Capture-Block kodiert"
        );

        self.ueberlauf_gemeldet = false;
        Some(AudioDataMessage::new(
            encode_pcm16(&samples),
            self.converter.target_rate().hz(),
        ))
    }

    /// Setzt die Geraeterate (Quelle). `true` bei Aenderung.
    pub fn set_device_rate(&mut self, rate: SampleRate) -> bool {
        self.converter.set_source_rate(rate)
    }

    /// Setzt die Transportrate (Ziel). `true` bei Aenderung.
    pub fn set_transport_rate(&mut self, rate: SampleRate) -> bool {
        self.converter.set_target_rate(rate)
    }

    pub fn converter(&self) -> &RateConverter {
        &self.converter
    }

    pub fn zustand(&self) -> CaptureZustand {
        if self.puffer.is_empty() {
            CaptureZustand::Idle
        } else {
            CaptureZustand::Accumulating
        }
    }

    /// Anzahl gesammelter Samples
    pub fn len(&self) -> usize {
        self.puffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puffer.is_empty()
    }

    pub fn letzter_pegel(&self) -> Pegel {
        self.letzter_pegel
    }

    /// Verwirft gesammelte Samples und Filter-Historie
    pub fn reset(&mut self) {
        self.puffer.clear();
        self.conditioner.reset_all();
        self.ueberlauf_gemeldet = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_pcm16;

    fn pipeline(device_rate: SampleRate) -> CapturePipeline {
        CapturePipeline::new(&PipelineConfig::standard(), device_rate).unwrap()
    }

    #[test]
    fn leerer_flush_sendet_nichts() {
        let mut capture = pipeline(SampleRate::HZ_16000);
        assert_eq!(capture.zustand(), CaptureZustand::Idle);
        assert!(capture.flush().is_none());
    }

    #[test]
    fn sammeln_und_flushen() {
        let mut capture = pipeline(SampleRate::HZ_16000);
        capture.push_quantum(&[0.5; 128]);
        capture.push_quantum(&[-0.5; 128]);
        assert_eq!(capture.zustand(), CaptureZustand::Accumulating);
        assert_eq!(capture.len(), 256);

        let msg = capture.flush().unwrap();
        assert_eq!(msg.sample_rate, 16000);
        assert_eq!(msg.payload.len(), 512);
        assert_eq!(capture.zustand(), CaptureZustand::Idle);

        let decoded = decode_pcm16(&msg.payload);
        assert!((decoded[0] - 0.5).abs() < 1e-4);
        assert!((decoded[255] + 0.5).abs() < 1e-4);
        assert!(capture.flush().is_none());
    }

    #[test]
    fn konvertiert_auf_transportrate() {
        let mut capture = pipeline(SampleRate::HZ_48000);
        capture.push_quantum(&[0.1; 480]);
        let msg = capture.flush().unwrap();
        assert_eq!(msg.sample_rate, 16000);
        assert_eq!(msg.sample_count(), 160);
    }

    #[test]
    fn obergrenze_begrenzt_sammeln() {
        let config = PipelineConfig::builder().max_buffer_size(300).build().unwrap();
        let mut capture = CapturePipeline::new(&config, SampleRate::HZ_16000).unwrap();
        assert_eq!(capture.push_quantum(&[0.2; 256]), 0);
        assert_eq!(capture.push_quantum(&[0.2; 256]), 212);
        assert_eq!(capture.push_quantum(&[0.2; 256]), 256);
        assert_eq!(capture.flush().unwrap().sample_count(), 300);
        // Nach dem Flush wird wieder gesammelt
        assert_eq!(capture.push_quantum(&[0.2; 256]), 0);
    }

    #[test]
    fn aufbereitung_wird_angewendet() {
        let config = PipelineConfig::builder()
            .capture(crate::config::ConditionerConfig {
                compressor: Some(crate::dsp::CompressorConfig::default()),
                ..Default::default()
            })
            .build()
            .unwrap();
        let mut capture = CapturePipeline::new(&config, SampleRate::HZ_16000).unwrap();
        capture.push_quantum(&[1.0; 16]);
        let decoded = decode_pcm16(&capture.flush().unwrap().payload);
        assert!((decoded[0] - 0.625).abs() < 1e-4);
        assert!((capture.letzter_pegel().peak - 0.625).abs() < 1e-6);
    }

    #[test]
    fn reset_verwirft_samples() {
        let mut capture = pipeline(SampleRate::HZ_16000);
        capture.push_quantum(&[0.3; 64]);
        capture.reset();
        assert!(capture.is_empty());
        assert!(capture.flush().is_none());
    }
}
