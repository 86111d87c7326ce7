//! Playback-Pipeline (Transport -> Geraet)
//!
//! Eingehende Bloecke werden auf die Geraeterate konvertiert, aufbereitet
//! und im Ausgangspuffer abgelegt (nur die neuesten `max_buffer_size`
//! Samples bleiben). Pro Ausgabequantum wird vorne entnommen, an beiden
//! Raendern geblendet und bei Unterlauf mit Stille aufgefuellt.
//!
//! `render` allokiert nicht und blockiert nie.

use std::borrow::Cow;

use pcmstream_core::SampleRate;
use tracing::{debug, trace, warn};

use crate::config::PipelineConfig;
use crate::crossfade::crossfade_in_place;
use crate::error::AudioResult;
use crate::meter::Pegel;
use crate::pipeline::SignalConditioner;
use crate::resample::RateConverter;
use crate::ring_buffer::{SampleRingBuffer, Ueberlauf};

/// Zustand der Playback-Pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackZustand {
    Idle,
    Buffered,
}

/// Ergebnis eines Ausgabequantums
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderErgebnis {
    /// Samples aus dem Puffer
    pub geliefert: usize,
    /// Mit Stille aufgefuellte Samples
    pub stille: usize,
}

impl RenderErgebnis {
    pub fn ist_unterlauf(&self) -> bool {
        self.stille > 0
    }
}

/// Playback-Richtung eines Prozessors
#[derive(Debug)]
pub struct PlaybackPipeline {
    puffer: SampleRingBuffer,
    /// Quelle = Transportrate, Ziel = Geraeterate
    converter: RateConverter,
    conditioner: SignalConditioner,
    fade_length: usize,
    letzter_pegel: Pegel,
    im_unterlauf: bool,
}

impl PlaybackPipeline {
    pub fn new(config: &PipelineConfig, device_rate: SampleRate) -> AudioResult<Self> {
        config.validieren()?;
        Ok(Self {
            puffer: SampleRingBuffer::new(config.max_buffer_size, Ueberlauf::AeltesteVerwerfen),
            converter: RateConverter::new(
                config.transport_rate,
                device_rate,
                config.interpolation,
                config.anti_alias_filter()?,
            ),
            conditioner: SignalConditioner::from_config(&config.playback)?,
            fade_length: config.crossfade_laenge(),
            letzter_pegel: Pegel::default(),
            // Erst nach dem ersten Block zaehlt fehlender Inhalt als Unterlauf
            im_unterlauf: true,
        })
    }

    /// Nimmt einen dekodierten Block entgegen. Gibt die Anzahl durch
    /// Ueberlauf verworfener (aeltester) Samples zurueck.
    pub fn ingest(&mut self, block: &[f32]) -> usize {
        if block.is_empty() {
            return 0;
        }

        let mut samples = self.converter.convert(block);
        if !self.conditioner.is_empty() {
            self.conditioner.process_block(samples.to_mut());
        }

        let verworfen = self.puffer.append(&samples);
        if verworfen > 0 {
            warn!(
                kapazitaet = self.puffer.capacity(),
                verworfen, "Playback-Puffer uebergelaufen, aelteste Samples verworfen"
            );
        }
        if let Cow::Owned(_) = samples {
            debug!(
                eingang = block.len(),
                ausgang = samples.len(),
                ratio = self.converter.ratio(),
                "Playback-Block konvertiert"
            );
        }
        verworfen
    }

    /// Fuellt ein Ausgabequantum
    pub fn render(&mut self, out: &mut [f32]) -> RenderErgebnis {
        let geliefert = self.puffer.take_front_into(out);
        crossfade_in_place(&mut out[..geliefert], self.fade_length);
        out[geliefert..].fill(0.0);

        let ergebnis = RenderErgebnis {
            geliefert,
            stille: out.len() - geliefert,
        };

        if ergebnis.ist_unterlauf() {
            if !self.im_unterlauf {
                warn!(
                    geliefert,
                    angefordert = out.len(),
                    "Playback-Unterlauf, fehlende Samples durch Stille ersetzt"
                );
                self.im_unterlauf = true;
            }
        } else {
            self.im_unterlauf = false;
        }

        if geliefert > 0 {
            self.letzter_pegel = Pegel::messen(out);
            trace!(
                geliefert,
                peak = self.letzter_pegel.peak,
                rms = self.letzter_pegel.rms,
                "Playback-Quantum"
            );
        }
        ergebnis
    }

    /// Setzt die Geraeterate (Ziel). `true` bei Aenderung.
    pub fn set_device_rate(&mut self, rate: SampleRate) -> bool {
        self.converter.set_target_rate(rate)
    }

    /// Setzt die Transportrate (Quelle). `true` bei Aenderung.
    pub fn set_transport_rate(&mut self, rate: SampleRate) -> bool {
        self.converter.set_source_rate(rate)
    }

    pub fn converter(&self) -> &RateConverter {
        &self.converter
    }

    pub fn zustand(&self) -> PlaybackZustand {
        if self.puffer.is_empty() {
            PlaybackZustand::Idle
        } else {
            PlaybackZustand::Buffered
        }
    }

    /// Anzahl gepufferter Samples
    pub fn len(&self) -> usize {
        self.puffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.puffer.capacity()
    }

    pub fn letzter_pegel(&self) -> Pegel {
        self.letzter_pegel
    }

    /// Verwirft gepufferte Samples und Filter-Historie
    pub fn reset(&mut self) {
        self.puffer.clear();
        self.conditioner.reset_all();
        self.im_unterlauf = true;
    }
}
