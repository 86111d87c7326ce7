//! AudioNode – Prozessor mit Nachrichten-Port
//!
//! Verbindet einen `PcmProcessor` ueber crossbeam-channel mit der
//! Aussenwelt. Vor jedem Quantum werden alle wartenden Port-Nachrichten
//! abgearbeitet. Weder Empfang noch Versand blockieren: ist der
//! Ausgangskanal voll, wird der Block verworfen und gezaehlt.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use pcmstream_core::SampleRate;
use pcmstream_protocol::{ControlMessage, ProcessorEvent};
use tracing::{debug, error, warn};

use crate::error::{AudioError, AudioResult};
use crate::processor::{AudioStats, PcmProcessor, PortNachricht};

/// Standard-Kapazitaet beider Port-Kanaele
pub const STANDARD_PORT_KAPAZITAET: usize = 64;

/// Aussenseite des Ports (Transport / Steuerung)
#[derive(Debug, Clone)]
pub struct NodePort {
    tx: Sender<PortNachricht>,
    rx: Receiver<ProcessorEvent>,
}

impl NodePort {
    /// Sendet eine Nachricht ohne zu blockieren
    pub fn send(&self, msg: PortNachricht) -> AudioResult<()> {
        self.tx.try_send(msg).map_err(|e| match e {
            TrySendError::Full(_) => AudioError::PortVoll,
            TrySendError::Disconnected(_) => {
                AudioError::PortGetrennt("Prozessor nicht mehr erreichbar".into())
            }
        })
    }

    pub fn send_control(&self, msg: ControlMessage) -> AudioResult<()> {
        self.send(PortNachricht::Steuerung(msg))
    }

    pub fn send_samples(&self, samples: Vec<f32>) -> AudioResult<()> {
        self.send(PortNachricht::Samples(samples))
    }

    /// Holt ein Ereignis, falls vorhanden
    pub fn try_recv(&self) -> AudioResult<Option<ProcessorEvent>> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(AudioError::PortGetrennt(
                "Prozessor beendet".into(),
            )),
        }
    }

    /// Alle aktuell wartenden Ereignisse
    pub fn drain(&self) -> Vec<ProcessorEvent> {
        self.rx.try_iter().collect()
    }

    /// Empfangsseite fuer blockierende Leser in eigenen Threads
    pub fn events(&self) -> &Receiver<ProcessorEvent> {
        &self.rx
    }
}

/// Innenseite: Prozessor plus Kanalenden
#[derive(Debug)]
pub struct AudioNode {
    processor: PcmProcessor,
    eingang: Receiver<PortNachricht>,
    ausgang: Sender<ProcessorEvent>,
    emissions_dropped: u64,
}

impl AudioNode {
    /// Erstellt Node und zugehoerigen Port mit `kapazitaet` Plaetzen je Richtung
    pub fn new(processor: PcmProcessor, kapazitaet: usize) -> (Self, NodePort) {
        let (msg_tx, msg_rx) = bounded::<PortNachricht>(kapazitaet.max(1));
        let (event_tx, event_rx) = bounded::<ProcessorEvent>(kapazitaet.max(1));
        let node = Self {
            processor,
            eingang: msg_rx,
            ausgang: event_tx,
            emissions_dropped: 0,
        };
        let port = NodePort {
            tx: msg_tx,
            rx: event_rx,
        };
        (node, port)
    }

    /// Arbeitet wartende Nachrichten ab und verarbeitet dann ein Quantum.
    /// Die Rate des Callbacks hat Vorrang vor `set_sample_rate` aus dem Port.
    pub fn process(&mut self, eingang: &[f32], ausgang: &mut [f32], device_rate: SampleRate) {
        self.drain_messages();
        self.processor.process(eingang, ausgang, device_rate);
    }

    /// Arbeitet alle wartenden Nachrichten ab. Gibt deren Anzahl zurueck.
    pub fn drain_messages(&mut self) -> usize {
        let mut anzahl = 0;
        while let Ok(msg) = self.eingang.try_recv() {
            anzahl += 1;
            match self.processor.handle_message(msg) {
                Ok(Some(block)) => self.emit(ProcessorEvent::from(block)),
                Ok(None) => {}
                Err(e) => error!("Port-Nachricht abgewiesen: {}", e),
            }
        }
        anzahl
    }

    fn emit(&mut self, event: ProcessorEvent) {
        match self.ausgang.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.emissions_dropped += 1;
                warn!(
                    verworfen = self.emissions_dropped,
                    "Ausgangsport voll, audio_data-Block verworfen"
                );
            }
            Err(TrySendError::Disconnected(_)) => {
                self.emissions_dropped += 1;
                debug!("Ausgangsport getrennt, audio_data-Block verworfen");
            }
        }
    }

    pub fn processor(&self) -> &PcmProcessor {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut PcmProcessor {
        &mut self.processor
    }

    /// Statistiken inklusive am Port verworfener Bloecke
    pub fn stats(&self) -> AudioStats {
        let mut stats = self.processor.stats().clone();
        stats.emissions_dropped = self.emissions_dropped;
        stats
    }
}
