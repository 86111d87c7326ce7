//! Ausgehende Audio-Nachrichten
//!
//! Ein geleerter Capture-Puffer wird als `audio_data`-Nachricht mit
//! PCM16-Little-Endian-Nutzdaten versendet. Im JSON sind die Bytes
//! Base64-kodiert.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Ein kodierter Capture-Block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDataMessage {
    /// PCM16 Little-Endian, 2 Bytes pro Sample
    #[serde(with = "base64_bytes")]
    pub payload: Bytes,
    /// Abtastrate der Nutzdaten in Hz
    #[serde(rename = "sampleRate")]
    pub sample_rate: u32,
}

impl AudioDataMessage {
    pub fn new(payload: Bytes, sample_rate: u32) -> Self {
        Self {
            payload,
            sample_rate,
        }
    }

    /// Anzahl der enthaltenen Samples
    pub fn sample_count(&self) -> usize {
        self.payload.len() / 2
    }

    /// Dauer des Blocks in Sekunden
    pub fn dauer_sekunden(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.sample_count() as f64 / self.sample_rate as f64
    }
}

/// Ereignis, das der Prozessor an seinen Port sendet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcessorEvent {
    AudioData(AudioDataMessage),
}

impl ProcessorEvent {
    /// Serialisiert das Ereignis als JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialisiert ein Ereignis aus JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl From<AudioDataMessage> for ProcessorEvent {
    fn from(msg: AudioDataMessage) -> Self {
        Self::AudioData(msg)
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
