//! pcmstream-audio – Echtzeit-PCM-Pipeline
//!
//! Zwischen Audio-Geraet und Transport:
//! - Ring-Buffer mit fester Obergrenze (allokationsfrei im Callback)
//! - PCM16-Codec (f32 <-> i16 Little-Endian)
//! - Abtastraten-Konvertierung (linear / Catmull-Rom, optionales Anti-Aliasing)
//! - Signalaufbereitung: High-Shelf-Boost, Kompressor, Normalisierung
//! - Raised-Cosine-Blende an Blockraendern
//! - Capture- und Playback-Pipeline, Prozessor mit Nachrichten-Port

pub mod capture;
pub mod codec;
pub mod config;
pub mod crossfade;
pub mod dsp;
pub mod error;
pub mod meter;
pub mod node;
pub mod pipeline;
pub mod playback;
pub mod processor;
pub mod resample;
pub mod ring_buffer;

// Bequeme Re-Exporte der wichtigsten Typen
pub use capture::{CapturePipeline, CaptureZustand};
pub use codec::{decode_pcm16, encode_pcm16};
pub use config::{ConditionerConfig, PipelineConfig, PipelineConfigBuilder, Preset};
pub use crossfade::{crossfade, crossfade_in_place};
pub use dsp::{AntiAliasFilter, AudioProcessor, CompressorConfig, NormalizationStrategy};
pub use error::{AudioError, AudioResult};
pub use meter::Pegel;
pub use node::{AudioNode, NodePort};
pub use pipeline::SignalConditioner;
pub use playback::{PlaybackPipeline, PlaybackZustand, RenderErgebnis};
pub use processor::{AudioStats, PcmProcessor, PortNachricht};
pub use resample::{resample, Interpolation, RateConverter};
pub use ring_buffer::{SampleRingBuffer, Ueberlauf};
