//! pcmstream-protocol – Nachrichten am Prozessor-Port
//!
//! Definiert die JSON-Nachrichten, die zwischen Prozessor und Transport
//! ausgetauscht werden: Steuerkommandos (eingehend) und kodierte
//! PCM16-Bloecke (ausgehend).

pub mod audio;
pub mod control;

pub use audio::{AudioDataMessage, ProcessorEvent};
pub use control::ControlMessage;
