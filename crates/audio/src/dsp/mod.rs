//! DSP-Module fuer die Signalaufbereitung
//!
//! Boost, Kompressor und Normalisierung implementieren das `AudioProcessor`
//! Trait fuer eine einheitliche Ketten-Integration. Der Anti-Aliasing-Filter
//! laeuft innerhalb des Resamplers und arbeitet daher auf Kopien.

pub mod anti_alias;
pub mod boost;
pub mod compressor;
pub mod normalizer;

pub use anti_alias::AntiAliasFilter;
pub use boost::HighShelfBoost;
pub use compressor::{Compressor, CompressorConfig};
pub use normalizer::{Normalizer, NormalizationStrategy};

/// Eine Stufe der Signalaufbereitung
///
/// Stufen arbeiten blockweise in-place und behalten ihren Zustand
/// ueber Blockgrenzen hinweg, bis `reset` aufgerufen wird.
pub trait AudioProcessor: Send + Sync {
    /// Bearbeitet einen Block direkt im Puffer
    fn process(&mut self, samples: &mut [f32]);

    /// Verwirft gespeicherte Vorgaengerwerte
    fn reset(&mut self);

    /// Inaktive Stufen lassen den Block unveraendert
    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Kurzname fuer Logs
    fn name(&self) -> &'static str;
}
