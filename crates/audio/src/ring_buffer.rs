//! Begrenzter Sample-Puffer fuer beide Richtungen
//!
//! Entkoppelt die Blockgroessen von Erzeuger und Verbraucher. Der Speicher
//! wird einmal beim Erstellen reserviert; `append` und `take_front` allokieren
//! im Callback nicht und blockieren nie.
//!
//! Zwei Ueberlaufstrategien:
//! - **AeltesteVerwerfen** (Playback): nur die neuesten `capacity` Samples bleiben
//! - **NeueVerwerfen** (Capture): Sammeln stoppt an der Obergrenze

use ringbuf::traits::{Consumer, Observer, Producer, RingBuffer};
use ringbuf::HeapRb;

/// Verhalten bei vollem Puffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ueberlauf {
    /// Aelteste Samples verwerfen, neueste behalten
    AeltesteVerwerfen,
    /// Neue Samples verwerfen, Inhalt behalten
    NeueVerwerfen,
}

/// Sample-Puffer mit fester Obergrenze
pub struct SampleRingBuffer {
    rb: HeapRb<f32>,
    ueberlauf: Ueberlauf,
    verworfen: u64,
}

impl SampleRingBuffer {
    /// Erstellt einen Puffer fuer maximal `capacity` Samples (mindestens 1)
    pub fn new(capacity: usize, ueberlauf: Ueberlauf) -> Self {
        Self {
            rb: HeapRb::new(capacity.max(1)),
            ueberlauf,
            verworfen: 0,
        }
    }

    /// Haengt Samples hinten an.
    ///
    /// Gibt die Anzahl verworfener Samples zurueck (0 wenn alles passte).
    pub fn append(&mut self, samples: &[f32]) -> usize {
        let frei = self.rb.vacant_len();
        let dropped = match self.ueberlauf {
            Ueberlauf::AeltesteVerwerfen => {
                let dropped = samples.len().saturating_sub(frei);
                self.rb.push_slice_overwrite(samples);
                dropped
            }
            Ueberlauf::NeueVerwerfen => samples.len() - self.rb.push_slice(samples),
        };
        self.verworfen += dropped as u64;
        dropped
    }

    /// Entnimmt bis zu `n` Samples vom Anfang
    pub fn take_front(&mut self, n: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; n.min(self.len())];
        let read = self.rb.pop_slice(&mut out);
        out.truncate(read);
        out
    }

    /// Entnimmt Samples direkt in `out`, gibt die Anzahl gelesener Samples zurueck
    pub fn take_front_into(&mut self, out: &mut [f32]) -> usize {
        self.rb.pop_slice(out)
    }

    /// Entnimmt den gesamten Inhalt
    pub fn take_all(&mut self) -> Vec<f32> {
        self.take_front(self.len())
    }

    /// Kuerzt auf die letzten `capacity` Samples, gibt die Anzahl verworfener zurueck
    pub fn drop_keep_tail(&mut self, capacity: usize) -> usize {
        let ueberschuss = self.len().saturating_sub(capacity);
        if ueberschuss > 0 {
            self.rb.skip(ueberschuss);
            self.verworfen += ueberschuss as u64;
        }
        ueberschuss
    }

    /// Leert den Puffer
    pub fn clear(&mut self) {
        self.rb.clear();
    }

    pub fn len(&self) -> usize {
        self.rb.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.rb.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.rb.is_full()
    }

    pub fn capacity(&self) -> usize {
        self.rb.capacity().get()
    }

    /// Summe aller bisher verworfenen Samples
    pub fn verworfen(&self) -> u64 {
        self.verworfen
    }
}

impl std::fmt::Debug for SampleRingBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleRingBuffer")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("ueberlauf", &self.ueberlauf)
            .field("verworfen", &self.verworfen)
            .finish()
    }
}
