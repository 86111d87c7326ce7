//! PCM16-Codec (f32 <-> i16 Little-Endian)
//!
//! Zustandslos. Encode klemmt auf [-1.0, 1.0], skaliert mit 32767 und
//! schneidet Richtung Null ab. Decode ist die Umkehrung fuer PCM16, das
//! vom Transport kommt.

use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Skalierungsfaktor zwischen f32 und i16
pub const PCM16_SKALA: f32 = i16::MAX as f32;

/// Kodiert f32-Samples als PCM16 Little-Endian (2 Bytes pro Sample)
pub fn encode_pcm16(samples: &[f32]) -> Bytes {
    let mut out = BytesMut::with_capacity(samples.len() * 2);
    encode_pcm16_into(samples, &mut out);
    out.freeze()
}

/// Kodiert f32-Samples und haengt die Bytes an `out` an
pub fn encode_pcm16_into(samples: &[f32], out: &mut BytesMut) {
    out.reserve(samples.len() * 2);
    for &sample in samples {
        out.put_i16_le(sample_to_i16(sample));
    }
}

/// Dekodiert PCM16 Little-Endian zu f32. Ein ueberzaehliges Byte am Ende wird ignoriert.
pub fn decode_pcm16(bytes: &[u8]) -> Vec<f32> {
    let mut buf = bytes;
    let mut out = Vec::with_capacity(bytes.len() / 2);
    while buf.remaining() >= 2 {
        out.push(i16_to_sample(buf.get_i16_le()));
    }
    out
}

/// Einzelnes Sample zu i16 (geklemmt, abgeschnitten). NaN ergibt 0.
#[inline]
pub fn sample_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * PCM16_SKALA) as i16
}

/// Einzelnes i16 zu Sample, auf [-1.0, 1.0] geklemmt
#[inline]
pub fn i16_to_sample(value: i16) -> f32 {
    (value as f32 / PCM16_SKALA).clamp(-1.0, 1.0)
}
