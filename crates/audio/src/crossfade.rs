//! Raised-Cosine-Blende an den Blockraendern
//!
//! Jeder ausgelieferte Playback-Block wird an beiden Enden ein- und
//! ausgeblendet. Die Blendlaenge ist auf die halbe Blocklaenge (aufgerundet)
//! begrenzt, kein Sample wird von beiden Fenstern gewichtet. Erstes und letztes
//! Sample sind danach exakt 0.

use std::f32::consts::PI;

/// Standard-Blendlaenge in Samples
pub const STANDARD_BLENDE: usize = 256;

/// Blendet eine Kopie von `block` ein und aus
pub fn crossfade(block: &[f32], fade_length: usize) -> Vec<f32> {
    let mut out = block.to_vec();
    crossfade_in_place(&mut out, fade_length);
    out
}

/// Blendet `block` direkt ein und aus
pub fn crossfade_in_place(block: &mut [f32], fade_length: usize) {
    let len = block.len();
    let f = fade_length.min(len.div_ceil(2));
    if f == 0 {
        return;
    }

    for i in 0..f {
        let gain = 0.5 * (1.0 - (PI * i as f32 / f as f32).cos());
        block[i] *= gain;
        // Mittleres Sample ungerader Bloecke gehoert nur zur Einblendung
        let j = len - 1 - i;
        if j >= f {
            block[j] *= gain;
        }
    }
    // cos(0) = 1 ist exakt, trotzdem explizit
    block[0] = 0.0;
    block[len - 1] = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raender_sind_null() {
        for len in [1usize, 2, 3, 10, 100, 256, 1024] {
            for f in [1usize, 4, 50, 256, 5000] {
                let out = crossfade(&vec![0.7f32; len], f);
                assert_eq!(out.len(), len);
                assert_eq!(out[0], 0.0, "len={len} f={f}");
                assert_eq!(out[len - 1], 0.0, "len={len} f={f}");
            }
        }
    }

    #[test]
    fn mitte_bleibt_unveraendert() {
        let out = crossfade(&[1.0f32; 100], 10);
        for s in &out[10..90] {
            assert_eq!(*s, 1.0);
        }
    }

    #[test]
    fn einblendung_steigt_monoton() {
        let out = crossfade(&[1.0f32; 64], 16);
        for w in out[..16].windows(2) {
            assert!(w[1] >= w[0]);
        }
        // Ausblendung spiegelt die Einblendung
        for i in 0..16 {
            assert!((out[i] - out[63 - i]).abs() < 1e-6);
        }
    }

    #[test]
    fn mitte_ungerader_bloecke_nur_einmal_gewichtet() {
        for len in [3usize, 5, 9, 101] {
            let out = crossfade(&vec![1.0f32; len], 256);
            let f = len.div_ceil(2);
            let mitte = len / 2;
            let erwartet = 0.5 * (1.0 - (PI * mitte as f32 / f as f32).cos());
            assert!(
                (out[mitte] - erwartet).abs() < 1e-6,
                "len={len}: {} statt {erwartet}",
                out[mitte]
            );
        }
        let out = crossfade(&[1.0f32; 5], 256);
        assert!((out[2] - 0.75).abs() < 1e-6);
        assert!((out[1] - out[3]).abs() < 1e-6);
    }

    #[test]
    fn blendlaenge_wird_begrenzt() {
        // f > len/2: Fenster bleiben getrennt, Mitte erreicht fast 1
        let out = crossfade(&[1.0f32; 20], 256);
        assert!(out[9] > 0.9);
        assert!(out.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn null_blende_und_leerer_block() {
        assert_eq!(crossfade(&[0.5, 0.5], 0), vec![0.5, 0.5]);
        assert!(crossfade(&[], 16).is_empty());
    }

    #[test]
    fn original_bleibt_unberuehrt() {
        let block = vec![0.3f32; 8];
        let _ = crossfade(&block, 4);
        assert_eq!(block, vec![0.3f32; 8]);
    }
}
