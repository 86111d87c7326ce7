//! End-to-End-Szenarien fuer Capture, Playback und Port-Nachrichten

use pcmstream_audio::{
    crossfade, decode_pcm16, encode_pcm16, resample, AudioNode, ConditionerConfig, Interpolation,
    NormalizationStrategy, PcmProcessor, PipelineConfig, PortNachricht, Preset, RateConverter,
    SampleRingBuffer, Ueberlauf,
};
use pcmstream_core::{Mode, SampleRate};
use pcmstream_protocol::{ControlMessage, ProcessorEvent};

fn prozessor(config: PipelineConfig, mode: Mode, device_rate: SampleRate) -> PcmProcessor {
    PcmProcessor::new(config, mode, device_rate).expect("Prozessor konnte nicht erstellt werden")
}

fn flush(p: &mut PcmProcessor) -> Option<pcmstream_protocol::AudioDataMessage> {
    p.handle_message(PortNachricht::Steuerung(ControlMessage::GetBuffer))
        .unwrap()
}

#[test]
fn szenario_a_stille_wird_zu_nullbytes() {
    let mut p = prozessor(PipelineConfig::standard(), Mode::Capture, SampleRate::HZ_16000);
    let mut aus = vec![0.0f32; 1024];
    p.process(&vec![0.0f32; 1024], &mut aus, SampleRate::HZ_16000);

    let msg = flush(&mut p).expect("Block erwartet");
    assert_eq!(msg.sample_rate, 16000);
    assert_eq!(msg.payload.len(), 2048);
    assert!(msg.payload.iter().all(|&b| b == 0));

    // Zweiter Flush ohne neue Samples sendet nichts
    assert!(flush(&mut p).is_none());
}

#[test]
fn szenario_b_kurzer_block_mit_stille() {
    let mut p = prozessor(PipelineConfig::standard(), Mode::Playback, SampleRate::HZ_16000);
    let block: Vec<f32> = (0..100).map(|i| 0.3 + (i as f32 * 0.1).sin() * 0.2).collect();
    p.handle_message(PortNachricht::Samples(block)).unwrap();

    let mut aus = vec![1.0f32; 256];
    p.process(&[], &mut aus, SampleRate::HZ_16000);

    // Raender exakt 0, dazwischen geblendete Daten
    assert_eq!(aus[0], 0.0);
    assert_eq!(aus[99], 0.0);
    assert!(aus[1..99].iter().all(|&s| s != 0.0));
    assert!(aus[100..].iter().all(|&s| s == 0.0));
    assert_eq!(aus[100..].len(), 156);
    assert_eq!(p.stats().underruns, 1);
    assert!(p.playback().is_empty());
}

#[test]
fn szenario_c_neue_rate_gilt_sofort() {
    let mut p = prozessor(PipelineConfig::standard(), Mode::Capture, SampleRate::HZ_16000);
    let mut aus = vec![0.0f32; 480];

    p.process(&vec![0.1f32; 480], &mut aus, SampleRate::HZ_16000);
    assert_eq!(flush(&mut p).unwrap().sample_count(), 480);

    p.handle_message(PortNachricht::Steuerung(ControlMessage::SetSampleRate {
        sample_rate: 48000.0,
    }))
    .unwrap();
    assert_eq!(p.capture().converter().ratio(), 3.0);

    p.process(&vec![0.1f32; 480], &mut aus, SampleRate::HZ_48000);
    assert_eq!(flush(&mut p).unwrap().sample_count(), 160);

    let mut conv = RateConverter::new(
        SampleRate::HZ_16000,
        SampleRate::HZ_16000,
        Interpolation::Cubic,
        None,
    );
    let data = vec![0.2f32; 900];
    assert_eq!(conv.convert(&data).len(), 900);
    conv.set_source_rate(SampleRate::HZ_48000);
    assert_eq!(conv.convert(&data).len(), 300);
}

#[test]
fn port_fluss_mit_json() {
    let p = prozessor(PipelineConfig::standard(), Mode::Playback, SampleRate::HZ_48000);
    let (mut node, port) = AudioNode::new(p, 16);

    for json in [
        r#"{"type":"set_mode","mode":"input"}"#,
        r#"{"type":"set_sample_rate","sampleRate":44100}"#,
    ] {
        port.send_control(ControlMessage::from_json(json).unwrap())
            .unwrap();
    }

    let quantum: Vec<f32> = (0..441).map(|i| (i as f32 * 0.02).sin() * 0.5).collect();
    let mut aus = vec![0.0f32; 441];
    node.process(&quantum, &mut aus, SampleRate::HZ_44100);
    assert_eq!(node.processor().mode(), Mode::Capture);

    port.send_control(ControlMessage::from_json(r#"{"type":"get_buffer"}"#).unwrap())
        .unwrap();
    node.process(&quantum, &mut aus, SampleRate::HZ_44100);

    let events = port.drain();
    assert_eq!(events.len(), 1);
    let json = events[0].to_json().unwrap();
    assert!(json.contains(r#""type":"audio_data""#));
    assert!(json.contains(r#""sampleRate":16000"#));

    let ProcessorEvent::AudioData(msg) = ProcessorEvent::from_json(&json).unwrap();
    // 441 Samples bei 44.1 kHz -> 160 bei 16 kHz
    assert_eq!(msg.sample_count(), 160);
    let decoded = decode_pcm16(&msg.payload);
    assert!(decoded.iter().all(|s| s.abs() <= 0.5 + 1e-3));
}

#[test]
fn transport_rundlauf_capture_nach_playback() {
    // Capture bei 48 kHz -> PCM16 16 kHz -> Playback bei 48 kHz
    let config = Preset::HoheQualitaet.config();
    let mut sender = prozessor(
        PipelineConfig {
            transport_rate: SampleRate::HZ_16000,
            ..config.clone()
        },
        Mode::Capture,
        SampleRate::HZ_48000,
    );
    let mut empfaenger = prozessor(
        PipelineConfig {
            transport_rate: SampleRate::HZ_16000,
            crossfade: None,
            ..config
        },
        Mode::Playback,
        SampleRate::HZ_48000,
    );

    let signal: Vec<f32> = (0..4800).map(|i| (i as f32 * 0.01).sin() * 0.3).collect();
    let mut stumm = vec![0.0f32; 480];
    for quantum in signal.chunks(480) {
        sender.process(quantum, &mut stumm, SampleRate::HZ_48000);
    }
    let msg = flush(&mut sender).unwrap();
    assert_eq!(msg.sample_count(), 1600);

    empfaenger.push_playback(&decode_pcm16(&msg.payload));
    assert_eq!(empfaenger.playback().len(), 4800);

    let mut aus = vec![0.0f32; 480];
    empfaenger.process(&[], &mut aus, SampleRate::HZ_48000);
    // Niederfrequentes Signal unter dem Schwellenwert bleibt nahezu erhalten
    for (a, b) in aus.iter().zip(signal.iter()).skip(4) {
        assert!((a - b).abs() < 0.01, "{a} vs {b}");
    }
}

#[test]
fn preset_sprache_normalisiert_playback() {
    let mut p = prozessor(Preset::Sprache.config(), Mode::Playback, SampleRate::HZ_16000);
    let leise: Vec<f32> = (0..2048).map(|i| (i as f32 * 0.05).sin() * 0.1).collect();
    p.push_playback(&leise);

    let mut aus = vec![0.0f32; 1024];
    p.process(&[], &mut aus, SampleRate::HZ_16000);
    let spitze = aus.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    // Verstaerkung auf hoechstens das Doppelte begrenzt
    assert!(spitze > 0.15 && spitze <= 0.2 * 1.3, "Spitze {spitze}");

    let strategie = Preset::Sprache.config().playback.normalization;
    assert_eq!(strategie, Some(NormalizationStrategy::sprache()));
}

#[test]
fn getrennte_zustaende_je_richtung() {
    let config = PipelineConfig::builder()
        .capture(ConditionerConfig {
            boost: Some(0.5),
            ..Default::default()
        })
        .playback(ConditionerConfig {
            boost: Some(0.5),
            ..Default::default()
        })
        .crossfade(None)
        .build()
        .unwrap();
    let mut capture = prozessor(config.clone(), Mode::Capture, SampleRate::HZ_16000);
    let mut playback = prozessor(config, Mode::Playback, SampleRate::HZ_16000);

    capture.process(&[0.9; 32], &mut [0.0; 32], SampleRate::HZ_16000);
    flush(&mut capture).unwrap();

    // Playback-Boost startet unbeeinflusst von der Capture-Historie
    playback.push_playback(&[0.4; 4]);
    let mut aus = [0.0f32; 4];
    playback.process(&[], &mut aus, SampleRate::HZ_16000);
    assert!((aus[0] - 0.6).abs() < 1e-6);
    assert!((aus[1] - 0.4).abs() < 1e-6);
}

#[test]
fn eigenschaften_der_bausteine() {
    // Identitaet
    let x: Vec<f32> = (0..333).map(|i| i as f32 / 333.0).collect();
    for hz in [8000u32, 44100, 96000] {
        let r = SampleRate::try_from(hz).unwrap();
        assert_eq!(&*resample(&x, r, r, Interpolation::Cubic, None), &x[..]);
    }

    // Klemmen
    assert_eq!(encode_pcm16(&[1.5]), encode_pcm16(&[1.0]));
    assert_eq!(encode_pcm16(&[-1.5]), encode_pcm16(&[-1.0]));

    // Ring-Buffer behaelt die neuesten Samples
    let mut rb = SampleRingBuffer::new(16000, Ueberlauf::AeltesteVerwerfen);
    let viele: Vec<f32> = (0..20000).map(|i| i as f32).collect();
    rb.append(&viele);
    assert_eq!(rb.take_all(), viele[4000..].to_vec());

    // Blende
    let block = crossfade(&[0.8; 7], 1);
    assert_eq!(block[0], 0.0);
    assert_eq!(block[6], 0.0);
    assert_eq!(block[3], 0.8);
}
