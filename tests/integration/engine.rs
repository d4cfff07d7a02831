//! MixEngine lifecycle, mixing and loudness.

use crate::helpers::tolerances::{DSP_EPSILON, FLOAT_EPSILON};
use crate::helpers::*;
use spatium::prelude::*;

#[test]
fn test_builder_rejects_invalid_config() {
    assert!(MixEngine::builder().sample_rate(1_000).build().is_err());
    assert!(MixEngine::builder().block_size(0).build().is_err());
    assert!(MixEngine::builder().block_size(100_000).build().is_err());
}

#[test]
fn test_builder_from_json_config() {
    let config: RenderConfig =
        serde_json::from_str(r#"{ "sample_rate": 44100, "output_layout": "7.1.4" }"#).unwrap();
    let engine = MixEngine::builder().config(config).build().unwrap();
    assert_eq!(engine.sample_rate(), 44_100);
    assert_eq!(engine.block_size(), 512);
    assert_eq!(engine.output_layout(), SpeakerLayout::Surround7_1_4);
}

#[test]
fn test_unrenderable_substream_is_excluded() {
    init_tracing();
    let mut engine = test_engine(SpeakerLayout::Stereo);
    let bed = engine.add_substream(SpeakerLayout::Surround5_1);
    let headphones = engine.add_substream(SpeakerLayout::Binaural);

    assert_eq!(engine.prepare(), 1);
    assert!(engine.is_renderable(bed));
    assert!(!engine.is_renderable(headphones));

    let inputs = [
        noise_buffer(6, TEST_BLOCK_SIZE, 1),
        noise_buffer(2, TEST_BLOCK_SIZE, 2),
    ];
    let mut out = AudioBuffer::new(2, TEST_BLOCK_SIZE);
    engine.render(&inputs, &mut out);

    let mut reference =
        create_renderer(SpeakerLayout::Surround5_1, SpeakerLayout::Stereo, TEST_BLOCK_SIZE, TEST_SAMPLE_RATE)
            .unwrap();
    let mut expected = AudioBuffer::new(2, TEST_BLOCK_SIZE);
    reference.render(&inputs[0], &mut expected);
    assert!(max_difference(&out, &expected) < FLOAT_EPSILON);
}

#[test]
fn test_substreams_are_summed() {
    let mut engine = test_engine(SpeakerLayout::Surround5_1);
    let dialog = engine.add_substream(SpeakerLayout::Mono);
    let music = engine.add_substream(SpeakerLayout::Stereo);
    assert_eq!(engine.prepare(), 2);
    assert_eq!(engine.renderer_kind(dialog), Some("bed-to-bed"));

    let voice = generate_sine(200.0, TEST_SAMPLE_RATE, TEST_BLOCK_SIZE);
    let inputs = [
        AudioBuffer::from_channels(&[voice.clone()]),
        AudioBuffer::from_channels(&[voice.clone(), voice.clone()]),
    ];
    let mut out = AudioBuffer::new(6, TEST_BLOCK_SIZE);
    engine.render(&inputs, &mut out);

    // Mono dialog lands in C, stereo music passes to L/R.
    assert_eq!(out.channel(2), voice.as_slice());
    assert_eq!(out.channel(0), voice.as_slice());
    assert_eq!(out.channel(1), voice.as_slice());
    assert_silence(out.channel(3), FLOAT_EPSILON);
    let _ = music;
}

#[test]
fn test_gain_change_is_ramped() {
    let mut engine = test_engine(SpeakerLayout::Stereo);
    let id = engine.add_substream(SpeakerLayout::Stereo);
    engine.prepare();

    let inputs = [AudioBuffer::from_channels(&[vec![1.0; TEST_BLOCK_SIZE], vec![1.0; TEST_BLOCK_SIZE]])];
    let mut out = AudioBuffer::new(2, TEST_BLOCK_SIZE);
    engine.render(&inputs, &mut out);
    assert_eq!(out.sample(0, TEST_BLOCK_SIZE - 1), 1.0);

    engine.set_gain(id, 0.5).unwrap();
    engine.render(&inputs, &mut out);
    let ch = out.channel(0);
    assert!(ch[0] < 1.0 && ch[0] > 0.99);
    assert!(ch.windows(2).all(|w| w[1] <= w[0]));

    // 10 ms at 48 kHz: settled within two blocks.
    engine.render(&inputs, &mut out);
    engine.render(&inputs, &mut out);
    assert!(out.channel(1).iter().all(|&s| (s - 0.5).abs() < DSP_EPSILON));
}

#[test]
fn test_gain_control_from_another_thread() {
    let mut engine = test_engine(SpeakerLayout::Mono);
    let id = engine.add_substream(SpeakerLayout::Mono);
    engine.prepare();
    let gain = engine.gain_control(id).unwrap();
    std::thread::spawn(move || gain.set(0.0)).join().unwrap();

    let inputs = [AudioBuffer::from_channels(&[vec![1.0; TEST_BLOCK_SIZE]])];
    let mut out = AudioBuffer::new(1, TEST_BLOCK_SIZE);
    for _ in 0..3 {
        engine.render(&inputs, &mut out);
    }
    assert_silence(out.channel(0), DSP_EPSILON);
}

#[test]
fn test_output_layout_change_rebuilds_renderers() {
    let mut engine = test_engine(SpeakerLayout::Stereo);
    let scene = engine.add_substream(SpeakerLayout::Hoa1);
    engine.prepare();
    assert_eq!(engine.renderer_kind(scene), Some("hoa-to-bed"));

    engine.set_output_layout(SpeakerLayout::Binaural);
    assert!(!engine.is_renderable(scene));
    assert_eq!(engine.prepare(), 1);
    assert_eq!(engine.renderer_kind(scene), Some("binaural"));

    let inputs = [noise_buffer(4, TEST_BLOCK_SIZE, 8)];
    let mut out = AudioBuffer::new(2, TEST_BLOCK_SIZE);
    engine.render(&inputs, &mut out);
    assert_has_audio(out.channel(0), 1e-3);
}

#[test]
fn test_removed_substream_leaves_mix() {
    let mut engine = test_engine(SpeakerLayout::Stereo);
    let a = engine.add_substream(SpeakerLayout::Stereo);
    let b = engine.add_substream(SpeakerLayout::Mono);
    engine.prepare();
    assert!(engine.remove_substream(a));
    assert_eq!(engine.substream_count(), 1);
    assert_eq!(engine.substreams().next(), Some((b, SpeakerLayout::Mono)));

    let inputs = [AudioBuffer::from_channels(&[vec![0.5; TEST_BLOCK_SIZE]])];
    let mut out = AudioBuffer::new(2, TEST_BLOCK_SIZE);
    engine.render(&inputs, &mut out);
    assert!((out.sample(0, 0) - 0.5 * std::f32::consts::FRAC_1_SQRT_2).abs() < FLOAT_EPSILON);
}

#[test]
fn test_expanded_substreams_build_a_full_bed() {
    // A 7.1.4 mix delivered as separate expanded stems.
    let mut engine = test_engine(SpeakerLayout::Surround7_1_4);
    let stems = [
        SpeakerLayout::ExplFront3,
        SpeakerLayout::ExplLfe,
        SpeakerLayout::ExplStereoSs,
        SpeakerLayout::ExplStereoRs,
        SpeakerLayout::ExplTop4,
    ];
    for stem in stems {
        engine.add_substream(stem);
    }
    assert_eq!(engine.prepare(), stems.len());

    let full = noise_buffer(12, TEST_BLOCK_SIZE, 77);
    let inputs: Vec<AudioBuffer> = stems
        .iter()
        .map(|stem| {
            let base = stem.base_layout();
            let mut buffer = AudioBuffer::new(stem.channel_count(), TEST_BLOCK_SIZE);
            for (dst, src) in stem.channel_map() {
                assert_eq!(base, SpeakerLayout::Surround7_1_4);
                buffer.channel_mut(src).copy_from_slice(full.channel(dst));
            }
            buffer
        })
        .collect();

    let mut out = AudioBuffer::new(12, TEST_BLOCK_SIZE);
    engine.render(&inputs, &mut out);
    assert!(max_difference(&out, &full) < FLOAT_EPSILON);
}

#[cfg(feature = "loudness")]
#[test]
fn test_measure_rendered_loudness() {
    let mut engine = test_engine(SpeakerLayout::Stereo);
    engine.add_substream(SpeakerLayout::Stereo);
    engine.prepare();

    // Two seconds of a -6 dBFS 1 kHz tone on both channels.
    let total = 2 * TEST_SAMPLE_RATE as usize;
    let tone: Vec<f32> = generate_sine(1000.0, TEST_SAMPLE_RATE, total)
        .into_iter()
        .map(|s| s * 0.5)
        .collect();

    let mut rendered = AudioBuffer::new(2, total);
    let mut out = AudioBuffer::new(2, TEST_BLOCK_SIZE);
    for start in (0..total).step_by(TEST_BLOCK_SIZE) {
        let end = (start + TEST_BLOCK_SIZE).min(total);
        let block = &tone[start..end];
        let inputs = [AudioBuffer::from_channels(&[block.to_vec(), block.to_vec()])];
        out.ensure_size(2, end - start);
        engine.render(&inputs, &mut out);
        for ch in 0..2 {
            rendered.channel_mut(ch)[start..end].copy_from_slice(out.channel(ch));
        }
    }

    let stats = engine.measure_loudness(&rendered).unwrap();
    assert!(
        (-8.0..-4.0).contains(&stats.integrated_lufs),
        "integrated {}",
        stats.integrated_lufs
    );
    assert!(stats.true_peak_dbtp < 0.0);
}

#[cfg(feature = "loudness")]
#[test]
fn test_measure_loudness_rejects_wrong_shape() {
    let engine = test_engine(SpeakerLayout::Surround5_1);
    let wrong = AudioBuffer::new(2, TEST_BLOCK_SIZE);
    assert!(engine.measure_loudness(&wrong).is_err());
}
