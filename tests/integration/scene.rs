//! Ambisonic decoding and binaural output.

use crate::helpers::tolerances::{FLOAT_EPSILON, SILENCE_THRESHOLD};
use crate::helpers::*;
use spatium::render::spatial::encoder::point_source_coefficients;
use spatium::render::{intermediate_layout, HoaToBedRenderer};
use proptest::prelude::*;
use spatium::prelude::*;

/// `signal` encoded as a point source at the given position.
fn encode(scene: SpeakerLayout, azimuth: f32, elevation: f32, signal: &[f32]) -> AudioBuffer {
    let order = scene.ambisonic_order().unwrap();
    let position = PannerPosition::new(azimuth, elevation, 1.0).unwrap();
    let mut coefficients = vec![0.0; scene.channel_count()];
    point_source_coefficients(order, &position, &mut coefficients);

    let mut buffer = AudioBuffer::new(scene.channel_count(), signal.len());
    for (ch, &c) in coefficients.iter().enumerate() {
        for (out, &s) in buffer.channel_mut(ch).iter_mut().zip(signal) {
            *out = s * c;
        }
    }
    buffer
}

#[test]
fn test_every_scene_decodes_to_every_bed() {
    init_tracing();
    for scene in SpeakerLayout::SCENES {
        for output in SpeakerLayout::BEDS.into_iter().chain(SpeakerLayout::EXPANDED) {
            let renderer = create_renderer(scene, output, 64, TEST_SAMPLE_RATE).unwrap();
            assert_eq!(renderer.kind(), "hoa-to-bed", "{scene} -> {output}");
        }
    }
}

#[test]
fn test_front_source_favours_centre() {
    let signal = vec![1.0; 64];
    let input = encode(SpeakerLayout::Hoa1, 0.0, 0.0, &signal);
    let mut renderer =
        create_renderer(SpeakerLayout::Hoa1, SpeakerLayout::Surround5_1, 64, TEST_SAMPLE_RATE).unwrap();
    let mut output = AudioBuffer::new(6, 64);
    renderer.render(&input, &mut output);

    let (l, r, c, lfe, ls, rs) = (
        output.sample(0, 0),
        output.sample(1, 0),
        output.sample(2, 0),
        output.sample(3, 0),
        output.sample(4, 0),
        output.sample(5, 0),
    );
    assert!(c > l && l > ls, "C {c}, L {l}, Ls {ls}");
    assert!((l - r).abs() < FLOAT_EPSILON);
    assert!((ls - rs).abs() < FLOAT_EPSILON);
    assert_eq!(lfe, 0.0);
}

#[test]
fn test_left_source_decodes_left() {
    let signal = generate_sine(500.0, TEST_SAMPLE_RATE, 128);
    let input = encode(SpeakerLayout::Hoa3, 90.0, 0.0, &signal);
    let mut renderer =
        create_renderer(SpeakerLayout::Hoa3, SpeakerLayout::Surround7_1_4, 128, TEST_SAMPLE_RATE)
            .unwrap();
    let mut output = AudioBuffer::new(12, 128);
    renderer.render(&input, &mut output);

    let side_left = rms(output.channel(4));
    let side_right = rms(output.channel(5));
    assert!(side_left > 4.0 * side_right, "Lss {side_left}, Rss {side_right}");
}

#[test]
fn test_intermediate_layouts() {
    assert_eq!(intermediate_layout(SpeakerLayout::Mono), SpeakerLayout::Stereo);
    assert_eq!(intermediate_layout(SpeakerLayout::Surround3_1_2), SpeakerLayout::Surround5_1_2);
    assert_eq!(intermediate_layout(SpeakerLayout::Surround7_1_2), SpeakerLayout::Surround7_1_4);
    assert_eq!(intermediate_layout(SpeakerLayout::Surround9_1_6), SpeakerLayout::Surround22_2);
    assert_eq!(intermediate_layout(SpeakerLayout::ExplTop6), SpeakerLayout::Surround22_2);
    assert_eq!(intermediate_layout(SpeakerLayout::Surround5_1), SpeakerLayout::Surround5_1);

    let renderer = HoaToBedRenderer::new(SpeakerLayout::Hoa2, SpeakerLayout::Mono).unwrap();
    assert_eq!(renderer.intermediate(), SpeakerLayout::Stereo);
    assert_eq!(renderer.orders().len(), 9);
}

#[test]
fn test_scene_into_mono_keeps_energy() {
    let signal = generate_sine(1000.0, TEST_SAMPLE_RATE, 256);
    let input = encode(SpeakerLayout::Hoa1, 0.0, 0.0, &signal);
    let mut renderer =
        create_renderer(SpeakerLayout::Hoa1, SpeakerLayout::Mono, 256, TEST_SAMPLE_RATE).unwrap();
    let mut output = AudioBuffer::new(1, 256);
    renderer.render(&input, &mut output);
    assert_has_audio(output.channel(0), 0.1);
}

#[test]
fn test_binaural_output_accepts_beds_and_scenes() {
    for input in SpeakerLayout::all().filter(|l| !l.is_binaural()) {
        let renderer = create_renderer(input, SpeakerLayout::Binaural, 64, TEST_SAMPLE_RATE).unwrap();
        assert_eq!(renderer.kind(), "binaural", "{input}");
        assert_eq!(renderer.output_layout().channel_count(), 2);
    }
}

#[test]
fn test_binaural_left_channel_is_louder_left() {
    let frames = 1024;
    let signal = generate_sine(500.0, TEST_SAMPLE_RATE, frames);
    let input = impulse_channel(2, 0, &signal);
    let mut renderer =
        create_renderer(SpeakerLayout::Stereo, SpeakerLayout::Binaural, frames, TEST_SAMPLE_RATE)
            .unwrap();
    let mut output = AudioBuffer::new(2, frames);
    renderer.render(&input, &mut output);

    let left = rms(output.channel(0));
    let right = rms(output.channel(1));
    assert!(left > right, "left {left}, right {right}");
    assert_has_audio(output.channel(1), SILENCE_THRESHOLD);
}

#[test]
fn test_binaural_front_scene_is_symmetric() {
    let frames = 512;
    let signal = generate_sine(300.0, TEST_SAMPLE_RATE, frames);
    let input = encode(SpeakerLayout::Hoa1, 0.0, 0.0, &signal);
    let mut renderer =
        create_renderer(SpeakerLayout::Hoa1, SpeakerLayout::Binaural, frames, TEST_SAMPLE_RATE)
            .unwrap();
    let mut output = AudioBuffer::new(2, frames);
    renderer.render(&input, &mut output);

    let left = rms(output.channel(0));
    let right = rms(output.channel(1));
    assert!((left - right).abs() < 1e-3 * left.max(1.0), "left {left}, right {right}");
}

#[test]
fn test_binaural_cannot_feed_speakers() {
    let result = create_renderer(SpeakerLayout::Binaural, SpeakerLayout::Stereo, 64, TEST_SAMPLE_RATE);
    assert!(result.is_err());
    let result = create_renderer(SpeakerLayout::Stereo, SpeakerLayout::Hoa1, 64, TEST_SAMPLE_RATE);
    assert!(result.is_err());
}

fn render_scene(input_layout: SpeakerLayout, output_layout: SpeakerLayout, input: &AudioBuffer) -> AudioBuffer {
    let mut renderer =
        create_renderer(input_layout, output_layout, input.frames(), TEST_SAMPLE_RATE).unwrap();
    let mut output = AudioBuffer::new(output_layout.channel_count(), input.frames());
    renderer.render(input, &mut output);
    output
}

/// Direct decodes and decodes through an intermediate layout plus mixdown.
const SCENE_PAIRS: [(SpeakerLayout, SpeakerLayout); 5] = [
    (SpeakerLayout::Hoa1, SpeakerLayout::Surround5_1),
    (SpeakerLayout::Hoa2, SpeakerLayout::Surround3_1_2),
    (SpeakerLayout::Hoa3, SpeakerLayout::Surround9_1_6),
    (SpeakerLayout::Hoa2, SpeakerLayout::Mono),
    (SpeakerLayout::Hoa4, SpeakerLayout::ExplStereoSs),
];

proptest! {
    #[test]
    fn prop_scene_decode_is_linear(
        seed_a in 0u64..1000,
        seed_b in 0u64..1000,
        a in -2.0f32..2.0,
        pair in 0usize..SCENE_PAIRS.len(),
    ) {
        let (input, output) = SCENE_PAIRS[pair];
        let x = noise_buffer(input.channel_count(), 32, seed_a);
        let y = noise_buffer(input.channel_count(), 32, seed_b.wrapping_add(10_000));
        let mut mix = x.clone();
        mix.apply_gain(a);
        mix.add_from(&y, 1.0);

        let rx = render_scene(input, output, &x);
        let ry = render_scene(input, output, &y);
        let rmix = render_scene(input, output, &mix);

        let mut expected = rx.clone();
        expected.apply_gain(a);
        expected.add_from(&ry, 1.0);
        prop_assert!(max_difference(&rmix, &expected) < 1e-3);
    }
}

#[test]
fn test_intermediate_pairs_use_mixdown() {
    for (input, output) in SCENE_PAIRS {
        let renderer = HoaToBedRenderer::new(input, output).unwrap();
        let through_intermediate = renderer.intermediate() != output;
        let expected = !matches!(output, SpeakerLayout::Surround5_1);
        assert_eq!(through_intermediate, expected, "{input} -> {output}");
    }
}
