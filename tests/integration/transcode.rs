//! Bed and expanded-layout transcoding through the renderer factory.

use crate::helpers::tolerances::{DSP_EPSILON, FLOAT_EPSILON};
use crate::helpers::*;
use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use spatium::core::matrix_count;
use spatium::prelude::*;

fn render_once(input_layout: SpeakerLayout, output_layout: SpeakerLayout, input: &AudioBuffer) -> AudioBuffer {
    let mut renderer =
        create_renderer(input_layout, output_layout, input.frames(), TEST_SAMPLE_RATE).unwrap();
    let mut output = AudioBuffer::new(output_layout.channel_count(), input.frames());
    renderer.render(input, &mut output);
    output
}

#[test]
fn test_gain_table_covers_every_bed_pair() {
    init_tracing();
    let beds = SpeakerLayout::BEDS;
    assert_eq!(matrix_count(), beds.len() * (beds.len() - 1));
    for input in beds {
        for output in beds {
            let renderer = create_renderer(input, output, TEST_BLOCK_SIZE, TEST_SAMPLE_RATE).unwrap();
            let expected = if input == output { "passthrough" } else { "bed-to-bed" };
            assert_eq!(renderer.kind(), expected, "{input} -> {output}");
        }
    }
}

#[test]
fn test_mono_dialog_lands_in_centre() {
    let signal = generate_sine(1000.0, TEST_SAMPLE_RATE, TEST_BLOCK_SIZE);
    let input = AudioBuffer::from_channels(&[signal.clone()]);
    let output = render_once(SpeakerLayout::Mono, SpeakerLayout::Surround5_1, &input);

    for ch in [0, 1, 3, 4, 5] {
        assert_silence(output.channel(ch), FLOAT_EPSILON);
    }
    assert_eq!(output.channel(2), signal.as_slice());
}

#[test]
fn test_stereo_to_stereo_is_bit_exact() {
    let input = noise_buffer(2, TEST_BLOCK_SIZE, 11);
    let output = render_once(SpeakerLayout::Stereo, SpeakerLayout::Stereo, &input);
    assert_eq!(output, input);
}

#[test]
fn test_side_surrounds_reach_their_slots_in_7_1_4() {
    let left = generate_sine(440.0, TEST_SAMPLE_RATE, TEST_BLOCK_SIZE);
    let right = generate_sine(660.0, TEST_SAMPLE_RATE, TEST_BLOCK_SIZE);
    let input = AudioBuffer::from_channels(&[left.clone(), right.clone()]);
    let output = render_once(SpeakerLayout::ExplStereoSs, SpeakerLayout::Surround7_1_4, &input);

    assert_eq!(output.channel(4), left.as_slice());
    assert_eq!(output.channel(5), right.as_slice());
    for ch in (0..12).filter(|&ch| ch != 4 && ch != 5) {
        assert_silence(output.channel(ch), FLOAT_EPSILON);
    }
}

#[test]
fn test_expanded_input_matches_zero_padded_base() {
    for expanded in SpeakerLayout::EXPANDED {
        let base = expanded.base_layout();
        let input = noise_buffer(expanded.channel_count(), 64, 3);

        let mut padded = AudioBuffer::new(base.channel_count(), 64);
        for (dst, src) in expanded.channel_map() {
            padded.channel_mut(dst).copy_from_slice(input.channel(src));
        }

        for output in SpeakerLayout::BEDS {
            let direct = render_once(expanded, output, &input);
            let via_base = render_once(base, output, &padded);
            let diff = max_difference(&direct, &via_base);
            assert!(diff < DSP_EPSILON, "{expanded} -> {output}: diff {diff}");
        }
    }
}

#[test]
fn test_bed_into_expanded_output_keeps_its_columns() {
    // 7.1.4 folded into the top-four subset keeps only the height feeds.
    let input = noise_buffer(12, 64, 5);
    let output = render_once(SpeakerLayout::Surround7_1_4, SpeakerLayout::ExplTop4, &input);
    assert_eq!(output.channels(), 4);
    for (o, ch) in (8..12).enumerate() {
        assert_eq!(output.channel(o), input.channel(ch));
    }
}

#[test]
fn test_channel_count_invariants() {
    for input in SpeakerLayout::BEDS.into_iter().chain(SpeakerLayout::EXPANDED) {
        for output in SpeakerLayout::BEDS {
            let renderer = create_renderer(input, output, 32, TEST_SAMPLE_RATE).unwrap();
            assert_eq!(renderer.input_layout().channel_count(), input.channel_count());
            assert_eq!(renderer.output_layout().channel_count(), output.channel_count());
        }
    }
}

#[test]
fn test_lfe_folds_into_single_lfe() {
    // 22.2 carries two LFEs; both sum into the single LFE of 5.1.
    let mut input = AudioBuffer::new(24, 16);
    input.channel_mut(3).fill(0.25);
    input.channel_mut(9).fill(0.5);
    let output = render_once(SpeakerLayout::Surround22_2, SpeakerLayout::Surround5_1, &input);
    assert_abs_diff_eq!(output.sample(3, 0), 0.75, epsilon = FLOAT_EPSILON);
}

#[test]
fn test_shorter_blocks_after_prepare() {
    let mut renderer = create_renderer(
        SpeakerLayout::ExplStereoRs,
        SpeakerLayout::Stereo,
        TEST_BLOCK_SIZE,
        TEST_SAMPLE_RATE,
    )
    .unwrap();
    for frames in [TEST_BLOCK_SIZE, 17, 1, TEST_BLOCK_SIZE / 2] {
        let input = noise_buffer(2, frames, frames as u64);
        let mut output = AudioBuffer::new(2, frames);
        renderer.render(&input, &mut output);
        assert_has_audio(output.channel(0), 0.01);
    }
}

proptest! {
    #[test]
    fn prop_transcode_is_linear(
        seed_a in 0u64..1000,
        seed_b in 0u64..1000,
        a in -2.0f32..2.0,
        pair in 0usize..110,
    ) {
        let beds = SpeakerLayout::BEDS;
        let input = beds[pair / 10];
        let output = beds
            .into_iter()
            .filter(|&l| l != input)
            .nth(pair % 10)
            .unwrap();

        let x = noise_buffer(input.channel_count(), 32, seed_a);
        let y = noise_buffer(input.channel_count(), 32, seed_b.wrapping_add(10_000));
        let mut mix = x.clone();
        mix.apply_gain(a);
        mix.add_from(&y, 1.0);

        let rx = render_once(input, output, &x);
        let ry = render_once(input, output, &y);
        let rmix = render_once(input, output, &mix);

        let mut expected = rx.clone();
        expected.apply_gain(a);
        expected.add_from(&ry, 1.0);
        prop_assert!(max_difference(&rmix, &expected) < 1e-3);
    }
}
