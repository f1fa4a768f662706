//! Integration tests for the SMQT transform
//!
//! These tests exercise the public API end to end and check the properties
//! every correct transform must hold: bounded output, determinism, channel
//! independence and agreement between traversal and scheduling strategies.

use rust_smqt::pipeline::{merge_rgba8, split_rgb8};
use rust_smqt::smqt::{mean, partition};
use rust_smqt::{
    Channel, ChannelBuffer, ChannelDispatcher, Execution, MAX_LEVEL, RgbChannels, SmqtEngine,
    SmqtError, Traversal, enhance, smqt_channel, smqt_rgb,
};

fn noisy_image(width: usize, height: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..width * height * 3)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect()
}

/// Walk the partition tree by hand and check completeness at every node
fn check_partitions(raw: &[u8], positions: &[usize], level: u8) -> usize {
    if level == 0 || positions.is_empty() {
        return 0;
    }
    let m = mean(positions, raw).unwrap();
    let split = partition(positions, raw, m).unwrap();

    let mut merged: Vec<usize> = split.low.iter().chain(&split.high).copied().collect();
    merged.sort_unstable();
    let mut expected = positions.to_vec();
    expected.sort_unstable();
    assert_eq!(merged, expected, "partition lost or duplicated positions");

    1 + check_partitions(raw, &split.high, level - 1) + check_partitions(raw, &split.low, level - 1)
}

#[test]
fn test_output_bounded_for_every_level() {
    let rgb = noisy_image(23, 17, 1);
    for level in 0..=MAX_LEVEL {
        let mut channels = split_rgb8(&rgb, 23, 17).unwrap();
        smqt_rgb(&mut channels, level).unwrap();
        let max = (1u16 << level) - 1;
        for channel in Channel::ALL {
            let output = channels.channel(channel).output();
            assert!(
                output.iter().all(|&v| u16::from(v) <= max),
                "{channel} exceeded {max} at level {level}"
            );
            if level == 0 {
                assert!(output.iter().all(|&v| v == 0));
            }
        }
    }
}

#[test]
fn test_partition_completeness_through_tree() {
    let rgb = noisy_image(40, 10, 9);
    let channels = split_rgb8(&rgb, 40, 10).unwrap();
    let raw = channels.green.raw();
    let nodes = check_partitions(raw, &channels.green.positions(), MAX_LEVEL);
    assert!(nodes > 1);
}

#[test]
fn test_transform_is_deterministic() {
    let rgb = noisy_image(31, 29, 5);
    let first = enhance(&rgb, 31, 29, 8).unwrap();
    let second = enhance(&rgb, 31, 29, 8).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_uniform_image_maps_to_black() {
    let rgb = vec![180u8; 12 * 9 * 3];
    for level in [1, 4, 8] {
        let rgba = enhance(&rgb, 12, 9, level).unwrap();
        assert!(
            rgba.chunks(4).all(|px| px == [0, 0, 0, 255]),
            "level {level}"
        );
    }
}

#[test]
fn test_single_pixel_image() {
    let rgba = enhance(&[10, 200, 255], 1, 1, 8).unwrap();
    assert_eq!(rgba, vec![0, 0, 0, 255]);
}

#[test]
fn test_strategies_agree() {
    let rgb = noisy_image(64, 48, 77);
    let reference = {
        let mut channels = split_rgb8(&rgb, 64, 48).unwrap();
        smqt_rgb(&mut channels, 8).unwrap();
        channels
    };

    for traversal in [Traversal::Recursive, Traversal::Stack] {
        for execution in [Execution::Parallel, Execution::Sequential] {
            let mut channels = split_rgb8(&rgb, 64, 48).unwrap();
            let engine = SmqtEngine::new(8).unwrap().with_traversal(traversal);
            ChannelDispatcher::new(engine)
                .with_execution(execution)
                .transform(&mut channels)
                .unwrap();
            assert_eq!(channels, reference, "{traversal:?} / {execution:?}");
        }
    }
}

#[test]
fn test_channel_order_does_not_matter() {
    let rgb = noisy_image(20, 20, 3);
    let mut together = split_rgb8(&rgb, 20, 20).unwrap();
    smqt_rgb(&mut together, 7).unwrap();

    // Transform channels one by one in reverse order
    let mut separate = split_rgb8(&rgb, 20, 20).unwrap();
    for channel in Channel::ALL.into_iter().rev() {
        smqt_channel(separate.channel_mut(channel), 7).unwrap();
    }
    assert_eq!(together, separate);
}

#[test]
fn test_contrast_stretches_narrow_range() {
    // Values squeezed into 120..=135 spread over the full 8-bit range
    let width = 16;
    let height = 16;
    let rgb: Vec<u8> = (0..width * height)
        .flat_map(|i| {
            let v = 120 + (i % 16) as u8;
            [v, v, v]
        })
        .collect();
    let mut channels = split_rgb8(&rgb, width, height).unwrap();
    smqt_rgb(&mut channels, 8).unwrap();

    let output = channels.red.output();
    let min = *output.iter().min().unwrap();
    let max = *output.iter().max().unwrap();
    assert_eq!(min, 0);
    assert!(max >= 240, "max was {max}");

    let rgba = merge_rgba8(&channels);
    assert_eq!(rgba.len(), width * height * 4);
}

#[test]
fn test_invalid_inputs() {
    assert!(matches!(
        ChannelBuffer::new(0),
        Err(SmqtError::InvalidSize { size: 0 })
    ));
    assert!(matches!(
        RgbChannels::new(4, 0),
        Err(SmqtError::InvalidSize { .. })
    ));
    assert!(matches!(
        SmqtEngine::new(MAX_LEVEL + 1),
        Err(SmqtError::InvalidLevel { .. })
    ));
}
