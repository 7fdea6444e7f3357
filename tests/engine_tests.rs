//! End-to-end scenarios through the `segment` entry point.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use pixseg::{
    segment, segment_with_cancel, Algorithm, CancelToken, Error, QualityMetrics, SegmentOptions,
    NOISE,
};
use std::io::Cursor;

fn png_bytes(img: RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    png_bytes(RgbaImage::from_pixel(width, height, Rgba(rgba)))
}

/// 2x2 checkerboard: black diagonal, white anti-diagonal.
fn checkerboard_png() -> Vec<u8> {
    let mut img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
    img.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
    img.put_pixel(0, 1, Rgba([255, 255, 255, 255]));
    png_bytes(img)
}

fn same_size_options(width: u32, height: u32) -> SegmentOptions {
    SegmentOptions {
        target_width: width,
        target_height: height,
        seed: Some(42),
        ..Default::default()
    }
}

#[test]
fn solid_red_centroid_k1_is_one_full_cluster() {
    let bytes = solid_png(4, 4, [255, 0, 0, 255]);
    let result = segment(
        &bytes,
        Algorithm::Centroid { k: 1 },
        &same_size_options(4, 4),
    )
    .unwrap();

    assert_eq!(result.algorithm, "centroid");
    assert_eq!(result.cluster_count, 1);
    assert_eq!(result.stats.len(), 1);
    assert_eq!(result.stats[0].pixel_count, 16);
    assert!((result.stats[0].percentage - 100.0).abs() < 1e-4);
    assert_eq!(result.cluster_pngs.len(), 1);
    assert!(result.edge_map_png.is_none());
}

#[test]
fn checkerboard_density_separates_black_and_white() {
    // eps below the black-white color distance (~441) but above the weighted
    // spatial gaps; min_pts 2 so each color pair seeds a cluster.
    let result = segment(
        &checkerboard_png(),
        Algorithm::Density {
            eps: Some(50.0),
            min_pts: Some(2),
        },
        &same_size_options(2, 2),
    )
    .unwrap();

    assert_eq!(result.cluster_count, 2);
    let total_pixels: usize = result.stats.iter().map(|s| s.pixel_count).sum();
    assert_eq!(total_pixels, 4);
    for stat in &result.stats {
        assert_eq!(stat.pixel_count, 2);
    }
}

#[test]
fn checkerboard_density_tight_eps_never_merges_colors() {
    // min_pts above what either color can muster: everything is noise, but
    // black and white are still never merged into one cluster.
    let result = segment(
        &checkerboard_png(),
        Algorithm::Density {
            eps: Some(50.0),
            min_pts: Some(3),
        },
        &same_size_options(2, 2),
    )
    .unwrap();

    assert_eq!(result.cluster_count, 0);
    assert!(result.stats.is_empty());
}

#[test]
fn mode_seeking_two_tone_finds_two_clusters() {
    let mut img = RgbaImage::from_pixel(8, 8, Rgba([20, 20, 20, 255]));
    for y in 4..8 {
        for x in 0..8 {
            img.put_pixel(x, y, Rgba([230, 230, 230, 255]));
        }
    }
    let result = segment(
        &png_bytes(img),
        Algorithm::mode_seeking(),
        &same_size_options(8, 8),
    )
    .unwrap();

    assert_eq!(result.algorithm, "mode-seeking");
    assert_eq!(result.cluster_count, 2);
    let total: f32 = result.stats.iter().map(|s| s.percentage).sum();
    assert!((total - 100.0).abs() < 1e-3);
}

#[test]
fn percentages_sum_to_100_for_centroid() {
    let mut img = RgbaImage::from_pixel(6, 6, Rgba([200, 30, 30, 255]));
    for y in 0..6 {
        for x in 3..6 {
            img.put_pixel(x, y, Rgba([30, 30, 200, 255]));
        }
    }
    let result = segment(
        &png_bytes(img),
        Algorithm::Centroid { k: 2 },
        &same_size_options(6, 6),
    )
    .unwrap();

    let total: f32 = result.stats.iter().map(|s| s.percentage).sum();
    assert!((total - 100.0).abs() < 1e-3);
    let pixels: usize = result.stats.iter().map(|s| s.pixel_count).sum();
    assert_eq!(pixels, 36);
}

#[test]
fn seeded_runs_are_reproducible() {
    let bytes = checkerboard_png();
    let options = same_size_options(2, 2);
    let a = segment(&bytes, Algorithm::Centroid { k: 2 }, &options).unwrap();
    let b = segment(&bytes, Algorithm::Centroid { k: 2 }, &options).unwrap();
    assert_eq!(a.stats, b.stats);
    assert_eq!(a.segmented_png, b.segmented_png);
}

#[test]
fn result_images_decode_to_target_dimensions() {
    let bytes = solid_png(10, 10, [0, 120, 0, 255]);
    let options = SegmentOptions {
        target_width: 5,
        target_height: 7,
        edge_detection: true,
        seed: Some(1),
        ..Default::default()
    };
    let result = segment(&bytes, Algorithm::Centroid { k: 1 }, &options).unwrap();

    let segmented = image::load_from_memory(&result.segmented_png).unwrap();
    assert_eq!((segmented.width(), segmented.height()), (5, 7));
    let edges = image::load_from_memory(result.edge_map_png.as_ref().unwrap()).unwrap();
    assert_eq!((edges.width(), edges.height()), (5, 7));
}

#[test]
fn quality_metrics_are_the_documented_placeholders() {
    let bytes = solid_png(4, 4, [50, 50, 50, 255]);
    let result = segment(
        &bytes,
        Algorithm::Centroid { k: 1 },
        &same_size_options(4, 4),
    )
    .unwrap();
    assert_eq!(result.quality, QualityMetrics::PLACEHOLDER);
}

#[test]
fn pdf_input_is_rejected() {
    let err = segment(
        b"%PDF-1.4 fake document",
        Algorithm::centroid(),
        &SegmentOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedInput(_)));
}

#[test]
fn corrupt_input_is_a_decode_error() {
    let err = segment(
        b"\x89PNG\r\n\x1a\ntruncated",
        Algorithm::centroid(),
        &SegmentOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[test]
fn fired_cancel_token_aborts_without_result() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let bytes = solid_png(4, 4, [255, 0, 0, 255]);
    let err = segment_with_cancel(
        &bytes,
        Algorithm::Centroid { k: 1 },
        &same_size_options(4, 4),
        &cancel,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[test]
fn noise_label_is_distinct_from_cluster_ids() {
    // Sanity check on the public sentinel.
    assert_eq!(NOISE, usize::MAX);
}
