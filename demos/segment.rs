//! Run all three algorithms on a small synthetic image and print the stats.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use pixseg::{segment, Algorithm, SegmentOptions, SegmentationResult};
use std::io::Cursor;

fn print_result(result: &SegmentationResult) {
    println!(
        "=== {} ({} clusters, {:.1?}) ===",
        result.algorithm, result.cluster_count, result.elapsed
    );
    for stat in &result.stats {
        println!(
            "  cluster {:2}: {:5} px ({:5.1}%) color {:?}",
            stat.cluster_id, stat.pixel_count, stat.percentage, stat.dominant_color
        );
    }
}

fn main() {
    // Three vertical color bands.
    let mut img = RgbaImage::from_pixel(30, 30, Rgba([220, 40, 40, 255]));
    for y in 0..30 {
        for x in 10..20 {
            img.put_pixel(x, y, Rgba([40, 200, 60, 255]));
        }
        for x in 20..30 {
            img.put_pixel(x, y, Rgba([40, 70, 220, 255]));
        }
    }
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();

    let options = SegmentOptions {
        target_width: 30,
        target_height: 30,
        seed: Some(42),
        ..Default::default()
    };

    for algorithm in [
        Algorithm::Centroid { k: 3 },
        Algorithm::density(),
        Algorithm::mode_seeking(),
    ] {
        let result = segment(&bytes, algorithm, &options).unwrap();
        print_result(&result);
    }
}
