use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use exif_backfill::codec;
use exif_backfill::exif::MetadataContainer;
use exif_backfill::{batch, pipeline, resolver};

fn write_timestamped_jpeg(path: &Path, timestamp: &str) {
    let mut container = MetadataContainer::empty();
    container.set_capture_timestamp(timestamp);
    let img = image::RgbImage::new(8, 8);
    let bytes = codec::encode(&img, container.serialize(), path).unwrap();
    fs::write(path, bytes).unwrap();
}

fn write_transparent_png(path: &Path) {
    let mut img = RgbaImage::new(8, 8);
    for px in img.pixels_mut() {
        *px = Rgba([0, 0, 0, 0]);
    }
    img.save(path).unwrap();
}

// The worked example: a.jpg already timestamped, b.png bare, two workers.
#[test]
fn mixed_directory_end_to_end() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let a = input.path().join("a.jpg");
    let b = input.path().join("b.png");
    write_timestamped_jpeg(&a, "2020:01:01 00:00:00");
    write_transparent_png(&b);

    let records = pipeline::discover_images(input.path()).unwrap();
    let result = batch::run(&records, output.path(), 2, |_, _| {}).unwrap();

    assert_eq!(result.discovered, 2);
    assert_eq!(result.synthesized, 1);
    assert_eq!(result.copied, 1);
    assert_eq!(result.failed, 0);

    // a.jpg passes through byte-identically under its original name.
    let a_out = output.path().join("a.jpg");
    assert_eq!(fs::read(&a).unwrap(), fs::read(&a_out).unwrap());

    // b.png becomes b.jpg, carrying a timestamp equal to its modified time.
    let b_out = output.path().join("b.jpg");
    assert!(b_out.is_file());
    let expected =
        resolver::format_timestamp(fs::metadata(&b).unwrap().modified().unwrap());
    let container = MetadataContainer::read(&b_out);
    assert_eq!(container.capture_timestamp(), Some(expected.as_str()));

    // Transparent pixels land on white in the re-encoded JPEG.
    let decoded = image::open(&b_out).unwrap().into_rgb8();
    let px = decoded.get_pixel(4, 4);
    assert!(px[0] > 250 && px[1] > 250 && px[2] > 250, "got {px:?}");
}

#[test]
fn rerun_reprocesses_everything_from_scratch() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_timestamped_jpeg(&input.path().join("a.jpg"), "2021:06:01 12:00:00");

    let records = pipeline::discover_images(input.path()).unwrap();
    let first = batch::run(&records, output.path(), 1, |_, _| {}).unwrap();
    let second = batch::run(&records, output.path(), 1, |_, _| {}).unwrap();

    assert_eq!(first, second);
    assert_eq!(second.copied, 1);
}

#[test]
fn synthesized_output_survives_its_own_second_pass() {
    // Once a timestamp is backfilled, a later run over the outputs must
    // classify them as already timestamped.
    let input = TempDir::new().unwrap();
    let mid = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    image::RgbImage::new(8, 8)
        .save(input.path().join("fresh.jpg"))
        .unwrap();

    let records = pipeline::discover_images(input.path()).unwrap();
    let first = batch::run(&records, mid.path(), 1, |_, _| {}).unwrap();
    assert_eq!(first.synthesized, 1);

    let records = pipeline::discover_images(mid.path()).unwrap();
    let second = batch::run(&records, out.path(), 1, |_, _| {}).unwrap();
    assert_eq!(second.copied, 1);
    assert_eq!(second.synthesized, 0);

    // Copy-through leaves the file byte-identical.
    assert_eq!(
        fs::read(mid.path().join("fresh.jpg")).unwrap(),
        fs::read(out.path().join("fresh.jpg")).unwrap()
    );
}

#[test]
fn corrupt_sibling_does_not_abort_the_batch() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    for i in 0..4 {
        image::RgbImage::new(8, 8)
            .save(input.path().join(format!("ok{i}.jpg")))
            .unwrap();
    }
    fs::write(input.path().join("bad.jpg"), b"not a jpeg").unwrap();

    let records = pipeline::discover_images(input.path()).unwrap();
    let result = batch::run(&records, output.path(), 4, |_, _| {}).unwrap();

    assert_eq!(result.discovered, 5);
    assert_eq!(result.synthesized, 4);
    assert_eq!(result.failed, 1);
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 4);
}
