#[allow(dead_code)]
mod common;

use std::path::Path;

use cinestack_core::error::CinestackError;
use cinestack_core::io::loader::{list_images, load_stack, LoadOptions};
use cinestack_core::progress::NoOpReporter;

use common::{numbered_image_dir, source_index};

fn options(
    start: Option<usize>,
    stop: Option<usize>,
    step: Option<usize>,
    count: Option<usize>,
) -> LoadOptions {
    LoadOptions {
        start,
        stop,
        step,
        count,
    }
}

#[test]
fn test_default_selection_takes_everything() {
    let indices = LoadOptions::default().selected_indices(10).unwrap();
    assert_eq!(indices, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_explicit_step() {
    let indices = options(None, None, Some(3), None).selected_indices(10).unwrap();
    assert_eq!(indices, vec![0, 3, 6, 9]);
}

#[test]
fn test_count_derives_step() {
    // span 10, count 3: step = round(10/3) = 3
    let indices = options(None, None, None, Some(3)).selected_indices(10).unwrap();
    assert_eq!(indices, vec![0, 3, 6, 9]);

    // span 10, count 5: step = 2, exactly 5 frames
    let indices = options(None, None, None, Some(5)).selected_indices(10).unwrap();
    assert_eq!(indices, vec![0, 2, 4, 6, 8]);
}

#[test]
fn test_count_step_rounds_ties_to_even() {
    // span 10, count 4: 10/4 = 2.5 rounds to 2, not 3
    let indices = options(None, None, None, Some(4)).selected_indices(10).unwrap();
    assert_eq!(indices, vec![0, 2, 4, 6, 8]);

    // span 15, count 2: 15/2 = 7.5 rounds to 8
    let indices = options(None, None, None, Some(2)).selected_indices(15).unwrap();
    assert_eq!(indices, vec![0, 8]);
}

#[test]
fn test_count_beats_explicit_step() {
    let indices = options(None, None, Some(1), Some(2))
        .selected_indices(10)
        .unwrap();
    assert_eq!(indices, vec![0, 5]);
}

#[test]
fn test_count_zero_rejected() {
    let err = options(None, None, None, Some(0))
        .selected_indices(10)
        .unwrap_err();
    assert!(matches!(err, CinestackError::InvalidParameter(_)));
}

#[test]
fn test_count_above_span_rejected() {
    // span 4, count 10: step rounds to 0
    let err = options(None, Some(4), None, Some(10))
        .selected_indices(10)
        .unwrap_err();
    assert!(matches!(err, CinestackError::InvalidParameter(_)));
}

#[test]
fn test_missing_directory() {
    let err = list_images(Path::new("/nonexistent/run42"), "tif").unwrap_err();
    assert!(matches!(err, CinestackError::DirectoryNotFound(_)));
}

#[test]
fn test_suffix_leading_dot_ignored() {
    let dir = numbered_image_dir(3, "tif");
    let plain = list_images(dir.path(), "tif").unwrap();
    let dotted = list_images(dir.path(), ".tif").unwrap();
    assert_eq!(plain, dotted);
    assert_eq!(plain.len(), 3);
}

#[test]
fn test_listing_is_sorted_and_filtered() {
    let dir = numbered_image_dir(5, "tif");
    std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

    let paths = list_images(dir.path(), "tif").unwrap();
    assert_eq!(paths.len(), 5);
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);
}

#[test]
fn test_load_stack_subsamples() {
    let dir = numbered_image_dir(10, "tif");
    let stack = load_stack(
        dir.path(),
        "tif",
        &options(Some(2), Some(8), Some(2), None),
        &NoOpReporter,
    )
    .unwrap();

    assert_eq!(stack.len(), 3);
    let loaded: Vec<usize> = stack.iter().map(source_index).collect();
    assert_eq!(loaded, vec![2, 4, 6]);
}

#[test]
fn test_load_stack_count() {
    let dir = numbered_image_dir(12, "tif");
    let stack = load_stack(
        dir.path(),
        "tif",
        &options(None, None, None, Some(4)),
        &NoOpReporter,
    )
    .unwrap();

    // step = round(12/4) = 3
    let loaded: Vec<usize> = stack.iter().map(source_index).collect();
    assert_eq!(loaded, vec![0, 3, 6, 9]);
}

#[test]
fn test_stop_past_end_rejected() {
    let dir = numbered_image_dir(4, "tif");
    let err = load_stack(
        dir.path(),
        "tif",
        &options(None, Some(9), None, None),
        &NoOpReporter,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CinestackError::FrameIndexOutOfRange { index: 4, total: 4 }
    ));
}

#[test]
fn test_decode_failure_aborts_load() {
    let dir = numbered_image_dir(3, "tif");
    // Overwrite the middle file with bytes no decoder accepts.
    std::fs::write(dir.path().join("img_001.tif"), b"not a tiff").unwrap();

    let err = load_stack(dir.path(), "tif", &LoadOptions::default(), &NoOpReporter)
        .unwrap_err();
    assert!(matches!(err, CinestackError::ImageError(_)));
}

#[test]
fn test_empty_selection_rejected() {
    let dir = numbered_image_dir(4, "tif");
    let err = load_stack(
        dir.path(),
        "tif",
        &options(Some(2), Some(2), None, None),
        &NoOpReporter,
    )
    .unwrap_err();
    assert!(matches!(err, CinestackError::EmptySequence));
}
