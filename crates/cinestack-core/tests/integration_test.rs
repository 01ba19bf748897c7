#[allow(dead_code)]
mod common;

use tempfile::TempDir;

use cinestack_core::align::background::{subtract_background, SubtractConfig};
use cinestack_core::align::correlate::compute_offset;
use cinestack_core::export::frames::{export_frames, FrameExportOptions, FrameFormat};
use cinestack_core::export::gif::{save_gif, GifOptions};
use cinestack_core::io::image_io::{load_image, save_tiff};
use cinestack_core::io::loader::{load_stack, LoadOptions};
use cinestack_core::pipeline::config::{AnimateJob, FramesJob, PipelineConfig};
use cinestack_core::pipeline::run_pipeline;
use cinestack_core::progress::NoOpReporter;

/// Write a directory of numbered TIFFs holding a bright square that drifts
/// by one pixel per frame along both axes.
fn write_drifting_dir(num_frames: usize) -> (TempDir, std::path::PathBuf) {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("stack");
    std::fs::create_dir(&dir).unwrap();

    for i in 0..num_frames {
        let frame = common::square_frame(64, 64, 20 + i, 20 + i, 12, 1.0, 0.0);
        save_tiff(&frame, &dir.join(format!("img_{i:03}.tif"))).unwrap();
    }
    (tmp, dir)
}

fn bare_subtract() -> SubtractConfig {
    SubtractConfig {
        median_size: 1,
        clip_percentiles: None,
        scan_all_offsets: false,
        equalize: None,
    }
}

#[test]
fn test_full_pipeline_end_to_end() {
    let (tmp, input) = write_drifting_dir(6);
    let out = tmp.path().join("out");
    std::fs::create_dir(&out).unwrap();

    let config = PipelineConfig {
        input,
        subtract: Some(bare_subtract()),
        animate: Some(AnimateJob {
            output: out.join("movie.gif"),
            ..AnimateJob::default()
        }),
        frames: Some(FramesJob {
            output: out.join("shots"),
            ..FramesJob::default()
        }),
        ..PipelineConfig::default()
    };

    let result = run_pipeline(&config, &NoOpReporter);
    assert!(result.is_ok(), "pipeline failed: {:?}", result.err());
    let report = result.unwrap();

    // Drift of (5, 5) on the last of 6 frames sets the output window.
    assert_eq!(report.frames, 6);
    assert_eq!(report.height, 59);
    assert_eq!(report.width, 59);

    let gif = report.animation.expect("animation was configured");
    assert_eq!(gif, out.join("movie.gif"));
    assert!(gif.is_file());

    assert_eq!(report.frame_files.len(), 6);
    assert_eq!(report.frame_files[0], out.join("shots").join("shots_0.png"));

    let reloaded = load_image(&report.frame_files[0]).unwrap();
    assert_eq!(reloaded.height(), 59);
    assert_eq!(reloaded.width(), 59);
}

#[test]
fn test_pipeline_without_subtraction() {
    let (tmp, input) = write_drifting_dir(4);
    let gif_path = tmp.path().join("raw.gif");

    let config = PipelineConfig {
        input,
        subtract: None,
        animate: Some(AnimateJob {
            output: gif_path.clone(),
            ..AnimateJob::default()
        }),
        frames: None,
        ..PipelineConfig::default()
    };

    let report = run_pipeline(&config, &NoOpReporter).unwrap();

    // Frames pass through at their source dimensions.
    assert_eq!(report.frames, 4);
    assert_eq!(report.height, 64);
    assert_eq!(report.width, 64);
    assert!(gif_path.is_file());
    assert!(report.frame_files.is_empty());
}

#[test]
fn test_manual_pipeline_steps() {
    // Step-by-step composition of the stages the runner wires together.
    let (tmp, input) = write_drifting_dir(6);

    let stack = load_stack(&input, "tif", &LoadOptions::default(), &NoOpReporter).unwrap();
    assert_eq!(stack.len(), 6);
    assert_eq!(stack.height(), 64);

    let offset = compute_offset(stack.get(0).unwrap(), stack.get(5).unwrap()).unwrap();
    assert_eq!(offset.magnitudes(), (5, 5));

    let corrected = subtract_background(&stack, &bare_subtract(), &NoOpReporter).unwrap();
    assert_eq!(corrected.height(), 59);
    assert_eq!(corrected.width(), 59);

    let gif = save_gif(
        &corrected,
        &tmp.path().join("manual"),
        &GifOptions::default(),
        &NoOpReporter,
    )
    .unwrap();
    assert!(gif.is_file());

    let options = FrameExportOptions {
        format: FrameFormat::Tiff,
        annotate: None,
    };
    let written = export_frames(&corrected, &tmp.path().join("tiffs"), &options, &NoOpReporter)
        .unwrap();
    assert_eq!(written.len(), 6);

    let reloaded = load_image(&written[0]).unwrap();
    assert_eq!(reloaded.original_bit_depth, 16);
    assert_eq!(reloaded.height(), 59);
    assert_eq!(reloaded.width(), 59);
}
