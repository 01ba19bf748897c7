use cinestack_core::align::background::SubtractConfig;
use cinestack_core::error::CinestackError;
use cinestack_core::export::frames::FrameFormat;
use cinestack_core::pipeline::config::PipelineConfig;
use cinestack_core::pipeline::run_pipeline;
use cinestack_core::progress::NoOpReporter;

#[test]
fn test_default_config_round_trips_through_toml() {
    let config = PipelineConfig::default();
    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: PipelineConfig = toml::from_str(&text).unwrap();

    assert_eq!(parsed.suffix, "tif");
    let subtract = parsed.subtract.expect("default enables subtraction");
    assert_eq!(subtract.median_size, 3);
    assert_eq!(subtract.clip_percentiles, Some((0.1, 99.9)));
    assert!(!subtract.scan_all_offsets);
    assert!(subtract.equalize.is_none());

    let animate = parsed.animate.expect("default enables the animation");
    assert_eq!(animate.output.to_string_lossy(), "stack.gif");
    assert_eq!(animate.fps, 10);
    assert!(parsed.frames.is_none());
}

#[test]
fn test_minimal_toml_fills_defaults() {
    let text = r#"
input = "images"

[animate]
output = "movie.gif"
"#;
    let config: PipelineConfig = toml::from_str(text).unwrap();

    assert_eq!(config.input.to_string_lossy(), "images");
    assert_eq!(config.suffix, "tif");
    assert!(config.load.start.is_none());
    assert!(config.load.count.is_none());
    assert!(config.subtract.is_none());
    assert!(config.frames.is_none());

    let animate = config.animate.unwrap();
    assert_eq!(animate.fps, 10);
    assert!(animate.equalize.is_none());
}

#[test]
fn test_full_toml_parses_every_section() {
    let text = r#"
input = "run42"
suffix = "png"

[load]
start = 2
stop = 40
count = 10

[subtract]
median_size = 5
scan_all_offsets = true

[subtract.equalize]
clip_limit = 0.02

[frames]
output = "frames_out"
format = "tiff"

[frames.scale_bar]
dx = 1.5
units = "nm"

[frames.timestamp]
fps = 25.0
"#;
    let config: PipelineConfig = toml::from_str(text).unwrap();

    assert_eq!(config.suffix, "png");
    assert_eq!(config.load.start, Some(2));
    assert_eq!(config.load.stop, Some(40));
    assert_eq!(config.load.count, Some(10));

    let subtract = config.subtract.unwrap();
    assert_eq!(subtract.median_size, 5);
    assert!(subtract.scan_all_offsets);
    // Clipping stays on its documented default when the key is omitted.
    assert_eq!(subtract.clip_percentiles, Some((0.1, 99.9)));
    let equalize = subtract.equalize.unwrap();
    assert_eq!(equalize.clip_limit, 0.02);
    assert_eq!(equalize.tiles, (8, 8));
    assert_eq!(equalize.nbins, 256);

    let frames = config.frames.unwrap();
    assert_eq!(frames.format, FrameFormat::Tiff);
    let bar = frames.scale_bar.unwrap();
    assert_eq!(bar.units, "nm");
    assert_eq!(bar.length_fraction, 0.25);
    assert_eq!(frames.timestamp.unwrap().fps, 25.0);
}

#[test]
fn test_explicit_clip_percentiles_parse_as_pair() {
    let text = r#"
input = "images"

[subtract]
clip_percentiles = [5.0, 95.0]

[animate]
output = "movie.gif"
"#;
    let config: PipelineConfig = toml::from_str(text).unwrap();
    let subtract = config.subtract.unwrap();
    assert_eq!(subtract.clip_percentiles, Some((5.0, 95.0)));
}

#[test]
fn test_config_without_input_rejected() {
    let err = toml::from_str::<PipelineConfig>("suffix = \"png\"").unwrap_err();
    assert!(err.to_string().contains("input"), "unexpected error: {err}");
}

#[test]
fn test_pipeline_without_export_jobs_rejected() {
    let config = PipelineConfig {
        input: "does-not-exist".into(),
        subtract: Some(SubtractConfig::default()),
        animate: None,
        frames: None,
        ..PipelineConfig::default()
    };

    // Rejected before any filesystem access, so the bogus input never matters.
    let err = run_pipeline(&config, &NoOpReporter).unwrap_err();
    assert!(matches!(err, CinestackError::InvalidParameter(_)));
}
