use cinestack_core::pipeline::config::PipelineConfig;
use cinestack_core::pipeline::PipelineReport;
use console::Style;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_pipeline_summary(config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Cinestack Pipeline"));
    println!(
        "  {}",
        s.title
            .apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}")
    );
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Suffix"),
        s.value.apply_to(&config.suffix)
    );
    if config.load.start.is_some()
        || config.load.stop.is_some()
        || config.load.step.is_some()
        || config.load.count.is_some()
    {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Selection"),
            s.value.apply_to(format!(
                "start={} stop={} step={} count={}",
                option_text(config.load.start),
                option_text(config.load.stop),
                option_text(config.load.step),
                option_text(config.load.count),
            ))
        );
    }
    println!();

    if let Some(ref subtract) = config.subtract {
        println!("  {}", s.header.apply_to("Subtraction"));
        println!(
            "    {:<12}{}",
            s.label.apply_to("Median"),
            s.value.apply_to(format!("{} px", subtract.median_size))
        );
        match subtract.clip_percentiles {
            Some((lo, hi)) => println!(
                "    {:<12}{}",
                s.label.apply_to("Clip"),
                s.value.apply_to(format!("[{lo}, {hi}] %"))
            ),
            None => println!(
                "    {:<12}{}",
                s.label.apply_to("Clip"),
                s.disabled.apply_to("disabled")
            ),
        }
        match subtract.equalize {
            Some(ref clahe) => println!(
                "    {:<12}{}",
                s.label.apply_to("Equalize"),
                s.method.apply_to(format!("clahe (limit {})", clahe.clip_limit))
            ),
            None => println!(
                "    {:<12}{}",
                s.label.apply_to("Equalize"),
                s.disabled.apply_to("disabled")
            ),
        }
        println!(
            "    {:<12}{}",
            s.label.apply_to("Window"),
            s.method.apply_to(if subtract.scan_all_offsets {
                "all offsets"
            } else {
                "last frame"
            })
        );
    } else {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Subtraction"),
            s.disabled.apply_to("disabled")
        );
    }
    println!();

    if let Some(ref animate) = config.animate {
        println!("  {}", s.header.apply_to("Animate"));
        println!(
            "    {:<12}{}",
            s.label.apply_to("Output"),
            s.path.apply_to(animate.output.display())
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Rate"),
            s.value.apply_to(format!("{} fps", animate.fps))
        );
    } else {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Animate"),
            s.disabled.apply_to("disabled")
        );
    }
    println!();

    if let Some(ref frames) = config.frames {
        println!("  {}", s.header.apply_to("Frames"));
        println!(
            "    {:<12}{}",
            s.label.apply_to("Output"),
            s.path.apply_to(frames.output.display())
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Format"),
            s.method.apply_to(format!("{:?}", frames.format).to_lowercase())
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Scale bar"),
            match frames.scale_bar {
                Some(ref bar) =>
                    s.value.apply_to(format!("{} {} per px", bar.dx, bar.units)),
                None => s.disabled.apply_to("disabled".to_string()),
            }
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Timestamp"),
            match frames.timestamp {
                Some(ref stamp) => s.value.apply_to(format!("{} fps", stamp.fps)),
                None => s.disabled.apply_to("disabled".to_string()),
            }
        );
    } else {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Frames"),
            s.disabled.apply_to("disabled")
        );
    }
    println!();
}

pub fn print_report(report: &PipelineReport) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(report.frames)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Dimensions"),
        s.value
            .apply_to(format!("{}x{}", report.width, report.height))
    );
    if let Some(ref path) = report.animation {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Animation"),
            s.path.apply_to(path.display())
        );
    }
    if !report.frame_files.is_empty() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Images"),
            s.value.apply_to(report.frame_files.len())
        );
    }
}

fn option_text(value: Option<usize>) -> String {
    value.map_or_else(|| "auto".to_string(), |v| v.to_string())
}
