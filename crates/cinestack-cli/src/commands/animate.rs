use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cinestack_core::align::background::subtract_background;
use cinestack_core::export::gif::{save_gif, GifOptions};
use cinestack_core::filters::clahe::ClaheConfig;
use cinestack_core::io::loader::load_stack;

use crate::progress::ConsoleReporter;

use super::{CorrectionArgs, SourceArgs};

#[derive(Args)]
pub struct AnimateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub correction: CorrectionArgs,

    /// Playback frame rate
    #[arg(long, default_value = "10")]
    pub fps: u32,

    /// Output GIF path
    #[arg(short, long, default_value = "stack.gif")]
    pub output: PathBuf,
}

pub fn run(args: &AnimateArgs) -> Result<()> {
    let reporter = ConsoleReporter::new()?;
    let stack = load_stack(
        &args.source.dir,
        &args.source.suffix,
        &args.source.load_options(),
        &reporter,
    )?;
    println!(
        "Loaded {} frames ({}x{})",
        stack.len(),
        stack.width(),
        stack.height()
    );

    // With subtraction, equalization runs inside the correction; without,
    // it applies per frame at encoding time.
    let (stack, gif_equalize) = match args.correction.subtract_config()? {
        Some(config) => (subtract_background(&stack, &config, &reporter)?, None),
        None => (
            stack,
            args.correction.equalize.map(|clip_limit| ClaheConfig {
                clip_limit,
                ..Default::default()
            }),
        ),
    };

    let options = GifOptions {
        fps: args.fps,
        equalize: gif_equalize,
    };
    let path = save_gif(&stack, &args.output, &options, &reporter)?;
    println!("Saved to {}", path.display());
    Ok(())
}
