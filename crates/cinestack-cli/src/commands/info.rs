use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use cinestack_core::consts::DEFAULT_SUFFIX;
use cinestack_core::io::image_io::load_image;
use cinestack_core::io::loader::list_images;

#[derive(Args)]
pub struct InfoArgs {
    /// Source image directory
    pub dir: PathBuf,

    /// Source file suffix
    #[arg(long, default_value = DEFAULT_SUFFIX)]
    pub suffix: String,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let paths = list_images(&args.dir, &args.suffix)?;

    println!("Directory:   {}", args.dir.display());
    println!("Images:      {}", paths.len());

    if let Some(first) = paths.first() {
        let frame = load_image(first)?;
        println!("Dimensions:  {}x{}", frame.width(), frame.height());
        println!("Bit depth:   {}", frame.original_bit_depth);
    }

    if !paths.is_empty() {
        println!();
        for (i, path) in paths.iter().enumerate() {
            println!(
                "{:>6}  {}",
                i,
                path.file_name().unwrap_or_default().to_string_lossy()
            );
        }
    }

    Ok(())
}
