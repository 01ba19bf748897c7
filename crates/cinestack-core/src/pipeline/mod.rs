pub mod config;
mod runner;

pub use runner::{run_pipeline, PipelineReport};
