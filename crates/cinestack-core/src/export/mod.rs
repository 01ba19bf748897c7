pub mod annotate;
pub mod font;
pub mod frames;
pub mod gif;
