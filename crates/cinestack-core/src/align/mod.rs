pub mod background;
pub mod correlate;
