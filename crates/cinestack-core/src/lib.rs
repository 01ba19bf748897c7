pub mod error;
pub mod consts;
pub mod frame;
pub mod progress;
pub mod io;
pub mod filters;
pub mod align;
pub mod export;
pub mod pipeline;
