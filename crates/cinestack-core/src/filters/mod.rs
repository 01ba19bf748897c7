pub mod clahe;
pub mod histogram;
pub mod median;
