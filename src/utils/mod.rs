pub mod buffer;
pub mod filters;
pub mod frames;
pub mod resample;
