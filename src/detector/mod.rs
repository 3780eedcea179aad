//! Per-frame fundamental period search.
pub mod internals;
pub mod yin;

pub use internals::TauSearch;
pub use yin::{FramePitch, YINDetector};
