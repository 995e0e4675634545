mod scale;

pub use scale::{BASELINE_DPI, DisplayScale, ScaleSource, to_logical, to_physical};
