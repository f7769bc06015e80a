mod registration;
mod stats;

pub use registration::*;
pub use stats::*;
