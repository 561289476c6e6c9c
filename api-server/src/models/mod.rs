//! Data models

pub mod location;
pub mod prediction;
pub mod region;

pub use location::*;
pub use prediction::*;
pub use region::*;
