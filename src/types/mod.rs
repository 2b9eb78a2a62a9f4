pub mod rating;
pub mod result;
pub mod stats;
pub mod trend;

pub use rating::*;
pub use result::*;
pub use stats::*;
pub use trend::*;
