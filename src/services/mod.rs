pub mod rtsi;

pub use rtsi::{CalculationCounter, RtsiCalculator};
