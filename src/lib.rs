pub mod assembly;
pub mod error;
pub mod export;
pub mod factory;
pub mod kernel;
pub mod math;
pub mod operations;
pub mod sampling;
pub mod scene;

pub use error::{CristalisError, Result};
