mod error;
pub mod operations;
pub mod providers;
pub mod traits;

#[cfg(test)]
pub(crate) mod mocks;

pub use error::{OperationError, Result, SubprocessError};
