mod domain;
mod error;
mod range;
mod types;


pub use domain::*;
pub use error::*;
pub use range::*;
pub use types::*;


/// Position of a source within a driver, in registration order.
pub type SourceIndex = usize;
