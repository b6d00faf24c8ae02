pub mod error;
pub mod span;

pub use error::{Result, SyntaxError};
pub use span::{Position, Span};
