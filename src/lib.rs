pub mod counter;
pub mod error;
pub mod fuzz;
pub mod input;
pub mod interpreter;
pub mod log;
pub mod metrics;
pub mod program;
pub mod tape;
pub mod token;

pub use error::{Error, Result};
pub use interpreter::Interpreter;
