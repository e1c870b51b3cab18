pub mod client;
pub mod enhance;
pub mod wire;

mod deadline;
mod error;

pub use client::IndexClient;
pub use deadline::Deadline;
pub use enhance::EnhanceClient;
pub use error::{Error, Result};
