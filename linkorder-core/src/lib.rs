pub mod archive;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod error;
pub mod linker;
pub mod ordering;
pub mod resolver;
pub mod symbols;

pub use archive::*;
pub use config::*;
pub use discovery::*;
pub use domain::*;
pub use error::*;
pub use linker::*;
pub use ordering::*;
pub use resolver::*;
pub use symbols::*;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

#[cfg(test)]
mod tests;
