//! Commonly used types and traits

pub use crate::cargo::DataCargo;
pub use crate::chain::{Chain, ChainBuilder};
pub use crate::config::Configuration;
pub use crate::define_link;
pub use crate::error::ChainError;
pub use crate::link::{Link, LinkName};
pub use crate::registry::LinkRegistry;
