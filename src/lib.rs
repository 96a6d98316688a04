//! # Kusari (鎖)
//!
//! A lightweight and simple chain execution engine for Rust.
//!
//! The name "Kusari" (鎖) means "chain" in Japanese: an ordered sequence of
//! links, each doing one unit of work against a shared payload, forged
//! together into a single run.
//!
//! ## Features
//!
//! - **Type-safe**: the [`LinkName`] newtype and a payload-typed
//!   [`LinkRegistry`] prevent typos and mismatched links at compile time
//! - **Async First**: built with `async-trait`; links run strictly in order
//!   on the calling task
//! - **Failure Policy**: [`Configuration`] decides whether a failing link
//!   halts the chain or earns bounded retries
//! - **In-band Cancellation**: any link can stop the chain cleanly through
//!   its [`DataCargo`]
//! - **Callbacks**: completion and error notification hooks on the chain
//! - **Error Handling**: structured errors with `thiserror`, contained
//!   inside `run`
//! - **Lightweight**: minimal dependencies, focused on core chain mechanics
//!
//! ## Quick Start
//!
//! ```rust
//! use kusari::prelude::*;
//! use async_trait::async_trait;
//!
//! define_link!(LoadDataLink);
//!
//! #[async_trait]
//! impl Link<String> for LoadDataLink {
//!     async fn execute(&self, cargo: &mut DataCargo<String>) -> Result<(), ChainError> {
//!         cargo.payload_mut().push_str("Hello, Kusari!");
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut chain = Chain::builder()
//!     .add_link(LoadDataLink)
//!     .build()
//!     .expect("valid chain");
//!
//! chain.run().await;
//!
//! assert_eq!(chain.payload(), "Hello, Kusari!");
//! # }
//! ```
//!
//! ## Inline Links and Callbacks
//!
//! Closures can be appended directly, and the chain notifies completion with
//! the final payload:
//!
//! ```rust
//! use kusari::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut chain = Chain::builder_with(2_i64)
//!     .add_fn(|cargo| {
//!         *cargo.payload_mut() *= 10;
//!         Ok(())
//!     })
//!     .add_fn(|cargo| {
//!         *cargo.payload_mut() += 1;
//!         Ok(())
//!     })
//!     .build()
//!     .expect("valid chain");
//!
//! chain.on_completed(|total| println!("chain finished with {total}"));
//! chain.run().await;
//!
//! assert_eq!(*chain.payload(), 21);
//! # }
//! ```
//!
//! ## Failure Policy
//!
//! By default any failing link halts the chain. With retries configured, a
//! failing link gets a bounded number of attempts before the chain gives up;
//! the error callback fires once per failing attempt:
//!
//! ```rust
//! use kusari::prelude::*;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let calls = Arc::new(AtomicU32::new(0));
//! let counter = Arc::clone(&calls);
//!
//! let mut chain = Chain::builder_with(String::new())
//!     .config(Configuration::retry(3))
//!     .add_fn(move |cargo| {
//!         // Succeeds on the third attempt.
//!         if counter.fetch_add(1, Ordering::SeqCst) < 2 {
//!             return Err(ChainError::LinkFailed {
//!                 link_name: LinkName::new("Flaky"),
//!                 details: "transient".to_string(),
//!             });
//!         }
//!         cargo.payload_mut().push_str("recovered");
//!         Ok(())
//!     })
//!     .build()
//!     .expect("valid chain");
//!
//! chain.on_error(|_payload, error| eprintln!("attempt failed: {error}"));
//! chain.run().await;
//!
//! assert_eq!(chain.payload(), "recovered");
//! # }
//! ```
//!
//! ## Name-Based Links
//!
//! Link types register into a [`LinkRegistry`] and are appended by name; an
//! unknown name fails at `build()`, before the chain ever runs:
//!
//! ```rust
//! use kusari::prelude::*;
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! define_link!(TrimLink);
//!
//! #[async_trait]
//! impl Link<String> for TrimLink {
//!     async fn execute(&self, cargo: &mut DataCargo<String>) -> Result<(), ChainError> {
//!         let trimmed = cargo.payload().trim().to_string();
//!         *cargo.payload_mut() = trimmed;
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let registry = Arc::new(LinkRegistry::new().register::<TrimLink>());
//!
//! let mut chain = Chain::builder_with("  padded  ".to_string())
//!     .registry(registry)
//!     .add_link_by_name("TrimLink")
//!     .build()
//!     .expect("valid chain");
//!
//! chain.run().await;
//! assert_eq!(chain.payload(), "padded");
//! # }
//! ```

mod cargo;
mod chain;
mod config;
mod error;
mod link;
mod registry;

pub mod prelude;

pub use cargo::DataCargo;
pub use chain::{Chain, ChainBuilder};
pub use config::Configuration;
pub use error::ChainError;
pub use link::{FnLink, Link, LinkName};
pub use registry::LinkRegistry;

/// Macro to define a link with minimal boilerplate
///
/// This macro creates a link struct with:
/// - `const NAME: &'static str` - compile-time link name
/// - `Debug` derive
/// - `Default` implementation (required for registry registration)
///
/// # Example
///
/// ```rust
/// use kusari::define_link;
///
/// define_link!(MyLink);
/// assert_eq!(MyLink::NAME, "MyLink");
/// ```
#[macro_export]
macro_rules! define_link {
    ($name:ident) => {
        #[derive(Debug)]
        pub struct $name;

        impl $name {
            /// Link name as a compile-time constant
            #[allow(dead_code)]
            pub const NAME: &'static str = stringify!($name);
        }

        impl Default for $name {
            fn default() -> Self {
                Self
            }
        }
    };
}
