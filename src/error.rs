use crate::link::LinkName;
use thiserror::Error;

/// Errors raised while building or running a chain.
///
/// Build-time variants ([`ChainError::LinkNotFound`], [`ChainError::NullLink`],
/// [`ChainError::Configuration`]) are returned synchronously from
/// [`ChainBuilder::build`](crate::ChainBuilder::build). Execution failures
/// ([`ChainError::LinkFailed`], or any variant returned by a link's
/// `execute`) never escape [`Chain::run`](crate::Chain::run): they are
/// reported through the error callback and drive the retry/stop policy.
///
/// # Non-Exhaustive
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code. When matching
/// on this error, always include a wildcard pattern:
///
/// ```
/// use kusari::{ChainError, LinkName};
///
/// fn handle_error(error: ChainError) {
///     match error {
///         ChainError::LinkFailed { link_name, details } => {
///             eprintln!("Link {} failed: {}", link_name, details);
///         }
///         ChainError::LinkNotFound(name) => {
///             eprintln!("Link {} not found", name);
///         }
///         ChainError::NullLink => {
///             eprintln!("A null link was appended");
///         }
///         ChainError::Configuration(msg) => {
///             eprintln!("Configuration error: {}", msg);
///         }
///         _ => eprintln!("Unknown error: {}", error),
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ChainError {
    /// A link failed during execution.
    ///
    /// The conventional variant for links to return from `execute`; the
    /// chain reports it to the error callback and applies the retry/stop
    /// policy.
    #[error("Link failed: {link_name}, details: {details}")]
    LinkFailed {
        /// The name of the link that failed
        link_name: LinkName,
        /// Details about the failure
        details: String,
    },

    /// A name-based link lookup found no registered link.
    ///
    /// Returned by `build()` when `add_link_by_name` referenced a name the
    /// attached [`LinkRegistry`](crate::LinkRegistry) does not contain (or
    /// no registry was attached at all).
    #[error("Link not found: {0}")]
    LinkNotFound(LinkName),

    /// An absent link was appended to the chain.
    ///
    /// Returned by `build()` when `add_link_boxed` was handed `None`.
    #[error("Chain link cannot be null")]
    NullLink,

    /// The chain configuration is invalid.
    #[error("Invalid chain configuration: {0}")]
    Configuration(String),
}
