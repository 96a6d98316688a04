use crate::cargo::DataCargo;
use crate::error::ChainError;
use async_trait::async_trait;
use std::fmt;
use std::marker::PhantomData;

/// Type-safe link name wrapper.
///
/// Provides compile-time safety for link identifiers, preventing
/// typos and mismatched link names at the API level.
///
/// # Examples
///
/// ```
/// use kusari::LinkName;
///
/// let name = LinkName::new("ValidateOrder");
/// assert_eq!(name.as_str(), "ValidateOrder");
///
/// // From trait for ergonomic conversion
/// let name: LinkName = "EnrichOrder".into();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkName(String);

impl LinkName {
    /// Creates a new LinkName
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a LinkName from a type's name (extracts last segment)
    pub fn from_type_name<T: ?Sized>() -> Self {
        let full_name = std::any::type_name::<T>();
        let short_name = full_name.split("::").last().unwrap_or("UnknownLink");
        Self::new(short_name)
    }

    /// Returns the link name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LinkName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for LinkName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for LinkName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for LinkName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One unit of work in a chain, executed against the shared cargo.
///
/// Implement this trait to define custom links. A link receives the chain's
/// [`DataCargo`] by mutable reference, mutates the payload as needed, and
/// either returns `Ok(())`, returns an error (which feeds the chain's
/// retry/stop policy), or calls [`DataCargo::cancel`] to stop the chain
/// cleanly after itself.
///
/// Links carry no chain-ordering state of their own; the chain executes them
/// strictly in insertion order. They may carry their own configuration.
///
/// # Type Parameter
///
/// * `T` - The payload type flowing through the chain
///
/// # Examples
///
/// ```
/// use kusari::prelude::*;
/// use async_trait::async_trait;
///
/// define_link!(DoubleLink);
///
/// #[async_trait]
/// impl Link<i64> for DoubleLink {
///     async fn execute(&self, cargo: &mut DataCargo<i64>) -> Result<(), ChainError> {
///         *cargo.payload_mut() *= 2;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Link<T>: Send + Sync {
    /// Executes the link logic.
    ///
    /// # Arguments
    ///
    /// * `cargo` - Mutable reference to the chain's cargo for reading/writing
    ///   the payload and requesting cancellation
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Link finished; the chain continues (or halts cleanly if
    ///   the cargo's cancel flag was set)
    /// - `Err(error)` - Link failed (may trigger a retry based on the chain's
    ///   [`Configuration`](crate::Configuration))
    async fn execute(&self, cargo: &mut DataCargo<T>) -> Result<(), ChainError>;

    /// Returns the link name.
    ///
    /// By default, uses the type name. Override to provide a custom name.
    fn name(&self) -> LinkName {
        LinkName::from_type_name::<Self>()
    }

    /// Returns the default link name from the type.
    ///
    /// Used by [`LinkRegistry`](crate::LinkRegistry) when registering links
    /// by type.
    fn default_name() -> LinkName
    where
        Self: Sized,
    {
        LinkName::from_type_name::<Self>()
    }

    /// Formats link information for debugging.
    fn fmt_debug(&self) -> String {
        format!("Link '{}'", self.name())
    }
}

/// Adapter wrapping an inline closure as a [`Link`].
///
/// Built by [`ChainBuilder::add_fn`](crate::ChainBuilder::add_fn); also
/// usable directly when a closure link needs to go into a
/// [`LinkRegistry`](crate::LinkRegistry) factory.
///
/// # Examples
///
/// ```
/// use kusari::{DataCargo, FnLink, Link};
///
/// let link = FnLink::new(|cargo: &mut DataCargo<u32>| {
///     *cargo.payload_mut() += 1;
///     Ok(())
/// });
/// assert_eq!(link.name().as_str(), "FnLink");
/// ```
pub struct FnLink<T, F> {
    action: F,
    _payload: PhantomData<fn(T)>,
}

impl<T, F> FnLink<T, F>
where
    F: Fn(&mut DataCargo<T>) -> Result<(), ChainError> + Send + Sync,
{
    /// Wraps a closure as a link.
    pub fn new(action: F) -> Self {
        Self {
            action,
            _payload: PhantomData,
        }
    }
}

impl<T, F> fmt::Debug for FnLink<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnLink").finish_non_exhaustive()
    }
}

#[async_trait]
impl<T, F> Link<T> for FnLink<T, F>
where
    T: Send,
    F: Fn(&mut DataCargo<T>) -> Result<(), ChainError> + Send + Sync,
{
    async fn execute(&self, cargo: &mut DataCargo<T>) -> Result<(), ChainError> {
        (self.action)(cargo)
    }

    fn name(&self) -> LinkName {
        LinkName::new("FnLink")
    }
}
