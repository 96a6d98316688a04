use crate::error::ChainError;
use crate::link::{Link, LinkName};
use std::collections::HashMap;
use std::fmt;

type LinkFactory<T> = Box<dyn Fn() -> Box<dyn Link<T>> + Send + Sync>;

/// Name-keyed registry of link factories, used by
/// [`ChainBuilder::add_link_by_name`](crate::ChainBuilder::add_link_by_name).
///
/// Links register explicitly, either by type (the name comes from
/// [`Link::default_name`]) or with an arbitrary name and factory closure.
/// Registering the same name twice keeps the last registration.
///
/// The registry is typed by the payload `T`, so only links compatible with
/// the chain's payload can ever be registered under it. Build it once, wrap
/// it in an [`Arc`](std::sync::Arc), and share it across chains; resolution
/// is read-only.
///
/// # Examples
///
/// ```
/// use kusari::prelude::*;
/// use async_trait::async_trait;
///
/// define_link!(GreetLink);
///
/// #[async_trait]
/// impl Link<String> for GreetLink {
///     async fn execute(&self, cargo: &mut DataCargo<String>) -> Result<(), ChainError> {
///         cargo.payload_mut().push_str("hello");
///         Ok(())
///     }
/// }
///
/// let registry = LinkRegistry::new().register::<GreetLink>();
/// assert!(registry.contains("GreetLink"));
/// ```
pub struct LinkRegistry<T> {
    factories: HashMap<LinkName, LinkFactory<T>>,
}

impl<T> fmt::Debug for LinkRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkRegistry")
            .field("links", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> Default for LinkRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LinkRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers a link type under its [`Link::default_name`].
    ///
    /// The type must be default-constructible; resolution builds a fresh
    /// instance per chain. If the name is already registered, this
    /// registration wins.
    pub fn register<L: Link<T> + Default + 'static>(self) -> Self {
        self.register_factory(L::default_name(), || Box::new(L::default()))
    }

    /// Registers a factory under an explicit name.
    ///
    /// If the name is already registered, this registration wins.
    pub fn register_factory(
        mut self,
        name: impl Into<LinkName>,
        factory: impl Fn() -> Box<dyn Link<T>> + Send + Sync + 'static,
    ) -> Self {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    /// Builds the link registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::LinkNotFound`] if the name is absent.
    pub fn resolve(&self, name: &LinkName) -> Result<Box<dyn Link<T>>, ChainError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ChainError::LinkNotFound(name.clone()))
    }

    /// Whether a link is registered under `name`.
    pub fn contains(&self, name: impl Into<LinkName>) -> bool {
        self.factories.contains_key(&name.into())
    }

    /// Iterates over the registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &LinkName> {
        self.factories.keys()
    }

    /// Number of registered links.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
