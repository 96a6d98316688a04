use crate::cargo::DataCargo;
use crate::config::Configuration;
use crate::error::ChainError;
use crate::link::{FnLink, Link, LinkName};
use crate::registry::LinkRegistry;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

type CompletedCallback<T> = Box<dyn Fn(&T) + Send + Sync>;
type ErrorCallback<T> = Box<dyn Fn(&T, &ChainError) + Send + Sync>;

/// Outcome of running one link to completion of its retry budget.
enum LinkOutcome {
    /// The link finished; move on to the next one.
    Continue,
    /// The link requested cancellation; halt without failure.
    Cancelled,
    /// The link failed and the policy forbids going on; halt.
    Failed,
}

/// An ordered sequence of links executed against one payload.
///
/// Built through [`ChainBuilder`]; see the crate docs for a walkthrough.
/// `run` executes the links strictly in insertion order on the calling task,
/// applying the chain's [`Configuration`] when a link fails. Because `run`
/// takes `&mut self`, two runs of the same chain can never overlap.
pub struct Chain<T> {
    links: Vec<Box<dyn Link<T>>>,
    cargo: DataCargo<T>,
    config: Configuration,
    on_completed: Option<CompletedCallback<T>>,
    on_error: Option<ErrorCallback<T>>,
}

impl<T> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field(
                "links",
                &self.links.iter().map(|link| link.name()).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}

impl<T> Chain<T> {
    /// Starts a builder with a default-constructed payload.
    pub fn builder() -> ChainBuilder<T>
    where
        T: Default,
    {
        ChainBuilder::new()
    }

    /// Starts a builder with an explicit payload.
    pub fn builder_with(payload: T) -> ChainBuilder<T> {
        ChainBuilder::with_payload(payload)
    }

    /// Registers the completion callback, replacing any prior one.
    ///
    /// The callback fires exactly once per `run`, with the final payload,
    /// when every link finished without cancellation or unrecovered failure.
    pub fn on_completed(&mut self, action: impl Fn(&T) + Send + Sync + 'static) -> &mut Self {
        self.on_completed = Some(Box::new(action));
        self
    }

    /// Registers the error callback, replacing any prior one.
    ///
    /// The callback fires once per failing attempt, with the payload as of
    /// the failure and the error the link returned. It is a notification
    /// only; it does not alter the retry/stop decision.
    pub fn on_error(
        &mut self,
        action: impl Fn(&T, &ChainError) + Send + Sync + 'static,
    ) -> &mut Self {
        self.on_error = Some(Box::new(action));
        self
    }

    /// Returns a shared reference to the payload.
    pub fn payload(&self) -> &T {
        self.cargo.payload()
    }

    /// Consumes the chain and returns the payload.
    pub fn into_payload(self) -> T {
        self.cargo.into_payload()
    }

    /// Executes the chain once.
    ///
    /// Links run strictly sequentially, each wrapped in the retry/stop
    /// decision of the chain's [`Configuration`]. Execution failures never
    /// propagate out of `run`: the only observable signals are the error
    /// callback having fired and the completion callback staying silent.
    ///
    /// `run` may be called again on the same chain; the cargo is not reset
    /// between calls, so payload state carries over.
    pub async fn run(&mut self) {
        for index in 0..self.links.len() {
            match self.run_link(index).await {
                LinkOutcome::Continue => {}
                LinkOutcome::Cancelled => {
                    info!("Chain cancelled by link '{}'", self.links[index].name());
                    return;
                }
                LinkOutcome::Failed => {
                    warn!("Chain halted at link '{}'", self.links[index].name());
                    return;
                }
            }
        }

        info!("Chain completed");
        if let Some(action) = &self.on_completed {
            action(self.cargo.payload());
        }
    }

    /// Runs one link through its retry budget, as a bounded loop.
    ///
    /// The attempt counter starts at 0. Before every attempt the cargo's
    /// cancel flag is cleared; cargo state is otherwise carried between
    /// attempts, not rolled back.
    async fn run_link(&mut self, index: usize) -> LinkOutcome {
        let mut attempt: u32 = 0;
        loop {
            self.cargo.clear_cancel();
            let link = &self.links[index];
            match link.execute(&mut self.cargo).await {
                Ok(()) => {
                    info!("Link '{}' completed successfully", link.name());
                    if self.cargo.is_cancelled() {
                        return LinkOutcome::Cancelled;
                    }
                    return LinkOutcome::Continue;
                }
                Err(error) => {
                    warn!(
                        "Link '{}' failed on attempt {}: {}",
                        link.name(),
                        attempt,
                        error
                    );
                    if let Some(action) = &self.on_error {
                        action(self.cargo.payload(), &error);
                    }
                    if self.grants_retry(attempt) {
                        attempt += 1;
                        continue;
                    }
                    return LinkOutcome::Failed;
                }
            }
        }
    }

    /// Whether a failing attempt earns another one.
    ///
    /// Retries happen only when the chain does not stop on failure, a retry
    /// budget is configured, and the budget is not yet spent. Note that
    /// `stop_on_failure = false` with `repeat_times_on_failure = 0` still
    /// halts on the first failure: with no budget there is nothing to spend.
    fn grants_retry(&self, attempt: u32) -> bool {
        !self.config.stop_on_failure
            && self.config.repeat_times_on_failure > 0
            && attempt < self.config.repeat_times_on_failure - 1
    }
}

/// Entry recorded by the builder, resolved when `build` is called.
enum LinkEntry<T> {
    Instance(Box<dyn Link<T>>),
    Named(LinkName),
    Null,
}

/// Fluent builder for [`Chain`].
///
/// Links are appended during the build phase, directly, as closures, or by
/// registry name; name resolution happens once, inside [`build`], so a
/// missing name fails before `run` is ever called.
///
/// [`build`]: ChainBuilder::build
pub struct ChainBuilder<T> {
    payload: T,
    config: Configuration,
    registry: Option<Arc<LinkRegistry<T>>>,
    entries: Vec<LinkEntry<T>>,
}

impl<T: Default> Default for ChainBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> ChainBuilder<T> {
    /// Starts a builder with a default-constructed payload.
    pub fn new() -> Self {
        Self::with_payload(T::default())
    }
}

impl<T> ChainBuilder<T> {
    /// Starts a builder with an explicit payload.
    pub fn with_payload(payload: T) -> Self {
        Self {
            payload,
            config: Configuration::default(),
            registry: None,
            entries: Vec::new(),
        }
    }

    /// Sets the chain's failure policy. Defaults apply if never called.
    pub fn config(mut self, config: Configuration) -> Self {
        self.config = config;
        self
    }

    /// Attaches the registry consulted by [`add_link_by_name`].
    ///
    /// [`add_link_by_name`]: ChainBuilder::add_link_by_name
    pub fn registry(mut self, registry: Arc<LinkRegistry<T>>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Appends a link.
    pub fn add_link<L: Link<T> + 'static>(mut self, link: L) -> Self {
        self.entries.push(LinkEntry::Instance(Box::new(link)));
        self
    }

    /// Appends a dynamically produced link.
    ///
    /// `None` records a [`ChainError::NullLink`] error, surfaced by
    /// [`build`](ChainBuilder::build). Intended for links obtained from a
    /// fallible lookup.
    pub fn add_link_boxed(mut self, link: Option<Box<dyn Link<T>>>) -> Self {
        self.entries.push(match link {
            Some(link) => LinkEntry::Instance(link),
            None => LinkEntry::Null,
        });
        self
    }

    /// Appends an inline closure as a link.
    pub fn add_fn<F>(mut self, action: F) -> Self
    where
        T: Send + 'static,
        F: Fn(&mut DataCargo<T>) -> Result<(), ChainError> + Send + Sync + 'static,
    {
        self.entries
            .push(LinkEntry::Instance(Box::new(FnLink::new(action))));
        self
    }

    /// Appends the link registered under `name` in the attached registry.
    ///
    /// Resolution is deferred to [`build`](ChainBuilder::build); an unknown
    /// name (or a missing registry) fails there with
    /// [`ChainError::LinkNotFound`].
    pub fn add_link_by_name(mut self, name: impl Into<LinkName>) -> Self {
        self.entries.push(LinkEntry::Named(name.into()));
        self
    }

    /// Resolves all entries and builds the chain.
    ///
    /// # Errors
    ///
    /// Returns the first recorded build error:
    /// [`ChainError::LinkNotFound`] for an unresolvable name,
    /// [`ChainError::NullLink`] for an absent link.
    pub fn build(self) -> Result<Chain<T>, ChainError> {
        let Self {
            payload,
            config,
            registry,
            entries,
        } = self;

        let mut links = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                LinkEntry::Instance(link) => links.push(link),
                LinkEntry::Named(name) => match &registry {
                    Some(registry) => links.push(registry.resolve(&name)?),
                    None => return Err(ChainError::LinkNotFound(name)),
                },
                LinkEntry::Null => return Err(ChainError::NullLink),
            }
        }

        Ok(Chain {
            links,
            cargo: DataCargo::new(payload),
            config,
            on_completed: None,
            on_error: None,
        })
    }
}
