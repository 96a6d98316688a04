use std::fmt;

/// The mutable carrier passed through every link of a chain.
///
/// Holds the payload plus a cancellation flag. The chain clears the flag
/// before each link runs and reads it right after the link returns: a link
/// that calls [`DataCargo::cancel`] stops the chain after itself without
/// being treated as a failure.
///
/// Exactly one `DataCargo` exists per chain; it is owned by the chain and
/// never shared across chains or runs.
pub struct DataCargo<T> {
    payload: T,
    cancel: bool,
}

impl<T: fmt::Debug> fmt::Debug for DataCargo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataCargo")
            .field("payload", &self.payload)
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl<T: Default> Default for DataCargo<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> DataCargo<T> {
    /// Wraps a payload in a fresh cargo with the cancel flag cleared.
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            cancel: false,
        }
    }

    /// Returns a shared reference to the payload.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Returns a mutable reference to the payload.
    ///
    /// This is how links read and write the data flowing through the chain.
    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    /// Requests that the chain halt after the current link.
    ///
    /// A cancelled chain skips its remaining links and does not invoke the
    /// completion callback. Cancellation is not a failure: the error
    /// callback does not fire either.
    pub fn cancel(&mut self) {
        self.cancel = true;
    }

    /// Whether cancellation was requested during the current link.
    pub fn is_cancelled(&self) -> bool {
        self.cancel
    }

    /// Consumes the cargo and returns the payload.
    pub fn into_payload(self) -> T {
        self.payload
    }

    pub(crate) fn clear_cancel(&mut self) {
        self.cancel = false;
    }
}
