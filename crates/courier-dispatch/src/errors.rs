//! Error types for dispatch failures.
//!
//! The taxonomy distinguishes configuration defects from runtime
//! conditions: a request no mapping matches and a resolved endpoint no
//! adapter supports both propagate immediately, while mapping, guard, and
//! invocation failures are offered to the configured exception resolvers
//! first. Application components surface arbitrary error types through the
//! boxed [`EndpointError`] wrapper.

use thiserror::Error;

/// Error raised by an endpoint, interceptor hook, mapping, or guard.
///
/// Application strategies return whatever concrete error types they like;
/// this wrapper erases them at the dispatch seam while keeping the source
/// chain intact for logging and downcasting.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EndpointError(#[source] Box<dyn std::error::Error + Send + Sync + 'static>);

impl EndpointError {
    /// Wraps a concrete error.
    #[must_use]
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Box::new(error))
    }

    /// Creates an error from a plain message.
    #[must_use]
    pub fn msg(message: impl Into<String>) -> Self {
        Self(message.into().into())
    }

    /// Wraps an already-boxed error.
    #[must_use]
    pub fn from_boxed(error: Box<dyn std::error::Error + Send + Sync + 'static>) -> Self {
        Self(error)
    }

    /// Attempts to downcast the wrapped error to a concrete type.
    #[must_use]
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.0.downcast_ref()
    }
}

/// Errors surfaced by [`MessageDispatcher::dispatch`].
///
/// [`MessageDispatcher::dispatch`]: crate::dispatcher::MessageDispatcher::dispatch
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No configured mapping resolved an invocation chain. Never offered
    /// to exception resolvers: there is no endpoint identity to recover
    /// around.
    #[error("no endpoint mapping matched the request")]
    NoEndpointFound,

    /// No configured adapter supports the resolved endpoint. A dispatcher
    /// wiring defect: fatal, never retried, never offered to exception
    /// resolvers.
    #[error("no endpoint adapter supports the resolved {endpoint} endpoint")]
    NoAdapter {
        /// Shape label of the unsupported endpoint.
        endpoint: String,
    },

    /// An endpoint mapping failed while resolving the request.
    #[error("endpoint mapping failed: {source}")]
    Mapping {
        /// Underlying mapping error.
        #[source]
        source: EndpointError,
    },

    /// The request guard failed while inspecting the request.
    #[error("request guard failed: {source}")]
    Guard {
        /// Underlying guard error.
        #[source]
        source: EndpointError,
    },

    /// The endpoint or an interceptor hook raised an error.
    #[error("endpoint invocation failed: {source}")]
    Invocation {
        /// Underlying invocation error.
        #[source]
        source: EndpointError,
    },
}

impl DispatchError {
    /// Creates a no-adapter error for the given endpoint shape label.
    pub fn no_adapter(endpoint: impl Into<String>) -> Self {
        Self::NoAdapter {
            endpoint: endpoint.into(),
        }
    }

    /// Wraps a mapping resolution error.
    #[must_use]
    pub fn mapping(source: EndpointError) -> Self {
        Self::Mapping { source }
    }

    /// Wraps a guard inspection error.
    #[must_use]
    pub fn guard(source: EndpointError) -> Self {
        Self::Guard { source }
    }

    /// Wraps an invocation error.
    #[must_use]
    pub fn invocation(source: EndpointError) -> Self {
        Self::Invocation { source }
    }

    /// Returns `true` when the error is eligible for exception-resolver
    /// recovery.
    ///
    /// Missing endpoints and missing adapters always propagate; mapping,
    /// guard, and invocation failures may be translated into recovery
    /// responses.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::NoEndpointFound | Self::NoAdapter { .. } => false,
            Self::Mapping { .. } | Self::Guard { .. } | Self::Invocation { .. } => true,
        }
    }
}
