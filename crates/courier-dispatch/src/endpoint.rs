//! Endpoint handles and the shipped endpoint shapes.
//!
//! An endpoint is the application object that produces a response for a
//! request. Its shape is opaque to the dispatcher and interpreted only by
//! endpoint adapters, so the handle is a tagged sum over the shapes this
//! crate ships plus an `Any`-based escape hatch for application-defined
//! adapters.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::context::{Message, MessageContext};
use crate::errors::EndpointError;

/// Endpoint with full access to the message context.
///
/// Implementations read the request and may write a response through
/// [`MessageContext::response`]. Leaving the response absent is valid for
/// request-only exchanges.
pub trait MessageHandler: Send + Sync {
    /// Handles the request held by the given context.
    ///
    /// # Errors
    ///
    /// Returns an application error when the request cannot be handled; the
    /// dispatcher offers it to the configured exception resolvers.
    fn handle(&self, context: &mut MessageContext) -> Result<(), EndpointError>;
}

/// Fire-and-forget endpoint.
///
/// Sink endpoints consume the request and never produce a response; the
/// dispatcher treats the absent response as a normal outcome.
pub trait SinkHandler: Send + Sync {
    /// Consumes the request message.
    ///
    /// # Errors
    ///
    /// Returns an application error when the request cannot be consumed.
    fn consume(&self, request: &dyn Message) -> Result<(), EndpointError>;
}

/// Opaque handle for a resolved endpoint.
///
/// Mappings produce handles; adapters interpret them. The `Custom` variant
/// carries an arbitrary shared object for adapters supplied by the
/// application.
#[derive(Clone)]
pub enum Endpoint {
    /// Endpoint operating on the full message context.
    Message(Arc<dyn MessageHandler>),
    /// Fire-and-forget endpoint consuming the request only.
    Sink(Arc<dyn SinkHandler>),
    /// Application-defined endpoint for custom adapters to downcast.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Endpoint {
    /// Wraps a [`MessageHandler`] endpoint.
    #[must_use]
    pub fn message(handler: impl MessageHandler + 'static) -> Self {
        Self::Message(Arc::new(handler))
    }

    /// Wraps a [`SinkHandler`] endpoint.
    #[must_use]
    pub fn sink(handler: impl SinkHandler + 'static) -> Self {
        Self::Sink(Arc::new(handler))
    }

    /// Wraps an arbitrary object for an application-defined adapter.
    #[must_use]
    pub fn custom(handler: impl Any + Send + Sync) -> Self {
        Self::Custom(Arc::new(handler))
    }

    /// Returns a short label for the endpoint shape, used in logs and
    /// error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Sink(_) => "sink",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("Endpoint").field(&self.kind()).finish()
    }
}
