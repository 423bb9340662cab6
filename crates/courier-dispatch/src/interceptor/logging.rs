//! Tracing-based message logging interceptor.

use tracing::{debug, warn};

use super::{EndpointInterceptor, Flow};
use crate::context::MessageContext;
use crate::endpoint::Endpoint;
use crate::errors::EndpointError;

/// Tracing target for message logging.
const LOGGING_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::logging");

/// Interceptor that logs request arrival and response disposition.
///
/// Messages are opaque to the dispatch core, so the interceptor logs the
/// queries the [`crate::Message`] trait exposes: payload presence on the
/// way in, fault state on the way out. It always continues the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageLoggingInterceptor;

impl MessageLoggingInterceptor {
    /// Creates the interceptor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EndpointInterceptor for MessageLoggingInterceptor {
    fn before_invoke(
        &self,
        context: &mut MessageContext,
        endpoint: &Endpoint,
    ) -> Result<Flow, EndpointError> {
        debug!(
            target: LOGGING_TARGET,
            endpoint = endpoint.kind(),
            has_payload = context.request().has_payload(),
            "request entering endpoint"
        );
        Ok(Flow::Continue)
    }

    fn after_success(
        &self,
        context: &mut MessageContext,
        endpoint: &Endpoint,
    ) -> Result<Flow, EndpointError> {
        debug!(
            target: LOGGING_TARGET,
            endpoint = endpoint.kind(),
            has_response = context.has_response(),
            "endpoint completed"
        );
        Ok(Flow::Continue)
    }

    fn after_fault(
        &self,
        _context: &mut MessageContext,
        endpoint: &Endpoint,
    ) -> Result<Flow, EndpointError> {
        warn!(
            target: LOGGING_TARGET,
            endpoint = endpoint.kind(),
            "endpoint produced a fault response"
        );
        Ok(Flow::Continue)
    }
}
