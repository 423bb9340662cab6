//! Interceptor chain contract.
//!
//! Interceptors wrap endpoint invocation with a symmetric before/after
//! protocol. The dispatcher runs `before_invoke` hooks in registration
//! order; the branch-appropriate after-hook then unwinds in reverse over
//! the prefix of interceptors whose before-hook ran, so interceptors
//! registered later run closest to the endpoint and unwind first. The
//! unconditional `on_completion` hook fires last, also in reverse, and its
//! errors never alter the dispatch outcome.

mod logging;

#[cfg(test)]
mod tests;

pub use self::logging::MessageLoggingInterceptor;

use crate::context::MessageContext;
use crate::endpoint::Endpoint;
use crate::errors::{DispatchError, EndpointError};
use crate::header::HeaderName;

/// Continuation decision returned by interceptor hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Proceed with the next interceptor (or the invocation itself).
    Continue,
    /// Short-circuit the current walk.
    Stop,
}

/// Hook points around one endpoint invocation.
///
/// All hooks default to pass-through, so implementations override only the
/// phases they care about. Hook errors (other than `on_completion` errors,
/// which are logged and swallowed) are offered to the configured exception
/// resolvers like endpoint errors.
pub trait EndpointInterceptor: Send + Sync {
    /// Runs before the endpoint is invoked.
    ///
    /// Returning [`Flow::Stop`] skips the remaining interceptors and the
    /// invocation entirely; this interceptor is assumed to have produced
    /// whatever response the exchange needs.
    ///
    /// # Errors
    ///
    /// Returns an error to abort the dispatch; the error is offered to the
    /// exception resolvers.
    fn before_invoke(
        &self,
        _context: &mut MessageContext,
        _endpoint: &Endpoint,
    ) -> Result<Flow, EndpointError> {
        Ok(Flow::Continue)
    }

    /// Runs on the success branch of the after-phase.
    ///
    /// Returning [`Flow::Stop`] skips the after-hooks of earlier
    /// interceptors.
    ///
    /// # Errors
    ///
    /// Returns an error to abort the dispatch; the error is offered to the
    /// exception resolvers.
    fn after_success(
        &self,
        _context: &mut MessageContext,
        _endpoint: &Endpoint,
    ) -> Result<Flow, EndpointError> {
        Ok(Flow::Continue)
    }

    /// Runs on the fault branch of the after-phase.
    ///
    /// Returning [`Flow::Stop`] skips the after-hooks of earlier
    /// interceptors.
    ///
    /// # Errors
    ///
    /// Returns an error to abort the dispatch; the error is offered to the
    /// exception resolvers.
    fn after_fault(
        &self,
        _context: &mut MessageContext,
        _endpoint: &Endpoint,
    ) -> Result<Flow, EndpointError> {
        Ok(Flow::Continue)
    }

    /// Runs unconditionally once the chain completes, in reverse order
    /// over every interceptor whose `before_invoke` ran.
    ///
    /// `error` carries the dispatch error when the chain completed through
    /// exception resolution.
    ///
    /// # Errors
    ///
    /// Errors from this hook are logged per interceptor and swallowed; one
    /// misbehaving cleanup cannot mask the dispatch outcome.
    fn on_completion(
        &self,
        _context: &mut MessageContext,
        _endpoint: &Endpoint,
        _error: Option<&DispatchError>,
    ) -> Result<(), EndpointError> {
        Ok(())
    }

    /// Capability probe used by protocol-aware dispatchers: whether this
    /// interceptor understands the named mandatory header block.
    ///
    /// This is distinct from the lifecycle hooks and defaults to `false`;
    /// interceptors with no protocol awareness never claim a header.
    fn understands(&self, _header: &HeaderName) -> bool {
        false
    }
}
