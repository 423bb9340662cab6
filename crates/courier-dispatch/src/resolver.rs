//! Exception resolution strategies.
//!
//! When endpoint resolution or invocation fails with a recoverable error,
//! the dispatcher offers the error to its configured resolvers in order.
//! The first resolver that reports `true` has synthesized a recovery
//! response (typically a protocol-level fault) into the context and stops
//! the scan; if none does, the dispatcher rethrows the original error to
//! its caller.

use crate::context::MessageContext;
use crate::endpoint::Endpoint;
use crate::errors::DispatchError;

/// Strategy translating dispatch errors into recovery responses.
pub trait EndpointExceptionResolver: Send + Sync {
    /// Attempts to resolve the given error.
    ///
    /// `endpoint` is the resolved endpoint, or `None` when the error was
    /// raised before an endpoint was chosen (mapping failures). A resolver
    /// that returns `true` must have written whatever recovery response
    /// the exchange needs into the context; the dispatcher then runs the
    /// after-phase against that response.
    fn resolve(
        &self,
        context: &mut MessageContext,
        endpoint: Option<&Endpoint>,
        error: &DispatchError,
    ) -> bool;
}
