//! Pre-dispatch request inspection.
//!
//! A guard runs after endpoint resolution and before the first interceptor
//! hook. Protocol-aware dispatchers use this seam for mandatory request
//! validation (the SOAP layer installs its must-understand header
//! validator here). The verdict protocol is deliberately distinct from the
//! interceptor [`Flow`](crate::interceptor::Flow): a rejecting guard has
//! already synthesized the fault response, and the dispatch completes
//! without any interceptor, adapter, or endpoint running.

use crate::chain::InvocationChain;
use crate::context::MessageContext;
use crate::errors::EndpointError;

/// Outcome of a guard inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardVerdict {
    /// The request may proceed into the interceptor chain.
    Proceed,
    /// Dispatch is aborted; the guard has produced the response.
    Reject,
}

/// Pre-dispatch inspection strategy.
pub trait RequestGuard: Send + Sync {
    /// Inspects the request against the resolved chain.
    ///
    /// # Errors
    ///
    /// Returns an error when inspection itself fails (as opposed to the
    /// request failing inspection); the dispatcher offers it to the
    /// exception resolvers.
    fn inspect(
        &self,
        chain: &InvocationChain,
        context: &mut MessageContext,
    ) -> Result<GuardVerdict, EndpointError>;
}
