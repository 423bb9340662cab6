//! Central message dispatcher.
//!
//! The dispatcher owns the ordered strategy lists and drives one request
//! through them: resolve an invocation chain via the mappings, select the
//! first adapter supporting the resolved endpoint, let an optional guard
//! inspect the request, run the interceptor before-phase, invoke the
//! endpoint, and unwind the after-phase in reverse. Failures along the way
//! are offered to the exception resolvers; unrecovered errors are rethrown
//! to the caller.
//!
//! ## Dispatch states
//!
//! One `dispatch` call moves through `Resolving` (mappings, then adapter
//! lookup), `Guarding` (protocol dispatchers only), `Intercepting(before)`,
//! `Invoking`, and `Intercepting(after)`. An error in any of those states
//! enters error handling: recoverable errors are offered to the resolvers
//! and, when one handles the error, the after-phase runs against the
//! synthesized response; everything else propagates. The dispatcher
//! instance itself is immutable after construction and safe to share
//! across request-handling threads.

#[cfg(test)]
mod tests;

use tracing::{debug, warn};

use crate::adapter::EndpointAdapter;
use crate::chain::InvocationChain;
use crate::context::{Message, MessageContext};
use crate::endpoint::Endpoint;
use crate::errors::DispatchError;
use crate::guard::{GuardVerdict, RequestGuard};
use crate::interceptor::Flow;
use crate::mapping::EndpointMapping;
use crate::resolver::EndpointExceptionResolver;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Tracing target used when no endpoint can be found for a request.
const ENDPOINT_NOT_FOUND_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::endpoint_not_found");

/// Tracing target for received-message tracing.
const RECEIVED_TRACING_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::tracing::received");

/// Tracing target for sent-message tracing.
const SENT_TRACING_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::tracing::sent");

/// Index of the last interceptor whose before-hook ran.
///
/// This is the unwind boundary: only interceptors up to and including it
/// participate in the after- and completion-phases, in reverse order.
type UnwindBoundary = Option<usize>;

/// Central dispatcher routing request messages to endpoints.
///
/// Strategy lists are appended during construction and frozen afterwards;
/// a single dispatcher is then invoked concurrently, one call per inbound
/// message, with all per-dispatch state confined to the call frame.
#[derive(Default)]
pub struct MessageDispatcher {
    mappings: Vec<Box<dyn EndpointMapping>>,
    adapters: Vec<Box<dyn EndpointAdapter>>,
    resolvers: Vec<Box<dyn EndpointExceptionResolver>>,
    guard: Option<Box<dyn RequestGuard>>,
}

impl MessageDispatcher {
    /// Creates a dispatcher with empty strategy lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an endpoint mapping. Mappings are consulted in the order
    /// they were added; the first match wins.
    #[must_use]
    pub fn with_mapping(mut self, mapping: impl EndpointMapping + 'static) -> Self {
        self.mappings.push(Box::new(mapping));
        self
    }

    /// Appends an endpoint adapter. Adapters are scanned in the order they
    /// were added; the first to support the resolved endpoint invokes it.
    #[must_use]
    pub fn with_adapter(mut self, adapter: impl EndpointAdapter + 'static) -> Self {
        self.adapters.push(Box::new(adapter));
        self
    }

    /// Appends an exception resolver. Resolvers are tried in the order
    /// they were added; the first to handle an error stops the scan.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl EndpointExceptionResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    /// Installs the pre-dispatch request guard.
    #[must_use]
    pub fn with_guard(mut self, guard: impl RequestGuard + 'static) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    /// Receives an inbound message: traces it, dispatches it, and traces
    /// the outcome.
    ///
    /// # Errors
    ///
    /// Propagates whatever [`MessageDispatcher::dispatch`] propagates.
    pub fn receive(&self, context: &mut MessageContext) -> Result<(), DispatchError> {
        debug!(
            target: RECEIVED_TRACING_TARGET,
            has_payload = context.request().has_payload(),
            "received request"
        );
        self.dispatch(context)?;
        match context.existing_response() {
            Some(response) => debug!(
                target: SENT_TRACING_TARGET,
                fault = response.has_fault(),
                "sending response"
            ),
            None => debug!(target: SENT_TRACING_TARGET, "request produced no response"),
        }
        Ok(())
    }

    /// Dispatches the request held by the given context.
    ///
    /// On success the context holds whatever the exchange produced: a
    /// response, a fault response, or nothing at all for fire-and-forget
    /// endpoints and guard-rejected requests.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::NoEndpointFound`] when no mapping matches; never
    ///   offered to exception resolvers.
    /// - [`DispatchError::NoAdapter`] when the dispatcher is misconfigured
    ///   for the resolved endpoint; never offered to exception resolvers,
    ///   and no interceptor hook fires.
    /// - Any recoverable error ([`DispatchError::Mapping`],
    ///   [`DispatchError::Guard`], [`DispatchError::Invocation`]) that no
    ///   configured resolver handled, rethrown verbatim.
    pub fn dispatch(&self, context: &mut MessageContext) -> Result<(), DispatchError> {
        let mut chain: Option<InvocationChain> = None;
        let mut boundary: UnwindBoundary = None;

        match self.run(context, &mut chain, &mut boundary) {
            Ok(()) => Ok(()),
            Err(error) => self.handle_error(context, chain.as_ref(), boundary, error),
        }
    }

    /// Runs the happy-path state machine, leaving the resolved chain and
    /// the unwind boundary behind for error handling.
    fn run(
        &self,
        context: &mut MessageContext,
        chain_slot: &mut Option<InvocationChain>,
        boundary: &mut UnwindBoundary,
    ) -> Result<(), DispatchError> {
        let chain = chain_slot.insert(self.resolve_endpoint(context)?);
        let adapter = self.resolve_adapter(chain.endpoint())?;

        if let Some(guard) = self.guard.as_deref() {
            match guard
                .inspect(chain, context)
                .map_err(DispatchError::guard)?
            {
                GuardVerdict::Proceed => {}
                GuardVerdict::Reject => {
                    debug!(
                        target: DISPATCH_TARGET,
                        "request guard rejected dispatch before the interceptor chain"
                    );
                    return Ok(());
                }
            }
        }

        for (index, interceptor) in chain.interceptors().iter().enumerate() {
            *boundary = Some(index);
            let flow = interceptor
                .before_invoke(context, chain.endpoint())
                .map_err(DispatchError::invocation)?;
            if flow == Flow::Stop {
                debug!(
                    target: DISPATCH_TARGET,
                    index, "interceptor stopped the chain before invocation"
                );
                self.trigger_after_hooks(chain, *boundary, context)?;
                self.trigger_completion(chain, *boundary, context, None);
                return Ok(());
            }
        }

        debug!(
            target: DISPATCH_TARGET,
            endpoint = chain.endpoint().kind(),
            "invoking endpoint"
        );
        adapter
            .invoke(context, chain.endpoint())
            .map_err(DispatchError::invocation)?;

        self.trigger_after_hooks(chain, *boundary, context)?;
        self.trigger_completion(chain, *boundary, context, None);
        Ok(())
    }

    /// Error-handling state: offers recoverable errors to the resolvers
    /// and finishes the chain against the synthesized response, or
    /// propagates.
    fn handle_error(
        &self,
        context: &mut MessageContext,
        chain: Option<&InvocationChain>,
        boundary: UnwindBoundary,
        error: DispatchError,
    ) -> Result<(), DispatchError> {
        if let DispatchError::NoEndpointFound = error {
            warn!(
                target: ENDPOINT_NOT_FOUND_TARGET,
                "no endpoint mapping found for request"
            );
        }
        if !error.is_recoverable() {
            return Err(error);
        }

        let endpoint = chain.map(InvocationChain::endpoint);
        if !self.resolve_exception(context, endpoint, &error) {
            return Err(error);
        }

        if let Some(chain) = chain {
            self.trigger_after_hooks(chain, boundary, context)?;
            self.trigger_completion(chain, boundary, context, Some(&error));
        }
        Ok(())
    }

    /// Resolves the invocation chain for the request. All mappings are
    /// tried in order; the first non-empty result wins.
    fn resolve_endpoint(
        &self,
        context: &MessageContext,
    ) -> Result<InvocationChain, DispatchError> {
        for mapping in &self.mappings {
            match mapping.resolve(context).map_err(DispatchError::mapping)? {
                Some(chain) => {
                    debug!(
                        target: DISPATCH_TARGET,
                        endpoint = chain.endpoint().kind(),
                        interceptors = chain.interceptors().len(),
                        "mapping resolved request to endpoint"
                    );
                    return Ok(chain);
                }
                None => {
                    debug!(target: DISPATCH_TARGET, "mapping has no match for request");
                }
            }
        }
        Err(DispatchError::NoEndpointFound)
    }

    /// Returns the first configured adapter supporting the endpoint.
    fn resolve_adapter(&self, endpoint: &Endpoint) -> Result<&dyn EndpointAdapter, DispatchError> {
        for adapter in &self.adapters {
            if adapter.supports(endpoint) {
                return Ok(adapter.as_ref());
            }
        }
        Err(DispatchError::no_adapter(endpoint.kind()))
    }

    /// Tries the exception resolvers in order; the first to report
    /// `handled` stops the scan.
    fn resolve_exception(
        &self,
        context: &mut MessageContext,
        endpoint: Option<&Endpoint>,
        error: &DispatchError,
    ) -> bool {
        for resolver in &self.resolvers {
            if resolver.resolve(context, endpoint, error) {
                debug!(
                    target: DISPATCH_TARGET,
                    %error,
                    "dispatch error resolved into a recovery response"
                );
                return true;
            }
        }
        false
    }

    /// Runs the branch-appropriate after-hooks in reverse over the prefix
    /// of interceptors whose before-hook ran.
    ///
    /// The walk is skipped entirely when the context holds no response:
    /// there is nothing to post-process. The branch is chosen once, from
    /// the response's fault state, before the walk starts.
    fn trigger_after_hooks(
        &self,
        chain: &InvocationChain,
        boundary: UnwindBoundary,
        context: &mut MessageContext,
    ) -> Result<(), DispatchError> {
        let Some(last_index) = boundary else {
            return Ok(());
        };
        if !context.has_response() {
            return Ok(());
        }
        let fault = context.existing_response().is_some_and(Message::has_fault);
        for interceptor in chain.interceptors().iter().take(last_index + 1).rev() {
            let hook_result = if fault {
                interceptor.after_fault(context, chain.endpoint())
            } else {
                interceptor.after_success(context, chain.endpoint())
            };
            if hook_result.map_err(DispatchError::invocation)? == Flow::Stop {
                break;
            }
        }
        Ok(())
    }

    /// Runs the completion hooks in reverse over the prefix of
    /// interceptors whose before-hook ran, regardless of response
    /// presence. Hook errors are logged per interceptor and swallowed.
    fn trigger_completion(
        &self,
        chain: &InvocationChain,
        boundary: UnwindBoundary,
        context: &mut MessageContext,
        error: Option<&DispatchError>,
    ) {
        let Some(last_index) = boundary else {
            return;
        };
        for interceptor in chain.interceptors().iter().take(last_index + 1).rev() {
            if let Err(hook_error) = interceptor.on_completion(context, chain.endpoint(), error) {
                warn!(
                    target: DISPATCH_TARGET,
                    %hook_error,
                    "interceptor completion hook failed"
                );
            }
        }
    }
}
