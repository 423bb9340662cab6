//! Must-understand header validation.
//!
//! SOAP requires a receiving node to reject a message carrying a
//! mandatory header block it does not understand. The
//! [`MustUnderstandValidator`] enforces this before the interceptor chain
//! runs: it collects the mandatory blocks addressed to the node, asks
//! every interceptor in the resolved chain whether it understands each
//! block, and on any unclaimed block writes a must-understand fault into
//! the response and rejects the dispatch. Neither interceptor hooks nor
//! the endpoint run for a rejected request, and the dispatch itself
//! completes without error: the fault response is the outcome.


use std::marker::PhantomData;

use tracing::{debug, warn};

use courier_dispatch::{
    EndpointError, GuardVerdict, HeaderName, InvocationChain, MessageContext, RequestGuard,
};

use crate::fault::{FaultCode, SoapFault};
use crate::message::{SoapMessage, SoapVersion};

/// Tracing target for must-understand validation.
const SOAP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::must_understand");

/// Default reason string for must-understand faults.
pub const DEFAULT_MUST_UNDERSTAND_FAULT_REASON: &str =
    "One or more mandatory SOAP header blocks not understood";

/// Request guard validating must-understand headers.
///
/// Generic over the concrete envelope type `M` the transport provides;
/// requests of any other message type pass through untouched, so a SOAP
/// dispatcher can keep serving non-SOAP exchanges.
pub struct MustUnderstandValidator<M> {
    fault_reason: String,
    fault_locale: String,
    ultimate_receiver: bool,
    _envelope: PhantomData<fn() -> M>,
}

impl<M: SoapMessage + 'static> MustUnderstandValidator<M> {
    /// Creates a validator with the default fault reason, English locale,
    /// and ultimate-receiver semantics.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fault_reason: DEFAULT_MUST_UNDERSTAND_FAULT_REASON.to_owned(),
            fault_locale: "en".to_owned(),
            ultimate_receiver: true,
            _envelope: PhantomData,
        }
    }

    /// Overrides the must-understand fault reason string.
    #[must_use]
    pub fn with_fault_reason(mut self, reason: impl Into<String>) -> Self {
        self.fault_reason = reason.into();
        self
    }

    /// Overrides the language tag qualifying the fault reason.
    #[must_use]
    pub fn with_fault_locale(mut self, locale: impl Into<String>) -> Self {
        self.fault_locale = locale.into();
        self
    }

    /// Configures whether the node acts as the ultimate receiver.
    ///
    /// Intermediaries pass `false` so that role-less SOAP 1.2 header
    /// blocks are not addressed to them.
    #[must_use]
    pub const fn acting_as_ultimate_receiver(mut self, ultimate_receiver: bool) -> Self {
        self.ultimate_receiver = ultimate_receiver;
        self
    }

    /// Returns the mandatory header names no chain interceptor claims.
    fn unclaimed_headers(&self, chain: &InvocationChain, request: &M) -> Vec<HeaderName> {
        request
            .headers_to_process(chain.roles(), self.ultimate_receiver)
            .into_iter()
            .filter(|block| block.must_understand())
            .filter(|block| {
                !chain
                    .interceptors()
                    .iter()
                    .any(|interceptor| interceptor.understands(block.name()))
            })
            .map(|block| block.name().clone())
            .collect()
    }

    /// Builds the must-understand fault for the given unclaimed headers.
    fn build_fault(
        &self,
        version: SoapVersion,
        chain: &InvocationChain,
        not_understood: Vec<HeaderName>,
    ) -> SoapFault {
        let mut fault = SoapFault::new(
            FaultCode::MustUnderstand,
            self.fault_reason.clone(),
            self.fault_locale.clone(),
        );
        if let Some(role) = chain.roles().first() {
            fault = fault.with_role(role.clone());
        }
        if version == SoapVersion::V12 {
            fault = fault.with_not_understood(not_understood);
        }
        fault
    }
}

impl<M: SoapMessage + 'static> Default for MustUnderstandValidator<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: SoapMessage + 'static> RequestGuard for MustUnderstandValidator<M> {
    fn inspect(
        &self,
        chain: &InvocationChain,
        context: &mut MessageContext,
    ) -> Result<GuardVerdict, EndpointError> {
        let Some(request) = context.request().as_any().downcast_ref::<M>() else {
            return Ok(GuardVerdict::Proceed);
        };
        let version = request.soap_version();
        let not_understood = self.unclaimed_headers(chain, request);
        if not_understood.is_empty() {
            debug!(
                target: SOAP_TARGET,
                "all mandatory header blocks are understood"
            );
            return Ok(GuardVerdict::Proceed);
        }

        warn!(
            target: SOAP_TARGET,
            headers = ?not_understood,
            "mandatory SOAP header blocks not understood; responding with fault"
        );
        let fault = self.build_fault(version, chain, not_understood);
        let Some(response) = context.response().as_any_mut().downcast_mut::<M>() else {
            return Err(EndpointError::msg(
                "response message is not a SOAP envelope of the expected type",
            ));
        };
        response.set_fault(fault);
        Ok(GuardVerdict::Reject)
    }
}
