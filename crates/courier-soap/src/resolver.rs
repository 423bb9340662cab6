//! SOAP exception resolution.

use std::marker::PhantomData;

use tracing::warn;

use courier_dispatch::{DispatchError, Endpoint, EndpointExceptionResolver, MessageContext};

use crate::fault::{FaultCode, SoapFault};
use crate::message::SoapMessage;

/// Tracing target for SOAP exception resolution.
const RESOLVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::resolver");

/// Exception resolver turning any dispatch error into a receiver fault.
///
/// The fault reason is the error's display text. Typically registered
/// last, behind more specific resolvers, as the catch-all that keeps
/// endpoint failures from propagating to the transport. Requests whose
/// envelope is not of type `M` are declined so a later resolver (or the
/// dispatcher's rethrow policy) can take over.
pub struct SimpleSoapFaultResolver<M> {
    fault_locale: String,
    _envelope: PhantomData<fn() -> M>,
}

impl<M: SoapMessage + 'static> SimpleSoapFaultResolver<M> {
    /// Creates a resolver qualifying fault reasons with the English
    /// locale.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fault_locale: "en".to_owned(),
            _envelope: PhantomData,
        }
    }

    /// Overrides the language tag qualifying fault reasons.
    #[must_use]
    pub fn with_fault_locale(mut self, locale: impl Into<String>) -> Self {
        self.fault_locale = locale.into();
        self
    }
}

impl<M: SoapMessage + 'static> Default for SimpleSoapFaultResolver<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: SoapMessage + 'static> EndpointExceptionResolver for SimpleSoapFaultResolver<M> {
    fn resolve(
        &self,
        context: &mut MessageContext,
        _endpoint: Option<&Endpoint>,
        error: &DispatchError,
    ) -> bool {
        if context.request().as_any().downcast_ref::<M>().is_none() {
            return false;
        }
        let fault = SoapFault::new(FaultCode::Receiver, error.to_string(), self.fault_locale.clone());
        let Some(response) = context.response().as_any_mut().downcast_mut::<M>() else {
            return false;
        };
        warn!(
            target: RESOLVER_TARGET,
            %error,
            "dispatch error resolved into a receiver fault"
        );
        response.set_fault(fault);
        true
    }
}
