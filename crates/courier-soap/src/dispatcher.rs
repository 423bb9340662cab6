//! SOAP dispatcher assembly.

use courier_dispatch::MessageDispatcher;

use crate::message::SoapMessage;
use crate::validator::MustUnderstandValidator;

/// Creates a message dispatcher with SOAP must-understand semantics.
///
/// A SOAP dispatcher is a generic [`MessageDispatcher`] with a default
/// [`MustUnderstandValidator`] installed as the request guard; mappings,
/// adapters, and exception resolvers are appended by the caller as usual.
/// `M` is the concrete envelope type the transport produces.
#[must_use]
pub fn soap_message_dispatcher<M: SoapMessage + 'static>() -> MessageDispatcher {
    MessageDispatcher::new().with_guard(MustUnderstandValidator::<M>::new())
}
