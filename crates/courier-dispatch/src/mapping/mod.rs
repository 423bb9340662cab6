//! Endpoint resolution strategies.
//!
//! A mapping inspects the request and either produces an
//! [`InvocationChain`] or reports "no match". The dispatcher consults its
//! configured mappings in order and the first chain wins; mapping errors
//! propagate immediately rather than falling through to later mappings.

mod keyed;


pub use self::keyed::KeyedEndpointMapping;

use crate::chain::InvocationChain;
use crate::context::MessageContext;
use crate::errors::EndpointError;

/// Strategy resolving a request to an invocation chain.
pub trait EndpointMapping: Send + Sync {
    /// Resolves the request held by the context.
    ///
    /// Returns `Ok(None)` when this mapping has no match for the request,
    /// which lets the dispatcher move on to the next configured mapping.
    ///
    /// # Errors
    ///
    /// Returns an error when resolution itself fails; the dispatcher
    /// propagates it immediately instead of treating it as "no match".
    fn resolve(&self, context: &MessageContext) -> Result<Option<InvocationChain>, EndpointError>;
}
