//! Key-lookup endpoint mapping.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::EndpointMapping;
use crate::chain::InvocationChain;
use crate::context::MessageContext;
use crate::endpoint::Endpoint;
use crate::errors::EndpointError;
use crate::interceptor::EndpointInterceptor;

/// Tracing target for mapping resolution.
const MAPPING_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::mapping");

/// Mapping that resolves endpoints through a key lookup table.
///
/// A caller-supplied key function derives a lookup key from the request
/// (for example the payload root name or an addressing action). The key
/// selects a registered endpoint; when the key misses, or the key function
/// yields no key at all, an optional default endpoint takes over. Every
/// produced chain carries the mapping's configured interceptors and role
/// identifiers.
pub struct KeyedEndpointMapping<F> {
    key_fn: F,
    endpoints: HashMap<String, Endpoint>,
    default_endpoint: Option<Endpoint>,
    interceptors: Vec<Arc<dyn EndpointInterceptor>>,
    roles: Vec<String>,
}

impl<F> KeyedEndpointMapping<F>
where
    F: Fn(&MessageContext) -> Option<String> + Send + Sync,
{
    /// Creates an empty mapping around the given key function.
    #[must_use]
    pub fn new(key_fn: F) -> Self {
        Self {
            key_fn,
            endpoints: HashMap::new(),
            default_endpoint: None,
            interceptors: Vec::new(),
            roles: Vec::new(),
        }
    }

    /// Registers an endpoint under a lookup key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is already registered; registrations
    /// are configuration and silent replacement would hide wiring
    /// mistakes.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        endpoint: Endpoint,
    ) -> Result<(), EndpointError> {
        let key = key.into();
        if self.endpoints.contains_key(&key) {
            return Err(EndpointError::msg(format!(
                "endpoint key '{key}' is already registered"
            )));
        }
        self.endpoints.insert(key, endpoint);
        Ok(())
    }

    /// Sets the endpoint used when no registered key matches.
    #[must_use]
    pub fn with_default_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.default_endpoint = Some(endpoint);
        self
    }

    /// Sets the interceptors attached to every produced chain.
    #[must_use]
    pub fn with_interceptors(mut self, interceptors: Vec<Arc<dyn EndpointInterceptor>>) -> Self {
        self.interceptors = interceptors;
        self
    }

    /// Sets the role identifiers attached to every produced chain.
    #[must_use]
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    fn chain_for(&self, endpoint: Endpoint) -> InvocationChain {
        InvocationChain::new(endpoint)
            .with_interceptors(self.interceptors.clone())
            .with_roles(self.roles.clone())
    }
}

impl<F> EndpointMapping for KeyedEndpointMapping<F>
where
    F: Fn(&MessageContext) -> Option<String> + Send + Sync,
{
    fn resolve(&self, context: &MessageContext) -> Result<Option<InvocationChain>, EndpointError> {
        let key = (self.key_fn)(context);
        let endpoint = match key.as_deref() {
            Some(key) => self.endpoints.get(key),
            None => None,
        };
        match endpoint.or(self.default_endpoint.as_ref()) {
            Some(endpoint) => {
                debug!(
                    target: MAPPING_TARGET,
                    key = key.as_deref().unwrap_or("<none>"),
                    endpoint = endpoint.kind(),
                    "lookup key mapped to endpoint"
                );
                Ok(Some(self.chain_for(endpoint.clone())))
            }
            None => {
                debug!(
                    target: MAPPING_TARGET,
                    key = key.as_deref().unwrap_or("<none>"),
                    "lookup key has no registered endpoint"
                );
                Ok(None)
            }
        }
    }
}
