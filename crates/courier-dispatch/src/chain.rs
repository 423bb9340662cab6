//! Resolved invocation chains.
//!
//! A chain pairs the resolved endpoint with the ordered interceptors that
//! wrap its invocation and the protocol role identifiers the endpoint acts
//! under. Mappings build a chain once per dispatch; it is immutable
//! afterwards and owned by the activation frame of that dispatch call.

use std::fmt;
use std::sync::Arc;

use crate::endpoint::Endpoint;
use crate::interceptor::EndpointInterceptor;

/// Endpoint plus ordered interceptors and role identifiers for one
/// dispatch.
#[derive(Clone)]
pub struct InvocationChain {
    endpoint: Endpoint,
    interceptors: Vec<Arc<dyn EndpointInterceptor>>,
    roles: Vec<String>,
}

impl InvocationChain {
    /// Creates a chain with no interceptors and no roles.
    #[must_use]
    pub const fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            interceptors: Vec::new(),
            roles: Vec::new(),
        }
    }

    /// Attaches the ordered interceptor list.
    #[must_use]
    pub fn with_interceptors(mut self, interceptors: Vec<Arc<dyn EndpointInterceptor>>) -> Self {
        self.interceptors = interceptors;
        self
    }

    /// Attaches the role identifiers the endpoint acts under.
    #[must_use]
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    /// Returns the resolved endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the ordered interceptors.
    #[must_use]
    pub fn interceptors(&self) -> &[Arc<dyn EndpointInterceptor>] {
        &self.interceptors
    }

    /// Returns the declared role identifiers.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }
}

impl fmt::Debug for InvocationChain {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("InvocationChain")
            .field("endpoint", &self.endpoint)
            .field("interceptors", &self.interceptors.len())
            .field("roles", &self.roles)
            .finish()
    }
}
