//! Qualified names for protocol header blocks.
//!
//! The dispatch core never parses headers, but the interceptor capability
//! probe (see [`EndpointInterceptor::understands`]) identifies header
//! blocks by qualified name, so the name type lives here where both the
//! core and protocol-aware extensions can reach it.
//!
//! [`EndpointInterceptor::understands`]: crate::interceptor::EndpointInterceptor::understands

use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace-qualified name of a protocol header block.
///
/// # Example
///
/// ```
/// use courier_dispatch::HeaderName;
///
/// let name = HeaderName::new("urn:example:security", "Signature");
/// assert_eq!(name.to_string(), "{urn:example:security}Signature");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeaderName {
    namespace: String,
    local_part: String,
}

impl HeaderName {
    /// Creates a qualified name from a namespace URI and a local part.
    #[must_use]
    pub fn new(namespace: impl Into<String>, local_part: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_part: local_part.into(),
        }
    }

    /// Returns the namespace URI.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the local part.
    #[must_use]
    pub fn local_part(&self) -> &str {
        &self.local_part
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{{}}}{}", self.namespace, self.local_part)
    }
}
