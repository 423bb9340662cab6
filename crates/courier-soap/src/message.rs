//! SOAP envelope abstractions.
//!
//! The dispatch engine treats messages as opaque; this module defines the
//! narrow SOAP view the must-understand pre-pass needs: the protocol
//! version, the header blocks addressed to the current processing node,
//! and fault emplacement on the response. Which header blocks are
//! addressed to the node is decided by the message implementation, because
//! the version-specific role rules (SOAP 1.1 `actor` versus SOAP 1.2
//! `role` and the ultimate-receiver default) belong to the envelope, not
//! the dispatcher.

use serde::{Deserialize, Serialize};

use courier_dispatch::{HeaderName, Message};

use crate::fault::SoapFault;

/// SOAP protocol version of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoapVersion {
    /// SOAP 1.1.
    V11,
    /// SOAP 1.2.
    V12,
}

impl SoapVersion {
    /// Returns the canonical version string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V11 => "1.1",
            Self::V12 => "1.2",
        }
    }

    /// Returns the envelope namespace for this version.
    #[must_use]
    pub const fn envelope_namespace(self) -> &'static str {
        match self {
            Self::V11 => "http://schemas.xmlsoap.org/soap/envelope/",
            Self::V12 => "http://www.w3.org/2003/05/soap-envelope",
        }
    }

    /// Returns the role URI designating the next processing node.
    ///
    /// Header blocks addressed to this role must be processed by every
    /// node that receives the message.
    ///
    /// # Example
    ///
    /// ```
    /// use courier_soap::SoapVersion;
    ///
    /// assert_eq!(
    ///     SoapVersion::V11.next_role(),
    ///     "http://schemas.xmlsoap.org/soap/actor/next"
    /// );
    /// ```
    #[must_use]
    pub const fn next_role(self) -> &'static str {
        match self {
            Self::V11 => "http://schemas.xmlsoap.org/soap/actor/next",
            Self::V12 => "http://www.w3.org/2003/05/soap-envelope/role/next",
        }
    }
}

impl std::fmt::Display for SoapVersion {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Metadata of one SOAP header block.
///
/// Carries the qualified name, the mandatory-understand flag, and the
/// role/actor the block is addressed to (`None` for blocks with no
/// explicit role, which SOAP addresses to the ultimate receiver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderBlock {
    name: HeaderName,
    must_understand: bool,
    role: Option<String>,
}

impl HeaderBlock {
    /// Creates an optional header block with no explicit role.
    #[must_use]
    pub const fn new(name: HeaderName) -> Self {
        Self {
            name,
            must_understand: false,
            role: None,
        }
    }

    /// Marks the block as mandatory to understand.
    #[must_use]
    pub const fn mandatory(mut self) -> Self {
        self.must_understand = true;
        self
    }

    /// Addresses the block to an explicit role or actor.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Returns the qualified name of the block.
    #[must_use]
    pub const fn name(&self) -> &HeaderName {
        &self.name
    }

    /// Returns `true` when the block is mandatory to understand.
    #[must_use]
    pub const fn must_understand(&self) -> bool {
        self.must_understand
    }

    /// Returns the role the block is addressed to, if explicit.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

/// SOAP view of an opaque message.
///
/// Implemented by transport-owned envelope types. The selection rules in
/// [`SoapMessage::headers_to_process`] are version-specific and live with
/// the implementation: a block is addressed to the current node when its
/// role is the version's "next" URI, matches one of the given role
/// identifiers, or (when acting as ultimate receiver) names no role at
/// all.
pub trait SoapMessage: Message {
    /// Returns the protocol version of the envelope.
    fn soap_version(&self) -> SoapVersion;

    /// Returns the header blocks addressed to a node acting under the
    /// given roles.
    fn headers_to_process(&self, roles: &[String], ultimate_receiver: bool) -> Vec<HeaderBlock>;

    /// Writes a fault into this message, replacing any payload.
    fn set_fault(&mut self, fault: SoapFault);

    /// Returns the fault carried by this message, if any.
    fn fault(&self) -> Option<&SoapFault>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_strings_and_namespaces_differ() {
        assert_eq!(SoapVersion::V11.as_str(), "1.1");
        assert_eq!(SoapVersion::V12.to_string(), "1.2");
        assert_ne!(
            SoapVersion::V11.envelope_namespace(),
            SoapVersion::V12.envelope_namespace()
        );
        assert_ne!(SoapVersion::V11.next_role(), SoapVersion::V12.next_role());
    }

    #[test]
    fn header_blocks_default_to_optional_and_roleless() {
        let block = HeaderBlock::new(HeaderName::new("urn:example", "Token"));
        assert!(!block.must_understand());
        assert!(block.role().is_none());

        let upgraded = block.mandatory().with_role("urn:gateway");
        assert!(upgraded.must_understand());
        assert_eq!(upgraded.role(), Some("urn:gateway"));
    }
}
