//! SOAP fault descriptors.
//!
//! A [`SoapFault`] describes the fault a response envelope should carry;
//! the envelope implementation renders it into the wire format. The
//! descriptor covers what the dispatch layer synthesizes: a fault code, a
//! locale-qualified reason, an optional faulting role, and (SOAP 1.2) the
//! names of not-understood header blocks.

use serde::{Deserialize, Serialize};

use courier_dispatch::HeaderName;

use crate::message::SoapVersion;

/// Fault code categories shared by SOAP 1.1 and 1.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultCode {
    /// The message was faulty at the sender's end (1.1 `Client`,
    /// 1.2 `Sender`).
    Sender,
    /// The receiver could not process the message (1.1 `Server`,
    /// 1.2 `Receiver`).
    Receiver,
    /// A mandatory header block was not understood.
    MustUnderstand,
    /// The envelope namespace did not match the expected version.
    VersionMismatch,
}

impl FaultCode {
    /// Returns the version-specific code label.
    #[must_use]
    pub const fn label(self, version: SoapVersion) -> &'static str {
        match (self, version) {
            (Self::Sender, SoapVersion::V11) => "Client",
            (Self::Sender, SoapVersion::V12) => "Sender",
            (Self::Receiver, SoapVersion::V11) => "Server",
            (Self::Receiver, SoapVersion::V12) => "Receiver",
            (Self::MustUnderstand, _) => "MustUnderstand",
            (Self::VersionMismatch, _) => "VersionMismatch",
        }
    }
}

/// Description of a fault to place into a response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoapFault {
    code: FaultCode,
    reason: String,
    locale: String,
    role: Option<String>,
    not_understood: Vec<HeaderName>,
}

impl SoapFault {
    /// Creates a fault with the given code and locale-qualified reason.
    #[must_use]
    pub fn new(code: FaultCode, reason: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
            locale: locale.into(),
            role: None,
            not_understood: Vec::new(),
        }
    }

    /// Attributes the fault to a processing role or actor.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Attaches the names of not-understood header blocks (SOAP 1.2).
    #[must_use]
    pub fn with_not_understood(mut self, headers: Vec<HeaderName>) -> Self {
        self.not_understood = headers;
        self
    }

    /// Returns the fault code.
    #[must_use]
    pub const fn code(&self) -> FaultCode {
        self.code
    }

    /// Returns the human-readable reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the language tag qualifying the reason.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Returns the faulting role, if attributed.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Returns the not-understood header names attached to the fault.
    #[must_use]
    pub fn not_understood(&self) -> &[HeaderName] {
        &self.not_understood
    }
}
