//! Shared envelope stub for cross-component SOAP tests.
//!
//! Unlike the minimal stub in the validator unit tests, this envelope
//! implements the version-specific header selection rules: a block is
//! addressed to the node when its role is the version's "next" URI,
//! matches one of the node's role identifiers, or names no role while the
//! node acts as ultimate receiver.

use std::any::Any;
use std::sync::Arc;

use courier_dispatch::{Message, MessageContext, MessageFactory};
use courier_soap::{HeaderBlock, SoapFault, SoapMessage, SoapVersion};

/// In-memory SOAP envelope.
#[derive(Debug)]
pub struct StubEnvelope {
    version: SoapVersion,
    headers: Vec<HeaderBlock>,
    fault: Option<SoapFault>,
}

impl StubEnvelope {
    /// Creates an envelope of the given version with no headers.
    pub fn new(version: SoapVersion) -> Self {
        Self {
            version,
            headers: Vec::new(),
            fault: None,
        }
    }

    /// Appends a header block.
    pub fn with_header(mut self, block: HeaderBlock) -> Self {
        self.headers.push(block);
        self
    }
}

impl Message for StubEnvelope {
    fn has_payload(&self) -> bool {
        true
    }

    fn has_fault(&self) -> bool {
        self.fault.is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl SoapMessage for StubEnvelope {
    fn soap_version(&self) -> SoapVersion {
        self.version
    }

    fn headers_to_process(&self, roles: &[String], ultimate_receiver: bool) -> Vec<HeaderBlock> {
        self.headers
            .iter()
            .filter(|block| match block.role() {
                Some(role) if role == self.version.next_role() => true,
                Some(role) => roles.iter().any(|declared| declared == role),
                None => ultimate_receiver,
            })
            .cloned()
            .collect()
    }

    fn set_fault(&mut self, fault: SoapFault) {
        self.fault = Some(fault);
    }

    fn fault(&self) -> Option<&SoapFault> {
        self.fault.as_ref()
    }
}

/// Factory producing empty envelopes of a fixed version.
pub struct EnvelopeFactory(pub SoapVersion);

impl MessageFactory for EnvelopeFactory {
    fn create_message(&self) -> Box<dyn Message> {
        Box::new(StubEnvelope::new(self.0))
    }
}

/// Builds a context around the given request envelope.
pub fn envelope_context(request: StubEnvelope) -> MessageContext {
    let version = request.soap_version();
    MessageContext::new(Box::new(request), Arc::new(EnvelopeFactory(version)))
}

/// Returns the fault response downcast to the stub envelope.
///
/// # Panics
///
/// Panics when the context holds no stub envelope response.
pub fn fault_response(context: &MessageContext) -> &SoapFault {
    context
        .existing_response()
        .and_then(|message| message.as_any().downcast_ref::<StubEnvelope>())
        .and_then(StubEnvelope::fault)
        .expect("expected a fault response")
}
