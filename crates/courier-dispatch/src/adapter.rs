//! Endpoint invocation adapters.
//!
//! Adapters decouple the dispatcher from endpoint shapes: each adapter
//! declares which endpoints it supports and knows how to invoke them. The
//! dispatcher scans its configured adapters in order and the first
//! supporting adapter wins; a resolved endpoint no adapter supports is a
//! configuration defect, not a runtime condition.

use crate::context::MessageContext;
use crate::endpoint::Endpoint;
use crate::errors::EndpointError;

/// Strategy invoking endpoints of a particular shape.
pub trait EndpointAdapter: Send + Sync {
    /// Returns `true` when this adapter knows how to invoke the endpoint.
    fn supports(&self, endpoint: &Endpoint) -> bool;

    /// Invokes the endpoint.
    ///
    /// The endpoint may write a response into the context or leave it
    /// absent; absence is a valid fire-and-forget outcome.
    ///
    /// # Errors
    ///
    /// Returns the endpoint's error, or an error when the endpoint shape
    /// does not match this adapter.
    fn invoke(&self, context: &mut MessageContext, endpoint: &Endpoint)
    -> Result<(), EndpointError>;
}

/// Adapter for [`Endpoint::Message`] endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageHandlerAdapter;

impl MessageHandlerAdapter {
    /// Creates the adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EndpointAdapter for MessageHandlerAdapter {
    fn supports(&self, endpoint: &Endpoint) -> bool {
        matches!(endpoint, Endpoint::Message(_))
    }

    fn invoke(
        &self,
        context: &mut MessageContext,
        endpoint: &Endpoint,
    ) -> Result<(), EndpointError> {
        let Endpoint::Message(handler) = endpoint else {
            return Err(EndpointError::msg(format!(
                "message handler adapter cannot invoke {} endpoint",
                endpoint.kind()
            )));
        };
        handler.handle(context)
    }
}

/// Adapter for fire-and-forget [`Endpoint::Sink`] endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinkHandlerAdapter;

impl SinkHandlerAdapter {
    /// Creates the adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EndpointAdapter for SinkHandlerAdapter {
    fn supports(&self, endpoint: &Endpoint) -> bool {
        matches!(endpoint, Endpoint::Sink(_))
    }

    fn invoke(
        &self,
        context: &mut MessageContext,
        endpoint: &Endpoint,
    ) -> Result<(), EndpointError> {
        let Endpoint::Sink(handler) = endpoint else {
            return Err(EndpointError::msg(format!(
                "sink handler adapter cannot invoke {} endpoint",
                endpoint.kind()
            )));
        };
        handler.consume(context.request())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::mock;

    use super::*;
    use crate::endpoint::MessageHandler;
    use crate::test_support::{StubMessage, StubMessageFactory};

    mock! {
        Handler {}

        impl MessageHandler for Handler {
            fn handle(&self, context: &mut MessageContext) -> Result<(), EndpointError>;
        }
    }

    fn make_context() -> MessageContext {
        MessageContext::new(Box::new(StubMessage::new()), Arc::new(StubMessageFactory))
    }

    #[test]
    fn message_adapter_supports_only_message_endpoints() {
        let adapter = MessageHandlerAdapter::new();
        assert!(adapter.supports(&Endpoint::Message(Arc::new(MockHandler::new()))));
        assert!(!adapter.supports(&Endpoint::custom(())));
    }

    #[test]
    fn message_adapter_delegates_to_the_handler() {
        let mut handler = MockHandler::new();
        handler.expect_handle().times(1).returning(|_| Ok(()));

        let adapter = MessageHandlerAdapter::new();
        let mut context = make_context();
        let endpoint = Endpoint::Message(Arc::new(handler));
        assert!(adapter.invoke(&mut context, &endpoint).is_ok());
    }

    #[test]
    fn message_adapter_rejects_foreign_endpoint_shapes() {
        let adapter = MessageHandlerAdapter::new();
        let mut context = make_context();
        let error = adapter
            .invoke(&mut context, &Endpoint::custom(()))
            .expect_err("custom endpoint should be rejected");
        assert!(error.to_string().contains("cannot invoke"));
    }

    #[test]
    fn sink_adapter_never_creates_a_response() {
        struct Recorder;

        impl crate::endpoint::SinkHandler for Recorder {
            fn consume(
                &self,
                _request: &dyn crate::context::Message,
            ) -> Result<(), EndpointError> {
                Ok(())
            }
        }

        let adapter = SinkHandlerAdapter::new();
        let mut context = make_context();
        let endpoint = Endpoint::sink(Recorder);
        assert!(adapter.supports(&endpoint));
        assert!(adapter.invoke(&mut context, &endpoint).is_ok());
        assert!(!context.has_response());
    }
}
