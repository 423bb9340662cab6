//! Message abstraction and the per-dispatch message context.
//!
//! The engine never looks inside a message. The [`Message`] trait exposes
//! the two queries dispatch needs (payload presence and fault state) plus
//! `Any`-based downcasting so protocol-aware collaborators can reach their
//! concrete envelope types. The [`MessageContext`] is the single channel by
//! which the endpoint, interceptors, and exception resolvers communicate
//! results: it carries exactly one request, at most one lazily-created
//! response, and a per-dispatch property map.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Opaque request or response message.
///
/// Implementations are owned by transport and marshalling collaborators.
/// The dispatch engine only queries payload presence and fault state;
/// everything else is reached through downcasting by components that know
/// the concrete envelope type.
pub trait Message: Send {
    /// Returns `true` when the message carries a payload.
    fn has_payload(&self) -> bool;

    /// Returns `true` when the message represents a protocol-level fault.
    ///
    /// Messages from transports without a fault concept keep the default
    /// answer.
    fn has_fault(&self) -> bool {
        false
    }

    /// Returns the message as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns the message as mutable [`Any`] for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Factory for response messages.
///
/// The context holds a factory handle and consults it at most once per
/// dispatch, the first time the response is requested.
pub trait MessageFactory: Send + Sync {
    /// Creates an empty message suitable for use as a response.
    fn create_message(&self) -> Box<dyn Message>;
}

/// Mutable holder for the messages of one dispatch call.
///
/// The request is immutable once the context is constructed. The response
/// is created lazily on first access and persists for the remainder of the
/// dispatch; repeated access returns the same instance. Contexts are
/// created by the transport-facing caller and die when the dispatch call
/// returns.
pub struct MessageContext {
    request: Box<dyn Message>,
    response: Option<Box<dyn Message>>,
    factory: Arc<dyn MessageFactory>,
    properties: HashMap<String, serde_json::Value>,
}

impl MessageContext {
    /// Creates a context around the given request message.
    #[must_use]
    pub fn new(request: Box<dyn Message>, factory: Arc<dyn MessageFactory>) -> Self {
        Self {
            request,
            response: None,
            factory,
            properties: HashMap::new(),
        }
    }

    /// Returns the request message.
    #[must_use]
    pub fn request(&self) -> &dyn Message {
        self.request.as_ref()
    }

    /// Returns `true` when a response has been created.
    #[must_use]
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    /// Returns the response message, creating it on first access.
    ///
    /// Creation is idempotent: the factory is consulted at most once per
    /// context, and every call returns the same instance.
    pub fn response(&mut self) -> &mut dyn Message {
        let factory = Arc::clone(&self.factory);
        &mut **self.response.get_or_insert_with(|| factory.create_message())
    }

    /// Returns the response message if one has been created.
    #[must_use]
    pub fn existing_response(&self) -> Option<&dyn Message> {
        self.response.as_deref()
    }

    /// Stores a per-dispatch property.
    ///
    /// Properties let interceptors and endpoints pass metadata through one
    /// dispatch; they die with the context.
    pub fn set_property(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.properties.insert(name.into(), value);
    }

    /// Returns a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&serde_json::Value> {
        self.properties.get(name)
    }

    /// Removes a property, returning its value if it was set.
    pub fn remove_property(&mut self, name: &str) -> Option<serde_json::Value> {
        self.properties.remove(name)
    }
}
