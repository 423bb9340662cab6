//! Protocol-agnostic message dispatch engine.
//!
//! The `courier-dispatch` crate routes an inbound request message to an
//! application endpoint through ordered lists of pluggable strategies. A
//! [`MessageDispatcher`] owns four strategy lists, frozen at construction
//! time:
//!
//! - [`EndpointMapping`] implementations resolve a request to an
//!   [`InvocationChain`] (endpoint, interceptors, roles); the first mapping
//!   that matches wins.
//! - [`EndpointAdapter`] implementations declare which endpoint shapes they
//!   can invoke; the first adapter that supports the resolved endpoint
//!   performs the invocation.
//! - [`EndpointInterceptor`] hooks wrap the invocation with a symmetric
//!   before/after protocol: before-hooks run in registration order, after-
//!   hooks unwind in reverse over the prefix that ran.
//! - [`EndpointExceptionResolver`] implementations translate invocation
//!   failures into recovery responses; unrecovered errors are rethrown to
//!   the transport-facing caller.
//!
//! Messages themselves are opaque: the engine only asks whether a message
//! carries a payload or represents a protocol fault. Parsing,
//! serialization, and transport I/O are owned by collaborators behind the
//! [`Message`] and [`MessageFactory`] traits. Protocol-aware front-ends
//! (such as the SOAP layer in `courier-soap`) plug mandatory pre-dispatch
//! validation in through the [`RequestGuard`] seam.
//!
//! A dispatcher is `Send + Sync` and designed for concurrent reuse: all
//! per-request state lives in the [`MessageContext`] and the activation
//! frame of one [`MessageDispatcher::dispatch`] call.

pub mod adapter;
pub mod chain;
pub mod context;
pub mod dispatcher;
pub mod endpoint;
pub mod errors;
pub mod guard;
pub mod header;
pub mod interceptor;
pub mod mapping;
pub mod resolver;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use self::adapter::{EndpointAdapter, MessageHandlerAdapter, SinkHandlerAdapter};
pub use self::chain::InvocationChain;
pub use self::context::{Message, MessageContext, MessageFactory};
pub use self::dispatcher::MessageDispatcher;
pub use self::endpoint::{Endpoint, MessageHandler, SinkHandler};
pub use self::errors::{DispatchError, EndpointError};
pub use self::guard::{GuardVerdict, RequestGuard};
pub use self::header::HeaderName;
pub use self::interceptor::{EndpointInterceptor, Flow, MessageLoggingInterceptor};
pub use self::mapping::{EndpointMapping, KeyedEndpointMapping};
pub use self::resolver::EndpointExceptionResolver;
