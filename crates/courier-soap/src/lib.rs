//! SOAP extension for the courier dispatch engine.
//!
//! The crate adds the protocol-aware half of dispatch: SOAP envelope
//! abstractions ([`SoapMessage`], [`HeaderBlock`], [`SoapFault`]) and the
//! mandatory pre-dispatch validation of must-understand headers. The
//! [`MustUnderstandValidator`] plugs into a
//! [`MessageDispatcher`](courier_dispatch::MessageDispatcher) through the
//! request-guard seam: before any interceptor or endpoint runs it checks
//! that every mandatory header block addressed to the current processing
//! node is claimed by at least one interceptor in the resolved chain, and
//! otherwise writes a must-understand fault into the response and aborts
//! the chain.
//!
//! Envelope construction and parsing stay with marshalling collaborators:
//! this crate only defines the trait surface the validator and the shipped
//! [`SimpleSoapFaultResolver`] need, generic over the concrete envelope
//! type a transport provides.

pub mod dispatcher;
pub mod fault;
pub mod message;
pub mod resolver;
pub mod validator;

pub use courier_dispatch::HeaderName;

pub use self::dispatcher::soap_message_dispatcher;
pub use self::fault::{FaultCode, SoapFault};
pub use self::message::{HeaderBlock, SoapMessage, SoapVersion};
pub use self::resolver::SimpleSoapFaultResolver;
pub use self::validator::{DEFAULT_MUST_UNDERSTAND_FAULT_REASON, MustUnderstandValidator};
