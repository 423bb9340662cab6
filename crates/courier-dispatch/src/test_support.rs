//! In-memory stubs and recording doubles for dispatch tests.
//!
//! The recording doubles append `"name.hook"` entries to a shared call log
//! so order-sensitive chain tests can assert the exact hook sequence. They
//! are compiled for this crate's own tests and, behind the `test-support`
//! feature, for downstream crates' test suites.

use std::any::Any;
use std::sync::{Arc, Mutex};

use crate::chain::InvocationChain;
use crate::context::{Message, MessageContext, MessageFactory};
use crate::endpoint::{Endpoint, MessageHandler};
use crate::errors::{DispatchError, EndpointError};
use crate::header::HeaderName;
use crate::interceptor::{EndpointInterceptor, Flow};
use crate::mapping::EndpointMapping;
use crate::resolver::EndpointExceptionResolver;

/// Shared call log collected by the recording doubles.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Creates an empty call log.
#[must_use]
pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Drains the call log into a plain vector for assertions.
///
/// # Panics
///
/// Panics when the log mutex is poisoned; acceptable in tests.
#[must_use]
pub fn recorded(log: &CallLog) -> Vec<String> {
    log.lock().expect("call log poisoned").clone()
}

fn record(log: &CallLog, entry: String) {
    log.lock().expect("call log poisoned").push(entry);
}

/// Minimal in-memory message.
#[derive(Debug, Default)]
pub struct StubMessage {
    payload: bool,
    fault: bool,
}

impl StubMessage {
    /// Creates a message carrying a payload and no fault.
    #[must_use]
    pub fn new() -> Self {
        Self {
            payload: true,
            fault: false,
        }
    }

    /// Creates a payload-less message.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            payload: false,
            fault: false,
        }
    }

    /// Marks or clears the fault flag.
    pub fn set_fault(&mut self, fault: bool) {
        self.fault = fault;
    }
}

impl Message for StubMessage {
    fn has_payload(&self) -> bool {
        self.payload
    }

    fn has_fault(&self) -> bool {
        self.fault
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Factory producing [`StubMessage`] responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubMessageFactory;

impl MessageFactory for StubMessageFactory {
    fn create_message(&self) -> Box<dyn Message> {
        Box::new(StubMessage::new())
    }
}

/// Builds a context around a fresh stub request.
#[must_use]
pub fn stub_context() -> MessageContext {
    MessageContext::new(Box::new(StubMessage::new()), Arc::new(StubMessageFactory))
}

/// What a [`RecordingEndpoint`] writes into the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Respond {
    /// Leave the response absent (fire-and-forget shape).
    Nothing,
    /// Create a plain response.
    Response,
    /// Create a response marked as a fault.
    Fault,
}

/// Message endpoint that records its invocation.
pub struct RecordingEndpoint {
    name: &'static str,
    log: CallLog,
    respond: Respond,
    fail: bool,
}

impl RecordingEndpoint {
    /// Creates an endpoint that writes a plain response.
    #[must_use]
    pub fn new(name: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            log: Arc::clone(log),
            respond: Respond::Response,
            fail: false,
        }
    }

    /// Configures what the endpoint writes.
    #[must_use]
    pub fn responding(mut self, respond: Respond) -> Self {
        self.respond = respond;
        self
    }

    /// Makes the endpoint fail with an invocation error.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Wraps the endpoint into an [`Endpoint::Message`] handle.
    #[must_use]
    pub fn into_endpoint(self) -> Endpoint {
        Endpoint::Message(Arc::new(self))
    }
}

impl MessageHandler for RecordingEndpoint {
    fn handle(&self, context: &mut MessageContext) -> Result<(), EndpointError> {
        record(&self.log, format!("{}.handle", self.name));
        if self.fail {
            return Err(EndpointError::msg(format!("{} failed", self.name)));
        }
        match self.respond {
            Respond::Nothing => {}
            Respond::Response => {
                context.response();
            }
            Respond::Fault => {
                if let Some(stub) = context.response().as_any_mut().downcast_mut::<StubMessage>()
                {
                    stub.set_fault(true);
                }
            }
        }
        Ok(())
    }
}

/// Interceptor that records every hook call.
pub struct RecordingInterceptor {
    name: &'static str,
    log: CallLog,
    before_flow: Flow,
    after_flow: Flow,
    respond_on_stop: bool,
    fail_before: bool,
    fail_completion: bool,
    understood: Vec<HeaderName>,
}

impl RecordingInterceptor {
    /// Creates a pass-through recording interceptor.
    #[must_use]
    pub fn new(name: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            log: Arc::clone(log),
            before_flow: Flow::Continue,
            after_flow: Flow::Continue,
            respond_on_stop: false,
            fail_before: false,
            fail_completion: false,
            understood: Vec::new(),
        }
    }

    /// Makes `before_invoke` stop the chain.
    #[must_use]
    pub fn stopping(mut self) -> Self {
        self.before_flow = Flow::Stop;
        self
    }

    /// Makes the interceptor create a response when it stops the chain.
    #[must_use]
    pub fn responding_on_stop(mut self) -> Self {
        self.respond_on_stop = true;
        self
    }

    /// Makes both after-hooks stop the reverse walk.
    #[must_use]
    pub fn stopping_after(mut self) -> Self {
        self.after_flow = Flow::Stop;
        self
    }

    /// Makes `before_invoke` fail with an invocation error.
    #[must_use]
    pub fn failing_before(mut self) -> Self {
        self.fail_before = true;
        self
    }

    /// Makes `on_completion` fail.
    #[must_use]
    pub fn failing_completion(mut self) -> Self {
        self.fail_completion = true;
        self
    }

    /// Declares a header this interceptor understands.
    #[must_use]
    pub fn understanding(mut self, header: HeaderName) -> Self {
        self.understood.push(header);
        self
    }
}

impl EndpointInterceptor for RecordingInterceptor {
    fn before_invoke(
        &self,
        context: &mut MessageContext,
        _endpoint: &Endpoint,
    ) -> Result<Flow, EndpointError> {
        record(&self.log, format!("{}.before", self.name));
        if self.fail_before {
            return Err(EndpointError::msg(format!("{} before failed", self.name)));
        }
        if self.before_flow == Flow::Stop && self.respond_on_stop {
            context.response();
        }
        Ok(self.before_flow)
    }

    fn after_success(
        &self,
        _context: &mut MessageContext,
        _endpoint: &Endpoint,
    ) -> Result<Flow, EndpointError> {
        record(&self.log, format!("{}.after_success", self.name));
        Ok(self.after_flow)
    }

    fn after_fault(
        &self,
        _context: &mut MessageContext,
        _endpoint: &Endpoint,
    ) -> Result<Flow, EndpointError> {
        record(&self.log, format!("{}.after_fault", self.name));
        Ok(self.after_flow)
    }

    fn on_completion(
        &self,
        _context: &mut MessageContext,
        _endpoint: &Endpoint,
        _error: Option<&DispatchError>,
    ) -> Result<(), EndpointError> {
        record(&self.log, format!("{}.completion", self.name));
        if self.fail_completion {
            return Err(EndpointError::msg(format!(
                "{} completion failed",
                self.name
            )));
        }
        Ok(())
    }

    fn understands(&self, header: &HeaderName) -> bool {
        self.understood.contains(header)
    }
}

/// Mapping that records resolution and returns a fixed chain.
pub struct RecordingMapping {
    name: &'static str,
    log: CallLog,
    chain: Option<InvocationChain>,
    fail: bool,
}

impl RecordingMapping {
    /// Creates a mapping producing the given chain.
    #[must_use]
    pub fn new(name: &'static str, log: &CallLog, chain: InvocationChain) -> Self {
        Self {
            name,
            log: Arc::clone(log),
            chain: Some(chain),
            fail: false,
        }
    }

    /// Creates a mapping that never matches.
    #[must_use]
    pub fn unmatched(name: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            log: Arc::clone(log),
            chain: None,
            fail: false,
        }
    }

    /// Creates a mapping that fails with a resolution error.
    #[must_use]
    pub fn failing(name: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            log: Arc::clone(log),
            chain: None,
            fail: true,
        }
    }
}

impl EndpointMapping for RecordingMapping {
    fn resolve(&self, _context: &MessageContext) -> Result<Option<InvocationChain>, EndpointError> {
        record(&self.log, format!("{}.resolve", self.name));
        if self.fail {
            return Err(EndpointError::msg(format!("{} resolution failed", self.name)));
        }
        Ok(self.chain.clone())
    }
}

/// Exception resolver that records consultation.
pub struct RecordingResolver {
    name: &'static str,
    log: CallLog,
    handled: bool,
    respond: Respond,
}

impl RecordingResolver {
    /// Creates a resolver with the given outcome; a handling resolver
    /// writes a plain recovery response.
    #[must_use]
    pub fn new(name: &'static str, log: &CallLog, handled: bool) -> Self {
        Self {
            name,
            log: Arc::clone(log),
            handled,
            respond: Respond::Response,
        }
    }

    /// Configures what a handling resolver writes into the context.
    #[must_use]
    pub fn responding(mut self, respond: Respond) -> Self {
        self.respond = respond;
        self
    }
}

impl EndpointExceptionResolver for RecordingResolver {
    fn resolve(
        &self,
        context: &mut MessageContext,
        _endpoint: Option<&Endpoint>,
        _error: &DispatchError,
    ) -> bool {
        record(&self.log, format!("{}.resolve", self.name));
        if !self.handled {
            return false;
        }
        match self.respond {
            Respond::Nothing => {}
            Respond::Response => {
                context.response();
            }
            Respond::Fault => {
                if let Some(stub) = context.response().as_any_mut().downcast_mut::<StubMessage>()
                {
                    stub.set_fault(true);
                }
            }
        }
        true
    }
}
