//! Unit tests for the interceptor contract.

use std::sync::Arc;

use super::*;
use crate::test_support::{StubMessage, StubMessageFactory};

/// Interceptor overriding nothing, to exercise the defaults.
struct Passive;

impl EndpointInterceptor for Passive {}

fn make_context() -> MessageContext {
    MessageContext::new(Box::new(StubMessage::new()), Arc::new(StubMessageFactory))
}

#[test]
fn default_hooks_continue_and_claim_nothing() {
    let interceptor = Passive;
    let endpoint = Endpoint::custom(());
    let mut context = make_context();

    assert_eq!(
        interceptor
            .before_invoke(&mut context, &endpoint)
            .map_err(|e| e.to_string()),
        Ok(Flow::Continue)
    );
    assert_eq!(
        interceptor
            .after_success(&mut context, &endpoint)
            .map_err(|e| e.to_string()),
        Ok(Flow::Continue)
    );
    assert_eq!(
        interceptor
            .after_fault(&mut context, &endpoint)
            .map_err(|e| e.to_string()),
        Ok(Flow::Continue)
    );
    assert!(
        interceptor
            .on_completion(&mut context, &endpoint, None)
            .is_ok()
    );
    assert!(!interceptor.understands(&HeaderName::new("urn:example", "Token")));
}

#[test]
fn logging_interceptor_always_continues() {
    let interceptor = MessageLoggingInterceptor::new();
    let endpoint = Endpoint::custom(());
    let mut context = make_context();

    assert!(matches!(
        interceptor.before_invoke(&mut context, &endpoint),
        Ok(Flow::Continue)
    ));
    assert!(matches!(
        interceptor.after_success(&mut context, &endpoint),
        Ok(Flow::Continue)
    ));
    assert!(matches!(
        interceptor.after_fault(&mut context, &endpoint),
        Ok(Flow::Continue)
    ));
}
