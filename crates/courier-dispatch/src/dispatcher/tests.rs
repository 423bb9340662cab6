//! Unit tests for the dispatch state machine.
//!
//! The recording doubles append `"name.hook"` entries to a shared log, so
//! these tests assert the exact call sequence each dispatch produces.

use std::sync::Arc;

use super::*;
use crate::adapter::MessageHandlerAdapter;
use crate::errors::EndpointError;
use crate::test_support::{
    CallLog, RecordingEndpoint, RecordingInterceptor, RecordingMapping, RecordingResolver,
    Respond, call_log, recorded, stub_context,
};

fn chain_with(
    endpoint: RecordingEndpoint,
    interceptors: Vec<Arc<dyn crate::interceptor::EndpointInterceptor>>,
) -> InvocationChain {
    InvocationChain::new(endpoint.into_endpoint()).with_interceptors(interceptors)
}

fn dispatcher_for(log: &CallLog, chain: InvocationChain) -> MessageDispatcher {
    MessageDispatcher::new()
        .with_mapping(RecordingMapping::new("m0", log, chain))
        .with_adapter(MessageHandlerAdapter::new())
}

// ---------------------------------------------------------------------------
// Mapping resolution
// ---------------------------------------------------------------------------

#[test]
fn first_matching_mapping_wins_and_later_mappings_are_not_consulted() {
    let log = call_log();
    let chain = chain_with(RecordingEndpoint::new("e", &log), Vec::new());
    let dispatcher = MessageDispatcher::new()
        .with_mapping(RecordingMapping::unmatched("m0", &log))
        .with_mapping(RecordingMapping::new("m1", &log, chain.clone()))
        .with_mapping(RecordingMapping::new("m2", &log, chain))
        .with_adapter(MessageHandlerAdapter::new());

    let mut context = stub_context();
    dispatcher.dispatch(&mut context).expect("dispatch");

    assert_eq!(recorded(&log), ["m0.resolve", "m1.resolve", "e.handle"]);
}

#[test]
fn exhausted_mappings_raise_no_endpoint_found_without_resolvers() {
    let log = call_log();
    let dispatcher = MessageDispatcher::new()
        .with_mapping(RecordingMapping::unmatched("m0", &log))
        .with_resolver(RecordingResolver::new("r0", &log, true));

    let mut context = stub_context();
    let error = dispatcher
        .dispatch(&mut context)
        .expect_err("dispatch should fail");

    assert!(matches!(error, DispatchError::NoEndpointFound));
    assert_eq!(recorded(&log), ["m0.resolve"]);
}

#[test]
fn empty_mapping_list_raises_no_endpoint_found() {
    let log = call_log();
    let dispatcher =
        MessageDispatcher::new().with_resolver(RecordingResolver::new("r0", &log, true));

    let mut context = stub_context();
    let error = dispatcher
        .dispatch(&mut context)
        .expect_err("dispatch should fail");

    assert!(matches!(error, DispatchError::NoEndpointFound));
    assert!(recorded(&log).is_empty(), "resolver list must stay untouched");
}

#[test]
fn mapping_errors_reach_resolvers_without_an_endpoint() {
    let log = call_log();
    let dispatcher = MessageDispatcher::new()
        .with_mapping(RecordingMapping::failing("m0", &log))
        .with_adapter(MessageHandlerAdapter::new())
        .with_resolver(RecordingResolver::new("r0", &log, true));

    let mut context = stub_context();
    dispatcher
        .dispatch(&mut context)
        .expect("resolved mapping errors complete the dispatch");

    assert_eq!(recorded(&log), ["m0.resolve", "r0.resolve"]);
    assert!(context.has_response());
}

// ---------------------------------------------------------------------------
// Adapter resolution
// ---------------------------------------------------------------------------

#[test]
fn missing_adapter_is_a_configuration_error_and_fires_no_hooks() {
    let log = call_log();
    let chain = chain_with(
        RecordingEndpoint::new("e", &log),
        vec![Arc::new(RecordingInterceptor::new("i0", &log))],
    );
    // No adapter registered at all.
    let dispatcher = MessageDispatcher::new()
        .with_mapping(RecordingMapping::new("m0", &log, chain))
        .with_resolver(RecordingResolver::new("r0", &log, true));

    let mut context = stub_context();
    let error = dispatcher
        .dispatch(&mut context)
        .expect_err("dispatch should fail");

    assert!(matches!(error, DispatchError::NoAdapter { .. }));
    assert_eq!(recorded(&log), ["m0.resolve"], "no hook or resolver may run");
}

// ---------------------------------------------------------------------------
// Interceptor chain ordering
// ---------------------------------------------------------------------------

#[test]
fn successful_dispatch_unwinds_after_hooks_in_reverse() {
    let log = call_log();
    let chain = chain_with(
        RecordingEndpoint::new("e", &log),
        vec![
            Arc::new(RecordingInterceptor::new("i0", &log)),
            Arc::new(RecordingInterceptor::new("i1", &log)),
        ],
    );
    let dispatcher = dispatcher_for(&log, chain);

    let mut context = stub_context();
    dispatcher.dispatch(&mut context).expect("dispatch");

    assert_eq!(
        recorded(&log),
        [
            "m0.resolve",
            "i0.before",
            "i1.before",
            "e.handle",
            "i1.after_success",
            "i0.after_success",
            "i1.completion",
            "i0.completion",
        ]
    );
}

#[test]
fn stopping_before_hook_skips_invocation_and_unwinds_only_itself() {
    let log = call_log();
    let chain = chain_with(
        RecordingEndpoint::new("e", &log),
        vec![
            Arc::new(
                RecordingInterceptor::new("i0", &log)
                    .stopping()
                    .responding_on_stop(),
            ),
            Arc::new(RecordingInterceptor::new("i1", &log)),
        ],
    );
    let dispatcher = dispatcher_for(&log, chain);

    let mut context = stub_context();
    dispatcher.dispatch(&mut context).expect("dispatch");

    assert_eq!(
        recorded(&log),
        ["m0.resolve", "i0.before", "i0.after_success", "i0.completion"]
    );
}

#[test]
fn stopping_before_hook_without_response_still_completes() {
    let log = call_log();
    let chain = chain_with(
        RecordingEndpoint::new("e", &log),
        vec![
            Arc::new(RecordingInterceptor::new("i0", &log).stopping()),
            Arc::new(RecordingInterceptor::new("i1", &log)),
        ],
    );
    let dispatcher = dispatcher_for(&log, chain);

    let mut context = stub_context();
    dispatcher.dispatch(&mut context).expect("dispatch");

    // No response, so the after-phase is skipped; the completion phase is
    // unconditional over the prefix that ran.
    assert_eq!(recorded(&log), ["m0.resolve", "i0.before", "i0.completion"]);
}

#[test]
fn after_hook_stop_curtails_earlier_interceptors_only() {
    let log = call_log();
    let chain = chain_with(
        RecordingEndpoint::new("e", &log),
        vec![
            Arc::new(RecordingInterceptor::new("i0", &log)),
            Arc::new(RecordingInterceptor::new("i1", &log)),
            Arc::new(RecordingInterceptor::new("i2", &log).stopping_after()),
        ],
    );
    let dispatcher = dispatcher_for(&log, chain);

    let mut context = stub_context();
    dispatcher.dispatch(&mut context).expect("dispatch");

    assert_eq!(
        recorded(&log),
        [
            "m0.resolve",
            "i0.before",
            "i1.before",
            "i2.before",
            "e.handle",
            "i2.after_success",
            "i2.completion",
            "i1.completion",
            "i0.completion",
        ]
    );
}

#[test]
fn fault_responses_take_the_fault_branch() {
    let log = call_log();
    let chain = chain_with(
        RecordingEndpoint::new("e", &log).responding(Respond::Fault),
        vec![
            Arc::new(RecordingInterceptor::new("i0", &log)),
            Arc::new(RecordingInterceptor::new("i1", &log)),
        ],
    );
    let dispatcher = dispatcher_for(&log, chain);

    let mut context = stub_context();
    dispatcher.dispatch(&mut context).expect("dispatch");

    assert_eq!(
        recorded(&log),
        [
            "m0.resolve",
            "i0.before",
            "i1.before",
            "e.handle",
            "i1.after_fault",
            "i0.after_fault",
            "i1.completion",
            "i0.completion",
        ]
    );
}

#[test]
fn fire_and_forget_endpoints_skip_the_after_phase() {
    let log = call_log();
    let chain = chain_with(
        RecordingEndpoint::new("e", &log).responding(Respond::Nothing),
        vec![Arc::new(RecordingInterceptor::new("i0", &log))],
    );
    let dispatcher = dispatcher_for(&log, chain);

    let mut context = stub_context();
    dispatcher.dispatch(&mut context).expect("dispatch");

    assert_eq!(
        recorded(&log),
        ["m0.resolve", "i0.before", "e.handle", "i0.completion"]
    );
    assert!(!context.has_response());
}

#[test]
fn completion_hook_errors_are_swallowed() {
    let log = call_log();
    let chain = chain_with(
        RecordingEndpoint::new("e", &log),
        vec![
            Arc::new(RecordingInterceptor::new("i0", &log)),
            Arc::new(RecordingInterceptor::new("i1", &log).failing_completion()),
        ],
    );
    let dispatcher = dispatcher_for(&log, chain);

    let mut context = stub_context();
    dispatcher
        .dispatch(&mut context)
        .expect("completion errors must not change the outcome");

    assert_eq!(
        recorded(&log),
        [
            "m0.resolve",
            "i0.before",
            "i1.before",
            "e.handle",
            "i1.after_success",
            "i0.after_success",
            "i1.completion",
            "i0.completion",
        ]
    );
}

// ---------------------------------------------------------------------------
// Exception resolution
// ---------------------------------------------------------------------------

#[test]
fn second_resolver_handles_after_first_declines() {
    let log = call_log();
    let chain = chain_with(
        RecordingEndpoint::new("e", &log).failing(),
        vec![Arc::new(RecordingInterceptor::new("i0", &log))],
    );
    let dispatcher = dispatcher_for(&log, chain)
        .with_resolver(RecordingResolver::new("r0", &log, false))
        .with_resolver(RecordingResolver::new("r1", &log, true));

    let mut context = stub_context();
    dispatcher.dispatch(&mut context).expect("resolved dispatch");

    assert_eq!(
        recorded(&log),
        [
            "m0.resolve",
            "i0.before",
            "e.handle",
            "r0.resolve",
            "r1.resolve",
            "i0.after_success",
            "i0.completion",
        ]
    );
    assert!(context.has_response());
}

#[test]
fn resolver_synthesized_fault_takes_the_fault_branch() {
    let log = call_log();
    let chain = chain_with(
        RecordingEndpoint::new("e", &log).failing(),
        vec![Arc::new(RecordingInterceptor::new("i0", &log))],
    );
    let dispatcher = dispatcher_for(&log, chain)
        .with_resolver(RecordingResolver::new("r0", &log, true).responding(Respond::Fault));

    let mut context = stub_context();
    dispatcher.dispatch(&mut context).expect("resolved dispatch");

    assert_eq!(
        recorded(&log),
        [
            "m0.resolve",
            "i0.before",
            "e.handle",
            "r0.resolve",
            "i0.after_fault",
            "i0.completion",
        ]
    );
}

#[test]
fn unresolved_errors_are_rethrown_without_after_hooks() {
    let log = call_log();
    let chain = chain_with(
        RecordingEndpoint::new("e", &log).failing(),
        vec![Arc::new(RecordingInterceptor::new("i0", &log))],
    );
    let dispatcher = dispatcher_for(&log, chain)
        .with_resolver(RecordingResolver::new("r0", &log, false));

    let mut context = stub_context();
    let error = dispatcher
        .dispatch(&mut context)
        .expect_err("dispatch should rethrow");

    assert!(matches!(error, DispatchError::Invocation { .. }));
    assert!(error.to_string().contains("e failed"));
    assert_eq!(
        recorded(&log),
        ["m0.resolve", "i0.before", "e.handle", "r0.resolve"]
    );
}

#[test]
fn before_hook_errors_are_resolver_eligible() {
    let log = call_log();
    let chain = chain_with(
        RecordingEndpoint::new("e", &log),
        vec![
            Arc::new(RecordingInterceptor::new("i0", &log)),
            Arc::new(RecordingInterceptor::new("i1", &log).failing_before()),
        ],
    );
    let dispatcher = dispatcher_for(&log, chain)
        .with_resolver(RecordingResolver::new("r0", &log, true));

    let mut context = stub_context();
    dispatcher.dispatch(&mut context).expect("resolved dispatch");

    // The erroring interceptor is inside the unwind boundary, so both
    // interceptors participate in the after- and completion-phases.
    assert_eq!(
        recorded(&log),
        [
            "m0.resolve",
            "i0.before",
            "i1.before",
            "r0.resolve",
            "i1.after_success",
            "i0.after_success",
            "i1.completion",
            "i0.completion",
        ]
    );
}

// ---------------------------------------------------------------------------
// Guard integration
// ---------------------------------------------------------------------------

struct RejectingGuard {
    log: CallLog,
    respond: bool,
}

impl RequestGuard for RejectingGuard {
    fn inspect(
        &self,
        _chain: &InvocationChain,
        context: &mut MessageContext,
    ) -> Result<GuardVerdict, EndpointError> {
        self.log
            .lock()
            .expect("call log poisoned")
            .push("guard.inspect".to_owned());
        if self.respond {
            context.response();
        }
        Ok(GuardVerdict::Reject)
    }
}

#[test]
fn rejecting_guard_short_circuits_before_any_hook() {
    let log = call_log();
    let chain = chain_with(
        RecordingEndpoint::new("e", &log),
        vec![Arc::new(RecordingInterceptor::new("i0", &log))],
    );
    let dispatcher = dispatcher_for(&log, chain).with_guard(RejectingGuard {
        log: Arc::clone(&log),
        respond: true,
    });

    let mut context = stub_context();
    dispatcher.dispatch(&mut context).expect("guarded dispatch");

    assert_eq!(recorded(&log), ["m0.resolve", "guard.inspect"]);
    assert!(context.has_response());
}

struct FailingGuard;

impl RequestGuard for FailingGuard {
    fn inspect(
        &self,
        _chain: &InvocationChain,
        _context: &mut MessageContext,
    ) -> Result<GuardVerdict, EndpointError> {
        Err(EndpointError::msg("guard broke"))
    }
}

#[test]
fn guard_errors_are_resolver_eligible() {
    let log = call_log();
    let chain = chain_with(RecordingEndpoint::new("e", &log), Vec::new());
    let dispatcher = dispatcher_for(&log, chain)
        .with_guard(FailingGuard)
        .with_resolver(RecordingResolver::new("r0", &log, true));

    let mut context = stub_context();
    dispatcher.dispatch(&mut context).expect("resolved dispatch");

    assert_eq!(recorded(&log), ["m0.resolve", "r0.resolve"]);
}

// ---------------------------------------------------------------------------
// Receive wrapper
// ---------------------------------------------------------------------------

#[test]
fn receive_preserves_dispatch_semantics() {
    let log = call_log();
    let chain = chain_with(
        RecordingEndpoint::new("e", &log),
        vec![Arc::new(RecordingInterceptor::new("i0", &log))],
    );
    let dispatcher = dispatcher_for(&log, chain);

    let mut context = stub_context();
    dispatcher.receive(&mut context).expect("receive");

    assert_eq!(
        recorded(&log),
        [
            "m0.resolve",
            "i0.before",
            "e.handle",
            "i0.after_success",
            "i0.completion",
        ]
    );
    assert!(context.has_response());
}
