//! Behavioural tests for anchor-registration failure escalation.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::bootstrap::BootstrapError;
use crate::dispatch::WorkerError;
use crate::tests::support::WorkerWorld;

type StepResult = Result<(), String>;

#[fixture]
fn world() -> RefCell<WorkerWorld> {
    RefCell::new(WorkerWorld::new())
}

#[given("a worker whose anchor list is {anchors}")]
fn given_anchor_list(world: &RefCell<WorkerWorld>, anchors: String) {
    world.borrow_mut().set_anchors(&anchors);
}

#[given("a registry that rejects anchor {anchor}")]
fn given_rejected_anchor(world: &RefCell<WorkerWorld>, anchor: String) {
    world.borrow().registry.reject_anchor(&anchor);
}

#[when("that worker bootstraps")]
fn when_worker_bootstraps(world: &RefCell<WorkerWorld>) {
    world.borrow_mut().run_worker();
}

#[then("bootstrap fails naming anchor {anchor}")]
fn then_failure_names_anchor(world: &RefCell<WorkerWorld>, anchor: String) -> StepResult {
    let world = world.borrow();
    let error = world.last_error().ok_or("worker run unexpectedly succeeded")?;
    match error {
        WorkerError::Bootstrap(BootstrapError::Register { .. }) => {}
        other => return Err(format!("unexpected error kind: {other}")),
    }
    if !error.to_string().contains(&anchor) {
        return Err(format!("diagnostic does not name '{anchor}': {error}"));
    }
    Ok(())
}

#[then("only anchors before the failing one are registered")]
fn then_earlier_anchors_survive(world: &RefCell<WorkerWorld>) -> StepResult {
    let world = world.borrow();
    let names: Vec<_> = world
        .registry
        .registered()
        .into_iter()
        .map(|(_, name, _)| name)
        .collect();
    if names != vec![String::from("svc/a")] {
        return Err(format!("unexpected surviving registrations: {names:?}"));
    }
    Ok(())
}

#[then("no readiness message is sent")]
fn then_no_readiness(world: &RefCell<WorkerWorld>) {
    let world = world.borrow();
    assert!(world.sink.sent().is_empty(), "no readiness may be signalled");
    assert_eq!(world.parker.parks(), 0, "a failed worker must not park");
}

#[scenario(path = "tests/features/registration_failure.feature")]
fn registration_failure(#[from(world)] _: RefCell<WorkerWorld>) -> Result<(), String> {
    Ok(())
}
