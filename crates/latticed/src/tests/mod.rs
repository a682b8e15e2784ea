//! Test suites for the node bootstrap.

mod registration_behaviour;
mod support;
