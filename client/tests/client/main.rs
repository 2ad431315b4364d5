mod actions;
mod auth;
mod fetch;
mod remove;
mod submit;
mod transport;

use client::crud::{CrudOptions, CrudResource};
use client::resources::ResourceSpec;
use client::retry::RetryPolicy;
use std::time::Duration;
use test_helpers::TestApp;

/// A hook wired to the mock with a fast retry curve so failure tests
/// stay quick.
fn crud(app: &TestApp, spec: ResourceSpec) -> CrudResource {
    CrudResource::with_options(
        &app.backend(),
        spec,
        CrudOptions {
            retry: RetryPolicy::fixed(3, Duration::from_millis(20)),
            ..CrudOptions::default()
        },
    )
}
