//! Service layer
//!
//! Deployment logic built on the orchestration and HTTP collaborators:
//! the readiness probe and the full deployment sequence.

mod deploy;
pub(crate) mod readiness;

pub use deploy::deploy_stack;
