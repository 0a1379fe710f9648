//! Scheduler layer for the deployer
//!
//! Time-boxed polling: the bounded tick source and the wait for every
//! machine and unit to report "started".

pub mod poller;
pub mod waiter;

pub use poller::until_timeout;
pub use waiter::ConvergenceWaiter;
