//! # luxhub-adapter-virtual
//!
//! In-memory stand-ins for the home-automation host, used by tests and by
//! the demo daemon.
//!
//! ## Provided adapters
//!
//! | Adapter | Port | Behaviour |
//! |---------|------|-----------|
//! | [`VirtualHost`] | `HostBus` | Holds entity states, records and applies service calls, publishes changes of subscribed entities |
//! | [`VirtualScheduler`] | `Scheduler` | Manual clock: deliveries only happen when a test pulls them |
//!
//! ## Dependency rule
//!
//! Depends on `luxhub-app` (port traits) and `luxhub-domain` only.

mod host;
mod scheduler;

pub use host::VirtualHost;
pub use scheduler::VirtualScheduler;
