//! # luxhub-app
//!
//! Application layer — the light automation engine and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `HostBus` — point-read entity values, subscribe, invoke services
//!   - `Scheduler` — deliver a timer expiry after a delay, best-effort cancel
//!   - `EventPublisher` — push host events into the engine's queue
//! - Provide the **timer supervisor**: generational, cancellable delayed actions
//! - Provide the **light automation engine**: presence, manual override and
//!   illuminance handling for every configured light
//! - Provide **in-process infrastructure** (event bus, tokio scheduler, runtime loop)
//!
//! ## Dependency rule
//! Depends on `luxhub-domain` only (plus `tokio` for channels and sleeping tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod automation;
pub mod event_bus;
pub mod ports;
pub mod runtime;
pub mod scheduler;
pub mod timers;
