//! # luxhub-domain
//!
//! Pure domain model for the luxhub light automation engine.
//!
//! ## Responsibilities
//! - Foundational types: entity identifiers, error conventions, timestamps
//! - Define **state values** as read from the host bus (`on`, `off`, numbers, …)
//! - Define **state changes** (old → new notifications) and **service calls**
//! - Define **settings** (entity-backed or fixed tunables) and automation **modes**
//! - Define the per-light **automation configuration** and its validation
//! - Define **timer identities**: kinds, families and namespaced keys
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod automation;
pub mod event;
pub mod mode;
pub mod service;
pub mod setting;
pub mod state;
pub mod timer;
