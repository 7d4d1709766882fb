//! # luxhubd — luxhub daemon
//!
//! Composition root that wires the adapters together and runs the light
//! automation engine.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Install the `tracing` subscriber
//! - Construct the event bus, the virtual host and the tokio scheduler
//! - Load every configured light into the engine
//! - Feed console input to the virtual host
//! - Run until SIGINT, then cancel every pending timer
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod console;

use std::sync::Arc;

use anyhow::Context;
use luxhub_adapter_virtual::VirtualHost;
use luxhub_app::automation::LightAutomationEngine;
use luxhub_app::event_bus::{EventSender, InProcessEventBus};
use luxhub_app::runtime::AutomationRuntime;
use luxhub_app::scheduler::TokioScheduler;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::load().context("loading configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter()?)
        .init();

    // Event bus
    let bus = InProcessEventBus::new();

    // Adapters
    let host = Arc::new(VirtualHost::new(bus.sender()).with_states(config.seed_states()));
    let scheduler = TokioScheduler::new(bus.sender());

    // Engine
    let configured = config.lights.len();
    let mut engine = LightAutomationEngine::new(host.clone(), scheduler);
    let loaded = engine.load(config.lights);
    if loaded == 0 {
        tracing::warn!(configured, "no light automation loaded");
    } else {
        tracing::info!(configured, loaded, "light automations loaded");
    }

    tokio::spawn(read_console(host));

    let runtime = AutomationRuntime::new(engine, bus.into_receiver());
    runtime.run(shutdown_signal()).await;
    Ok(())
}

async fn read_console(host: Arc<VirtualHost<EventSender>>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match console::parse_line(&line) {
                Ok(Some((entity_id, value))) => {
                    if !host.set_state(&entity_id, value) {
                        tracing::debug!(%entity_id, "state unchanged");
                    }
                }
                Ok(None) => {}
                Err(err) => tracing::warn!(%err, %line, "ignoring console input"),
            },
            Ok(None) => {
                tracing::debug!("console closed");
                break;
            }
            Err(err) => {
                tracing::error!(%err, "failed to read console");
                break;
            }
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
