//! Runtime loop — drains the event bus into the engine.
//!
//! Events are handled strictly one at a time: a handler runs to completion,
//! including every service call and timer it issues, before the next event
//! is taken off the queue.

use std::future::Future;

use luxhub_domain::timer::TimerPayload;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::automation::LightAutomationEngine;
use crate::ports::{HostBus, HostEvent, Scheduler};

/// Owns the engine and the receiving end of the event bus.
pub struct AutomationRuntime<H, S: Scheduler<TimerPayload>> {
    engine: LightAutomationEngine<H, S>,
    receiver: UnboundedReceiver<HostEvent>,
}

impl<H, S> AutomationRuntime<H, S>
where
    H: HostBus,
    S: Scheduler<TimerPayload>,
{
    #[must_use]
    pub fn new(engine: LightAutomationEngine<H, S>, receiver: UnboundedReceiver<HostEvent>) -> Self {
        Self { engine, receiver }
    }

    /// Process events until `shutdown` resolves or every sender is dropped,
    /// then cancel all outstanding timers.
    ///
    /// The engine is handed back so callers can inspect its final state.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> LightAutomationEngine<H, S> {
        let mut shutdown = std::pin::pin!(shutdown);
        tracing::info!(lights = self.engine.light_count(), "automation runtime started");
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown requested");
                    break;
                }
                event = self.receiver.recv() => match event {
                    Some(event) => self.engine.handle(event),
                    None => {
                        tracing::info!("event bus closed");
                        break;
                    }
                },
            }
        }
        let cancelled = self.engine.shutdown();
        tracing::info!(cancelled, "automation runtime stopped");
        self.engine
    }
}
