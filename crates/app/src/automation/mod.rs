//! Light automation engine — drives every configured light from presence,
//! manual overrides and ambient light.
//!
//! The engine is a plain state machine: the runtime hands it one
//! [`HostEvent`] at a time through `&mut self`, so no two handlers ever
//! interleave. Delayed actions go through the [`TimerSupervisor`]; an
//! expiry that was cancelled or superseded in the meantime is rejected
//! before its callback runs.
//!
//! Incoming state changes are routed through a table built once per light
//! from [`LightAutomationConfig::roles`]: each observed entity maps to the
//! lights that care about it and the [`EntityRole`] it plays for them.

mod callbacks;
mod flags;
mod illuminance;
mod light;
mod presence;
mod readings;
mod tuning;


pub use flags::{FlagStore, LightFlags};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use luxhub_domain::automation::{EntityRole, LightAutomationBuilder, LightAutomationConfig};
use luxhub_domain::event::StateChange;
use luxhub_domain::id::EntityId;
use luxhub_domain::timer::{TimerKey, TimerKind, TimerPayload};

use crate::ports::{Expiry, HostBus, HostEvent, Scheduler};
use crate::timers::TimerSupervisor;

type Route = (EntityId, EntityRole);

/// Reactive controller for every configured light.
pub struct LightAutomationEngine<H, S: Scheduler<TimerPayload>> {
    host: H,
    timers: TimerSupervisor<S, TimerPayload>,
    flags: FlagStore,
    lights: HashMap<EntityId, Arc<LightAutomationConfig>>,
    routes: HashMap<EntityId, Vec<Route>>,
}

impl<H, S> LightAutomationEngine<H, S>
where
    H: HostBus,
    S: Scheduler<TimerPayload>,
{
    /// Create an engine with no light configured.
    #[must_use]
    pub fn new(host: H, scheduler: S) -> Self {
        Self {
            host,
            timers: TimerSupervisor::new(scheduler),
            flags: FlagStore::default(),
            lights: HashMap::new(),
            routes: HashMap::new(),
        }
    }

    /// Validate and register light configurations.
    ///
    /// A configuration that fails validation is logged and skipped; the
    /// others are loaded regardless. Returns how many lights were loaded.
    pub fn load(&mut self, lights: impl IntoIterator<Item = LightAutomationBuilder>) -> usize {
        let mut loaded = 0;
        for builder in lights {
            match builder.build() {
                Ok(config) => {
                    if self.add_light(config) {
                        loaded += 1;
                    }
                }
                Err(err) => {
                    tracing::error!(error = ?err, "skipping misconfigured light automation");
                }
            }
        }
        loaded
    }

    /// Register one validated light and subscribe to everything it observes.
    ///
    /// Returns `false` when the light is already automated.
    pub fn add_light(&mut self, config: LightAutomationConfig) -> bool {
        if self.lights.contains_key(&config.light) {
            tracing::error!(light = %config.light, "light already automated, ignoring duplicate");
            return false;
        }
        for (entity, role) in config.roles() {
            let routes = self.routes.entry(entity.clone()).or_default();
            if routes.is_empty() {
                self.host.subscribe(&entity);
            }
            routes.push((config.light.clone(), role));
        }
        tracing::info!(
            light = %config.light,
            presence_on = ?config.presence_on.as_ref().map(EntityId::as_str),
            presence_off = ?config.presence_off.as_ref().map(EntityId::as_str),
            illuminance = ?config.illuminance_sensor.as_ref().map(EntityId::as_str),
            "light automation loaded"
        );
        self.lights.insert(config.light.clone(), Arc::new(config));
        true
    }

    /// Process one event to completion.
    pub fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::StateChanged(change) => self.handle_state_change(&change),
            HostEvent::TimerFired(expiry) => self.handle_timer(&expiry),
        }
    }

    /// React to a state change of an observed entity.
    #[tracing::instrument(skip_all, fields(entity = %change.entity_id))]
    pub fn handle_state_change(&mut self, change: &StateChange) {
        if !change.is_change() {
            tracing::trace!("value unchanged, ignoring");
            return;
        }
        let Some(routes) = self.routes.get(&change.entity_id).cloned() else {
            tracing::trace!("entity not observed");
            return;
        };
        tracing::debug!(old = %change.old, new = %change.new, "state changed");

        for (light, role) in &routes {
            if let Some(config) = self.lights.get(light).cloned() {
                self.dispatch(&config, *role, change);
            }
        }

        // flows shared by both presence sensors run once per light
        let mut handled: Vec<&EntityId> = Vec::new();
        for (light, role) in &routes {
            if !role.is_presence() || handled.contains(&light) {
                continue;
            }
            handled.push(light);
            if let Some(config) = self.lights.get(light).cloned() {
                self.on_presence_changed(&config, change);
            }
        }
    }

    /// Run the callback of an elapsed timer, unless it is stale.
    #[tracing::instrument(skip_all, fields(key = %expiry.key, generation = expiry.generation))]
    pub fn handle_timer(&mut self, expiry: &Expiry<TimerPayload>) {
        if !self.timers.accept(expiry) {
            return;
        }
        match self.lights.get(&expiry.payload.light).cloned() {
            Some(config) => self.on_timer_fired(&config, expiry.payload.kind),
            None => tracing::warn!(light = %expiry.payload.light, "timer fired for an unknown light"),
        }
        self.timers.complete(expiry);
    }

    /// Cancel every live timer. Returns how many were cancelled.
    pub fn shutdown(&mut self) -> usize {
        let cancelled = self.timers.cancel_all(None);
        tracing::info!(cancelled, "light automation engine stopped");
        cancelled
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub fn timers(&self) -> &TimerSupervisor<S, TimerPayload> {
        &self.timers
    }

    /// Runtime flags of `light`.
    #[must_use]
    pub fn flags(&self, light: &EntityId) -> LightFlags {
        self.flags.get(light)
    }

    #[must_use]
    pub fn light(&self, light: &EntityId) -> Option<&LightAutomationConfig> {
        self.lights.get(light).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Whether the `kind` timer of `light` is live.
    #[must_use]
    pub fn is_timer_active(&self, light: &EntityId, kind: TimerKind) -> bool {
        self.timers
            .is_timer_active(&TimerKey::for_light(light, kind), kind.family())
    }

    fn dispatch(&mut self, config: &LightAutomationConfig, role: EntityRole, change: &StateChange) {
        match role {
            EntityRole::PresenceOn => {
                if change.is_turning_on() {
                    self.on_presence_detected(config);
                } else if change.new.is_off() {
                    self.on_presence_on_cleared(config);
                }
            }
            EntityRole::PresenceOff => {
                if change.new.is_off() {
                    self.on_presence_lost(config);
                    self.arm_on_time_reenable(config);
                }
            }
            EntityRole::Light => {
                if change.entered_on() {
                    self.on_light_turned_on(config);
                } else if change.entered_off() {
                    self.on_light_turned_off(config);
                }
            }
            EntityRole::Illuminance => self.on_illuminance(config, &change.new),
            EntityRole::Numeric(setting) => self.on_numeric_changed(config, setting, change),
            EntityRole::AutomationEnabled => self.on_automation_toggled(config, change),
            EntityRole::AutoEnableMode => self.on_mode_changed(config, change),
        }
    }

    fn start(&mut self, light: &EntityId, kind: TimerKind, delay: Duration) {
        let payload = TimerPayload::new(light.clone(), kind);
        self.timers
            .start_timer(payload.key(), delay, kind.family(), payload);
    }

    fn cancel(&mut self, light: &EntityId, kind: TimerKind) -> bool {
        self.timers
            .cancel_timer(&TimerKey::for_light(light, kind), kind.family())
    }

    fn is_active(&self, light: &EntityId, kind: TimerKind) -> bool {
        self.is_timer_active(light, kind)
    }

    /// Live at the latest generation allocated for its key.
    fn is_current(&self, light: &EntityId, kind: TimerKind) -> bool {
        let key = TimerKey::for_light(light, kind);
        let generation = self.timers.current_generation(&key, kind.family());
        self.timers.is_valid(&key, generation, kind.family())
    }
}
