//! End-to-end tests for the full luxhubd stack.
//!
//! Each test wires the same pieces as the daemon (event bus, virtual host,
//! engine) and drives the virtual devices the way a person would. The tokio
//! clock is paused so multi-minute timers elapse instantly.

use std::sync::Arc;
use std::time::Duration;

use luxhub_adapter_virtual::{VirtualHost, VirtualScheduler};
use luxhub_app::automation::LightAutomationEngine;
use luxhub_app::event_bus::{EventSender, InProcessEventBus};
use luxhub_app::ports::{HostBus, HostEvent};
use luxhub_app::runtime::AutomationRuntime;
use luxhub_app::scheduler::TokioScheduler;
use luxhub_domain::automation::LightAutomationBuilder;
use luxhub_domain::id::EntityId;
use luxhub_domain::state::StateValue;
use luxhub_domain::timer::{TimerKind, TimerPayload};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const LIGHT: &str = "light.kitchen";
const MOTION: &str = "binary_sensor.kitchen_motion";
const LUX: &str = "sensor.kitchen_lux";
const AUTO: &str = "input_boolean.kitchen_automation";

fn id(value: &str) -> EntityId {
    EntityId::new(value).unwrap()
}

/// The kitchen as it would be written in `luxhub.toml`.
fn kitchen() -> LightAutomationBuilder {
    toml::from_str(
        r#"
        light = "light.kitchen"
        presence_on = "binary_sensor.kitchen_motion"
        illuminance_sensor = "sensor.kitchen_lux"
        enable_automation = "input_boolean.kitchen_automation"
        enable_sensor = true
        timer_on_push = 5
        "#,
    )
    .unwrap()
}

fn seed() -> Vec<(EntityId, StateValue)> {
    vec![
        (id(LIGHT), StateValue::Off),
        (id(MOTION), StateValue::Off),
        (id(LUX), StateValue::Number(10.0)),
        (id(AUTO), StateValue::On),
    ]
}

type Engine = LightAutomationEngine<Arc<VirtualHost<EventSender>>, TokioScheduler>;

struct Daemon {
    host: Arc<VirtualHost<EventSender>>,
    stop: oneshot::Sender<()>,
    task: JoinHandle<Engine>,
}

impl Daemon {
    fn start(lights: Vec<LightAutomationBuilder>) -> Self {
        let bus = InProcessEventBus::new();
        let host = Arc::new(VirtualHost::new(bus.sender()).with_states(seed()));
        let mut engine = LightAutomationEngine::new(host.clone(), TokioScheduler::new(bus.sender()));
        engine.load(lights);

        let (stop, stopped) = oneshot::channel::<()>();
        let runtime = AutomationRuntime::new(engine, bus.into_receiver());
        let task = tokio::spawn(runtime.run(async {
            let _ = stopped.await;
        }));
        Self { host, stop, task }
    }

    fn set(&self, entity: &str, value: StateValue) {
        self.host.set_state(&id(entity), value);
    }

    fn state(&self, entity: &str) -> StateValue {
        self.host.state(&id(entity))
    }

    async fn stop(self) -> Engine {
        self.stop.send(()).unwrap();
        self.task.await.unwrap()
    }
}

async fn wait(seconds: u64) {
    tokio::time::sleep(Duration::from_secs(seconds)).await;
}

// ---------------------------------------------------------------------------
// Presence
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_follow_presence_through_a_visit() {
    let daemon = Daemon::start(vec![kitchen()]);

    daemon.set(MOTION, StateValue::On);
    wait(1).await;
    assert!(daemon.state(LIGHT).is_on());

    daemon.set(MOTION, StateValue::Off);
    wait(29).await;
    assert!(daemon.state(LIGHT).is_on());
    wait(2).await;
    assert!(daemon.state(LIGHT).is_off());

    let engine = daemon.stop().await;
    assert!(engine.timers().active_timers(None).is_empty());
}

#[tokio::test(start_paused = true)]
async fn should_keep_light_on_while_room_occupied() {
    let daemon = Daemon::start(vec![kitchen()]);

    daemon.set(MOTION, StateValue::On);
    wait(1).await;
    daemon.set(MOTION, StateValue::Off);
    wait(20).await;
    daemon.set(MOTION, StateValue::On);
    wait(120).await;

    assert!(daemon.state(LIGHT).is_on());
    daemon.stop().await;
}

// ---------------------------------------------------------------------------
// Manual override
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_suspend_automation_after_manual_off() {
    let daemon = Daemon::start(vec![kitchen()]);

    daemon.set(MOTION, StateValue::On);
    wait(10).await;
    daemon.set(LIGHT, StateValue::Off);
    wait(4 * 60).await;
    assert!(daemon.state(AUTO).is_on());
    wait(61).await;

    assert!(daemon.state(AUTO).is_off());
    let calls: Vec<String> = daemon.host.calls().iter().map(ToString::to_string).collect();
    assert_eq!(
        calls,
        [
            "light.turn_on(light.kitchen)",
            "input_boolean.turn_off(input_boolean.kitchen_automation)",
        ]
    );
    daemon.stop().await;
}

#[tokio::test(start_paused = true)]
async fn should_reenable_automation_once_room_stays_empty() {
    let daemon = Daemon::start(vec![kitchen()]);

    daemon.set(AUTO, StateValue::Off);
    wait(29 * 60).await;
    assert!(daemon.state(AUTO).is_off());
    wait(61).await;

    assert!(daemon.state(AUTO).is_on());
    daemon.stop().await;
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_run_remaining_lights_when_one_is_misconfigured() {
    let broken: LightAutomationBuilder = toml::from_str(r#"light = "light.attic""#).unwrap();
    let daemon = Daemon::start(vec![broken, kitchen()]);

    daemon.set(MOTION, StateValue::On);
    wait(1).await;

    assert!(daemon.state(LIGHT).is_on());
    let engine = daemon.stop().await;
    assert_eq!(engine.light_count(), 1);
}

// ---------------------------------------------------------------------------
// Deterministic clock
// ---------------------------------------------------------------------------

type ManualEngine =
    LightAutomationEngine<Arc<VirtualHost<EventSender>>, Arc<VirtualScheduler<TimerPayload>>>;

/// Drive the engine by hand with the manual-clock scheduler: deliver the
/// events queued on the bus, then every expiry due by `until`.
fn drain(
    engine: &mut ManualEngine,
    scheduler: &VirtualScheduler<TimerPayload>,
    events: &mut tokio::sync::mpsc::UnboundedReceiver<HostEvent>,
    until: Duration,
) {
    loop {
        while let Ok(event) = events.try_recv() {
            engine.handle(event);
        }
        match scheduler.next_due(until) {
            Some(expiry) => engine.handle(HostEvent::TimerFired(expiry)),
            None => break,
        }
    }
}

#[test]
fn should_replay_a_visit_on_a_manual_clock() {
    let bus = InProcessEventBus::new();
    let host = Arc::new(VirtualHost::new(bus.sender()).with_states(seed()));
    let scheduler = Arc::new(VirtualScheduler::new());
    let mut engine = LightAutomationEngine::new(host.clone(), scheduler.clone());
    assert_eq!(engine.load([kitchen()]), 1);
    let mut events = bus.into_receiver();
    assert!(host.is_subscribed(&id(MOTION)));

    host.set_state(&id(MOTION), StateValue::On);
    drain(&mut engine, &scheduler, &mut events, Duration::ZERO);
    assert!(host.read_value(&id(LIGHT)).is_on());
    assert!(engine.is_timer_active(&id(LIGHT), TimerKind::Illuminance));

    drain(&mut engine, &scheduler, &mut events, Duration::from_secs(5));
    assert!(!engine.flags(&id(LIGHT)).illuminance_lock);

    host.set_state(&id(MOTION), StateValue::Off);
    drain(&mut engine, &scheduler, &mut events, Duration::from_secs(34));
    assert!(host.read_value(&id(LIGHT)).is_on());
    drain(&mut engine, &scheduler, &mut events, Duration::from_secs(35));
    assert!(host.read_value(&id(LIGHT)).is_off());
    assert_eq!(scheduler.pending_count(), 0);
}
