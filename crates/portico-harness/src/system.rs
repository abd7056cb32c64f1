//! The asynchronous component the harness exists to exercise.
//!
//! [`ToasterSystem`] assembles the full port family around a small
//! toast-cycle state machine. The interesting part is not the state
//! machine itself but *where its transitions run*: inbound API
//! operations execute synchronously on the caller's thread, while the
//! cycle completion arrives on the timer pump's dispatch thread and
//! spontaneous power-cord events arrive on whatever thread the
//! provider raises them from. Tests observe all three.
//!
//! # Phases
//!
//! ```text
//!          initialize             toast (cord connected)
//!   Idle ─────────────► Ready ──────────────────────► Toasting
//!    ▲                    ▲                                │
//!    │   uninitialize     │      timeout → ok              │
//!    └────────────────────┴────────────────────────────────┘
//!                         ▲      disconnected → fail       │
//!                         └────────────────────────────────┘
//! ```

use parking_lot::Mutex;
use portico_port::{
    Ack, ConfigurationPort, HeaterElementPort, LedPort, PortError, PowerCordPort, ResultInfo,
    ToasterApiPort,
};
use portico_sync::{DelayTimer, TimerPump};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Ready,
    Toasting,
}

struct SystemState {
    phase: Phase,
    toasting_time_ms: u64,
}

/// An asynchronously-completing toaster component wired from ports.
///
/// Construction binds every inbound API operation and every dependency
/// *event* observer; the dependency ports' inbound operations are left
/// for the providers (mocks or real adapters) to bind. The component
/// never panics on a provider thread: an internal wiring gap surfaces
/// as an `error` event on the API port instead.
pub struct ToasterSystem {
    /// Topside API port the test driver invokes.
    pub api: ToasterApiPort,
    /// Heater element dependency port.
    pub heater: HeaterElementPort,
    /// Power cord dependency port.
    pub cord: PowerCordPort,
    /// Configuration dependency port.
    pub config: ConfigurationPort,
    /// Indicator led dependency port.
    pub led: LedPort,
    timer: DelayTimer,
    state: Arc<Mutex<SystemState>>,
}

impl ToasterSystem {
    /// Assembles the component on the given timer pump.
    #[must_use]
    pub fn new(pump: Arc<TimerPump>) -> Self {
        let api = ToasterApiPort::new();
        let heater = HeaterElementPort::new();
        let cord = PowerCordPort::new();
        let config = ConfigurationPort::new();
        let led = LedPort::new();
        let timer = DelayTimer::new(pump);
        let state = Arc::new(Mutex::new(SystemState {
            phase: Phase::Idle,
            toasting_time_ms: 0,
        }));

        // -- inbound API operations (caller's thread) --

        {
            let (heater, cord, led, config) =
                (heater.clone(), cord.clone(), led.clone(), config.clone());
            let (error, state) = (api.error.clone(), Arc::clone(&state));
            api.initialize.bind(move |()| {
                let result = (|| -> Result<(), PortError> {
                    heater.initialize.invoke(())?;
                    let ack = cord.initialize.invoke("toaster".into())?;
                    if ack == Ack::Fail {
                        warn!("power cord driver refused initialization");
                    }
                    led.initialize.invoke(())?;
                    let time_ms = config.get_toasting_time.invoke(())?;
                    let mut state = state.lock();
                    state.toasting_time_ms = time_ms;
                    state.phase = Phase::Ready;
                    debug!(time_ms, "system initialized");
                    Ok(())
                })();
                if let Err(err) = result {
                    report(&error, &err);
                }
            });
        }

        {
            let (heater, cord, led) = (heater.clone(), cord.clone(), led.clone());
            let (error, state, timer_port) =
                (api.error.clone(), Arc::clone(&state), timer.port().clone());
            api.uninitialize.bind(move |()| {
                let result = (|| -> Result<(), PortError> {
                    if state.lock().phase == Phase::Toasting {
                        timer_port.cancel.invoke(())?;
                        heater.off.invoke(())?;
                    }
                    heater.uninitialize.invoke(())?;
                    cord.uninitialize.invoke(())?;
                    led.uninitialize.invoke(())?;
                    state.lock().phase = Phase::Idle;
                    debug!("system uninitialized");
                    Ok(())
                })();
                if let Err(err) = result {
                    report(&error, &err);
                }
            });
        }

        {
            let state = Arc::clone(&state);
            api.get_time.bind(move |()| state.lock().toasting_time_ms);
        }

        {
            let state = Arc::clone(&state);
            api.set_time.bind(move |time_ms| {
                state.lock().toasting_time_ms = time_ms;
                debug!(time_ms, "toasting time overridden");
            });
        }

        {
            let (heater, cord) = (heater.clone(), cord.clone());
            let (fail, error) = (api.fail.clone(), api.error.clone());
            let (state, timer_port) = (Arc::clone(&state), timer.port().clone());
            api.toast.bind(move |name: String| {
                if state.lock().phase == Phase::Idle {
                    error.emit(ResultInfo::new("toast requested before initialize"));
                    return Ack::Fail;
                }
                let result = (|| -> Result<Ack, PortError> {
                    if !cord.is_connected_to_outlet.invoke(())? {
                        fail.emit(
                            ResultInfo::new("no mains power")
                                .with_details(json!({ "item": name })),
                        );
                        return Ok(Ack::Fail);
                    }
                    heater.on.invoke(())?;
                    let time_ms = {
                        let mut state = state.lock();
                        state.phase = Phase::Toasting;
                        state.toasting_time_ms
                    };
                    timer_port.create.invoke(time_ms)?;
                    debug!(item = %name, time_ms, "toast cycle started");
                    Ok(Ack::Ok)
                })();
                match result {
                    Ok(ack) => ack,
                    Err(err) => {
                        report(&error, &err);
                        Ack::Fail
                    }
                }
            });
        }

        // -- countdown completion (pump thread) --

        {
            let heater = heater.clone();
            let (ok, error, state) = (api.ok.clone(), api.error.clone(), Arc::clone(&state));
            timer.port().timeout.bind(move |()| {
                {
                    let mut state = state.lock();
                    if state.phase != Phase::Toasting {
                        debug!("stale timeout ignored");
                        return;
                    }
                    state.phase = Phase::Ready;
                }
                match heater.off.invoke(()) {
                    Ok(()) => {
                        debug!("toast cycle completed");
                        ok.emit(());
                    }
                    Err(err) => report(&error, &err),
                }
            });
        }

        // -- spontaneous power cord events (provider's thread) --

        cord.connected.bind(|()| {
            debug!("mains power appeared");
        });

        {
            let heater = heater.clone();
            let (fail, error) = (api.fail.clone(), api.error.clone());
            let (state, timer_port) = (Arc::clone(&state), timer.port().clone());
            cord.disconnected.bind(move |info: ResultInfo| {
                {
                    let mut state = state.lock();
                    if state.phase != Phase::Toasting {
                        debug!(reason = %info.reason, "disconnect outside a toast cycle");
                        return;
                    }
                    state.phase = Phase::Ready;
                }
                let result = (|| -> Result<(), PortError> {
                    timer_port.cancel.invoke(())?;
                    heater.off.invoke(())?;
                    Ok(())
                })();
                match result {
                    Ok(()) => {
                        warn!(reason = %info.reason, "toast cycle aborted");
                        fail.emit(info);
                    }
                    Err(err) => report(&error, &err),
                }
            });
        }

        Self {
            api,
            heater,
            cord,
            config,
            led,
            timer,
            state,
        }
    }

    /// Returns whether a toast cycle is currently running.
    #[must_use]
    pub fn is_toasting(&self) -> bool {
        self.state.lock().phase == Phase::Toasting
    }

    /// Returns the timer facility backing the countdown.
    #[must_use]
    pub fn timer(&self) -> &DelayTimer {
        &self.timer
    }
}

impl std::fmt::Debug for ToasterSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToasterSystem")
            .field("phase", &self.state.lock().phase)
            .finish()
    }
}

/// Routes an internal wiring failure to the API `error` event.
///
/// Runs on pump and provider threads where panicking would tear down
/// the wrong thread, so the failure is reported, never thrown.
fn report(error: &portico_port::Event<ResultInfo>, err: &PortError) {
    warn!(%err, "internal port failure");
    error.emit(ResultInfo::new(err.to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn provider_stubbed_system() -> ToasterSystem {
        let system = ToasterSystem::new(Arc::new(TimerPump::new()));
        system.heater.initialize.bind(|()| {});
        system.heater.uninitialize.bind(|()| {});
        system.heater.on.bind(|()| {});
        system.heater.off.bind(|()| {});
        system.cord.initialize.bind(|_label| Ack::Ok);
        system.cord.uninitialize.bind(|()| {});
        system.cord.is_connected_to_outlet.bind(|()| true);
        system.cord.get_voltage.bind(|()| 230);
        system.config.get_toasting_time.bind(|()| 20);
        system.led.initialize.bind(|()| {});
        system.led.uninitialize.bind(|()| {});
        system
    }

    #[test]
    fn initialize_reads_configuration() {
        let system = provider_stubbed_system();
        system.api.initialize.invoke(()).expect("api wired");
        assert_eq!(system.api.get_time.invoke(()).expect("api wired"), 20);
    }

    #[test]
    fn set_time_overrides_configuration() {
        let system = provider_stubbed_system();
        system.api.initialize.invoke(()).expect("api wired");
        system.api.set_time.invoke(5_000).expect("api wired");
        assert_eq!(system.api.get_time.invoke(()).expect("api wired"), 5_000);
    }

    #[test]
    fn toast_before_initialize_is_refused_with_error_event() {
        let system = provider_stubbed_system();
        let errors = Arc::new(AtomicUsize::new(0));
        let observer = Arc::clone(&errors);
        system.api.error.bind(move |_info| {
            observer.fetch_add(1, Ordering::SeqCst);
        });

        let ack = system.api.toast.invoke("bagel".into()).expect("api wired");
        assert_eq!(ack, Ack::Fail);
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn toast_without_mains_power_fails() {
        let system = provider_stubbed_system();
        system.cord.is_connected_to_outlet.bind(|()| false);

        let fails = Arc::new(AtomicUsize::new(0));
        let observer = Arc::clone(&fails);
        system.api.fail.bind(move |info| {
            assert_eq!(info.reason, "no mains power");
            observer.fetch_add(1, Ordering::SeqCst);
        });

        system.api.initialize.invoke(()).expect("api wired");
        let ack = system.api.toast.invoke("bagel".into()).expect("api wired");
        assert_eq!(ack, Ack::Fail);
        assert_eq!(fails.load(Ordering::SeqCst), 1);
        assert!(!system.is_toasting());
    }

    #[test]
    fn completed_cycle_emits_ok_and_turns_heater_off() {
        let system = provider_stubbed_system();
        let (tx, rx) = std::sync::mpsc::channel();
        system.api.ok.bind(move |()| {
            tx.send(()).ok();
        });

        system.api.initialize.invoke(()).expect("api wired");
        let ack = system.api.toast.invoke("bread".into()).expect("api wired");
        assert_eq!(ack, Ack::Ok);
        assert!(system.is_toasting());

        rx.recv_timeout(Duration::from_secs(2))
            .expect("cycle completes");
        assert!(!system.is_toasting());
    }

    #[test]
    fn disconnect_during_cycle_aborts_with_fail() {
        let system = provider_stubbed_system();
        let (tx, rx) = std::sync::mpsc::channel();
        system.api.fail.bind(move |info: ResultInfo| {
            tx.send(info.reason).ok();
        });

        system.api.initialize.invoke(()).expect("api wired");
        system.api.set_time.invoke(60_000).expect("api wired");
        system.api.toast.invoke("bread".into()).expect("api wired");

        system.cord.disconnected.emit(ResultInfo::new("plug pulled"));

        let reason = rx
            .recv_timeout(Duration::from_secs(1))
            .expect("abort is reported");
        assert_eq!(reason, "plug pulled");
        assert!(!system.is_toasting());
    }

    #[test]
    fn disconnect_outside_cycle_is_ignored() {
        let system = provider_stubbed_system();
        let fails = Arc::new(AtomicUsize::new(0));
        let observer = Arc::clone(&fails);
        system.api.fail.bind(move |_info| {
            observer.fetch_add(1, Ordering::SeqCst);
        });

        system.api.initialize.invoke(()).expect("api wired");
        system.cord.disconnected.emit(ResultInfo::new("plug pulled"));
        assert_eq!(fails.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn provider_gap_surfaces_as_error_event() {
        let pump = Arc::new(TimerPump::new());
        let system = ToasterSystem::new(pump);
        // Only the heater is wired; cord.initialize is missing.
        system.heater.initialize.bind(|()| {});

        let errors = Arc::new(AtomicUsize::new(0));
        let observer = Arc::clone(&errors);
        system.api.error.bind(move |info: ResultInfo| {
            assert!(info.reason.contains("power_cord"));
            observer.fetch_add(1, Ordering::SeqCst);
        });

        system.api.initialize.invoke(()).expect("api wired");
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }
}
