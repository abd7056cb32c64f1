//! End-to-end timing scenarios across pump, timer, and signal.
//!
//! These tests exercise the pieces together the way a component
//! harness does: a countdown armed on one thread, delivered on the
//! pump thread, observed by a blocked test thread through a signal.

use portico_sync::{DelayTimer, Signal, SignalError, TimerPump};
use portico_types::ErrorCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn signaled_timer(pump: &Arc<TimerPump>, name: &str) -> (DelayTimer, Arc<Signal>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let timer = DelayTimer::new(Arc::clone(pump));
    let signal = Arc::new(Signal::named(name));
    let producer = Arc::clone(&signal);
    timer.port().timeout.bind(move |()| producer.trigger());
    (timer, signal)
}

#[test]
fn countdown_trips_the_signal_within_its_window() {
    let pump = Arc::new(TimerPump::new());
    let (timer, fired) = signaled_timer(&pump, "window");

    let started = Instant::now();
    timer.create(50);

    fired
        .await_triggered(Duration::from_millis(200))
        .expect("countdown elapses within the observation window");
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[test]
fn canceled_countdown_leaves_the_signal_silent() {
    let pump = Arc::new(TimerPump::new());
    let (timer, fired) = signaled_timer(&pump, "silent");

    timer.create(50);
    std::thread::sleep(Duration::from_millis(10));
    timer.cancel();

    let err = fired
        .await_triggered(Duration::from_millis(100))
        .expect_err("the canceled countdown must not trigger");
    assert_eq!(err.code(), "SYNC_WAIT_TIMEOUT");
    assert!(err.is_recoverable());
}

#[test]
fn timeout_diagnostic_names_the_signal_and_the_bound() {
    let pump = Arc::new(TimerPump::new());
    let (_timer, fired) = signaled_timer(&pump, "toast-done");

    let err = fired
        .await_triggered(Duration::from_millis(20))
        .expect_err("nothing was armed");
    match err {
        SignalError::TimedOut { signal, waited } => {
            assert_eq!(signal, "toast-done");
            assert_eq!(waited, Duration::from_millis(20));
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
}

#[test]
fn one_signal_serves_consecutive_countdowns() {
    let pump = Arc::new(TimerPump::new());
    let (timer, fired) = signaled_timer(&pump, "cycles");

    for cycle in 0..3 {
        timer.create(10);
        fired
            .await_triggered(Duration::from_millis(500))
            .unwrap_or_else(|e| panic!("cycle {cycle} failed: {e}"));
    }
    assert_eq!(pump.pending(), 0);
}

#[test]
fn rearming_mid_flight_yields_exactly_one_timeout() {
    let pump = Arc::new(TimerPump::new());
    let timer = DelayTimer::new(Arc::clone(&pump));

    let count = Arc::new(AtomicUsize::new(0));
    let signal = Arc::new(Signal::named("replaced"));
    let (observer, producer) = (Arc::clone(&count), Arc::clone(&signal));
    timer.port().timeout.bind(move |()| {
        observer.fetch_add(1, Ordering::SeqCst);
        producer.trigger();
    });

    timer.create(40);
    timer.create(15);

    signal
        .await_triggered(Duration::from_millis(500))
        .expect("the replacement countdown fires");
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(
        count.load(Ordering::SeqCst),
        1,
        "the replaced countdown must not fire a second timeout"
    );
}

#[test]
fn timers_share_one_pump_without_interference() {
    let pump = Arc::new(TimerPump::new());
    let (short, short_fired) = signaled_timer(&pump, "short");
    let (long, long_fired) = signaled_timer(&pump, "long");

    long.create(80);
    short.create(10);

    short_fired
        .await_triggered(Duration::from_millis(500))
        .expect("short countdown fires first");
    long_fired
        .await_triggered(Duration::from_millis(500))
        .expect("long countdown still fires");
}

#[test]
fn cancel_from_the_pump_thread_is_allowed() {
    let pump = Arc::new(TimerPump::new());
    let victim = DelayTimer::new(Arc::clone(&pump));
    victim.create(60_000);

    let done = Arc::new(Signal::named("canceled"));
    let producer = Arc::clone(&done);
    let pump_side = Arc::clone(&pump);
    let victim_handle = victim.handle();
    pump.schedule(Duration::from_millis(10), move || {
        pump_side.unschedule(victim_handle);
        producer.trigger();
    });

    done.await_triggered(Duration::from_secs(2))
        .expect("pump-thread cancel completes");
    assert_eq!(pump.pending(), 0);
}

#[test]
fn trigger_retained_across_early_completion() {
    // Countdown so short it fires before the wait begins; the trigger
    // must be retained, not lost.
    let pump = Arc::new(TimerPump::new());
    let (timer, fired) = signaled_timer(&pump, "early");

    timer.create(0);
    std::thread::sleep(Duration::from_millis(50));

    fired
        .await_triggered(Duration::ZERO)
        .expect("retained trigger satisfies a zero-bound wait");
}
