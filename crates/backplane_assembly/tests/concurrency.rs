//! Concurrent access tests for a linked assembly.
//!
//! After `link()` completes, capability access is a pure, lock-free lookup:
//! multiple threads may call `access` on the same composition root without
//! synchronization, because nothing mutates after the one-time linking pass.

use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;
use std::thread;

use backplane_assembly::prelude::*;
use backplane_core::prelude::*;

// ─────────────────────────────────────────────────────────────────────────
// Test Capability and Modules
// ─────────────────────────────────────────────────────────────────────────

/// A counter capability with interior atomics, so concurrent callers can
/// exercise the implementation without framework-level locking.
#[derive(Default)]
struct Metrics {
    hits: AtomicUsize,
}

impl Metrics {
    fn record(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn total(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }
}

#[derive(Default)]
struct MetricsModule {
    metrics: Metrics,
}

impl Provide<Metrics> for MetricsModule {
    fn interface(&self) -> &Metrics {
        &self.metrics
    }
}

impl Module for MetricsModule {
    fn manifest(&self) -> Manifest {
        Manifest::new().provides(Provides::new().capability::<Self, Metrics>())
    }
}

#[derive(Default)]
struct Probe {
    port: BoundPort,
}

impl Module for Probe {
    fn manifest(&self) -> Manifest {
        Manifest::new().requires(Requires::new().capability::<Metrics>())
    }

    fn bind(&self, port: Port) {
        self.port.install(port);
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn concurrent_root_access_from_multiple_threads() {
    let assembly = Assembly::compose((MetricsModule::default(), Probe::default())).unwrap();
    assembly.link();

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..100 {
                    let metrics = assembly.access::<Metrics>().unwrap();
                    metrics.record();
                }
            });
        }
    });

    assert_eq!(assembly.access::<Metrics>().unwrap().total(), 400);
}

#[test]
fn concurrent_port_access_resolves_to_one_instance() {
    let assembly = Assembly::compose((MetricsModule::default(), Probe::default())).unwrap();
    assembly.link();

    let probe = assembly.get_module::<Probe>().unwrap();
    let barrier = Barrier::new(4);

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                // Line every thread up so the accesses genuinely overlap.
                barrier.wait();
                for _ in 0..50 {
                    let metrics = probe.port.access::<Metrics>().unwrap();
                    metrics.record();
                }
            });
        }
    });

    // Every thread hit the same provider-owned implementation.
    let direct = assembly.get_module::<MetricsModule>().unwrap();
    assert_eq!(direct.metrics.total(), 200);
}

#[test]
fn guards_held_across_threads_observe_the_same_state() {
    let assembly = Assembly::compose((MetricsModule::default(), Probe::default())).unwrap();
    assembly.link();

    let reader = assembly.access::<Metrics>().unwrap();
    let writer = assembly.access::<Metrics>().unwrap();

    thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..25 {
                writer.record();
            }
        });
    });

    assert_eq!(reader.total(), 25);
}
