//! Tests for assembly composition, linking, and capability access.
//!
//! These tests cover the happy path of the framework: declaring an assembly,
//! running the linking pass, and reaching capabilities from accessor modules
//! and from outside the assembly.

use backplane_assembly::prelude::*;
use backplane_core::prelude::*;

// ─────────────────────────────────────────────────────────────────────────
// Test Capabilities
// ─────────────────────────────────────────────────────────────────────────

struct Logger {
    tag: &'static str,
}

struct Clock {
    epoch_ms: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self { epoch_ms: 1_000 }
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Test Modules
// ─────────────────────────────────────────────────────────────────────────

/// Provides `Logger`.
struct LogModule {
    logger: Logger,
}

impl LogModule {
    fn new(tag: &'static str) -> Self {
        Self {
            logger: Logger { tag },
        }
    }
}

impl Provide<Logger> for LogModule {
    fn interface(&self) -> &Logger {
        &self.logger
    }
}

impl Module for LogModule {
    fn manifest(&self) -> Manifest {
        Manifest::new().provides(Provides::new().capability::<Self, Logger>())
    }
}

/// A second, independent `Logger` provider for tie-breaking tests.
struct AltLogModule {
    logger: Logger,
}

impl AltLogModule {
    fn new(tag: &'static str) -> Self {
        Self {
            logger: Logger { tag },
        }
    }
}

impl Provide<Logger> for AltLogModule {
    fn interface(&self) -> &Logger {
        &self.logger
    }
}

impl Module for AltLogModule {
    fn manifest(&self) -> Manifest {
        Manifest::new().provides(Provides::new().capability::<Self, Logger>())
    }
}

/// Requires `Logger`.
#[derive(Default)]
struct Worker {
    port: BoundPort,
}

impl Module for Worker {
    fn manifest(&self) -> Manifest {
        Manifest::new().requires(Requires::new().capability::<Logger>())
    }

    fn bind(&self, port: Port) {
        self.port.install(port);
    }
}

impl Worker {
    fn logger(&self) -> CapabilityRef<Logger> {
        self.port
            .access::<Logger>()
            .expect("assembly should be linked")
    }
}

/// Provides `Clock` and requires `Logger` (dual-role module).
#[derive(Default)]
struct RelayModule {
    clock: Clock,
    port: BoundPort,
}

impl Provide<Clock> for RelayModule {
    fn interface(&self) -> &Clock {
        &self.clock
    }
}

impl Module for RelayModule {
    fn manifest(&self) -> Manifest {
        Manifest::new()
            .provides(Provides::new().capability::<Self, Clock>())
            .requires(Requires::new().capability::<Logger>())
    }

    fn bind(&self, port: Port) {
        self.port.install(port);
    }
}

/// Carries no role declarations at all.
struct PassiveModule;

impl Module for PassiveModule {
    fn manifest(&self) -> Manifest {
        Manifest::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Accessor → Root → Resolver → Provider
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn accessor_reaches_the_providers_implementation() {
    let assembly = Assembly::compose((LogModule::new("primary"), Worker::default())).unwrap();
    assembly.link();

    let worker = assembly.get_module::<Worker>().unwrap();
    let logger = worker.logger();

    assert_eq!(logger.tag, "primary");

    // The reference is the provider's own implementation instance, not a copy.
    let provider = assembly.get_module::<LogModule>().unwrap();
    assert!(core::ptr::eq(&*logger, &provider.logger));
}

#[test]
fn first_declared_provider_wins_resolution() {
    let assembly = Assembly::compose((
        LogModule::new("first"),
        AltLogModule::new("second"),
        Worker::default(),
    ))
    .unwrap();
    assembly.link();

    let worker = assembly.get_module::<Worker>().unwrap();
    assert_eq!(worker.logger().tag, "first");

    // Declaration order is the tie-breaker: swapping the providers swaps the winner.
    let swapped = Assembly::compose((
        AltLogModule::new("second"),
        LogModule::new("first"),
        Worker::default(),
    ))
    .unwrap();
    swapped.link();

    let worker = swapped.get_module::<Worker>().unwrap();
    assert_eq!(worker.logger().tag, "second");
}

#[test]
fn repeated_access_returns_the_same_instance() {
    let assembly = Assembly::compose((LogModule::new("stable"), Worker::default())).unwrap();
    assembly.link();

    let worker = assembly.get_module::<Worker>().unwrap();
    let first = worker.logger();
    let second = worker.logger();

    assert!(core::ptr::eq(&*first, &*second));
}

#[test]
fn dual_role_module_provides_and_accesses() {
    let assembly = Assembly::compose((LogModule::new("log"), RelayModule::default())).unwrap();
    assembly.link();

    assert_eq!(assembly.provider_count(), 2);
    assert_eq!(assembly.accessor_count(), 1);

    // The relay reaches Logger through its port...
    let relay = assembly.get_module::<RelayModule>().unwrap();
    assert_eq!(relay.port.access::<Logger>().unwrap().tag, "log");

    // ...and supplies Clock to the assembly.
    assert_eq!(assembly.access::<Clock>().unwrap().epoch_ms, 1_000);
}

// ─────────────────────────────────────────────────────────────────────────
// Linking
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn relinking_is_idempotent() {
    let assembly = Assembly::compose((LogModule::new("once"), Worker::default())).unwrap();
    assembly.link();

    let worker = assembly.get_module::<Worker>().unwrap();
    let before = worker.logger();

    assembly.link();
    let after = worker.logger();

    assert!(core::ptr::eq(&*before, &*after));
}

#[test]
fn accessor_port_is_unbound_before_linking() {
    let assembly = Assembly::compose((LogModule::new("late"), Worker::default())).unwrap();

    let worker = assembly.get_module::<Worker>().unwrap();
    assert!(!worker.port.is_bound());
    assert_eq!(
        worker.port.access::<Logger>().unwrap_err(),
        AccessError::NotLinked
    );

    assembly.link();
    assert!(worker.port.is_bound());
    assert!(worker.port.access::<Logger>().is_ok());
}

// ─────────────────────────────────────────────────────────────────────────
// Port restriction
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn port_rejects_capabilities_outside_the_requires_set() {
    // Clock is supplied by the relay, but Worker only declares Logger.
    let assembly = Assembly::compose((
        LogModule::new("log"),
        RelayModule::default(),
        Worker::default(),
    ))
    .unwrap();
    assembly.link();

    let worker = assembly.get_module::<Worker>().unwrap();
    let err = worker.port.access::<Clock>().unwrap_err();

    assert!(matches!(err, AccessError::Undeclared { .. }));
}

#[test]
fn port_allowed_lists_the_declared_set() {
    let assembly = Assembly::compose((LogModule::new("log"), Worker::default())).unwrap();
    assembly.link();

    let worker = assembly.get_module::<Worker>().unwrap();
    let allowed = worker.port.get().unwrap().allowed();

    assert_eq!(allowed, vec![CapabilityId::of::<Logger>()]);
}

// ─────────────────────────────────────────────────────────────────────────
// External bootstrap access
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn external_callers_bootstrap_through_the_root() {
    // Clock is required by nobody; it is still reachable from outside.
    let assembly = Assembly::compose((LogModule::new("boot"), RelayModule::default())).unwrap();
    assembly.link();

    let clock = assembly.access::<Clock>().unwrap();
    assert_eq!(clock.epoch_ms, 1_000);

    let logger = assembly.access::<Logger>().unwrap();
    assert_eq!(logger.tag, "boot");
    assert!(logger.provider().contains("LogModule"));
}

#[test]
fn unadvertised_capability_is_unresolved_at_the_root() {
    struct Missing;

    let assembly = Assembly::compose(LogModule::new("only")).unwrap();
    assembly.link();

    let err = assembly.access::<Missing>().unwrap_err();
    assert!(matches!(err, AccessError::Unresolved { .. }));
}

// ─────────────────────────────────────────────────────────────────────────
// Declaration surfaces
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn builder_declaration_behaves_like_the_tuple_form() {
    let assembly = Assembly::builder()
        .module(LogModule::new("built"))
        .module(Worker::default())
        .build()
        .unwrap();
    assembly.link();

    let worker = assembly.get_module::<Worker>().unwrap();
    assert_eq!(worker.logger().tag, "built");
}

#[test]
fn passive_modules_are_owned_but_take_no_role() {
    let assembly = Assembly::compose((
        LogModule::new("log"),
        PassiveModule,
        Worker::default(),
    ))
    .unwrap();
    assembly.link();

    assert_eq!(assembly.len(), 3);
    assert_eq!(assembly.provider_count(), 1);
    assert_eq!(assembly.accessor_count(), 1);
    assert!(assembly.get_module::<PassiveModule>().is_ok());
}
