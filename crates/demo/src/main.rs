//! Example status-reporter assembly.
//!
//! Wires three modules into one composition root: a console logger, a
//! monotonic clock, and a status module that requires both. Demonstrates the
//! full lifecycle — declare, compose, link, access — plus external bootstrap
//! access from outside the assembly.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug status
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use backplane_assembly::prelude::*;
use backplane_core::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ─────────────────────────────────────────────────────────────────────────────
// Capabilities
// ─────────────────────────────────────────────────────────────────────────────

/// Structured line sink.
struct Logger {
    target: &'static str,
}

impl Logger {
    fn log(&self, line: &str) {
        info!(target: "status", source = self.target, "{line}");
    }
}

/// Monotonic tick source.
struct Clock {
    ticks: AtomicU64,
}

impl Clock {
    fn tick(&self) -> u64 {
        self.ticks.fetch_add(1, Ordering::Relaxed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Modules
// ─────────────────────────────────────────────────────────────────────────────

struct ConsoleLogModule {
    logger: Logger,
}

impl ConsoleLogModule {
    fn new(target: &'static str) -> Self {
        Self {
            logger: Logger { target },
        }
    }
}

impl Provide<Logger> for ConsoleLogModule {
    fn interface(&self) -> &Logger {
        &self.logger
    }
}

impl Module for ConsoleLogModule {
    fn manifest(&self) -> Manifest {
        Manifest::new().provides(Provides::new().capability::<Self, Logger>())
    }
}

struct ClockModule {
    clock: Clock,
}

impl ClockModule {
    fn new() -> Self {
        Self {
            clock: Clock {
                ticks: AtomicU64::new(0),
            },
        }
    }
}

impl Provide<Clock> for ClockModule {
    fn interface(&self) -> &Clock {
        &self.clock
    }
}

impl Module for ClockModule {
    fn manifest(&self) -> Manifest {
        Manifest::new().provides(Provides::new().capability::<Self, Clock>())
    }
}

#[derive(Default)]
struct StatusModule {
    port: BoundPort,
}

impl StatusModule {
    fn report(&self, what: &str) {
        let logger = self.port.access::<Logger>().expect("assembly is linked");
        let clock = self.port.access::<Clock>().expect("assembly is linked");
        logger.log(&format!("[t={}] {what}", clock.tick()));
    }
}

impl Module for StatusModule {
    fn manifest(&self) -> Manifest {
        Manifest::new().requires(
            Requires::new()
                .capability::<Logger>()
                .capability::<Clock>(),
        )
    }

    fn bind(&self, port: Port) {
        self.port.install(port);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry point
// ─────────────────────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let assembly = Assembly::compose((
        ConsoleLogModule::new("console"),
        ClockModule::new(),
        StatusModule::default(),
    ))
    .unwrap_or_else(|errors| {
        for error in &errors {
            tracing::error!(%error, "composition failed");
        }
        std::process::exit(1);
    });

    assembly.link();

    // Accessor modules reach capabilities through their bound ports.
    let status = assembly
        .get_module::<StatusModule>()
        .expect("StatusModule is part of the assembly");
    status.report("startup complete");
    status.report("all modules linked");

    // External callers bootstrap through the root directly.
    let logger = assembly
        .access::<Logger>()
        .expect("a Logger provider is declared");
    logger.log("reporting finished");
}
