//! The module trait and the assembly declaration surface.
//!
//! Modules are the unit of composition. A module's role is whatever its
//! [`Manifest`] declares: provider, accessor, both, or passive. The framework
//! owns module instances for the assembly's whole lifetime and only ever
//! talks to them through this trait plus the typed
//! [`Provide`](backplane_core::Provide) seam.
//!
//! # Example
//!
//! ```
//! use backplane_assembly::module::Module;
//! use backplane_assembly::port::{BoundPort, Port};
//! use backplane_core::{Manifest, Provide, Provides, Requires};
//!
//! struct Logger;
//!
//! struct LogModule {
//!     logger: Logger,
//! }
//!
//! impl Provide<Logger> for LogModule {
//!     fn interface(&self) -> &Logger {
//!         &self.logger
//!     }
//! }
//!
//! impl Module for LogModule {
//!     fn manifest(&self) -> Manifest {
//!         Manifest::new().provides(Provides::new().capability::<Self, Logger>())
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Worker {
//!     port: BoundPort,
//! }
//!
//! impl Module for Worker {
//!     fn manifest(&self) -> Manifest {
//!         Manifest::new().requires(Requires::new().capability::<Logger>())
//!     }
//!
//!     fn bind(&self, port: Port) {
//!         self.port.install(port);
//!     }
//! }
//! ```

use core::any::TypeId;

use backplane_core::Manifest;
use downcast_rs::{Downcast, impl_downcast};
use variadics_please::all_tuples;

use crate::assembly::AssemblyBuilder;
use crate::port::Port;

// ─────────────────────────────────────────────────────────────────────────────
// ModuleId
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a module type.
///
/// Used for the assembly's type-uniqueness check and for lookup by type.
/// Based on [`TypeId`], so each module type has exactly one `ModuleId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId {
    type_id: TypeId,
    type_name: &'static str,
}

impl ModuleId {
    /// Creates a `ModuleId` for the given module type.
    #[must_use]
    pub fn of<M: Module>() -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            type_name: core::any::type_name::<M>(),
        }
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Module Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A component participating in exactly one assembly.
///
/// The composition root constructs nothing itself: module instances are
/// handed to it fully built, and it owns them until it is dropped. The trait
/// has two jobs:
///
/// 1. **Declare** the module's roles via [`manifest()`](Module::manifest).
///    The manifest must depend only on the module's type, never on instance
///    state — it is collected once and cached.
/// 2. **Receive** the bound reference via [`bind()`](Module::bind) during the
///    linking pass. Only accessor modules care; the default is a no-op.
pub trait Module: Downcast + Send + Sync {
    /// Returns the module's role declaration.
    fn manifest(&self) -> Manifest;

    /// Installs the bound reference during the linking pass.
    ///
    /// Called once per `link()` invocation for every accessor module.
    /// Accessors typically forward to [`BoundPort::install`], which keeps the
    /// first installation; re-linking hands over an identical port, so the
    /// result is the same either way.
    ///
    /// [`BoundPort::install`]: crate::port::BoundPort::install
    fn bind(&self, _port: Port) {}

    /// Returns the module's name for diagnostics.
    ///
    /// Default implementation returns the type name.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }
}

impl_downcast!(Module);

// ─────────────────────────────────────────────────────────────────────────────
// IntoModules Trait (for assembly declaration polymorphism)
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for values that declare an assembly's ordered module list.
///
/// Implemented for single modules and for tuples of modules, so an assembly
/// is declared in one expression:
///
/// ```ignore
/// let assembly = Assembly::compose((LogModule::new(), Worker::default()))?;
/// ```
///
/// Tuple order is declaration order, which also fixes resolution
/// tie-breaking and the partition order. Users typically don't implement
/// this trait directly.
pub trait IntoModules {
    /// Adds these modules to the builder in declaration order.
    fn add_to(self, builder: &mut AssemblyBuilder);
}

/// Single modules implement `IntoModules` directly.
impl<M: Module> IntoModules for M {
    fn add_to(self, builder: &mut AssemblyBuilder) {
        // Capture ModuleId while we still have the concrete type
        builder.add_boxed(ModuleId::of::<M>(), Box::new(self));
    }
}

/// Macro to implement `IntoModules` for tuples of modules.
macro_rules! impl_into_modules_for_tuple {
    ($($M:ident),*) => {
        impl<$($M: Module),*> IntoModules for ($($M,)*) {
            #[expect(
                non_snake_case,
                reason = "tuple field bindings reuse the type parameter names"
            )]
            fn add_to(self, builder: &mut AssemblyBuilder) {
                let ($($M,)*) = self;
                $(IntoModules::add_to($M, builder);)*
            }
        }
    };
}

// Generate implementations for tuples from 2 to 16 elements
all_tuples!(impl_into_modules_for_tuple, 2, 16, M);
