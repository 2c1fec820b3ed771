//! Capability identity and the typed supply seam.
//!
//! A capability is an identity-only contract: modules advertise the
//! capabilities they supply and declare the capabilities they need, and the
//! composition root matches the two sides by type identity alone. The
//! capability type doubles as the interface object — resolving capability `C`
//! yields a `&C` borrowed from whichever provider module owns the
//! implementation.
//!
//! # Example
//!
//! ```
//! use backplane_core::capability::{Capability, CapabilityId, Provide};
//!
//! // The capability type is the interface callers receive.
//! struct Logger {
//!     prefix: String,
//! }
//!
//! impl Logger {
//!     fn line(&self, message: &str) -> String {
//!         format!("{}: {message}", self.prefix)
//!     }
//! }
//!
//! // A provider owns the implementation and hands out references to it.
//! struct ConsoleLog {
//!     logger: Logger,
//! }
//!
//! impl Provide<Logger> for ConsoleLog {
//!     fn interface(&self) -> &Logger {
//!         &self.logger
//!     }
//! }
//!
//! let module = ConsoleLog { logger: Logger { prefix: "demo".into() } };
//! assert_eq!(module.interface().line("hi"), "demo: hi");
//! assert_eq!(CapabilityId::of::<Logger>(), CapabilityId::of::<Logger>());
//! ```

use core::any::TypeId;

/// An identity-only contract supplied or requested by modules.
///
/// Capabilities carry no framework-level data; equality is type identity
/// (same type = same capability). Any type that is `Send + Sync + 'static`
/// automatically implements `Capability`, so ordinary structs and type-erased
/// interface objects both qualify.
///
/// The capability type is also what `access` returns a reference to: a module
/// providing `Logger` owns a `Logger` value and exposes `&Logger` through
/// [`Provide`].
pub trait Capability: Send + Sync + 'static {}

// Blanket implementation for all compatible types
impl<C: Send + Sync + 'static> Capability for C {}

/// Unique identifier for a capability type.
///
/// Based on [`TypeId`], so each capability type has exactly one
/// `CapabilityId`. The type name is carried alongside for error messages.
///
/// # Example
///
/// ```
/// use backplane_core::capability::CapabilityId;
///
/// struct Logger;
/// struct Clock;
///
/// assert_eq!(CapabilityId::of::<Logger>(), CapabilityId::of::<Logger>());
/// assert_ne!(CapabilityId::of::<Logger>(), CapabilityId::of::<Clock>());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapabilityId {
    type_id: TypeId,
    type_name: &'static str,
}

impl CapabilityId {
    /// Creates a `CapabilityId` for the given capability type.
    #[must_use]
    pub fn of<C: Capability>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            type_name: core::any::type_name::<C>(),
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

/// Typed supply seam between a provider module and one of its capabilities.
///
/// A module implements `Provide<C>` once for every capability `C` it
/// advertises. The framework never constructs capability values; it only
/// forwards references produced here, so the module keeps full ownership of
/// its implementation state.
///
/// Implementations must be pure accessors: no I/O, no side effects. The
/// linking passes may call them any number of times.
pub trait Provide<C: Capability> {
    /// Returns the module's implementation of capability `C`.
    fn interface(&self) -> &C;
}
