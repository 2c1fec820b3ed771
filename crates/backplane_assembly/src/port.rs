//! Bound references and capability access guards.
//!
//! During the linking pass every accessor module receives a [`Port`]: a
//! non-owning handle back to the composition root, restricted to the
//! module's declared `Requires` set. Ports are the only mutable state the
//! framework introduces, and each module's port is written exactly once —
//! [`BoundPort`] is the write-once cell accessors embed to hold it.
//!
//! Access returns a [`CapabilityRef`]: a guard that dereferences to the
//! winning provider's implementation. The chase is lock-free — a cached
//! binding lookup, a function-pointer call, and a downcast.

use core::fmt;
use core::marker::PhantomData;
use core::ops::Deref;
use std::sync::{Arc, OnceLock, Weak};

use backplane_core::{Binding, Capability, CapabilityId};

use crate::assembly::AssemblyInner;
use crate::error::AccessError;

// ─────────────────────────────────────────────────────────────────────────────
// Port
// ─────────────────────────────────────────────────────────────────────────────

/// A bound reference from an accessor module back to its composition root.
///
/// The handle is non-owning (`Weak`): the root owns the modules, never the
/// other way around. Access through a port is restricted to the capability
/// set the module's manifest declares; anything else is rejected with
/// [`AccessError::Undeclared`] even when some provider supplies it.
#[derive(Clone)]
pub struct Port {
    root: Weak<AssemblyInner>,
    slot: usize,
}

impl Port {
    pub(crate) fn new(root: Weak<AssemblyInner>, slot: usize) -> Self {
        Self { root, slot }
    }

    /// Accesses capability `C` through the composition root.
    ///
    /// The call forwards through the root's cached binding table to the
    /// first provider in declaration order that advertises `C`.
    ///
    /// # Errors
    ///
    /// - [`AccessError::Undeclared`] if `C` is not in the module's `Requires` set
    /// - [`AccessError::Detached`] if the composition root was dropped
    pub fn access<C: Capability>(&self) -> Result<CapabilityRef<C>, AccessError> {
        let root = self.root.upgrade().ok_or(AccessError::Detached)?;
        let id = CapabilityId::of::<C>();

        let declared = root.entries[self.slot]
            .manifest
            .required()
            .is_some_and(|requires| requires.contains(id));
        if !declared {
            return Err(AccessError::Undeclared {
                capability: id.type_name(),
            });
        }

        AssemblyInner::access::<C>(&root)
    }

    /// Returns the capability identities this port may access.
    ///
    /// Empty if the composition root was dropped.
    #[must_use]
    pub fn allowed(&self) -> Vec<CapabilityId> {
        self.root
            .upgrade()
            .and_then(|root| {
                root.entries[self.slot]
                    .manifest
                    .required()
                    .map(|requires| requires.ids().to_vec())
            })
            .unwrap_or_default()
    }
}

impl fmt::Debug for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Port").field("slot", &self.slot).finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BoundPort
// ─────────────────────────────────────────────────────────────────────────────

/// Write-once storage for a module's bound [`Port`].
///
/// Accessor modules embed a `BoundPort` and forward
/// [`Module::bind`](crate::module::Module::bind) to [`install`](Self::install).
/// The first installation wins; a re-link hands over an identical port, so
/// later installations are redundant by construction.
///
/// # Example
///
/// ```ignore
/// #[derive(Default)]
/// struct Worker {
///     port: BoundPort,
/// }
///
/// impl Module for Worker {
///     fn manifest(&self) -> Manifest {
///         Manifest::new().requires(Requires::new().capability::<Logger>())
///     }
///
///     fn bind(&self, port: Port) {
///         self.port.install(port);
///     }
/// }
///
/// impl Worker {
///     fn log(&self, line: &str) {
///         let logger = self.port.access::<Logger>().expect("assembly is linked");
///         logger.write(line);
///     }
/// }
/// ```
#[derive(Debug, Default)]
pub struct BoundPort {
    port: OnceLock<Port>,
}

impl BoundPort {
    /// Creates an empty, unbound cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            port: OnceLock::new(),
        }
    }

    /// Installs the port. The first installation wins.
    pub fn install(&self, port: Port) {
        let _ = self.port.set(port);
    }

    /// Returns the installed port, if the linking pass has run.
    #[must_use]
    pub fn get(&self) -> Option<&Port> {
        self.port.get()
    }

    /// Returns `true` once a port has been installed.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.port.get().is_some()
    }

    /// Accesses capability `C` through the installed port.
    ///
    /// # Errors
    ///
    /// - [`AccessError::NotLinked`] if the linking pass has not run yet
    /// - otherwise, whatever [`Port::access`] returns
    pub fn access<C: Capability>(&self) -> Result<CapabilityRef<C>, AccessError> {
        self.port
            .get()
            .ok_or(AccessError::NotLinked)?
            .access::<C>()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CapabilityRef
// ─────────────────────────────────────────────────────────────────────────────

/// A resolved reference to a provider's capability implementation.
///
/// Dereferences to `&C` inside the provider module that won resolution. The
/// guard holds a strong reference to the assembly's module store so the
/// borrow stays valid; logical ownership of the modules remains with the
/// composition root.
///
/// Two `CapabilityRef<C>` values obtained from the same linked root always
/// reach the same underlying implementation instance.
pub struct CapabilityRef<C: Capability> {
    root: Arc<AssemblyInner>,
    binding: Binding,
    _marker: PhantomData<fn() -> C>,
}

impl<C: Capability> CapabilityRef<C> {
    pub(crate) fn new(root: Arc<AssemblyInner>, binding: Binding) -> Self {
        Self {
            root,
            binding,
            _marker: PhantomData,
        }
    }

    /// Returns the name of the provider module this reference resolved to.
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.root.entries[self.binding.slot()].name
    }
}

impl<C: Capability> Deref for CapabilityRef<C> {
    type Target = C;

    fn deref(&self) -> &Self::Target {
        let module = self.root.entries[self.binding.slot()].module.as_any();
        self.binding
            .fetch(module)
            .downcast_ref::<C>()
            .expect("capability type mismatch (this is a bug)")
    }
}

impl<C: Capability> Clone for CapabilityRef<C> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
            binding: self.binding,
            _marker: PhantomData,
        }
    }
}

impl<C: Capability> fmt::Debug for CapabilityRef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRef")
            .field("capability", &self.binding.capability())
            .field("provider", &self.provider())
            .finish()
    }
}
