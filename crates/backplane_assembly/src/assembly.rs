//! The composition root: module ownership, linking, and capability access.
//!
//! An [`Assembly`] is a closed, fixed, ordered collection of distinct module
//! types. Composition runs every configuration pass up front — role
//! validation, type-uniqueness, the partition, and capability resolution —
//! and refuses to construct the root if any of them fails. After that the
//! assembly's metadata is immutable; the only remaining mutation is the
//! one-time installation of ports during [`link()`](Assembly::link).
//!
//! # Lifecycle
//!
//! 1. **Composition** — `Assembly::compose()` / `AssemblyBuilder::build()`
//!    validates the declaration graph and caches the partition and the
//!    capability→provider binding table.
//! 2. **Linking** — `link()` installs a [`Port`] into every accessor module.
//!    Must run before any capability access; running it again re-installs
//!    identical references.
//! 3. **Access** — `access::<C>()` and the accessors' ports resolve through
//!    the cached bindings with no locking.
//!
//! # Example
//!
//! ```
//! use backplane_assembly::assembly::Assembly;
//! use backplane_assembly::module::Module;
//! use backplane_assembly::port::{BoundPort, Port};
//! use backplane_core::{Manifest, Provide, Provides, Requires};
//!
//! struct Logger {
//!     prefix: &'static str,
//! }
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
//!
//! let assembly = Assembly::compose((
//!     LogModule { logger: Logger { prefix: "app" } },
//!     Worker::default(),
//! ))
//! .expect("declaration graph is well-formed");
//!
//! assembly.link();
//!
//! // Accessors reach capabilities through their port...
//! let worker = assembly.get_module::<Worker>().unwrap();
//! assert_eq!(worker.port.access::<Logger>().unwrap().prefix, "app");
//!
//! // ...and external callers bootstrap through the root directly.
//! assert_eq!(assembly.access::<Logger>().unwrap().prefix, "app");
//! ```

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use backplane_core::{
    BindingTable, Capability, CapabilityId, CompositionError, Manifest, Partition, Provides,
    Requires, resolve_provider,
};
use hashbrown::HashSet;
use tracing::debug;

use crate::error::AccessError;
use crate::module::{IntoModules, Module, ModuleId};
use crate::port::{CapabilityRef, Port};

// ─────────────────────────────────────────────────────────────────────────────
// Assembly internals
// ─────────────────────────────────────────────────────────────────────────────

/// One owned module plus its cached declaration metadata.
pub(crate) struct ModuleEntry {
    pub(crate) id: ModuleId,
    pub(crate) module: Box<dyn Module>,
    pub(crate) manifest: Manifest,
    /// Cached for error messages and diagnostics.
    pub(crate) name: String,
}

/// Shared state behind an [`Assembly`].
///
/// Ports hold a `Weak` to this; everything except `linked` is immutable
/// after composition.
pub(crate) struct AssemblyInner {
    pub(crate) entries: Vec<ModuleEntry>,
    pub(crate) partition: Partition,
    pub(crate) bindings: BindingTable,
    pub(crate) linked: AtomicBool,
}

impl AssemblyInner {
    /// Shared access path for the root and for ports.
    pub(crate) fn access<C: Capability>(
        inner: &Arc<Self>,
    ) -> Result<CapabilityRef<C>, AccessError> {
        if !inner.linked.load(Ordering::Acquire) {
            return Err(AccessError::NotLinked);
        }

        let id = CapabilityId::of::<C>();
        let binding = inner
            .bindings
            .get(id)
            .copied()
            .ok_or(AccessError::Unresolved {
                capability: id.type_name(),
            })?;

        Ok(CapabilityRef::new(Arc::clone(inner), binding))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Assembly
// ─────────────────────────────────────────────────────────────────────────────

/// The composition root of one closed system instance.
///
/// Owns all module instances for their entire lifetime. Construction order is
/// declaration order; that same order fixes resolution tie-breaking and the
/// partition output.
///
/// An assembly moves through two states: **constructed** (modules owned,
/// bindings cached, ports not yet installed) and **linked** (after
/// [`link()`](Self::link)). Capability access is permitted only once linked;
/// there is no unlink — the root's lifetime ends by being dropped.
pub struct Assembly {
    inner: Arc<AssemblyInner>,
}

impl Assembly {
    /// Composes an assembly from an ordered module declaration.
    ///
    /// Accepts a single module or a tuple of modules; tuple order is
    /// declaration order. All configuration defects are collected in one
    /// pass.
    ///
    /// # Errors
    ///
    /// Returns every [`CompositionError`] found in the declaration graph:
    /// empty declared roles, duplicate module types, and required
    /// capabilities no provider supplies.
    pub fn compose(modules: impl IntoModules) -> Result<Self, Vec<CompositionError>> {
        let mut builder = Self::builder();
        modules.add_to(&mut builder);
        builder.build()
    }

    /// Creates an empty [`AssemblyBuilder`] for incremental declaration.
    #[must_use]
    pub fn builder() -> AssemblyBuilder {
        AssemblyBuilder::new()
    }

    /// Performs the one-time linking pass.
    ///
    /// Installs a [`Port`] into every accessor module, then permits
    /// capability access. Calling `link()` again is safe but redundant: it
    /// hands every accessor an identical port, and write-once port cells
    /// keep the first one.
    ///
    /// Linking is the only mutation in the assembly's lifetime. If it can be
    /// reached from several threads, the caller must serialize the first
    /// invocation (typically by linking during single-threaded startup).
    pub fn link(&self) {
        for &slot in self.inner.partition.accessors() {
            let port = Port::new(Arc::downgrade(&self.inner), slot);
            self.inner.entries[slot].module.bind(port);
        }
        self.inner.linked.store(true, Ordering::Release);

        debug!(
            accessors = self.inner.partition.accessors().len(),
            "assembly linked"
        );
    }

    /// Returns `true` once [`link()`](Self::link) has run.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.inner.linked.load(Ordering::Acquire)
    }

    /// Accesses capability `C` — the public capability-access entry point.
    ///
    /// Resolves `C` against the cached binding table to the first provider
    /// in declaration order that advertises it, and returns a guard
    /// dereferencing to that provider's implementation. This is the same
    /// path accessor ports forward through, and it is also how code outside
    /// the assembly bootstraps initial access to a capability.
    ///
    /// # Errors
    ///
    /// - [`AccessError::NotLinked`] before the linking pass has run
    /// - [`AccessError::Unresolved`] if no provider advertises `C`
    pub fn access<C: Capability>(&self) -> Result<CapabilityRef<C>, AccessError> {
        AssemblyInner::access::<C>(&self.inner)
    }

    /// Returns the owned instance of module type `M`.
    ///
    /// # Errors
    ///
    /// [`AccessError::UnknownModule`] if `M` is not part of the assembly.
    pub fn get_module<M: Module>(&self) -> Result<&M, AccessError> {
        let id = ModuleId::of::<M>();
        let entry = self
            .inner
            .entries
            .iter()
            .find(|entry| entry.id == id)
            .ok_or(AccessError::UnknownModule {
                module: id.type_name(),
            })?;

        Ok(entry
            .module
            .downcast_ref::<M>()
            .expect("module type mismatch (this is a bug)"))
    }

    /// Returns `true` if module type `M` is part of the assembly.
    #[must_use]
    pub fn contains<M: Module>(&self) -> bool {
        let id = ModuleId::of::<M>();
        self.inner.entries.iter().any(|entry| entry.id == id)
    }

    /// Returns the number of modules in the assembly.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Returns `true` if the assembly has no modules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Returns the number of provider-role modules.
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.inner.partition.providers().len()
    }

    /// Returns the number of accessor-role modules.
    #[must_use]
    pub fn accessor_count(&self) -> usize {
        self.inner.partition.accessors().len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AssemblyBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Incremental declaration of an assembly's ordered module list.
///
/// # Example
///
/// ```ignore
/// let assembly = Assembly::builder()
///     .module(LogModule::new())
///     .module(Worker::default())
///     .build()?;
/// ```
#[derive(Default)]
pub struct AssemblyBuilder {
    modules: Vec<(ModuleId, Box<dyn Module>)>,
}

impl AssemblyBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a module to the declaration order.
    #[must_use]
    pub fn module<M: Module>(mut self, module: M) -> Self {
        self.add_boxed(ModuleId::of::<M>(), Box::new(module));
        self
    }

    /// Internal method to append a boxed module with its captured ID.
    ///
    /// Called by [`IntoModules`] implementations.
    pub(crate) fn add_boxed(&mut self, id: ModuleId, module: Box<dyn Module>) {
        self.modules.push((id, module));
    }

    /// Returns the module types declared so far, in order.
    #[must_use]
    pub fn declared(&self) -> Vec<ModuleId> {
        self.modules.iter().map(|(id, _)| *id).collect()
    }

    /// Validates the declaration graph and constructs the assembly.
    ///
    /// Runs every configuration pass: empty-role checks, type uniqueness,
    /// the partition, and resolution of every required capability. Defects
    /// are collected exhaustively rather than failing on the first one.
    ///
    /// # Errors
    ///
    /// All [`CompositionError`]s found in the declaration graph.
    pub fn build(self) -> Result<Assembly, Vec<CompositionError>> {
        let mut errors = Vec::new();

        // Manifests depend only on module types; collect them once.
        let entries: Vec<ModuleEntry> = self
            .modules
            .into_iter()
            .map(|(id, module)| {
                let manifest = module.manifest();
                let name = module.name().to_string();
                ModuleEntry {
                    id,
                    module,
                    manifest,
                    name,
                }
            })
            .collect();

        // A declared role must name at least one capability.
        for entry in &entries {
            if entry.manifest.provided().is_some_and(Provides::is_empty) {
                errors.push(CompositionError::EmptyProvides {
                    module: entry.name.clone(),
                });
            }
            if entry.manifest.required().is_some_and(Requires::is_empty) {
                errors.push(CompositionError::EmptyRequires {
                    module: entry.name.clone(),
                });
            }
        }

        // Lookup by type requires uniqueness.
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id) {
                errors.push(CompositionError::DuplicateModule {
                    module: entry.name.clone(),
                });
            }
        }

        let manifests: Vec<Manifest> = entries.iter().map(|entry| entry.manifest.clone()).collect();
        let partition = Partition::compute(&manifests);
        let bindings = BindingTable::build(&partition, &manifests);

        // Every required capability must resolve to a provider in this
        // assembly, before any instance exists to access it.
        for &slot in partition.accessors() {
            let Some(requires) = manifests[slot].required() else {
                continue;
            };
            for &capability in requires.ids() {
                if resolve_provider(capability, &partition, &manifests).is_none() {
                    errors.push(CompositionError::UnresolvedCapability {
                        capability: capability.type_name().to_string(),
                        module: entries[slot].name.clone(),
                    });
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        debug!(
            modules = entries.len(),
            providers = partition.providers().len(),
            accessors = partition.accessors().len(),
            capabilities = bindings.len(),
            "assembly composed"
        );

        Ok(Assembly {
            inner: Arc::new(AssemblyInner {
                entries,
                partition,
                bindings,
                linked: AtomicBool::new(false),
            }),
        })
    }
}
