//! Role declarations attached to modules.
//!
//! Every module carries a [`Manifest`]: an explicit, inspectable record of
//! the capabilities it supplies ([`Provides`]) and the capabilities it needs
//! ([`Requires`]). Roles follow from the manifest alone:
//!
//! | Declared | Role |
//! |----------|------|
//! | `Provides` only | Provider |
//! | `Requires` only | Accessor |
//! | Both | Provider and Accessor |
//! | Neither | Passive |
//!
//! A declared role must name at least one capability; an empty `Provides` or
//! `Requires` set is a configuration error and is rejected before the
//! assembly can be built.
//!
//! Each [`Provided`] entry captures a monomorphized fetch function at the
//! declaration site, where the concrete module type is still in scope. That
//! keeps resolution a pure metadata lookup: once a capability is matched to a
//! provider slot, access is a function-pointer call plus a downcast.
//!
//! # Example
//!
//! ```
//! use backplane_core::capability::Provide;
//! use backplane_core::manifest::{Manifest, Provides, Requires};
//!
//! struct Logger;
//! struct Clock;
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
//! // Supplies Logger, needs Clock.
//! let manifest = Manifest::new()
//!     .provides(Provides::new().capability::<LogModule, Logger>())
//!     .requires(Requires::new().capability::<Clock>());
//!
//! assert!(manifest.is_provider());
//! assert!(manifest.is_accessor());
//! ```

use core::any::Any;
use core::fmt;

use crate::capability::{Capability, CapabilityId, Provide};

/// Type-erased accessor from a provider module to one of its capabilities.
///
/// The input is the provider module as `&dyn Any`; the output is the
/// capability implementation as `&dyn Any`, downcast to the capability type
/// by the caller.
pub type FetchFn = fn(&dyn Any) -> &dyn Any;

/// Monomorphized fetch body stored in [`Provided`] entries.
fn fetch_interface<M, C>(module: &dyn Any) -> &dyn Any
where
    M: Provide<C> + 'static,
    C: Capability,
{
    let module = module
        .downcast_ref::<M>()
        .expect("module type mismatch (this is a bug)");
    module.interface()
}

// ─────────────────────────────────────────────────────────────────────────────
// Provided
// ─────────────────────────────────────────────────────────────────────────────

/// A single supplied capability: its identity plus the type-erased accessor
/// that reaches the implementation inside the provider module.
#[derive(Clone, Copy)]
pub struct Provided {
    id: CapabilityId,
    fetch: FetchFn,
}

impl Provided {
    /// Creates an entry for capability `C` supplied by module type `M`.
    #[must_use]
    pub fn of<M, C>() -> Self
    where
        M: Provide<C> + 'static,
        C: Capability,
    {
        Self {
            id: CapabilityId::of::<C>(),
            fetch: fetch_interface::<M, C>,
        }
    }

    /// Returns the supplied capability's identity.
    #[must_use]
    pub fn id(&self) -> CapabilityId {
        self.id
    }

    /// Fetches the capability implementation out of the provider module.
    ///
    /// `module` must be the instance of the module type this entry was
    /// declared for; anything else trips the internal downcast guard.
    #[must_use]
    pub fn fetch<'a>(&self, module: &'a dyn Any) -> &'a dyn Any {
        (self.fetch)(module)
    }

    /// Returns the raw fetch function, for caching in a resolved binding.
    pub(crate) fn fetch_fn(&self) -> FetchFn {
        self.fetch
    }
}

impl fmt::Debug for Provided {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provided")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Provides
// ─────────────────────────────────────────────────────────────────────────────

/// Declares the capability set a module supplies.
///
/// The set keeps declaration order and ignores duplicate declarations of the
/// same capability (the first one wins, consistent with assembly-wide
/// resolution). An empty set is expressible but rejected when the assembly is
/// built.
#[derive(Debug, Default, Clone)]
pub struct Provides {
    entries: Vec<Provided>,
}

impl Provides {
    /// Creates an empty `Provides` declaration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that module type `M` supplies capability `C`.
    ///
    /// Inside a module's manifest this is written with `Self`:
    ///
    /// ```ignore
    /// Provides::new().capability::<Self, Logger>()
    /// ```
    #[must_use]
    pub fn capability<M, C>(mut self) -> Self
    where
        M: Provide<C> + 'static,
        C: Capability,
    {
        let entry = Provided::of::<M, C>();
        if !self.contains(entry.id()) {
            self.entries.push(entry);
        }
        self
    }

    /// Returns `true` if this set contains the given capability.
    ///
    /// This is the predicate the resolver scans provider manifests with.
    #[must_use]
    pub fn contains(&self, id: CapabilityId) -> bool {
        self.entries.iter().any(|entry| entry.id() == id)
    }

    /// Returns the entry for the given capability, if declared.
    #[must_use]
    pub fn get(&self, id: CapabilityId) -> Option<&Provided> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Returns all entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[Provided] {
        &self.entries
    }

    /// Returns the declared capability identities in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = CapabilityId> + '_ {
        self.entries.iter().map(Provided::id)
    }

    /// Returns the number of declared capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no capabilities are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Requires
// ─────────────────────────────────────────────────────────────────────────────

/// Declares the capability set a module needs.
///
/// Access through a bound port is restricted to this set. Declaration order
/// is kept for inspection; duplicates are ignored. An empty set is
/// expressible but rejected when the assembly is built.
#[derive(Debug, Default, Clone)]
pub struct Requires {
    ids: Vec<CapabilityId>,
}

impl Requires {
    /// Creates an empty `Requires` declaration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that the module needs capability `C`.
    #[must_use]
    pub fn capability<C: Capability>(mut self) -> Self {
        let id = CapabilityId::of::<C>();
        if !self.contains(id) {
            self.ids.push(id);
        }
        self
    }

    /// Returns `true` if this set contains the given capability.
    #[must_use]
    pub fn contains(&self, id: CapabilityId) -> bool {
        self.ids.contains(&id)
    }

    /// Returns the declared capability identities in declaration order.
    #[must_use]
    pub fn ids(&self) -> &[CapabilityId] {
        &self.ids
    }

    /// Returns the number of declared capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if no capabilities are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Manifest
// ─────────────────────────────────────────────────────────────────────────────

/// A module's complete role declaration.
///
/// Manifests are pure metadata: they depend only on the module's type, never
/// on instance state, so the composition root collects them once and caches
/// them for the assembly's lifetime.
#[derive(Debug, Default, Clone)]
pub struct Manifest {
    provides: Option<Provides>,
    requires: Option<Requires>,
}

impl Manifest {
    /// Creates a manifest with no declared roles (a passive module).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a [`Provides`] declaration.
    #[must_use]
    pub fn provides(mut self, provides: Provides) -> Self {
        self.provides = Some(provides);
        self
    }

    /// Attaches a [`Requires`] declaration.
    #[must_use]
    pub fn requires(mut self, requires: Requires) -> Self {
        self.requires = Some(requires);
        self
    }

    /// Returns the `Provides` declaration, if any.
    #[must_use]
    pub fn provided(&self) -> Option<&Provides> {
        self.provides.as_ref()
    }

    /// Returns the `Requires` declaration, if any.
    #[must_use]
    pub fn required(&self) -> Option<&Requires> {
        self.requires.as_ref()
    }

    /// Returns `true` if the module declares a provider role.
    #[must_use]
    pub fn is_provider(&self) -> bool {
        self.provides.is_some()
    }

    /// Returns `true` if the module declares an accessor role.
    #[must_use]
    pub fn is_accessor(&self) -> bool {
        self.requires.is_some()
    }

    /// Returns the supplied capability identities in declaration order.
    pub fn provided_ids(&self) -> impl Iterator<Item = CapabilityId> + '_ {
        self.provides.iter().flat_map(Provides::ids)
    }

    /// Returns the needed capability identities in declaration order.
    pub fn required_ids(&self) -> impl Iterator<Item = CapabilityId> + '_ {
        self.requires.iter().flat_map(|requires| requires.ids().iter().copied())
    }
}
