//! Capability resolution and the cached binding table.
//!
//! Resolution maps a requested capability to the provider that supplies it:
//! the provider sublist is scanned in declaration order and the first module
//! whose `Provides` set contains the capability wins. Ties between several
//! eligible providers are broken silently by order — first declared wins;
//! the assembly's declaration order is the override mechanism.
//!
//! Resolution never allocates and never reads instance state. It is resolved
//! once per capability and cached in a [`BindingTable`] on the composition
//! root, so post-link access is a map hit plus a function-pointer call.

use core::any::Any;
use core::fmt;

use hashbrown::HashMap;

use crate::capability::CapabilityId;
use crate::manifest::{FetchFn, Manifest, Provided};
use crate::partition::Partition;

/// Resolves a capability to the first matching provider slot.
///
/// Scans `partition`'s provider sublist in declaration order and returns the
/// slot of the first manifest whose `Provides` set contains `capability`, or
/// `None` if no provider advertises it. A `None` here is a configuration
/// error: the composition root refuses to build an assembly with an
/// unresolved required capability.
#[must_use]
pub fn resolve_provider(
    capability: CapabilityId,
    partition: &Partition,
    manifests: &[Manifest],
) -> Option<usize> {
    partition.providers().iter().copied().find(|&slot| {
        manifests[slot]
            .provided()
            .is_some_and(|provides| provides.contains(capability))
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Binding
// ─────────────────────────────────────────────────────────────────────────────

/// A resolved capability: the winning provider slot plus the fetch function
/// that reaches the implementation inside it.
#[derive(Clone, Copy)]
pub struct Binding {
    capability: CapabilityId,
    slot: usize,
    fetch: FetchFn,
}

impl Binding {
    fn resolved(slot: usize, entry: &Provided) -> Self {
        Self {
            capability: entry.id(),
            slot,
            fetch: entry.fetch_fn(),
        }
    }

    /// Returns the resolved capability's identity.
    #[must_use]
    pub fn capability(&self) -> CapabilityId {
        self.capability
    }

    /// Returns the winning provider's slot in the assembly.
    #[must_use]
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Fetches the capability implementation out of the provider module.
    #[must_use]
    pub fn fetch<'a>(&self, module: &'a dyn Any) -> &'a dyn Any {
        (self.fetch)(module)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("capability", &self.capability)
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BindingTable
// ─────────────────────────────────────────────────────────────────────────────

/// Cached capability→provider map for one assembly.
///
/// Built once at composition time from the partition and the manifests;
/// immutable afterwards, so concurrent lookups need no synchronization.
#[derive(Debug, Default)]
pub struct BindingTable {
    map: HashMap<CapabilityId, Binding>,
}

impl BindingTable {
    /// Builds the table by resolving every advertised capability.
    ///
    /// Providers are visited in declaration order and the first entry for a
    /// capability wins, matching [`resolve_provider`].
    #[must_use]
    pub fn build(partition: &Partition, manifests: &[Manifest]) -> Self {
        let mut map = HashMap::new();

        for &slot in partition.providers() {
            let Some(provides) = manifests[slot].provided() else {
                continue;
            };
            for entry in provides.entries() {
                map.entry(entry.id())
                    .or_insert_with(|| Binding::resolved(slot, entry));
            }
        }

        Self { map }
    }

    /// Returns the binding for the given capability, if any provider
    /// advertises it.
    #[must_use]
    pub fn get(&self, capability: CapabilityId) -> Option<&Binding> {
        self.map.get(&capability)
    }

    /// Returns `true` if some provider advertises the given capability.
    #[must_use]
    pub fn contains(&self, capability: CapabilityId) -> bool {
        self.map.contains_key(&capability)
    }

    /// Returns the number of distinct resolvable capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the assembly has no providers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
