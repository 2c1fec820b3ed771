//! Role partition over an assembly's module list.
//!
//! The partitioner splits the ordered module list into the provider sublist
//! and the accessor sublist, preserving the relative order of the original
//! list. A module declaring both roles appears in both sublists; a passive
//! module appears in neither.
//!
//! The computation is pure: it reads only the cached manifests, never
//! instance state, so the composition root computes it once and keeps it for
//! the assembly's lifetime.

use crate::manifest::Manifest;

/// Ordered provider/accessor views over an assembly's module slots.
///
/// Slots index into the assembly's declaration-ordered module list. Both
/// sublists are stable: re-running [`Partition::compute`] over the same
/// manifests yields the same result.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Partition {
    providers: Vec<usize>,
    accessors: Vec<usize>,
}

impl Partition {
    /// Computes the partition for the given declaration-ordered manifests.
    #[must_use]
    pub fn compute(manifests: &[Manifest]) -> Self {
        let mut providers = Vec::new();
        let mut accessors = Vec::new();

        for (slot, manifest) in manifests.iter().enumerate() {
            if manifest.is_provider() {
                providers.push(slot);
            }
            if manifest.is_accessor() {
                accessors.push(slot);
            }
        }

        Self {
            providers,
            accessors,
        }
    }

    /// Returns the provider slots in declaration order.
    #[must_use]
    pub fn providers(&self) -> &[usize] {
        &self.providers
    }

    /// Returns the accessor slots in declaration order.
    #[must_use]
    pub fn accessors(&self) -> &[usize] {
        &self.accessors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Provide;
    use crate::manifest::{Provides, Requires};

    struct Signal;

    struct Emitter {
        signal: Signal,
    }

    impl Provide<Signal> for Emitter {
        fn interface(&self) -> &Signal {
            &self.signal
        }
    }

    fn provider() -> Manifest {
        Manifest::new().provides(Provides::new().capability::<Emitter, Signal>())
    }

    fn accessor() -> Manifest {
        Manifest::new().requires(Requires::new().capability::<Signal>())
    }

    fn both() -> Manifest {
        provider().requires(Requires::new().capability::<Signal>())
    }

    #[test]
    fn empty_list_yields_empty_partition() {
        let partition = Partition::compute(&[]);
        assert!(partition.providers().is_empty());
        assert!(partition.accessors().is_empty());
    }

    #[test]
    fn split_preserves_declaration_order() {
        let manifests = vec![provider(), accessor(), provider(), accessor()];
        let partition = Partition::compute(&manifests);

        assert_eq!(partition.providers(), &[0, 2]);
        assert_eq!(partition.accessors(), &[1, 3]);
    }

    #[test]
    fn dual_role_module_appears_in_both_sublists() {
        let manifests = vec![both()];
        let partition = Partition::compute(&manifests);

        assert_eq!(partition.providers(), &[0]);
        assert_eq!(partition.accessors(), &[0]);
    }

    #[test]
    fn passive_module_appears_in_neither_sublist() {
        let manifests = vec![provider(), Manifest::new(), accessor()];
        let partition = Partition::compute(&manifests);

        assert_eq!(partition.providers(), &[0]);
        assert_eq!(partition.accessors(), &[2]);
    }

    #[test]
    fn recomputation_is_deterministic() {
        let manifests = vec![both(), Manifest::new(), provider(), accessor()];
        assert_eq!(
            Partition::compute(&manifests),
            Partition::compute(&manifests)
        );
    }
}
