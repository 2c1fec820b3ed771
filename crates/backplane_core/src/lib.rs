//! Capability metadata primitives for Backplane (Layer 1).
//!
//! `backplane_core` provides the pure, instance-free half of the framework:
//!
//! - [`capability`] - Capability identity and the typed supply seam
//! - [`manifest`] - Role declarations attached to modules
//! - [`partition`] - Provider/accessor split over a module list
//! - [`resolve`] - Capability resolution and the cached binding table
//! - [`error`] - Configuration-time error types
//!
//! Everything here is configuration-time work: it happens once, synchronously,
//! with no I/O and no instance state. The composition root in
//! `backplane_assembly` runs these passes when an assembly is declared and
//! caches the results for the assembly's lifetime.
//!
//! # Architecture
//!
//! This crate is Layer 1 of the Backplane architecture:
//!
//! - **Layer 1** (`backplane_core`): capability metadata (this crate)
//! - **Layer 2** (`backplane_assembly`): the composition root, linking, and
//!   capability access

/// Capability identity and the typed supply seam.
pub mod capability;

/// Configuration-time error types.
pub mod error;

/// Role declarations attached to modules.
pub mod manifest;

/// Provider/accessor partition over a module list.
pub mod partition;

/// Capability resolution and the cached binding table.
pub mod resolve;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::capability::{Capability, CapabilityId, Provide};
    pub use crate::error::CompositionError;
    pub use crate::manifest::{FetchFn, Manifest, Provided, Provides, Requires};
    pub use crate::partition::Partition;
    pub use crate::resolve::{Binding, BindingTable, resolve_provider};
}

// Re-export key types at crate root for convenience
pub use capability::{Capability, CapabilityId, Provide};
pub use error::CompositionError;
pub use manifest::{FetchFn, Manifest, Provided, Provides, Requires};
pub use partition::Partition;
pub use resolve::{Binding, BindingTable, resolve_provider};
