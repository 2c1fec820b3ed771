//! The composition root for Backplane (Layer 2).
//!
//! `backplane_assembly` turns the metadata primitives of `backplane_core`
//! into a running composition root:
//!
//! - [`module`] - The `Module` trait and the assembly declaration surface
//! - [`assembly`] - `Assembly`: module ownership, validation, and linking
//! - [`port`] - Bound references and capability access guards
//! - [`error`] - Access-surface error types
//!
//! # Data flow
//!
//! An assembly is declared as an ordered module list → composition validates
//! the declaration graph and caches the partition and binding table →
//! `link()` installs a port into every accessor → capability access flows
//! accessor → root → cached binding → provider's own interface.
//!
//! # Architecture
//!
//! This crate is Layer 2 of the Backplane architecture:
//!
//! - **Layer 1** (`backplane_core`): capability metadata (partition,
//!   resolution, declarations)
//! - **Layer 2** (`backplane_assembly`): the composition root (this crate)

/// The composition root: module ownership, linking, and capability access.
pub mod assembly;

/// Access-surface error types.
pub mod error;

/// The module trait and the assembly declaration surface.
pub mod module;

/// Bound references and capability access guards.
pub mod port;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::assembly::{Assembly, AssemblyBuilder};
    pub use crate::error::AccessError;
    pub use crate::module::{IntoModules, Module, ModuleId};
    pub use crate::port::{BoundPort, CapabilityRef, Port};
}

// Re-export key types at crate root for convenience
pub use assembly::{Assembly, AssemblyBuilder};
pub use error::AccessError;
pub use module::{IntoModules, Module, ModuleId};
pub use port::{BoundPort, CapabilityRef, Port};
