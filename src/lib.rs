//! A static capability composition framework.
//!
//! Modules declare the capabilities they provide and require; an
//! [`Assembly`] wires the whole graph once, before anything runs. See
//! `backplane_core` for the metadata primitives and `backplane_assembly`
//! for the composition root.

pub use backplane_assembly::{
    AccessError, Assembly, AssemblyBuilder, BoundPort, CapabilityRef, IntoModules, Module,
    ModuleId, Port,
};
pub use backplane_core::{
    Binding, BindingTable, Capability, CapabilityId, CompositionError, FetchFn, Manifest,
    Partition, Provide, Provided, Provides, Requires, resolve_provider,
};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use backplane_assembly::prelude::*;
    pub use backplane_core::prelude::*;
}
