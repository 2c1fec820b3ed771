//! Access-surface error types.

/// Failure of a capability or module lookup on a composition root.
///
/// Configuration defects are caught when the assembly is composed (see
/// [`CompositionError`](backplane_core::CompositionError)); this enum covers
/// the remaining ways an access entry point can be misused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Capability access was attempted before `link()` ran.
    #[error("assembly is not linked yet; call link() before accessing capabilities")]
    NotLinked,

    /// No provider in the assembly advertises the requested capability.
    #[error("no provider in the assembly supplies capability '{capability}'")]
    Unresolved {
        /// The requested capability's type name.
        capability: &'static str,
    },

    /// A port was asked for a capability outside its module's declared
    /// `Requires` set.
    #[error("capability '{capability}' is not in this module's Requires set")]
    Undeclared {
        /// The requested capability's type name.
        capability: &'static str,
    },

    /// The requested module type is not part of the assembly.
    #[error("module '{module}' is not part of this assembly")]
    UnknownModule {
        /// The requested module's type name.
        module: &'static str,
    },

    /// The composition root behind a port was dropped.
    ///
    /// Only reachable through a port cloned out of its module; a module's own
    /// port cannot outlive the root that owns the module.
    #[error("the composition root backing this port was dropped")]
    Detached,
}
