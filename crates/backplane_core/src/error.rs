//! Configuration-time error types.

/// A structural defect in a declared assembly.
///
/// Every variant reflects a mismatch in the declaration graph and is fatal:
/// composition collects all defects in one pass and refuses to construct the
/// assembly. Nothing in this enum is recoverable or retryable at runtime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositionError {
    /// A module declared a `Provides` role with zero capabilities.
    #[error("module '{module}' declares a Provides role with no capabilities")]
    EmptyProvides {
        /// The offending module's name.
        module: String,
    },

    /// A module declared a `Requires` role with zero capabilities.
    #[error("module '{module}' declares a Requires role with no capabilities")]
    EmptyRequires {
        /// The offending module's name.
        module: String,
    },

    /// Two modules of the same type were declared in one assembly, which
    /// would make lookup by type ambiguous.
    #[error("module type '{module}' is declared more than once in the assembly")]
    DuplicateModule {
        /// The duplicated module type's name.
        module: String,
    },

    /// A required capability is not advertised by any provider in the
    /// assembly.
    #[error("unresolved capability '{capability}' required by module '{module}'")]
    UnresolvedCapability {
        /// The capability nobody supplies.
        capability: String,
        /// The accessor that requires it.
        module: String,
    },
}
