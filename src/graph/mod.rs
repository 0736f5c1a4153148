/// Per-language primitives the walkers are generic over.
pub mod semantics;

/// Supertype trees and subtype lists.
pub mod type_hierarchy;

/// Caller and callee trees.
pub mod call_hierarchy;

/// Overridden ancestor methods.
pub mod super_methods;

/// Transitive inheritors and overriding members.
pub mod implementations;

pub use call_hierarchy::CallHierarchyBuilder;
pub use implementations::ImplementationFinder;
pub use semantics::LanguageSemantics;
pub use super_methods::{AncestorMethod, SuperMethodResolver};
pub use type_hierarchy::TypeHierarchyBuilder;
