//! Convention-based component resolution.
//!
//! Components live in files beneath kind-specific sub-directories of a set of
//! search roots (`<root>/models/admin/userModel.toml`). This crate finds them,
//! loads them into [`Definition`]s, and hands out one singleton instance per
//! component.
//!
//! # Architecture
//!
//! * [`roots`]: ordered, append-only search roots and public-directory mounting
//! * [`module`]: the seam to whatever turns a component file into a factory
//! * [`manifest`]: the default TOML manifest loader and factory registration
//! * [`loader`]: first-match-wins definition lookup with a process-lifetime cache
//! * [`hooks`]: typed creation notifications per component kind
//! * [`instantiate`]: singleton construction, overrides and built-ins
//!
//! Every cache lives in a value owned by the caller. Nothing here is global
//! apart from the `inventory` factory registrations.

mod definition;
mod error;
pub mod hooks;
pub mod instantiate;
pub mod loader;
pub mod manifest;
pub mod module;
pub mod roots;
mod settings;

pub use definition::Definition;
pub use error::RegistryError;
pub use hooks::{ComponentCreated, LifecycleHooks, SubscriptionId};
pub use instantiate::{Instantiator, Resolved, downcast};
pub use loader::{ComponentLoader, LoaderOptions};
pub use manifest::{FactoryBuilder, FactoryInput, FactoryReg, FactoryStatic, Manifest, ManifestLoader};
pub use module::{BoxError, ComponentFactory, ConstructContext, Instance, LoadError, LoadRequest, ModuleLoader, factory};
pub use roots::{NoopMount, SearchRoots, StaticMount};
pub use settings::ComponentSettings;
pub use wright_primitives::{ComponentKind, QualifiedName, RootSet};

#[doc(hidden)]
pub use inventory as __inventory;
