//! Shared vocabulary for the wright crates.
//!
//! * [`ComponentKind`]: the closed set of component categories and their file conventions
//! * [`QualifiedName`]: dotted component identifiers mapped onto nested paths
//! * [`RootSet`]: the ordered roots a resolved component uses for its own lookups
//! * [`path`]: lexical path normalisation used for containment checks

mod kind;
mod name;
pub mod path;
mod roots;

pub use kind::ComponentKind;
pub use name::{NameError, QualifiedName};
pub use roots::RootSet;
