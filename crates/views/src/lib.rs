//! View support: minification, the template-engine seam, and partial
//! resolution by directory cascade.
//!
//! A view directory sees every partial in its own `partials/` directory and
//! in the `partials/` directory of each ancestor up to the application root.
//! The closest definition of a name wins.

mod engine;
mod error;
mod minify;
pub mod partials;

pub use engine::{CompileError, TemplateEngine, Verbatim};
pub use error::ViewError;
pub use minify::Minifier;
pub use partials::{Partial, PartialOptions, PartialResolver, PartialSet};
