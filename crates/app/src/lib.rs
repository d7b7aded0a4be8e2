//! Application context for convention-based wiring.
//!
//! An [`App`] owns every cache for one application tree: directory listings,
//! search roots, component definitions and instances, and resolved partials.
//! Build one with [`App::builder`].

mod app;
mod builtins;
pub mod config;
mod error;
mod warmup;

pub use app::{App, AppBuilder};
pub use builtins::{BaseController, StaticHandler};
pub use config::{AppConfig, ConfigLoadReport, load_config_from_dir};
pub use error::{AppError, ConfigError};
pub use warmup::{WarmupFailure, WarmupReport};
pub use wright_registry::{ComponentCreated, ComponentKind, Definition, Instance, SubscriptionId};
pub use wright_views::{PartialSet, TemplateEngine, Verbatim};
