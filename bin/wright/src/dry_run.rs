//! Module loader for inspecting a tree without its factories.
//!
//! The CLI is not linked against application code, so it cannot build real
//! components. This loader still parses every manifest, which is enough to
//! surface broken component files, and returns a factory that builds `()`.

use std::sync::Arc;

use wright_registry::{ComponentFactory, Instance, LoadError, LoadRequest, Manifest, ModuleLoader, factory};

#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunLoader;

impl ModuleLoader for DryRunLoader {
	fn load(&self, request: &LoadRequest<'_>) -> Result<Arc<dyn ComponentFactory>, LoadError> {
		let manifest = Manifest::read(request.path)?;
		tracing::trace!(name = %request.name, factory = %manifest.factory, "manifest ok");
		Ok(factory(|_cx| Ok(Arc::new(()) as Instance)))
	}
}
