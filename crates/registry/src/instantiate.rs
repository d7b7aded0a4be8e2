//! Singleton construction.
//!
//! Each instantiable (kind, name) is constructed once, cached, and announced
//! to [`LifecycleHooks`] on that first construction only. Overrides replace
//! the cached instance silently. Built-ins are looked up by short name before
//! any file is probed and are constructed fresh on every request.

use std::any::Any;
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex, RwLock};
use rustc_hash::FxHashMap as HashMap;
use wright_primitives::{ComponentKind, QualifiedName};

use crate::definition::Definition;
use crate::error::RegistryError;
use crate::hooks::{ComponentCreated, LifecycleHooks};
use crate::loader::ComponentLoader;
use crate::module::{ComponentFactory, Instance};

/// Result of asking for a component.
///
/// Helpers have no singleton, so asking for one yields its definition.
#[derive(Clone)]
pub enum Resolved {
	Instance(Instance),
	Definition(Arc<Definition>),
}

impl Resolved {
	pub fn into_instance(self) -> Option<Instance> {
		match self {
			Self::Instance(instance) => Some(instance),
			Self::Definition(_) => None,
		}
	}

	pub fn into_definition(self) -> Option<Arc<Definition>> {
		match self {
			Self::Instance(_) => None,
			Self::Definition(def) => Some(def),
		}
	}
}

impl std::fmt::Debug for Resolved {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Instance(_) => f.write_str("Resolved::Instance(..)"),
			Self::Definition(def) => f.debug_tuple("Resolved::Definition").field(def).finish(),
		}
	}
}

type InstanceKey = (ComponentKind, QualifiedName);

/// Builds and caches component singletons.
pub struct Instantiator {
	loader: Arc<ComponentLoader>,
	hooks: Arc<LifecycleHooks>,
	builtins: RwLock<HashMap<(ComponentKind, Box<str>), Arc<Definition>>>,
	/// Serialises check-then-construct; reentrant so constructors and
	/// observers may resolve other components.
	gate: ReentrantMutex<()>,
	instances: Mutex<HashMap<InstanceKey, Instance>>,
}

impl Instantiator {
	pub fn new(loader: Arc<ComponentLoader>, hooks: Arc<LifecycleHooks>) -> Self {
		Self {
			loader,
			hooks,
			builtins: RwLock::new(HashMap::default()),
			gate: ReentrantMutex::new(()),
			instances: Mutex::new(HashMap::default()),
		}
	}

	/// Registers a built-in under a short name, shadowing any component file.
	pub fn register_builtin(
		&self,
		kind: ComponentKind,
		short: &str,
		factory: Arc<dyn ComponentFactory>,
	) -> Result<(), RegistryError> {
		let name = QualifiedName::new(short)?;
		let def = Definition::builtin(kind, name, self.loader.roots().primary(), factory);
		self.builtins.write().insert((kind, Box::from(short)), Arc::new(def));
		Ok(())
	}

	pub fn builtin(&self, kind: ComponentKind, short: &str) -> Option<Arc<Definition>> {
		self.builtins.read().get(&(kind, Box::from(short))).cloned()
	}

	/// Resolves a component by short name, consulting built-ins first.
	///
	/// A built-in yields a fresh, uncached instance each time, without
	/// notification. Anything else goes through [`Instantiator::instantiate`]
	/// with the short name as alias.
	pub fn get(&self, kind: ComponentKind, short: &str) -> Result<Resolved, RegistryError> {
		if let Some(def) = self.builtin(kind, short) {
			if !kind.is_instantiable() {
				return Ok(Resolved::Definition(def));
			}
			let instance = def.construct(short).map_err(|source| RegistryError::Construct {
				kind,
				name: def.name().clone(),
				source,
			})?;
			return Ok(Resolved::Instance(instance));
		}
		let name = kind.qualify(short)?;
		self.instantiate(kind, &name, short)
	}

	/// Definition for a short name, consulting built-ins first.
	pub fn definition(&self, kind: ComponentKind, short: &str) -> Result<Arc<Definition>, RegistryError> {
		if let Some(def) = self.builtin(kind, short) {
			return Ok(def);
		}
		self.loader.load(kind, &kind.qualify(short)?, None)
	}

	/// Returns the singleton for `(kind, name)`, or the definition for helpers.
	pub fn instantiate(&self, kind: ComponentKind, name: &QualifiedName, alias: &str) -> Result<Resolved, RegistryError> {
		if !kind.is_instantiable() {
			return self.loader.load(kind, name, None).map(Resolved::Definition);
		}
		self.instance(kind, name, alias).map(Resolved::Instance)
	}

	/// Returns the singleton for `(kind, name)`, constructing it on first use.
	pub fn instance(&self, kind: ComponentKind, name: &QualifiedName, alias: &str) -> Result<Instance, RegistryError> {
		if !kind.is_instantiable() {
			return Err(RegistryError::NotInstantiable(kind));
		}

		let _gate = self.gate.lock();
		if let Some(instance) = self.cached(kind, name) {
			return Ok(instance);
		}

		let def = self.loader.load(kind, name, None)?;
		let instance = def.construct(alias).map_err(|source| RegistryError::Construct {
			kind,
			name: name.clone(),
			source,
		})?;
		self.instances.lock().insert((kind, name.clone()), instance.clone());
		tracing::debug!(%kind, %name, alias, "constructed component");

		self.hooks.emit(&ComponentCreated {
			kind,
			name,
			alias,
			instance: &instance,
		});
		Ok(instance)
	}

	/// Replaces the cached singleton, bypassing the loader and notifications.
	///
	/// Returns the instance that was replaced, if any.
	pub fn override_instance(
		&self,
		kind: ComponentKind,
		name: &QualifiedName,
		instance: Instance,
	) -> Result<Option<Instance>, RegistryError> {
		if !kind.is_instantiable() {
			return Err(RegistryError::NotInstantiable(kind));
		}
		let _gate = self.gate.lock();
		tracing::debug!(%kind, %name, "overriding component instance");
		Ok(self.instances.lock().insert((kind, name.clone()), instance))
	}

	/// Cached singleton, without loading or constructing anything.
	pub fn cached(&self, kind: ComponentKind, name: &QualifiedName) -> Option<Instance> {
		self.instances.lock().get(&(kind, name.clone())).cloned()
	}

	pub fn loader(&self) -> &Arc<ComponentLoader> {
		&self.loader
	}

	pub fn hooks(&self) -> &Arc<LifecycleHooks> {
		&self.hooks
	}
}

/// Recovers the concrete type of an instance.
pub fn downcast<T: Any + Send + Sync>(
	kind: ComponentKind,
	name: &QualifiedName,
	instance: Instance,
) -> Result<Arc<T>, RegistryError> {
	instance.downcast::<T>().map_err(|_| RegistryError::TypeMismatch {
		kind,
		name: name.clone(),
		expected: std::any::type_name::<T>(),
	})
}
