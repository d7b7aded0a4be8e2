//! Component creation notifications.
//!
//! Observers subscribe to one [`ComponentKind`] and are called synchronously,
//! on the constructing thread, the first time a singleton of that kind is
//! built. Overrides and built-ins never notify, and helpers are never
//! constructed, so helper subscriptions never fire.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;
use wright_primitives::{ComponentKind, QualifiedName};

use crate::module::Instance;

/// Payload delivered to creation observers.
#[derive(Debug, Clone, Copy)]
pub struct ComponentCreated<'a> {
	pub kind: ComponentKind,
	pub name: &'a QualifiedName,
	/// Short name the component was requested under.
	pub alias: &'a str,
	pub instance: &'a Instance,
}

/// Handle for removing a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Arc<dyn Fn(&ComponentCreated<'_>) + Send + Sync>;

/// Per-kind observer lists.
#[derive(Default)]
pub struct LifecycleHooks {
	next_id: AtomicU64,
	observers: RwLock<HashMap<ComponentKind, Vec<(SubscriptionId, Observer)>>>,
}

impl LifecycleHooks {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `observer` for creations of `kind`.
	pub fn subscribe<F>(&self, kind: ComponentKind, observer: F) -> SubscriptionId
	where
		F: Fn(&ComponentCreated<'_>) + Send + Sync + 'static,
	{
		if !kind.is_instantiable() {
			tracing::warn!(%kind, "subscribed to a kind that is never instantiated");
		}
		let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
		let observer: Observer = Arc::new(observer);
		self.observers.write().entry(kind).or_default().push((id, observer));
		id
	}

	/// Removes a subscription. Returns false if it was already gone.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut observers = self.observers.write();
		for list in observers.values_mut() {
			if let Some(pos) = list.iter().position(|(sub, _)| *sub == id) {
				list.remove(pos);
				return true;
			}
		}
		false
	}

	/// Delivers `event` to the observers of its kind, in subscription order.
	///
	/// The observer list is snapshotted first, so observers may subscribe or
	/// resolve other components while being notified.
	pub fn emit(&self, event: &ComponentCreated<'_>) {
		let observers: Vec<Observer> = match self.observers.read().get(&event.kind) {
			Some(list) => list.iter().map(|(_, observer)| observer.clone()).collect(),
			None => return,
		};
		tracing::trace!(kind = %event.kind, name = %event.name, observers = observers.len(), "component created");
		for observer in observers {
			observer(event);
		}
	}

	pub fn observer_count(&self, kind: ComponentKind) -> usize {
		self.observers.read().get(&kind).map_or(0, Vec::len)
	}
}

impl std::fmt::Debug for LifecycleHooks {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let observers = self.observers.read();
		let mut map = f.debug_map();
		for (kind, list) in observers.iter() {
			map.entry(kind, &list.len());
		}
		map.finish()
	}
}
