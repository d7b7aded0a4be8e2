#![allow(unused_crate_dependencies)]

mod common;

use std::sync::{Arc, Mutex};

use common::{Fixture, Widget, touch, write};
use pretty_assertions::assert_eq;
use wright_listing::ListingCache;
use wright_registry::{
	BoxError, ComponentFactory, ComponentKind, ComponentLoader, ComponentSettings, FactoryBuilder, FactoryInput, Instance,
	Instantiator, LifecycleHooks, LoaderOptions, ManifestLoader, NoopMount, QualifiedName, RegistryError, RootSet,
	SearchRoots, downcast, factory,
};

fn instantiator(cx: &common::Context) -> Arc<Instantiator> {
	Arc::new(Instantiator::new(cx.loader.clone(), cx.hooks.clone()))
}

fn record_creations(hooks: &LifecycleHooks, kind: ComponentKind) -> Arc<Mutex<Vec<String>>> {
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = seen.clone();
	hooks.subscribe(kind, move |event| {
		sink.lock().unwrap().push(format!("{}:{}", event.name, event.alias));
	});
	seen
}

#[test]
fn singleton_is_constructed_and_announced_once() {
	let fx = Fixture::new();
	touch(&fx.primary.join("services/userService.toml"));
	let cx = fx.context();
	let components = instantiator(&cx);
	let seen = record_creations(&cx.hooks, ComponentKind::Service);

	let first = components.get(ComponentKind::Service, "user").unwrap().into_instance().unwrap();
	let second = components.get(ComponentKind::Service, "user").unwrap().into_instance().unwrap();

	assert!(Arc::ptr_eq(&first, &second));
	assert_eq!(*seen.lock().unwrap(), vec!["userService:user".to_owned()]);
	assert_eq!(cx.modules.count(), 1);

	let widget = first.downcast::<Widget>().unwrap();
	assert_eq!(widget.alias, "user");
	assert_eq!(widget.source, fx.primary.join("services/userService.toml"));
}

#[test]
fn override_replaces_without_notifying() {
	let fx = Fixture::new();
	touch(&fx.primary.join("controllers/userController.toml"));
	let cx = fx.context();
	let components = instantiator(&cx);
	let seen = record_creations(&cx.hooks, ComponentKind::Controller);
	let name = ComponentKind::Controller.qualify("user").unwrap();

	let original = components.instance(ComponentKind::Controller, &name, "user").unwrap();
	let replacement: Instance = Arc::new("stub");
	let previous = components
		.override_instance(ComponentKind::Controller, &name, replacement.clone())
		.unwrap();

	assert!(Arc::ptr_eq(&previous.unwrap(), &original));
	let current = components.instance(ComponentKind::Controller, &name, "user").unwrap();
	assert!(Arc::ptr_eq(&current, &replacement));
	assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn override_before_first_use_skips_the_loader() {
	let fx = Fixture::new();
	let cx = fx.context();
	let components = instantiator(&cx);
	let seen = record_creations(&cx.hooks, ComponentKind::Model);
	let name = ComponentKind::Model.qualify("ghost").unwrap();

	assert!(
		components
			.override_instance(ComponentKind::Model, &name, Arc::new(7_u32))
			.unwrap()
			.is_none()
	);
	let instance = components.get(ComponentKind::Model, "ghost").unwrap().into_instance().unwrap();

	assert_eq!(*downcast::<u32>(ComponentKind::Model, &name, instance).unwrap(), 7);
	assert_eq!(cx.modules.count(), 0);
	assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn helpers_resolve_to_definitions() {
	let fx = Fixture::new();
	touch(&fx.primary.join("helpers/dateHelper.toml"));
	let cx = fx.context();
	let components = instantiator(&cx);
	let seen = record_creations(&cx.hooks, ComponentKind::Helper);
	let name = ComponentKind::Helper.qualify("date").unwrap();

	let def = components.get(ComponentKind::Helper, "date").unwrap().into_definition().unwrap();
	assert_eq!(def.name(), &name);
	assert!(matches!(
		components.instance(ComponentKind::Helper, &name, "date"),
		Err(RegistryError::NotInstantiable(ComponentKind::Helper))
	));
	assert!(matches!(
		components.override_instance(ComponentKind::Helper, &name, Arc::new(())),
		Err(RegistryError::NotInstantiable(_))
	));
	assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn builtins_shadow_files_and_are_never_cached() {
	let fx = Fixture::new();
	touch(&fx.primary.join("controllers/Base"));
	let cx = fx.context();
	let components = instantiator(&cx);
	let seen = record_creations(&cx.hooks, ComponentKind::Controller);
	components
		.register_builtin(
			ComponentKind::Controller,
			"Base",
			factory(|cx| Ok(Arc::new(cx.roots.clone()) as Instance)),
		)
		.unwrap();

	let a = components.get(ComponentKind::Controller, "Base").unwrap().into_instance().unwrap();
	let b = components.get(ComponentKind::Controller, "Base").unwrap().into_instance().unwrap();

	assert!(!Arc::ptr_eq(&a, &b));
	assert!(components.definition(ComponentKind::Controller, "Base").unwrap().is_builtin());
	assert_eq!(
		a.downcast::<RootSet>().unwrap().as_slice(),
		[fx.primary.clone()]
	);
	assert_eq!(cx.modules.count(), 0);
	assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn typed_access_reports_mismatches() {
	let fx = Fixture::new();
	touch(&fx.primary.join("models/userModel.toml"));
	let cx = fx.context();
	let components = instantiator(&cx);
	let name = ComponentKind::Model.qualify("user").unwrap();

	let instance = components.instance(ComponentKind::Model, &name, "user").unwrap();
	let err = downcast::<String>(ComponentKind::Model, &name, instance.clone()).unwrap_err();
	assert!(matches!(err, RegistryError::TypeMismatch { expected, .. } if expected.contains("String")));
	assert!(downcast::<Widget>(ComponentKind::Model, &name, instance).is_ok());
}

#[test]
fn failed_construction_is_not_cached() {
	let fx = Fixture::new();
	write(&fx.primary.join("services/flakyService.toml"), "factory = \"flaky\"\n");
	let listings = Arc::new(ListingCache::new());
	let roots = Arc::new(SearchRoots::discover(
		fx.primary.clone(),
		"modules",
		"public",
		listings.clone(),
		Arc::new(NoopMount),
	));
	let attempts = Arc::new(Mutex::new(0_u32));
	let modules = ManifestLoader::empty();
	{
		let attempts = attempts.clone();
		modules.register("flaky", move |_input| {
			let attempts = attempts.clone();
			Ok(factory(move |_cx| {
				let mut n = attempts.lock().unwrap();
				*n += 1;
				if *n == 1 {
					return Err("not yet".into());
				}
				Ok(Arc::new(*n) as Instance)
			}))
		});
	}
	let loader = Arc::new(ComponentLoader::new(
		roots,
		listings,
		Arc::new(modules),
		Arc::new(ComponentSettings::new()),
		LoaderOptions::default(),
	));
	let components = Instantiator::new(loader, Arc::new(LifecycleHooks::new()));
	let name = ComponentKind::Service.qualify("flaky").unwrap();

	let err = components.instance(ComponentKind::Service, &name, "flaky").unwrap_err();
	assert!(matches!(err, RegistryError::Construct { .. }));
	assert!(components.cached(ComponentKind::Service, &name).is_none());
	assert!(components.instance(ComponentKind::Service, &name, "flaky").is_ok());
}

#[test]
fn observers_may_resolve_other_components() {
	let fx = Fixture::new();
	touch(&fx.primary.join("controllers/userController.toml"));
	touch(&fx.primary.join("services/userService.toml"));
	let cx = fx.context();
	let components = instantiator(&cx);
	let services = record_creations(&cx.hooks, ComponentKind::Service);

	let weak = Arc::downgrade(&components);
	cx.hooks.subscribe(ComponentKind::Controller, move |event| {
		let components = weak.upgrade().unwrap();
		let service = components.get(ComponentKind::Service, event.alias).unwrap();
		assert!(service.into_instance().is_some());
	});

	components.get(ComponentKind::Controller, "user").unwrap();

	assert_eq!(*services.lock().unwrap(), vec!["userService:user".to_owned()]);
	let name = ComponentKind::Service.qualify("user").unwrap();
	assert!(components.cached(ComponentKind::Service, &name).is_some());
}

#[test]
fn manifest_settings_are_overlaid_with_configuration() {
	let fx = Fixture::new();
	let blog = fx.module("blog");
	write(
		&blog.join("models/postModel.toml"),
		"factory = \"table\"\n\n[settings]\ntable = \"posts\"\npool = 4\n",
	);
	let listings = Arc::new(ListingCache::new());
	let roots = Arc::new(SearchRoots::discover(
		fx.primary.clone(),
		"modules",
		"public",
		listings.clone(),
		Arc::new(NoopMount),
	));
	let modules = ManifestLoader::empty();
	modules.register("table", |input: &FactoryInput<'_>| {
		let settings = input.settings.clone();
		let path = input.path.to_path_buf();
		Ok(factory(move |cx| {
			Ok(Arc::new(Widget {
				source: path.clone(),
				alias: cx.alias.to_owned(),
				roots: cx.roots.clone(),
				config: settings.clone(),
			}) as Instance)
		}))
	});
	let mut settings = ComponentSettings::new();
	settings.insert(ComponentKind::Model, "postModel", toml::from_str("pool = 16").unwrap());
	let loader = Arc::new(ComponentLoader::new(
		roots,
		listings,
		Arc::new(modules),
		Arc::new(settings),
		LoaderOptions::default(),
	));
	let components = Instantiator::new(loader, Arc::new(LifecycleHooks::new()));

	let instance = components.get(ComponentKind::Model, "post").unwrap().into_instance().unwrap();
	let widget = instance.downcast::<Widget>().unwrap();

	let expected: toml::Table = toml::from_str("table = \"posts\"\npool = 16").unwrap();
	assert_eq!(widget.config, expected);
	assert_eq!(widget.roots.as_slice(), [blog, fx.primary.clone()]);
}

#[test]
fn unknown_factory_is_a_load_error() {
	let fx = Fixture::new();
	write(&fx.primary.join("services/mailService.toml"), "factory = \"smtp\"\n");
	let listings = Arc::new(ListingCache::new());
	let roots = Arc::new(SearchRoots::discover(
		fx.primary.clone(),
		"modules",
		"public",
		listings.clone(),
		Arc::new(NoopMount),
	));
	let loader = Arc::new(ComponentLoader::new(
		roots,
		listings,
		Arc::new(ManifestLoader::empty()),
		Arc::new(ComponentSettings::new()),
		LoaderOptions::default(),
	));

	let name = ComponentKind::Service.qualify("mail").unwrap();
	let err = loader.load(ComponentKind::Service, &name, None).unwrap_err();
	assert!(err.to_string().contains("smtp"), "{err}");
}

fn build_greeter(input: &FactoryInput<'_>) -> Result<Arc<dyn ComponentFactory>, BoxError> {
	let greeting = input
		.settings
		.get("greeting")
		.and_then(|v| v.as_str())
		.unwrap_or("hello")
		.to_owned();
	Ok(factory(move |_cx| Ok(Arc::new(greeting.clone()) as Instance)))
}

wright_registry::register_factory!(GREETER, "greeter", build_greeter);

#[test]
fn statically_registered_factories_are_available() {
	let modules = ManifestLoader::new();
	assert!(modules.contains("greeter"));
	assert!(modules.names().iter().any(|n| n == "greeter"));

	let fx = Fixture::new();
	write(
		&fx.primary.join("services/greeterService.toml"),
		"factory = \"greeter\"\n[settings]\ngreeting = \"hi\"\n",
	);
	let listings = Arc::new(ListingCache::new());
	let roots = Arc::new(SearchRoots::discover(
		fx.primary.clone(),
		"modules",
		"public",
		listings.clone(),
		Arc::new(NoopMount),
	));
	let loader = Arc::new(ComponentLoader::new(
		roots,
		listings,
		Arc::new(modules),
		Arc::new(ComponentSettings::new()),
		LoaderOptions::default(),
	));
	let components = Instantiator::new(loader, Arc::new(LifecycleHooks::new()));
	let name: QualifiedName = ComponentKind::Service.qualify("greeter").unwrap();

	let instance = components.instance(ComponentKind::Service, &name, "greeter").unwrap();
	assert_eq!(*downcast::<String>(ComponentKind::Service, &name, instance).unwrap(), "hi");
}

#[test]
fn registered_builders_can_be_shared() {
	let modules = ManifestLoader::empty();
	modules.register("greeter", build_greeter);
	let greeter: FactoryBuilder = modules.builder("greeter").unwrap();
	modules.register("welcome", move |input: &FactoryInput<'_>| greeter(input));

	assert!(modules.builder("smtp").is_none());
	assert_eq!(modules.names(), vec!["greeter".to_owned(), "welcome".to_owned()]);

	let fx = Fixture::new();
	write(&fx.primary.join("services/welcomeService.toml"), "factory = \"welcome\"\n");
	let listings = Arc::new(ListingCache::new());
	let roots = Arc::new(SearchRoots::discover(
		fx.primary.clone(),
		"modules",
		"public",
		listings.clone(),
		Arc::new(NoopMount),
	));
	let loader = Arc::new(ComponentLoader::new(
		roots,
		listings,
		Arc::new(modules),
		Arc::new(ComponentSettings::new()),
		LoaderOptions::default(),
	));
	let components = Instantiator::new(loader, Arc::new(LifecycleHooks::new()));

	let instance = components.get(ComponentKind::Service, "welcome").unwrap().into_instance().unwrap();
	assert_eq!(*instance.downcast::<String>().unwrap(), "hello");
}
