#![allow(unused_crate_dependencies)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use wright_app::{App, AppConfig, ComponentKind, Instance};
use wright_registry::{FactoryInput, ManifestLoader, factory};

fn write(path: &Path, contents: &str) {
	fs::create_dir_all(path.parent().unwrap()).unwrap();
	fs::write(path, contents).unwrap();
}

fn modules() -> ManifestLoader {
	let modules = ManifestLoader::empty();
	modules.register("unit", |_input: &FactoryInput<'_>| Ok(factory(|_cx| Ok(Arc::new(()) as Instance))));
	modules
}

#[test]
fn prefetch_loads_every_root() {
	let tmp = tempfile::tempdir().unwrap();
	let app_dir = tmp.path().join("app");
	let blog = app_dir.join("modules/blog");
	write(&app_dir.join("services/userService.toml"), "factory = \"unit\"");
	write(&app_dir.join("helpers/.hidden.toml"), "factory = \"unit\"");
	write(&app_dir.join("models/admin/userModel.toml"), "factory = \"unit\"");
	write(&blog.join("controllers/postController.toml"), "factory = \"unit\"");
	write(&blog.join("services/userService.toml"), "factory = \"unit\"");
	write(&app_dir.join("views/partials/nav.html"), "<nav/>");
	fs::create_dir_all(app_dir.join("views/posts/show")).unwrap();

	let app = App::builder(tmp.path())
		.config(AppConfig::default())
		.module_loader(modules())
		.build()
		.unwrap();
	let report = app.prefetch();

	assert!(report.is_clean(), "{:?}", report.failures);
	// userService twice (primary and blog), postController once. The nested
	// admin model is not top-level and the hidden helper is skipped.
	assert_eq!(report.definitions, 3);
	// views, views/partials, views/posts, views/posts/show
	assert_eq!(report.view_dirs, 4);

	let user = app.service_definition("user").unwrap();
	assert_eq!(user.path(), Some(app_dir.join("services/userService.toml").as_path()));
	let post = app.controller_definition("post").unwrap();
	assert_eq!(post.roots().as_slice(), [blog.clone(), app_dir.clone()]);
	assert!(app.components().loader().cached(ComponentKind::Model, &ComponentKind::Model.qualify("admin.user").unwrap()).is_none());

	let reads = app.listings().reads();
	let show = app.partials(app_dir.join("views/posts/show")).unwrap();
	assert!(show.contains("nav"));
	assert_eq!(app.listings().reads(), reads);
}

#[test]
fn prefetch_collects_failures() {
	let tmp = tempfile::tempdir().unwrap();
	let app_dir = tmp.path().join("app");
	write(&app_dir.join("services/goodService.toml"), "factory = \"unit\"");
	write(&app_dir.join("services/badService.toml"), "factory = \"missing\"");
	write(&app_dir.join("models/worseModel.toml"), "not a manifest");

	let app = App::builder(tmp.path())
		.config(AppConfig::default())
		.module_loader(modules())
		.build()
		.unwrap();
	let report = app.prefetch();

	assert_eq!(report.definitions, 1);
	let mut failed: Vec<_> = report.failures.iter().map(|f| f.path.clone()).collect();
	failed.sort();
	assert_eq!(
		failed,
		vec![app_dir.join("models/worseModel.toml"), app_dir.join("services/badService.toml")]
	);
	assert_eq!(report.view_dirs, 0);
}
