//! End-to-end resolution over manifest files on disk.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tortuga_meta::{ModuleBuilder, ModuleIdentity, TypeKind};
use tortuga_resolve::{LoadError, ManifestHost, ResolveError, Resolver};

fn write(path: &Path, builder: ModuleBuilder) -> PathBuf {
    builder.into_manifest().write_to(path).unwrap();
    path.to_path_buf()
}

/// bin/App.exe -> bin/Acme.Core.dll -> (installed) Acme.Util
fn fixture() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let bin = temp.path().join("bin");
    let installed = temp.path().join("installed");
    fs::create_dir_all(&bin).unwrap();
    fs::create_dir_all(&installed).unwrap();

    let mut app = ModuleBuilder::new(ModuleIdentity::new("App"));
    app.add_class("App.Program")
        .add_reference("Acme.Core")
        .add_reference("Missing");
    let app = write(&bin.join("App.exe"), app);

    let mut core = ModuleBuilder::new(ModuleIdentity::new("Acme.Core").with_version("2.0.0.0"));
    core.add_class("Acme.Core.Engine")
        .add_type("Acme.Core.IPlugin", TypeKind::Interface)
        .add_nested("Acme.Core.Engine.State", TypeKind::Enum, "Acme.Core.Engine")
        .add_reference_identity(ModuleIdentity::new("Acme.Util").with_version("1.0.0.0"));
    write(&bin.join("Acme.Core.dll"), core);

    let mut util = ModuleBuilder::new(ModuleIdentity::new("Acme.Util").with_version("1.0.0.0"));
    util.add_class("Acme.Core.Extensions").add_class("Acme.Util.Text");
    write(&installed.join("Acme.Util.dll"), util);

    (temp, app)
}

fn resolver(temp: &TempDir) -> Resolver<ManifestHost> {
    Resolver::new(ManifestHost::with_probe_dirs(vec![temp.path().join("installed")]))
}

#[test]
fn test_resolve_type_across_disk_modules() {
    let (temp, app) = fixture();
    let resolver = resolver(&temp);
    let root = resolver.load_root(&app).unwrap();

    let found = resolver
        .resolve_type(root.as_ref(), "Acme.Util.Text")
        .unwrap()
        .unwrap();
    assert_eq!(found.module_name(), "Acme.Util");
    assert_eq!(
        found.module_location(),
        temp.path().join("installed").join("Acme.Util.dll")
    );

    let nested = resolver
        .resolve_type(root.as_ref(), "Acme.Core.Engine.State")
        .unwrap()
        .unwrap();
    assert!(nested.is_nested());
    assert_eq!(nested.namespace, "Acme.Core");
}

#[test]
fn test_resolve_namespace_across_disk_modules() {
    let (temp, app) = fixture();
    let resolver = resolver(&temp);
    let root = resolver.load_root(&app).unwrap();

    let found = resolver
        .resolve_namespace_types(root.as_ref(), "Acme.Core")
        .unwrap();
    let names: Vec<_> = found.iter().map(|t| t.full_name.as_str()).collect();
    assert_eq!(names, vec!["Acme.Core.Engine", "Acme.Core.Extensions"]);
}

#[test]
fn test_missing_root() {
    let temp = TempDir::new().unwrap();
    let resolver = resolver(&temp);
    let result = resolver.load_root(&temp.path().join("Nope.exe"));
    assert!(matches!(result, Err(ResolveError::RootNotFound(_))));
}

#[test]
fn test_corrupt_reference_propagates() {
    let (temp, app) = fixture();
    fs::write(temp.path().join("bin").join("Acme.Core.dll"), "not json").unwrap();

    let resolver = resolver(&temp);
    let root = resolver.load_root(&app).unwrap();
    let result = resolver.resolve_type(root.as_ref(), "Acme.Util.Text");
    assert!(matches!(
        result,
        Err(ResolveError::Load {
            source: LoadError::Format { .. },
            ..
        })
    ));
}
