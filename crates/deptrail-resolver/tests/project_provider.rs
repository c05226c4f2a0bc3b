use std::fs;
use std::path::Path;

use deptrail_core::framework::FrameworkName;
use deptrail_core::library::{LibraryRange, LibraryType};
use deptrail_resolver::project_provider::{ProjectReferenceProvider, ProjectResolver};
use deptrail_resolver::provider::DependencyProvider;
use deptrail_resolver::walker::WalkContext;
use semver::Version;
use tempfile::TempDir;

fn write_project(root: &Path, name: &str, body: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("project.toml"), body).unwrap();
}

fn providers(root: &Path) -> Vec<Box<dyn DependencyProvider>> {
    let resolver = ProjectResolver::new(vec![root.to_path_buf()]);
    vec![Box::new(ProjectReferenceProvider::new(resolver))]
}

fn net45() -> FrameworkName {
    FrameworkName::parse(".NETFramework,Version=v4.5").unwrap()
}

fn dnxcore() -> FrameworkName {
    FrameworkName::parse("DNXCore,Version=v5.0").unwrap()
}

fn sample_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_project(
        tmp.path(),
        "App",
        r#"
[package]
name = "App"
version = "1.0.0"

[dependencies]
Lib = "*"

[frameworks.".NETFramework,Version=v4.5".dependencies]
"System.Xml" = { framework = true }

[frameworks."DNXCore,Version=v5.0".dependencies]
Util = ">=1.0"
"#,
    );
    write_project(
        tmp.path(),
        "Lib",
        r#"
[package]
name = "Lib"
version = "0.3.0"
loadable = false
"#,
    );
    write_project(
        tmp.path(),
        "Util",
        r#"
[package]
name = "Util"
version = "2.0.0"

[frameworks."DNXCore,Version=v5.0"]
"#,
    );
    tmp
}

#[test]
fn describes_a_project_for_a_matching_framework() {
    let tmp = sample_workspace();
    let provider = ProjectReferenceProvider::new(ProjectResolver::new(vec![tmp
        .path()
        .to_path_buf()]));

    let desc = provider
        .get_description(&LibraryRange::new("App", None), &dnxcore())
        .unwrap()
        .unwrap();
    assert_eq!(desc.identity.version, Some(Version::new(1, 0, 0)));
    assert_eq!(desc.library_type, LibraryType::Project);
    assert_eq!(desc.framework, Some(dnxcore()));
    assert!(desc.resolved);
    assert_eq!(desc.loadable_assemblies, ["App"]);
    assert_eq!(desc.path, Some(tmp.path().join("App").join("project.toml")));

    let names: Vec<&str> = desc.dependencies.iter().map(|d| d.name()).collect();
    assert_eq!(names, ["Lib", "Util"]);
}

#[test]
fn desktop_frameworks_add_implicit_references() {
    let tmp = sample_workspace();
    let provider = ProjectReferenceProvider::new(ProjectResolver::new(vec![tmp
        .path()
        .to_path_buf()]));

    let desc = provider
        .get_description(&LibraryRange::new("App", None), &net45())
        .unwrap()
        .unwrap();
    let names: Vec<&str> = desc.dependencies.iter().map(|d| d.name()).collect();
    assert_eq!(
        names,
        ["Lib", "System.Xml", "mscorlib", "System", "System.Core", "Microsoft.CSharp"]
    );
    assert!(desc.dependencies[1..]
        .iter()
        .all(|d| d.range.is_framework_reference));
}

#[test]
fn framework_mismatch_marks_description_unresolved() {
    let tmp = sample_workspace();
    let provider = ProjectReferenceProvider::new(ProjectResolver::new(vec![tmp
        .path()
        .to_path_buf()]));

    // Util only declares DNXCore.
    let util = provider
        .get_description(&LibraryRange::new("Util", None), &net45())
        .unwrap()
        .unwrap();
    assert!(!util.resolved);
    assert_eq!(util.framework, None);

    // Lib declares no frameworks at all, so it is usable anywhere.
    let lib = provider
        .get_description(&LibraryRange::new("Lib", None), &net45())
        .unwrap()
        .unwrap();
    assert!(lib.resolved);
    assert!(lib.loadable_assemblies.is_empty());
}

#[test]
fn framework_references_and_missing_projects_are_not_answered() {
    let tmp = sample_workspace();
    let provider = ProjectReferenceProvider::new(ProjectResolver::new(vec![tmp
        .path()
        .to_path_buf()]));

    assert!(provider
        .get_description(&LibraryRange::framework_reference("Lib"), &dnxcore())
        .unwrap()
        .is_none());
    assert!(provider
        .get_description(&LibraryRange::new("Missing", None), &dnxcore())
        .unwrap()
        .is_none());
}

#[test]
fn earlier_search_path_wins() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write_project(first.path(), "Lib", "[package]\nname = \"Lib\"\nversion = \"1.0.0\"\n");
    write_project(second.path(), "Lib", "[package]\nname = \"Lib\"\nversion = \"2.0.0\"\n");

    let resolver = ProjectResolver::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);
    let project = resolver.try_resolve_project("Lib").unwrap().unwrap();
    assert_eq!(project.version, Version::new(1, 0, 0));
}

#[test]
fn attempted_paths_list_the_search_pattern() {
    let tmp = TempDir::new().unwrap();
    let provider = ProjectReferenceProvider::new(ProjectResolver::new(vec![tmp
        .path()
        .to_path_buf()]));
    let paths = provider.attempted_paths(&dnxcore());
    assert_eq!(paths.len(), 1);
    assert!(paths[0].ends_with("project.toml"));
    assert!(paths[0].contains("{name}"));
}

#[test]
fn walk_over_projects_on_disk() {
    let tmp = sample_workspace();
    let mut ctx = WalkContext::new();
    ctx.walk(&providers(tmp.path()), "App", &Version::new(1, 0, 0), &net45())
        .unwrap();

    let mut libraries = Vec::new();
    ctx.populate(&net45(), &mut libraries);
    let names: Vec<&str> = libraries.iter().map(|l| l.identity.name.as_str()).collect();
    assert_eq!(names, ["App", "Lib"]);

    // Framework references resolve to nothing and are dropped quietly.
    let app = &libraries[0];
    let deps: Vec<&str> = app.dependencies.iter().map(|d| d.name()).collect();
    assert_eq!(deps, ["Lib"]);
    assert!(ctx.report().unresolved.is_empty());

    let rendered = ctx.render_tree(None).unwrap();
    assert!(rendered.contains("mscorlib (framework)"));
}

#[test]
fn malformed_project_fails_the_walk() {
    let tmp = sample_workspace();
    write_project(tmp.path(), "Lib", "[package\nname = ");

    let mut ctx = WalkContext::new();
    let err = ctx
        .walk(&providers(tmp.path()), "App", &Version::new(1, 0, 0), &dnxcore())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Provider 'project' failed: could not describe Lib *"
    );
    assert!(err
        .chain()
        .any(|cause| cause.to_string() == "while loading project 'Lib'"));
    assert!(err
        .chain()
        .any(|cause| cause.to_string().contains("Failed to parse project.toml")));
}

#[test]
fn package_name_must_match_directory() {
    let tmp = sample_workspace();
    write_project(
        tmp.path(),
        "Lib",
        "[package]\nname = \"LibCore\"\nversion = \"0.3.0\"\n",
    );

    let resolver = ProjectResolver::new(vec![tmp.path().to_path_buf()]);
    let err = resolver.try_resolve_project("Lib").unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Manifest error: "), "got: {message}");
    assert!(
        message.contains("declares package 'LibCore' but lives in directory 'Lib'"),
        "got: {message}"
    );

    let mut ctx = WalkContext::new();
    let err = ctx
        .walk(&providers(tmp.path()), "App", &Version::new(1, 0, 0), &dnxcore())
        .unwrap_err();
    assert!(err
        .chain()
        .any(|cause| cause.to_string().contains("declares package 'LibCore'")));
    assert!(ctx.tree().is_none());
}

#[test]
fn package_name_may_differ_in_case() {
    let tmp = sample_workspace();
    write_project(
        tmp.path(),
        "Lib",
        "[package]\nname = \"lib\"\nversion = \"0.3.0\"\n",
    );

    let resolver = ProjectResolver::new(vec![tmp.path().to_path_buf()]);
    let project = resolver.try_resolve_project("Lib").unwrap().unwrap();
    assert_eq!(project.name, "lib");

    let mut ctx = WalkContext::new();
    ctx.walk(&providers(tmp.path()), "App", &Version::new(1, 0, 0), &dnxcore())
        .unwrap();
    let mut libraries = Vec::new();
    ctx.populate(&dnxcore(), &mut libraries);
    let app = &libraries[0];
    assert!(app
        .dependencies
        .iter()
        .any(|d| d.name().eq_ignore_ascii_case("lib") && d.library.is_some()));
}
