//! Generated C must match the reference output byte for byte

mod test_fixtures;

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use resource_bundle::{CompilerConfig, OutputKind, ResourceCompiler};
use test_fixtures::*;

const SNAPSHOT: &str = include_str!("snapshots/resources.c");

#[test]
fn test_c_source_matches_snapshot() {
    let output = default_compiler()
        .generate(&canonical_manifest(), OutputKind::CSource, Path::new("resources.c"))
        .unwrap();
    assert_eq!(String::from_utf8(output).unwrap(), SNAPSHOT);
}

#[test]
fn test_explicit_c_name_matches_snapshot() {
    let compiler = ResourceCompiler::new(CompilerConfig {
        c_name: Some("resources".to_string()),
        ..Default::default()
    })
    .unwrap();
    let output = compiler
        .generate(&canonical_manifest(), OutputKind::CSource, Path::new("out.c"))
        .unwrap();
    assert_eq!(String::from_utf8(output).unwrap(), SNAPSHOT);
}

#[test]
fn test_compile_to_file_matches_snapshot() {
    let out = TempDir::new().unwrap();
    let target = out.path().join("resources.c");
    default_compiler()
        .compile_to_file(&canonical_manifest_path(), OutputKind::CSource, &target)
        .unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), SNAPSHOT);
}

#[test]
fn test_source_dirs_match_snapshot() {
    let tree = SourceTree::new();
    tree.write("resource1.txt", RESOURCE1);
    tree.write("nested/resource2.txt", RESOURCE2);
    let manifest_path = tree.write_manifest("/assets", &["resource1.txt", "resource2.txt"]);

    let compiler = ResourceCompiler::new(CompilerConfig {
        source_dirs: vec![tree.path().to_path_buf(), tree.path().join("nested")],
        ..Default::default()
    })
    .unwrap();
    let target = tree.path().join("resources.c");
    compiler
        .compile_to_file(&manifest_path, OutputKind::CSource, &target)
        .unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), SNAPSHOT);
}

#[test]
fn test_snapshot_embeds_canonical_bundle() {
    let bundle = canonical_bundle();
    assert_eq!(bundle.len(), CANONICAL_BUNDLE_SIZE);
    assert!(SNAPSHOT.contains(&format!("const guint8 data[{}];", bundle.len() + 1)));

    // The string form holds every byte in octal
    let octal: String = bundle.iter().map(|b| format!("\\{:03o}", b)).collect();
    let literal: String = SNAPSHOT
        .lines()
        .skip_while(|line| !line.starts_with("#else /* _MSC_VER */"))
        .skip(2)
        .take_while(|line| !line.starts_with("#endif"))
        .map(|line| line.trim().trim_start_matches('"').trim_end_matches(" };").trim_end_matches('"'))
        .collect();
    assert_eq!(literal, octal);
}
