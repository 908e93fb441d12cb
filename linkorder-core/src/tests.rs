use crate::archive::{ArchiveReader, SymbolReader};
use crate::config::LinkOrderConfig;
use crate::domain::{ArchiveSymbols, LibInfo};
use crate::error::{DepFindError, LinkOrderError, ScanError, ScanResult};
use crate::fixtures::StaticLibFixture;
use crate::resolver::LinkResolver;
use std::path::Path;
use tempfile::TempDir;

/// The layout a CMake build of a small wrapper library tends to leave behind:
/// the wrapper on top, a crypto stack below it and a utility library shared
/// by everything.
fn native_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    StaticLibFixture::new("tinkwrap")
        .defines(&["tinkwrap_encrypt", "hello"])
        .references(&["aead_seal", "util_log", "memcpy"])
        .write_in(root)
        .unwrap();
    StaticLibFixture::new("aead")
        .defines(&["aead_seal", "aead_open"])
        .references(&["sha256_digest", "util_log"])
        .write_in(&root.join("third_party/aead"))
        .unwrap();
    StaticLibFixture::new("sha")
        .defines(&["sha256_digest"])
        .local_defines(&["sha256_round"])
        .references(&["util_log"])
        .write_in(&root.join("third_party/sha"))
        .unwrap();
    StaticLibFixture::new("util")
        .defines(&["util_log"])
        .references(&["printf"])
        .write_in(&root.join("third_party/util"))
        .unwrap();

    tmp
}

#[cfg(test)]
mod pipeline_tests {
    use super::*;

    #[test]
    fn test_plan_orders_native_tree() {
        let tree = native_tree();
        let resolver = LinkResolver::new(LinkOrderConfig::new(tree.path()));

        let plan = resolver.plan().unwrap();

        let order: Vec<&str> = plan.libraries.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(order, vec!["libtinkwrap.a", "libaead.a", "libsha.a", "libutil.a"]);
        assert_eq!(plan.edges.len(), 5);
        let wrap_to_aead = plan
            .edges
            .iter()
            .find(|e| e.dependent == "libtinkwrap.a" && e.dependency == "libaead.a")
            .unwrap();
        assert_eq!(wrap_to_aead.symbols, vec!["aead_seal"]);
    }

    #[test]
    fn test_link_writes_directives_in_order() {
        let tree = native_tree();
        let config = LinkOrderConfig {
            emit_rerun_if_changed: false,
            ..LinkOrderConfig::new(tree.path())
        };

        let mut out: Vec<u8> = vec![];
        LinkResolver::new(config).link(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let links: Vec<&str> = text
            .lines()
            .filter_map(|l| l.strip_prefix("cargo:rustc-link-lib=static="))
            .collect();
        assert_eq!(links, vec!["tinkwrap", "aead", "sha", "util"]);

        let searches = text
            .lines()
            .filter(|l| l.starts_with("cargo:rustc-link-search=native="))
            .count();
        assert_eq!(searches, 4);
        assert!(!text.contains("rerun-if-changed"));
    }

    #[test]
    fn test_plan_serializes_to_json() {
        let tree = native_tree();
        let plan = LinkResolver::new(LinkOrderConfig::new(tree.path()))
            .plan()
            .unwrap();

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["libraries"][0]["name"], "libtinkwrap.a");
        assert!(json["edges"].as_array().unwrap().len() == 5);
    }

    #[test]
    fn test_conflicting_definitions_fail() {
        let tree = native_tree();
        StaticLibFixture::new("util2")
            .defines(&["util_log"])
            .write_in(&tree.path().join("vendored"))
            .unwrap();

        let err = LinkResolver::new(LinkOrderConfig::new(tree.path()))
            .plan()
            .unwrap_err();
        assert!(matches!(
            err,
            LinkOrderError::DepFind(DepFindError::MultipleDefines { .. })
        ));
    }

    #[test]
    fn test_excluding_a_conflict_resolves_it() {
        let tree = native_tree();
        StaticLibFixture::new("util2")
            .defines(&["util_log"])
            .write_in(&tree.path().join("vendored"))
            .unwrap();

        let config = LinkOrderConfig {
            exclude: vec!["util2".to_string()],
            ..LinkOrderConfig::new(tree.path())
        };
        let plan = LinkResolver::new(config).plan().unwrap();
        assert_eq!(plan.libraries.len(), 4);
    }

    #[test]
    fn test_cycle_between_archives_fails() {
        let tmp = TempDir::new().unwrap();
        StaticLibFixture::new("left")
            .defines(&["left_fn"])
            .references(&["right_fn"])
            .write_in(tmp.path())
            .unwrap();
        StaticLibFixture::new("right")
            .defines(&["right_fn"])
            .references(&["left_fn"])
            .write_in(tmp.path())
            .unwrap();

        let err = LinkResolver::new(LinkOrderConfig::new(tmp.path()))
            .plan()
            .unwrap_err();
        assert!(matches!(
            err,
            LinkOrderError::DepFind(DepFindError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn test_empty_root_yields_empty_plan() {
        let tmp = TempDir::new().unwrap();
        let plan = LinkResolver::new(LinkOrderConfig::new(tmp.path()))
            .plan()
            .unwrap();
        assert!(plan.libraries.is_empty());
    }
}

#[cfg(test)]
mod reader_tests {
    use super::*;

    /// Fails for one named library and defers to the real reader otherwise.
    struct FlakyReader {
        broken: &'static str,
    }

    impl SymbolReader for FlakyReader {
        fn read_symbols(&self, lib: &LibInfo) -> ScanResult<ArchiveSymbols> {
            if lib.name == self.broken {
                return Err(ScanError::MalformedArchive {
                    path: lib.path.clone(),
                    reason: "truncated".to_string(),
                });
            }
            ArchiveReader::new().read_symbols(lib)
        }
    }

    #[test]
    fn test_unreadable_archive_is_skipped_when_lenient() {
        let tree = native_tree();
        let resolver = LinkResolver::new(LinkOrderConfig::new(tree.path()))
            .with_reader(Box::new(FlakyReader { broken: "libsha.a" }));

        let plan = resolver.plan().unwrap();
        assert_eq!(plan.libraries.len(), 4);
        assert!(plan.edges.iter().all(|e| e.dependency != "libsha.a"));
    }

    #[test]
    fn test_unreadable_archive_fails_when_strict() {
        let tree = native_tree();
        let config = LinkOrderConfig {
            strict: true,
            ..LinkOrderConfig::new(tree.path())
        };
        let resolver =
            LinkResolver::new(config).with_reader(Box::new(FlakyReader { broken: "libsha.a" }));

        let err = resolver.plan().unwrap_err();
        assert!(matches!(
            err,
            LinkOrderError::Scan(ScanError::MalformedArchive { .. })
        ));
    }

    #[test]
    fn test_missing_root_surfaces_scan_error() {
        let resolver = LinkResolver::new(LinkOrderConfig::new(Path::new("/nonexistent/linkorder")));
        assert!(matches!(
            resolver.scan().unwrap_err(),
            LinkOrderError::Scan(ScanError::RootNotFound { .. })
        ));
    }
}
