use std::collections::HashSet;
use std::fmt::{self, Display};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{LinkOrderConfig, ENV_VARS};
use crate::domain::LibInfo;
use crate::error::{LinkError, LinkResult};

/// A single `cargo:` line understood by build scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDirective {
    SearchNative(PathBuf),
    LinkStatic(String),
    RerunIfChanged(PathBuf),
    RerunIfEnvChanged(String),
}

impl Display for LinkDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkDirective::SearchNative(dir) => {
                write!(f, "cargo:rustc-link-search=native={}", dir.display())
            }
            LinkDirective::LinkStatic(name) => write!(f, "cargo:rustc-link-lib=static={}", name),
            LinkDirective::RerunIfChanged(path) => {
                write!(f, "cargo:rerun-if-changed={}", path.display())
            }
            LinkDirective::RerunIfEnvChanged(var) => {
                write!(f, "cargo:rerun-if-env-changed={}", var)
            }
        }
    }
}

fn utf8_path(path: &Path) -> LinkResult<PathBuf> {
    match path.to_str() {
        Some(_) => Ok(path.to_path_buf()),
        None => Err(LinkError::NonUtf8Path {
            path: path.to_path_buf(),
        }),
    }
}

/// Directives for `ordered_deps`, which must already be in link order.
///
/// Search directories come first, deduplicated in order of appearance, then
/// one static link line per library.
pub fn link_directives(
    ordered_deps: &[LibInfo],
    config: &LinkOrderConfig,
) -> LinkResult<Vec<LinkDirective>> {
    let mut search_dirs: Vec<LinkDirective> = vec![];
    let mut seen: HashSet<&Path> = HashSet::new();
    let mut links: Vec<LinkDirective> = vec![];

    for lib in ordered_deps {
        let link_name = lib.link_name().ok_or_else(|| LinkError::NotStaticLib {
            name: lib.name.clone(),
        })?;
        let dir = lib.search_dir().ok_or_else(|| LinkError::NoParentDirectory {
            name: lib.name.clone(),
        })?;
        if seen.insert(dir) {
            search_dirs.push(LinkDirective::SearchNative(utf8_path(dir)?));
        }
        links.push(LinkDirective::LinkStatic(link_name));
    }

    let mut directives = search_dirs;
    directives.append(&mut links);

    if config.emit_rerun_if_changed {
        for lib in ordered_deps {
            directives.push(LinkDirective::RerunIfChanged(utf8_path(&lib.path)?));
        }
        directives.extend(
            ENV_VARS
                .iter()
                .map(|var| LinkDirective::RerunIfEnvChanged(var.to_string())),
        );
    }

    Ok(directives)
}

pub fn emit_link_directives<W: Write>(
    writer: &mut W,
    ordered_deps: &[LibInfo],
    config: &LinkOrderConfig,
) -> LinkResult<()> {
    for directive in link_directives(ordered_deps, config)? {
        writeln!(writer, "{}", directive)?;
    }
    Ok(())
}

/// Print link directives for `ordered_deps` to stdout.
pub fn link_to_dependencies(ordered_deps: &[LibInfo]) -> LinkResult<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    emit_link_directives(&mut handle, ordered_deps, &LinkOrderConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lib(dir: &str, name: &str) -> LibInfo {
        LibInfo::new(name, Path::new(dir).join(name))
    }

    fn quiet() -> LinkOrderConfig {
        LinkOrderConfig {
            emit_rerun_if_changed: false,
            ..LinkOrderConfig::default()
        }
    }

    #[test]
    fn directive_lines() {
        assert_eq!(
            LinkDirective::SearchNative(PathBuf::from("/out/lib")).to_string(),
            "cargo:rustc-link-search=native=/out/lib"
        );
        assert_eq!(
            LinkDirective::LinkStatic("tinkwrap".to_string()).to_string(),
            "cargo:rustc-link-lib=static=tinkwrap"
        );
        assert_eq!(
            LinkDirective::RerunIfChanged(PathBuf::from("/out/lib/libz.a")).to_string(),
            "cargo:rerun-if-changed=/out/lib/libz.a"
        );
        assert_eq!(
            LinkDirective::RerunIfEnvChanged("LINKORDER_STRICT".to_string()).to_string(),
            "cargo:rerun-if-env-changed=LINKORDER_STRICT"
        );
    }

    #[test]
    fn search_dirs_are_deduplicated_and_links_keep_order() {
        let ordered = vec![
            lib("/out/app", "libapp.a"),
            lib("/out/deps", "libtls.a"),
            lib("/out/deps", "libcrypto.a"),
        ];

        let directives = link_directives(&ordered, &quiet()).unwrap();
        let lines: Vec<String> = directives.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "cargo:rustc-link-search=native=/out/app",
                "cargo:rustc-link-search=native=/out/deps",
                "cargo:rustc-link-lib=static=app",
                "cargo:rustc-link-lib=static=tls",
                "cargo:rustc-link-lib=static=crypto",
            ]
        );
    }

    #[test]
    fn rerun_lines_follow_links() {
        let ordered = vec![lib("/out", "libz.a")];
        let directives = link_directives(&ordered, &LinkOrderConfig::default()).unwrap();

        assert_eq!(directives[0], LinkDirective::SearchNative(PathBuf::from("/out")));
        assert_eq!(directives[1], LinkDirective::LinkStatic("z".to_string()));
        assert_eq!(directives[2], LinkDirective::RerunIfChanged(PathBuf::from("/out/libz.a")));
        assert_eq!(directives.len(), 3 + ENV_VARS.len());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_directory_is_rejected() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let dir = Path::new("/out").join(OsString::from_vec(vec![0xff]));
        let ordered = vec![LibInfo::new("libz.a", dir.join("libz.a"))];

        let err = link_directives(&ordered, &quiet()).unwrap_err();
        assert!(matches!(err, LinkError::NonUtf8Path { path } if path == dir));
    }

    #[test]
    fn non_static_name_is_rejected() {
        let ordered = vec![lib("/out", "libz.so")];
        let err = link_directives(&ordered, &quiet()).unwrap_err();
        assert!(matches!(err, LinkError::NotStaticLib { name } if name == "libz.so"));
    }

    #[test]
    fn emits_one_line_per_directive() {
        let ordered = vec![lib("/out", "liba.a"), lib("/out", "libb.a")];
        let mut out: Vec<u8> = vec![];
        emit_link_directives(&mut out, &ordered, &quiet()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "cargo:rustc-link-search=native=/out\n\
             cargo:rustc-link-lib=static=a\n\
             cargo:rustc-link-lib=static=b\n"
        );
    }
}
