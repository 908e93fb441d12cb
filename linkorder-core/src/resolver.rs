//! LinkResolver ties discovery, ordering and directive emission together.
//!
//! Build scripts normally only need [`resolve_and_link`]:
//!
//! ```no_run
//! // build.rs
//! let native = std::path::Path::new("native/out");
//! linkorder_core::resolve_and_link(native).expect("static libraries could not be ordered");
//! ```

use std::io::Write;
use std::path::Path;

use crate::archive::{ArchiveReader, SymbolReader};
use crate::config::LinkOrderConfig;
use crate::discovery::find_libs;
use crate::domain::{LibrarySet, LinkPlan};
use crate::error::Result;
use crate::linker::emit_link_directives;
use crate::ordering::{build_link_plan, DependencyGraph};

pub struct LinkResolver {
    config: LinkOrderConfig,
    reader: Box<dyn SymbolReader>,
}

impl LinkResolver {
    pub fn new(config: LinkOrderConfig) -> Self {
        Self {
            config,
            reader: Box::new(ArchiveReader::new()),
        }
    }

    /// Replace the archive reader, mainly for tests.
    pub fn with_reader(mut self, reader: Box<dyn SymbolReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn config(&self) -> &LinkOrderConfig {
        &self.config
    }

    pub fn scan(&self) -> Result<LibrarySet> {
        find_libs(&self.config.search_root, &self.config, self.reader.as_ref())
    }

    pub fn plan(&self) -> Result<LinkPlan> {
        let libs = self.scan()?;
        Ok(build_link_plan(&libs)?)
    }

    pub fn dependency_graph(&self) -> Result<DependencyGraph> {
        let libs = self.scan()?;
        Ok(DependencyGraph::build(&libs))
    }

    /// Compute the plan and write its directives to `writer`.
    pub fn link<W: Write>(&self, writer: &mut W) -> Result<LinkPlan> {
        let plan = self.plan()?;
        emit_link_directives(writer, &plan.libraries, &self.config)?;
        Ok(plan)
    }
}

/// Order the static libraries under `root` and print Cargo link directives
/// for them, honouring `LINKORDER_*` environment overrides.
pub fn resolve_and_link(root: &Path) -> Result<LinkPlan> {
    let mut config = LinkOrderConfig::new(root);
    config.apply_env()?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    LinkResolver::new(config).link(&mut handle)
}
