use std::io::Write;

use anyhow::{Context, Result};
use linkorder_core::{LinkOrderConfig, LinkResolver};

use crate::args::{Cli, Command};

/// Config file (or defaults), then `LINKORDER_*` variables, then flags.
pub fn build_config(cli: &Cli) -> Result<LinkOrderConfig> {
    let mut config = match &cli.config {
        Some(path) => LinkOrderConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LinkOrderConfig::default(),
    };
    config
        .apply_env()
        .context("reading LINKORDER_* environment")?;

    config.search_root = cli.command.root().clone();
    config.exclude.extend(cli.exclude.iter().cloned());
    if cli.strict {
        config.strict = true;
    }
    if let Some(depth) = cli.max_depth {
        config.max_depth = Some(depth);
    }
    if let Command::Emit { no_rerun: true, .. } = cli.command {
        config.emit_rerun_if_changed = false;
    }
    Ok(config)
}

pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let config = build_config(cli)?;
    let root = config.search_root.clone();
    log::debug!("Using config {:?}", config);
    let resolver = LinkResolver::new(config);

    match &cli.command {
        Command::Scan { .. } => {
            let libs = resolver
                .scan()
                .with_context(|| format!("scanning {}", root.display()))?;
            for lib in &libs.libs {
                writeln!(
                    out,
                    "{}\t{}\tdefined={}\tundefined={}",
                    lib.name,
                    lib.path.display(),
                    libs.symbols.defined_count(lib),
                    libs.symbols.undefined_count(lib)
                )?;
            }
        }
        Command::Order { json, .. } => {
            let plan = resolver
                .plan()
                .with_context(|| format!("ordering libraries under {}", root.display()))?;
            if *json {
                serde_json::to_writer_pretty(&mut *out, &plan)?;
                writeln!(out)?;
            } else {
                for lib in &plan.libraries {
                    writeln!(out, "{}", lib.name)?;
                }
            }
        }
        Command::Emit { .. } => {
            resolver
                .link(out)
                .with_context(|| format!("emitting directives for {}", root.display()))?;
        }
        Command::Graph { .. } => {
            let graph = resolver
                .dependency_graph()
                .with_context(|| format!("building graph for {}", root.display()))?;
            writeln!(out, "{}", graph.to_dot())?;
        }
    }
    Ok(())
}
