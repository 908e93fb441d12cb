use linkorder_core::fixtures::StaticLibFixture;
use linkorder_core::*;

fn main() -> Result<()> {
    // Lay out a small native build tree
    let root = std::env::temp_dir().join("linkorder-example");
    if root.exists() {
        std::fs::remove_dir_all(&root)?;
    }

    StaticLibFixture::new("app")
        .defines(&["app_main"])
        .references(&["http_get", "log_write"])
        .write_in(&root)?;
    StaticLibFixture::new("http")
        .defines(&["http_get"])
        .references(&["tls_connect", "log_write"])
        .write_in(&root.join("deps/http"))?;
    StaticLibFixture::new("tls")
        .defines(&["tls_connect"])
        .references(&["log_write"])
        .write_in(&root.join("deps/tls"))?;
    StaticLibFixture::new("log")
        .defines(&["log_write"])
        .references(&["write"])
        .write_in(&root.join("deps/log"))?;

    println!("Scanning {}", root.display());

    let config = LinkOrderConfig {
        emit_rerun_if_changed: false,
        ..LinkOrderConfig::new(&root)
    };
    let resolver = LinkResolver::new(config);

    let libs = resolver.scan()?;
    for lib in &libs.libs {
        println!(
            "  {:<12} defined={} undefined={}",
            lib.name,
            libs.symbols.defined_count(lib),
            libs.symbols.undefined_count(lib)
        );
    }

    let plan = build_link_plan(&libs)?;
    println!("\nLink order:");
    for (i, lib) in plan.libraries.iter().enumerate() {
        println!("  {}. {}", i + 1, lib.name);
    }

    println!("\nDependencies:");
    for edge in &plan.edges {
        println!("  {} -> {} via {}", edge.dependent, edge.dependency, edge.symbols.join(", "));
    }

    println!("\nDirectives:");
    let mut stdout = std::io::stdout();
    resolver.link(&mut stdout)?;

    std::fs::remove_dir_all(&root)?;
    Ok(())
}
