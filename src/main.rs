mod app;
mod envinfo;
mod extractor;
mod output;
mod scan;
mod walk;

use clap::Parser;

use crate::app::Cli;

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .expect("failed to set Ctrl+C handler");

    let cli = Cli::parse();

    // Diagnostics on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.json {
        let level = if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("dotmeta", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    if cli.info {
        envinfo::run();
        return Ok(());
    }

    let Some(path) = cli.path.as_deref() else {
        anyhow::bail!("a path to a directory or a .NET binary file is required");
    };

    scan::run(path, &cli)
}
