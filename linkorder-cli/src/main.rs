mod args;
mod commands;

use clap::Parser;

use args::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();
    log::debug!("linkorder starting: {:?}", cli.command);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    commands::run(&cli, &mut handle)
}
