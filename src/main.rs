use clap::Parser;
use paracn::{
    cli::{init_verbose, Cli, Command, FULL_VERSION},
    commands::{configs, estimate},
    utils::{handle_error_and_exit, Result},
};

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    let subcommand_name = match cli.command {
        Command::Estimate(_) => "estimate",
        Command::Configs(_) => "configs",
    };

    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        *FULL_VERSION,
        subcommand_name
    );
    match cli.command {
        Command::Estimate(args) => estimate::estimate(args)?,
        Command::Configs(args) => configs::configs(args)?,
    }
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
