use clap::Parser;

use relnotes::{
    Result,
    cli::{Args, Command},
    command,
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("relnotes")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = Args::parse();

    initialize_logger(cli_args.debug)?;

    match cli_args.command.clone() {
        Command::Generate { dry_run } => {
            command::generate::execute(&cli_args, dry_run)
        }
        Command::View { source, out_file } => {
            command::view::execute(&cli_args, source, out_file).await
        }
    }
}
