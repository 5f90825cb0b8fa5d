//! Dam CLI - scrape reservoir level bulletins into per-dam JSON histories.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "dam-cli",
    version,
    about = "Reservoir level bulletin scraper"
)]
struct Cli {
    #[command(flatten)]
    global: dam_cmd::GlobalArgs,

    #[command(subcommand)]
    command: dam_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    if let Err(e) = dam_cmd::run(cli.global, cli.command).await {
        log::error!("Error: {:#}", e);
        return Err(e);
    }
    Ok(())
}
