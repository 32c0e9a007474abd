use clap::Parser;
use tracing_subscriber::EnvFilter;
use volunteer_roster::shell::cli::Cli;
use volunteer_roster::shell::commands::App;
use volunteer_roster::shell::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let app = App::connect(config).await?;
    app.run(cli.command).await
}
