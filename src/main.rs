use clap::Parser;
use env_logger::Env;
use subsleuth::cli::Cli;
use subsleuth::config::Config;

fn main() -> anyhow::Result<()> {
    let config_path = Config::default_path()?;
    let config = Config::load(&config_path)?;
    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();
    cli.run(config, &config_path)
}
