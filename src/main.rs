use clap::Parser;
use spectrace::config::config_manager::ConfigManager;
use spectrace::structs::cli::Cli;
use spectrace::workers::command_runner::CommandRunner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ConfigManager::load(cli.config.as_deref())?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    match ConfigManager::resolve_path(cli.config.as_deref()) {
        Some(path) => log::info!("📋 Loaded config from: {}", path.display()),
        None => log::info!("📋 No configuration file found, using defaults"),
    }

    let mut runner = CommandRunner::new(cli.config);
    if let Err(e) = runner.run_command(cli.command, config).await {
        log::error!("❌ {}", e);
        eprintln!("error[{}]: {}", e.kind(), e);
        std::process::exit(1);
    }

    Ok(())
}
