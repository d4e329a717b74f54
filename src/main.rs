use clap::Parser;
use quickpoll::cli::{Cli, Command, ConfigCommand};
use quickpoll::{cli, config, server};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "quickpoll=info".into()),
        )
        .init();

    let args = Cli::parse();
    let result = match args.command.unwrap_or(Command::Start {
        port: None,
        bind: None,
    }) {
        Command::Start { port, bind } => start(port, bind),
        Command::Status { port, host } => cli::handle_status(&host, port),
        Command::Config(ConfigCommand::Show) => cli::handle_config_show(),
        Command::Config(ConfigCommand::Path) => {
            cli::handle_config_path();
            Ok(())
        }
        Command::Version => {
            cli::handle_version();
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn start(port: Option<u16>, bind: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_config()?.resolve(port, bind);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::run(config))?;
    Ok(())
}
