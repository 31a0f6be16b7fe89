use std::process::ExitCode;

use clap::Parser;

use puppet_pssh::{pipeline, Command, Config, Logger};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Config::parse();
    let log = Logger::from_env(cli.command.inventory().debug);
    log.debug("Initializing logger");

    let result = match &cli.command {
        Command::Run(args) => pipeline::run(args, &log)
            .await
            .map(|outcome| outcome.exit_code()),
        Command::List(args) => pipeline::list(args, std::io::stdout(), &log)
            .await
            .map(|_| 0),
        Command::CountNodes(args) => pipeline::count_nodes(args, std::io::stdout(), &log)
            .await
            .map(|_| 0),
    };

    match result {
        Ok(code) => ExitCode::from(code.clamp(0, 255) as u8),
        Err(e) => {
            log.error(e);
            ExitCode::FAILURE
        }
    }
}
