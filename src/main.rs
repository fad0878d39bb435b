use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use pagepilot::cli::Cli;
use pagepilot::{commands, logging};
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                std::process::exit(0);
            }
            _ => {
                let _ = err.print();
                std::process::exit(1);
            }
        },
    };

    logging::init(cli.verbose);

    // Bare invocation: usage, success.
    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        std::process::exit(0);
    };

    if let Err(err) = commands::dispatch(command, &cli.session).await {
        error!(error = %err, "command failed");
        std::process::exit(1);
    }
}
