use clap::{Parser, Subcommand};

use crate::config::DEFAULT_SESSION;

#[derive(Debug, Parser)]
#[command(
    name = "pagepilot",
    version,
    about = "Long-lived CDP browser sessions with accessibility-tree page summaries"
)]
pub struct Cli {
    /// Named session to operate on.
    #[arg(long, global = true, default_value = DEFAULT_SESSION)]
    pub session: String,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch a browser session, or redirect the one already running.
    Open {
        url: String,
        /// Show the browser window instead of running headless.
        #[arg(long)]
        headed: bool,
    },
    /// Register an externally-running browser by its CDP endpoint.
    Connect {
        /// Endpoint of the form http://host:port.
        cdp_url: String,
    },
    /// Persist cookies and local storage for a domain.
    Save {
        /// URL or bare domain to key the profile by.
        target: String,
    },
    /// Run an instruction batch against the active page.
    Exec {
        /// Instructions (goto/click/fill/press/wait/eval), joined from the
        /// remaining arguments and split on `;`.
        #[arg(required = true, trailing_var_arg = true)]
        code: Vec<String>,
    },
    /// Print the accessibility snapshot report for the active page.
    Snapshot,
    /// Write a full-page PNG and HTML dump as a timestamped file pair.
    Screenshot,
    /// Terminate an owned session, or disconnect an external one.
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn session_defaults_and_overrides() {
        let cli = Cli::try_parse_from(["pagepilot", "close"]).unwrap();
        assert_eq!(cli.session, DEFAULT_SESSION);

        let cli = Cli::try_parse_from(["pagepilot", "--session", "work", "close"]).unwrap();
        assert_eq!(cli.session, "work");
    }

    #[test]
    fn session_flag_is_accepted_after_the_command() {
        let cli = Cli::try_parse_from(["pagepilot", "close", "--session", "work"]).unwrap();
        assert_eq!(cli.session, "work");
    }

    #[test]
    fn open_takes_a_url_and_headed_flag() {
        let cli = Cli::try_parse_from(["pagepilot", "open", "https://example.com", "--headed"])
            .unwrap();
        match cli.command {
            Some(Command::Open { url, headed }) => {
                assert_eq!(url, "https://example.com");
                assert!(headed);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn open_requires_a_url() {
        assert!(Cli::try_parse_from(["pagepilot", "open"]).is_err());
    }

    #[test]
    fn exec_collects_the_remaining_arguments() {
        let cli =
            Cli::try_parse_from(["pagepilot", "exec", "click", "#login;", "press", "Enter"])
                .unwrap();
        match cli.command {
            Some(Command::Exec { code }) => {
                assert_eq!(code.join(" "), "click #login; press Enter");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn bare_invocation_parses_with_no_command() {
        let cli = Cli::try_parse_from(["pagepilot"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn unknown_commands_are_rejected() {
        assert!(Cli::try_parse_from(["pagepilot", "frobnicate"]).is_err());
    }
}
