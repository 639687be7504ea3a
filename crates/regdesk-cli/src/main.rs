//! `regdesk` command-line driver

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

fn cli() -> Command {
    let config_arg = Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("TOML configuration file");
    let values_arg = Arg::new("values")
        .long("values")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON object of form field values");
    let competition_arg = Arg::new("competition")
        .long("competition")
        .required(true)
        .help("Competition id, e.g. hackathon");
    let drafts_arg = Arg::new("drafts-dir")
        .long("drafts-dir")
        .value_parser(value_parser!(PathBuf))
        .help("Directory holding saved drafts");

    Command::new("regdesk")
        .version(regdesk_modal::VERSION)
        .about("Competition registration desk")
        .subcommand_required(true)
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate form values and print the error map")
                .arg(values_arg.clone())
                .arg(config_arg.clone()),
        )
        .subcommand(
            Command::new("submit")
                .about("Open the registration modal, fill it and submit")
                .arg(competition_arg.clone())
                .arg(values_arg)
                .arg(config_arg.clone())
                .arg(drafts_arg.clone()),
        )
        .subcommand(
            Command::new("draft")
                .about("Show the saved draft for a competition")
                .arg(competition_arg)
                .arg(drafts_arg)
                .arg(config_arg),
        )
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("regdesk=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    let result = match matches.subcommand() {
        Some(("validate", args)) => commands::validate(
            args.get_one::<PathBuf>("values").cloned().unwrap_or_default(),
            args.get_one::<PathBuf>("config").cloned(),
        ),
        Some(("submit", args)) => {
            commands::submit(
                args.get_one::<String>("competition").cloned().unwrap_or_default(),
                args.get_one::<PathBuf>("values").cloned().unwrap_or_default(),
                args.get_one::<PathBuf>("config").cloned(),
                args.get_one::<PathBuf>("drafts-dir").cloned(),
            )
            .await
        }
        Some(("draft", args)) => commands::draft(
            args.get_one::<String>("competition").cloned().unwrap_or_default(),
            args.get_one::<PathBuf>("drafts-dir").cloned(),
            args.get_one::<PathBuf>("config").cloned(),
        ),
        _ => Ok(false),
    };

    if finish(result) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Log a command failure with its cause chain; `true` when the command succeeded
fn finish(result: anyhow::Result<bool>) -> bool {
    match result {
        Ok(succeeded) => succeeded,
        Err(e) => {
            let chain = format!("{e:#}");
            tracing::error!(error = %chain, "Command failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn submit_requires_competition() {
        let err = cli()
            .try_get_matches_from(["regdesk", "submit", "--values", "v.json"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn failures_are_logged_and_unsuccessful() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        assert!(!finish(Err(anyhow::anyhow!("disk full").context("saving draft"))));
        assert!(!finish(Ok(false)));
        assert!(finish(Ok(true)));
    }

    #[test]
    fn global_json_flag() {
        let matches = cli()
            .try_get_matches_from(["regdesk", "draft", "--competition", "hackathon", "--json-logs"])
            .unwrap();
        assert!(matches.get_flag("json-logs"));
    }
}
