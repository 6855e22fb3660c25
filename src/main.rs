//! dotctl command-line entry point.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use dotctl::cli::{Cli, Command};
use dotctl::commands::{self, Session};
use dotctl::deploy::Action;
use dotctl::exec::SystemExecutor;
use dotctl::logging::{self, Logger};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let command = args.command.name();
    logging::init_subscriber(args.verbose, command);
    let log = Logger::new(command);

    match run(args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            if let Some(path) = log.log_path() {
                log.debug(&format!("log written to {}", path.display()));
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Cli, log: &Logger) -> Result<()> {
    match &args.command {
        Command::Version => return commands::version::run(),
        Command::Completions(opts) => {
            commands::version::completions(opts.shell, &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let mut session = Session::init(&args.global, log)?;
    let exec = SystemExecutor;
    match args.command {
        Command::Init => commands::init::run(&mut session, log),
        Command::Deploy(opts) => {
            commands::deploy::run(&session, Action::Deploy, &opts.packages, log)
        }
        Command::Undeploy(opts) => {
            commands::deploy::run(&session, Action::Undeploy, &opts.packages, log)
        }
        Command::Status => commands::status::run(&session, &exec, log),
        Command::Add(opts) => {
            commands::packages::add(&mut session, &opts.package, &opts.systems, log)
        }
        Command::Remove(opts) => commands::packages::remove(&mut session, &opts.package, log),
        Command::Adopt(opts) => commands::adopt::run(&mut session, &opts.args, log),
        Command::GithubRepo(opts) => commands::remote::run(
            &mut session,
            &opts.repository,
            opts.branch.as_deref(),
            log,
        ),
        Command::Sync => commands::sync::sync(&session, &exec, log).map(drop),
        Command::Pull => commands::sync::pull(&session, &exec, log).map(drop),
        Command::Debug => {
            commands::debug::run(&session, log);
            Ok(())
        }
        Command::Version | Command::Completions(_) => Ok(()),
    }
}
