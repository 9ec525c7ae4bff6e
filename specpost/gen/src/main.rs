//! Specpost
//!
//! Compiles OpenAPI/Swagger interface descriptions into runnable request
//! collections.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use specpost_gen::compile::{CompileOptions, compile_file};
use specpost_gen::config::load_profile;
use specpost_gen::errors::CompileError;
use specpost_gen::output::emit;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Specpost - turns interface descriptions into request collections
#[derive(Parser, Debug)]
#[command(name = "specpost")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile an interface description into a collection
    Compile {
        /// Input interface description (.json, .yaml or .yml)
        input: PathBuf,

        /// Output collection file
        output: PathBuf,

        /// Also write an environment template to this file
        #[arg(long = "env", value_name = "ENV_OUTPUT")]
        env: Option<PathBuf>,

        /// TOML profile overriding the built-in ledger tables
        #[arg(long, value_name = "FILE")]
        profile: Option<PathBuf>,

        /// Skip the end-to-end workflow folder
        #[arg(long)]
        no_workflow: bool,
    },
}

fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,specpost_gen=info".to_string(),
            2 => "info,specpost_gen=debug".to_string(),
            _ => "debug,specpost_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

fn run(command: Command) -> Result<(), CompileError> {
    let Command::Compile {
        input,
        output,
        env,
        profile,
        no_workflow,
    } = command;

    let options = CompileOptions {
        profile: load_profile(profile.as_deref())?,
        include_workflow: !no_workflow,
        now: None,
    };

    let (collection, environment, report) = compile_file(&input, &options)?;
    emit(&collection, &environment, &output, env.as_deref())?;

    eprintln!(
        "{} {} ({} groups, {} items)",
        "Compiled".green().bold(),
        output.display(),
        report.groups,
        report.items
    );
    if let Some(env) = &env {
        eprintln!(
            "{} {} ({} variables)",
            "Environment".green().bold(),
            env.display(),
            environment.values.len()
        );
    }
    if let Some(workflow) = &report.workflow {
        eprintln!("Workflow: {} steps", workflow.included.len());
        for skipped in &workflow.skipped {
            eprintln!(
                "  {} skipped '{}' ({} {}): no matching request",
                "warning:".yellow().bold(),
                skipped.step,
                skipped.method,
                skipped.path
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
            let _ = err.print();
            return code;
        }
    };

    init_tracing(cli.verbose, cli.json_logs);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
