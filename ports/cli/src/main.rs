mod cmds;
mod dtos;

use self::Opts::*;

use clap::{Parser, Subcommand};
use phylomc_ports_lib::{expose_runtime_arguments, LogFormat};
use std::{path::PathBuf, process::exit, str::FromStr};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Subcommand, Debug)]
#[command(author, version, about, long_about = None)]
enum Opts {
    /// Sample tree topologies from an alignment using MCMC
    Sample(cmds::sample::Arguments),

    /// Simulate an alignment on a random tree
    Simulate(cmds::simulate::Arguments),

    /// Score a tree against an alignment
    Likelihood(cmds::likelihood::Arguments),

    /// Summarize the topologies of a samples file
    Describe(cmds::describe::Arguments),
}

#[derive(Parser, Debug)]
#[clap(name = "pmc", version, author, about)]
struct Cli {
    #[clap(subcommand)]
    opts: Opts,

    #[clap(long)]
    log_level: Option<String>,

    #[clap(long)]
    log_file: Option<String>,

    #[clap(long, default_value = "ansi")]
    log_format: LogFormat,

    #[clap(short, long, default_value = "1")]
    threads: Option<usize>,
}

fn main() {
    let args = Cli::parse();

    // ? -----------------------------------------------------------------------
    // ? Configure logger
    // ? -----------------------------------------------------------------------

    let log_level = args.log_level.unwrap_or("info".to_string());

    let (non_blocking, _guard) = match args.log_file {
        //
        // If no log file is provided, log to stderr
        //
        None => tracing_appender::non_blocking(std::io::stderr()),
        //
        // If a log file is provided, log to the file
        //
        Some(file) => {
            let log_file = PathBuf::from(file);

            let (Some(directory), Some(file_name)) =
                (log_file.parent(), log_file.file_name())
            else {
                eprintln!("Invalid log file path: {:?}", log_file);
                exit(1);
            };

            let file_appender =
                tracing_appender::rolling::minutely(directory, file_name);

            tracing_appender::non_blocking(file_appender)
        }
    };

    let env_filter = match EnvFilter::from_str(log_level.as_str()) {
        Ok(filter) => filter,
        Err(err) => {
            eprintln!("Invalid log level {log_level}: {err}");
            exit(1);
        }
    };

    let tracing_config = tracing_subscriber::fmt()
        .event_format(
            fmt::format()
                // include levels in formatted output
                .with_level(true)
                // don't include targets
                .with_target(false)
                .compact(),
        )
        .with_writer(non_blocking)
        .with_env_filter(env_filter);

    match args.log_format {
        LogFormat::Ansi => tracing_config.pretty().init(),
        LogFormat::Json => tracing_config.json().init(),
    };

    // ? -----------------------------------------------------------------------
    // ? Get command line arguments
    // ? -----------------------------------------------------------------------

    expose_runtime_arguments();

    let result = match args.opts {
        Sample(sample_args) => {
            cmds::sample::sample_cmd(sample_args, args.threads.unwrap_or(1))
        }
        Simulate(simulate_args) => cmds::simulate::simulate_cmd(simulate_args),
        Likelihood(likelihood_args) => {
            cmds::likelihood::likelihood_cmd(likelihood_args)
        }
        Describe(describe_args) => {
            cmds::describe::describe_samples_cmd(describe_args)
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        exit(1);
    }
}
