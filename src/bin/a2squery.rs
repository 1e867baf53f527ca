//! Thin CLI wrapper around [`a2squery`] for ad-hoc queries against a single server.

use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgGroup, Parser, Subcommand};
use thiserror::Error;

use a2squery::ports::{parse_port_expression, PortExpressionError};
use a2squery::{A2SError, Engine, QueryContext};

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Query(#[from] A2SError),
    #[error(transparent)]
    Ports(#[from] PortExpressionError),
}

#[derive(Parser)]
#[command(name = "a2squery", version, about = "Query a Source/GoldSrc game server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one query against a server, or a set of ports on the same host.
    #[command(group(ArgGroup::new("kind").args(["info", "players", "rules", "ping"])))]
    Query {
        /// Server hostname or IP, without a port.
        host: String,

        #[arg(long)]
        info: bool,
        #[arg(long)]
        players: bool,
        #[arg(long)]
        rules: bool,
        #[arg(long)]
        ping: bool,

        /// Treat the target as a GoldSrc (pre-Source) engine server.
        #[arg(long)]
        goldsrc: bool,

        /// Port or comma-separated list of ports/ranges to query, e.g. "27015,27020-27022".
        #[arg(short, long, default_value = "27015")]
        ports: String,

        #[arg(short, long, default_value_t = 10.0)]
        timeout: f64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Command::Query {
        host,
        info: _,
        players,
        rules,
        ping,
        goldsrc,
        ports,
        timeout,
    } = cli.command;

    let ctx = QueryContext::new()
        .with_engine(if goldsrc { Engine::GoldSrc } else { Engine::Source })
        .with_timeout(Duration::from_secs_f64(timeout));

    for port in parse_port_expression(&ports)? {
        let addr = format!("{host}:{port}");

        if players {
            let result = ctx.query_players(&addr).await?;
            println!("{addr} {:#?} ({:?})", result.value, result.round_trip);
        } else if rules {
            let result = ctx.query_rules(&addr).await?;
            println!("{addr} {:#?} ({:?})", result.value, result.round_trip);
        } else if ping {
            let result = ctx.query_ping(&addr).await?;
            println!("{addr} {:#?} ({:?})", result.value, result.round_trip);
        } else {
            let result = ctx.query_info(&addr).await?;
            println!("{addr} {:#?} ({:?})", result.value, result.round_trip);
        }
    }

    Ok(())
}
