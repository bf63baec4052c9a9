//! Command-line parsing.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveDate;

#[derive(Debug, PartialEq)]
pub enum Command {
    /// Run the agent.  With `ticks`, run that many ticks flat out; without,
    /// run in real time until interrupted.
    Simulate { ticks: Option<u64> },
    Serve { addr: Option<SocketAddr> },
    Summarize { date: Option<NaiveDate>, json: bool },
    /// Print the effective configuration as JSON.
    Config,
    Help,
}

#[derive(Debug, PartialEq)]
pub struct Invocation {
    pub config:  Option<PathBuf>,
    pub command: Command,
}

pub fn print_usage() {
    println!("wanderer [--config <file.json>] <command>");
    println!("commands:");
    println!("  simulate [ticks]");
    println!("    without ticks: real time until Ctrl-C; with ticks: as fast as possible");
    println!("  serve [addr]");
    println!("    live feed, default addr 0.0.0.0:3001");
    println!("  summarize [YYYY-MM-DD] [--json]");
    println!("    defaults to today (UTC)");
    println!("  config");
    println!("    print the effective configuration");
}

pub fn parse(args: &[String]) -> Result<Invocation, String> {
    let mut config = None;
    let mut json = false;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config needs a file")?;
                config = Some(PathBuf::from(path));
            }
            "--json" => json = true,
            "-h" | "--help" => positional.insert(0, "help"),
            flag if flag.starts_with("--") => return Err(format!("unknown flag: {flag}")),
            other => positional.push(other),
        }
    }

    let operand = positional.get(1).copied();
    if positional.len() > 2 {
        return Err(format!("unexpected argument: {}", positional[2]));
    }

    let command = match positional.first().copied() {
        None | Some("help") => Command::Help,
        Some("simulate") => Command::Simulate {
            ticks: operand
                .map(|raw| raw.parse::<u64>().map_err(|_| format!("invalid ticks: {raw}")))
                .transpose()?,
        },
        Some("serve") => Command::Serve {
            addr: operand
                .map(|raw| raw.parse::<SocketAddr>().map_err(|_| format!("invalid addr: {raw}")))
                .transpose()?,
        },
        Some("summarize") => Command::Summarize {
            date: operand
                .map(|raw| {
                    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| format!("invalid date: {raw}"))
                })
                .transpose()?,
            json,
        },
        Some("config") => Command::Config,
        Some(other) => return Err(format!("unknown command: {other}")),
    };
    Ok(Invocation { config, command })
}
