//! wanderer: one agent drifting between the places of a small city.
//!
//! `simulate` runs the agent and writes its perception log, `serve` streams
//! that log to viewers, and `summarize` turns a finished day into a report.
//! The three share nothing but the log directory, so they can run as
//! separate processes.

mod cli;
mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wl_feed::FeedServer;
use wl_log::{DailyLogWriter, PerceptionRecorder, ResourceMonitor};
use wl_sim::SimBuilder;
use wl_summary::{render_narrative, summarize_file};

use cli::Command;
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match cli::parse(&args) {
        Ok(invocation) => invocation,
        Err(err) => {
            eprintln!("error: {err}");
            cli::print_usage();
            std::process::exit(2);
        }
    };
    let config = AppConfig::load(invocation.config.as_deref())?;

    match invocation.command {
        Command::Simulate { ticks } => simulate(config, ticks).await,
        Command::Serve { addr } => serve(config, addr).await,
        Command::Summarize { date, json } => summarize(&config, date, json),
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Help => {
            cli::print_usage();
            Ok(())
        }
    }
}

// ── simulate ──────────────────────────────────────────────────────────────────

async fn simulate(mut config: AppConfig, ticks: Option<u64>) -> Result<()> {
    if ticks.is_some() {
        config.sim.total_ticks = ticks;
    }
    let layout = config.layout();

    // Any configuration error aborts here, before the first tick.
    let mut sim = SimBuilder::new(config.sim.clone())
        .catalog(config.catalog()?)
        .motion(config.motion)
        .classifier(config.classifier.clone())
        .build()
        .context("invalid simulation setup")?;

    let recorder = PerceptionRecorder::new(DailyLogWriter::new(layout.perceptions_dir()))
        .with_weather(config.weather.clone())
        .with_echo(config.echo);
    let monitor = ResourceMonitor::new(layout.resources_path(), &config.sim, config.resource_interval_secs);
    let mut observers = (recorder, monitor);

    info!(
        locations = sim.brain().catalog().len(),
        seed = config.sim.seed,
        logs = %layout.root().display(),
        "starting simulation"
    );

    let stop = Arc::new(AtomicBool::new(false));
    let batch = ticks.is_some();
    if !batch {
        let flag = Arc::clone(&stop);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received; stopping");
                flag.store(true, Ordering::Relaxed);
            }
        });
    }

    let t0 = Instant::now();
    let worker = tokio::task::spawn_blocking(move || {
        if batch {
            sim.run(&mut observers)?;
        } else {
            sim.run_paced(&mut observers, &stop);
        }
        Ok::<_, wl_sim::SimError>((sim, observers))
    });
    let (sim, (mut recorder, mut monitor)) = worker.await.context("simulation task failed")??;

    if let Some(err) = recorder.take_error() {
        warn!(error = %err, failures = recorder.failures(), "some perceptions were not written");
    }
    if let Some(err) = monitor.take_error() {
        warn!(error = %err, "some resource samples were not written");
    }
    info!(
        ticks = sim.clock.current_tick.0,
        perceptions = recorder.written(),
        elapsed_secs = t0.elapsed().as_secs_f64(),
        thought = %sim.brain().current_thought(),
        "simulation finished"
    );
    Ok(())
}

// ── serve ─────────────────────────────────────────────────────────────────────

async fn serve(mut config: AppConfig, addr: Option<SocketAddr>) -> Result<()> {
    if let Some(addr) = addr {
        config.feed.bind = addr;
    }
    FeedServer::new(config.feed.clone(), config.layout())
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("live feed failed")
}

// ── summarize ─────────────────────────────────────────────────────────────────

fn summarize(config: &AppConfig, date: Option<NaiveDate>, json: bool) -> Result<()> {
    let date = date.unwrap_or_else(|| Utc::now().date_naive());
    let path = config.layout().day_path(date);
    let Some(summary) = summarize_file(&path, &config.summary())? else {
        bail!("no perceptions logged for {date} ({})", path.display());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_narrative(&summary));
    }
    Ok(())
}
