//! teamboard - scripted demo session against the tracker core.
//!
//! Runs a short sequence of user actions, prints every event the tracker
//! emits as a JSON line, waits for the notifications to expire and prints
//! the final snapshot.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast;
use tokio::time::{Duration, sleep};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use teamboard_core::domain::{
    Level, NewMember, NewTask, Priority, Role, TaskStatus, TrackerEvent,
};
use teamboard_core::ports::{BroadcastEventSink, LogEventSink, TokioClock};
use teamboard_core::report::{MemberFilter, ReportPeriod, ReportRequest};
use teamboard_core::{SharedTracker, TimerDriver, Tracker, TrackerBuilder, TrackerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Marketing team task tracker demo")]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start with an empty board
    #[arg(long)]
    no_seed: bool,

    /// Send events to the log instead of printing them
    #[arg(long)]
    log_events: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.debug);

    let mut config = match &args.config {
        Some(path) => TrackerConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TrackerConfig::default(),
    }
    .with_env_overrides()?;
    if args.no_seed {
        config.seed_sample_data = false;
    }
    let linger = Duration::from_millis(config.notification_ttl_ms.max(config.celebration_ttl_ms) + 100);

    let builder = TrackerBuilder::new().config(config).clock(TokioClock::new());
    let (tracker, printer) = if args.log_events {
        (builder.event_sink(LogEventSink).build()?, None)
    } else {
        let sink = BroadcastEventSink::default();
        let rx = sink.subscribe();
        let tracker = builder.event_sink(sink).build()?;
        (tracker, Some(tokio::spawn(print_events(rx))))
    };

    let shared = SharedTracker::new(tracker);
    let driver = TimerDriver::spawn(shared.clone());

    shared.update(run_session).await?;

    info!(wait_ms = linger.as_millis() as u64, "waiting for notifications to expire");
    sleep(linger).await;
    driver.shutdown_and_join().await;

    let snapshot = shared.lock().await.snapshot();
    // dropping the tracker closes the broadcast channel and ends the printer
    drop(shared);
    if let Some(printer) = printer {
        let _ = printer.await;
    }
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// A typical session: hire, assign, progress, bulk-edit, report.
fn run_session(tracker: &mut Tracker) -> Result<()> {
    let ann = tracker.add_member(NewMember::new(
        "Ann",
        Role::ContentCreator,
        "ann@example.com",
        Level::Junior,
    ))?;

    // rejected: no email
    if let Err(err) = tracker.add_member(NewMember::new("Nobody", Role::default(), "", Level::Junior)) {
        warn!(error = %err, "expected rejection");
    }

    let post = tracker.create_task(
        NewTask::new("Write post", Some(ann), "2025-07-01")
            .with_priority(Priority::High)
            .with_description("Launch announcement for the blog"),
    )?;
    let brief = tracker.create_task(NewTask::new("Draft brief", Some(ann), "2025-07-05"))?;

    tracker.update_status(post, TaskStatus::InProgress);
    tracker.update_status(post, TaskStatus::Completed);

    // rejected: nothing selected yet
    if let Err(err) = tracker.bulk_update_status(TaskStatus::InProgress) {
        warn!(error = %err, "expected rejection");
    }
    tracker.toggle_selection(brief);
    tracker.bulk_update_status(TaskStatus::InProgress)?;

    tracker.generate_report(ReportRequest {
        period: ReportPeriod::Week,
        member: MemberFilter::All,
    });
    Ok(())
}

async fn print_events(mut rx: broadcast::Receiver<TrackerEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!(error = %err, "failed to encode event"),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "event printer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn setup_logging(debug: bool) {
    // RUST_LOG wins over --debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("teamboard_core=debug,teamboard_cli=debug")
        } else {
            EnvFilter::new("teamboard_core=info,teamboard_cli=info")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
