use std::{future::Future, sync::Arc, time::Duration};

use agenda::{calendar_options, greeting, project, render_agenda, AgendaQuery, CalendarFilter};
use anyhow::{Context, Result};
use chrono::{Local, Timelike};
use clap::Parser;
use client_core::{AccountController, HttpAccountFetcher, StderrNotifier};
use shared::domain::Account;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server_url: String,
    /// Calendar color to show, or "all".
    #[arg(long, default_value = "all")]
    calendar: CalendarFilter,
    #[arg(long)]
    group_by_department: bool,
    /// Hour used for the greeting; defaults to the local hour.
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    hour: Option<u32>,
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
    /// Keep refreshing on this interval until interrupted.
    #[arg(long)]
    watch_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let fetcher =
        HttpAccountFetcher::new(&args.server_url, Duration::from_secs(args.timeout_secs))?;
    info!(server_url = fetcher.server_url(), "using account server");
    let controller = AccountController::new(Arc::new(fetcher), Arc::new(StderrNotifier));
    let query = AgendaQuery {
        calendar: args.calendar.clone(),
        group_by_department: args.group_by_department,
    };

    let Some(watch_secs) = args.watch_secs else {
        controller.refresh().await.context("failed to refresh agenda")?;
        print!("{}", agenda_text(&controller.account().await, &query, args.hour));
        return Ok(());
    };

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    watch(
        &controller,
        &query,
        args.hour,
        Duration::from_secs(watch_secs.max(1)),
        shutdown,
        |text| print!("{text}"),
    )
    .await;
    Ok(())
}

/// Refreshes and emits the agenda on every tick until `shutdown` resolves.
///
/// A refresh still waiting on the server is dropped when `shutdown` fires.
async fn watch(
    controller: &AccountController,
    query: &AgendaQuery,
    hour: Option<u32>,
    every: Duration,
    shutdown: impl Future<Output = ()>,
    mut emit: impl FnMut(String),
) {
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = &mut shutdown => break,
        }
        tokio::select! {
            refreshed = controller.refresh() => {
                if let Err(err) = refreshed {
                    warn!(error = %err, "refresh failed; showing previous agenda");
                }
            }
            () = &mut shutdown => break,
        }
        emit(agenda_text(&controller.account().await, query, hour));
    }
    info!("interrupted; exiting");
}

fn agenda_text(account: &Account, query: &AgendaQuery, hour: Option<u32>) -> String {
    let hour = hour.unwrap_or_else(|| Local::now().hour());
    let options = calendar_options(account);
    if !options.iter().any(|option| option.value == query.calendar) {
        warn!(calendar = %query.calendar, "no calendar with that color");
    }

    let labels: Vec<&str> = options.iter().map(|option| option.label.as_str()).collect();
    let agenda = project(account, query);
    format!(
        "Calendars: {}\n{}",
        labels.join(", "),
        render_agenda(greeting(hour), &agenda)
    )
}
