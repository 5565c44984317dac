//! Command handlers.
//!
//! Each handler builds a client from the validated config, runs one or more
//! core operations and writes rendered output to `out`.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use colored::Colorize;
use futures::future::join_all;
use maconomy_core::{format_date, parse_date, MaconomyClient, SaveEntry, SearchKind, Session};

use crate::cli::Commands;
use crate::config::Config;
use crate::render;
use crate::session::SessionStore;

/// Fields shared by every day of an `add`.
struct AddLine<'a> {
    project: &'a str,
    task: &'a str,
    hours: &'a str,
    text: &'a str,
    description: &'a str,
}

impl AddLine<'_> {
    fn entry(&self, date: NaiveDate, line_key: Option<String>) -> SaveEntry {
        SaveEntry {
            date,
            task: self.task.to_string(),
            hours: self.hours.to_string(),
            project_id: self.project.to_string(),
            text: self.text.to_string(),
            daily_description: self.description.to_string(),
            line_key,
        }
    }
}

pub async fn run<W: Write>(command: Commands, config: &Config, out: &mut W) -> Result<()> {
    let client = MaconomyClient::from_config(config.rpc.clone())?;
    let store = SessionStore::new(&config.session_file);

    match command {
        Commands::Login { username, password } => {
            tracing::info!("Logging in as {}", username);
            let info = client.login(&username, &password).await.context("Login failed")?;
            store.save(&info.session().context("Login failed")?)?;
            writeln!(out, "{}", render::login_summary(&info))?;
        }

        Commands::Period { start, end } => {
            let session = store.load()?;
            let start = parse_date(&start)?;
            let end = match end {
                Some(end) => parse_date(&end)?,
                None => start
                    .checked_add_days(Days::new(6))
                    .context("End date out of range")?,
            };
            let period = client.get_period(&session, start, end).await?;
            write!(out, "{}", render::period(&period))?;
        }

        Commands::Add {
            project,
            task,
            hours,
            dates,
            text,
            description,
            line_key,
        } => {
            let session = store.load()?;
            let dates = dates
                .iter()
                .map(|d| parse_date(d))
                .collect::<maconomy_core::Result<Vec<_>>>()?;
            let line = AddLine {
                project: &project,
                task: &task,
                hours: &hours,
                text: &text,
                description: &description,
            };
            add_entries(&client, &session, &line, &dates, line_key, out).await?;
        }

        Commands::Delete { line_key, date } => {
            let session = store.load()?;
            let date = parse_date(&date)?;
            client.delete_entry(&session, &line_key, date).await?;
            writeln!(out, "{}", format!("Deleted line {line_key}").green())?;
        }

        Commands::Projects { query } => {
            let session = store.load()?;
            let results = client
                .search(&session, &SearchKind::RecentlyUsedProjects, &query)
                .await?;
            write!(out, "{}", render::search_results(&results))?;
        }

        Commands::Tasks { project, query } => {
            let session = store.load()?;
            let results = client
                .search(&session, &SearchKind::TasksForProject(project), &query)
                .await?;
            write!(out, "{}", render::search_results(&results))?;
        }

        Commands::Periods => {
            let session = store.load()?;
            let periods = client.timesheet_periods(&session).await?;
            write!(out, "{}", render::periods(&periods))?;
        }

        Commands::Totals { from, to } => {
            let session = store.load()?;
            let totals = client
                .timesheet_totals(&session, parse_date(&from)?, parse_date(&to)?)
                .await?;
            if totals.is_empty() {
                writeln!(out, "No hours recorded")?;
            } else {
                write!(out, "{}", render::totals(&totals))?;
            }
        }
    }

    Ok(())
}

/// Saves the first day alone when no line key is given, so the remaining
/// days update the line it created instead of each creating their own.
async fn add_entries<W: Write>(
    client: &MaconomyClient,
    session: &Session,
    line: &AddLine<'_>,
    dates: &[NaiveDate],
    line_key: Option<String>,
    out: &mut W,
) -> Result<()> {
    let mut pending = dates;
    let key = match line_key.filter(|k| !k.is_empty()) {
        Some(key) => key,
        None => {
            let Some((first, rest)) = dates.split_first() else {
                return Ok(());
            };
            let key = client.save_entry(session, &line.entry(*first, None)).await?;
            tracing::debug!("Created line {}", key);
            writeln!(out, "{} {} ({})", "Entry added successfully".green(), format_date(*first), key)?;
            pending = rest;
            key
        }
    };

    let entries: Vec<SaveEntry> = pending.iter().map(|d| line.entry(*d, Some(key.clone()))).collect();
    let results = join_all(entries.iter().map(|e| client.save_entry(session, e))).await;

    let mut failed = 0;
    for (entry, result) in entries.iter().zip(results) {
        match result {
            Ok(_) => writeln!(out, "{} {}", "Entry added successfully".green(), format_date(entry.date))?,
            Err(e) => {
                failed += 1;
                tracing::warn!("Saving {} failed: {}", format_date(entry.date), e);
                writeln!(out, "{} {}: {}", "Failed".red(), format_date(entry.date), e)?;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} entries failed", dates.len());
    }
    Ok(())
}
