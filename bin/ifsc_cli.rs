//! # IFSC Lookup CLI
//!
//! Terminal front end for the IFSC Lookup SDK.
//!
//! ## Usage
//!
//! ```bash
//! # Direct lookup by code
//! cargo run --bin ifsc-cli -- lookup SBIN0000001
//!
//! # Interactive bank → state → district → branch browsing
//! cargo run --bin ifsc-cli -- browse
//! ```
//!
//! In browse mode, type the number of an option to select it, `r` to reset,
//! `c` to copy the displayed IFSC to the clipboard, `q` to quit.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use ifsc_lookup_sdk::copy_feedback::{CopyFeedback, Osc52Clipboard};
use ifsc_lookup_sdk::{
    CascadeLevel, HttpDirectoryApi, LookupCache, LookupOutcome, LookupRecord, LookupSession,
    Settings,
};

#[derive(Parser)]
#[command(name = "ifsc-cli", about = "Find Indian Financial System Codes by location or by code", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a branch record by IFSC code
    Lookup {
        /// The IFSC code (normalized to uppercase)
        code: String,
    },
    /// Browse interactively: bank, then state, district, branch
    Browse,
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new()?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log.level.clone()),
    )
    .init();
    ifsc_lookup_sdk::metrics::describe_metrics();

    let api = Arc::new(HttpDirectoryApi::new(&settings.api)?);
    let mut session = LookupSession::new(api, Arc::new(LookupCache::new()));

    match Cli::parse().command {
        Command::Lookup { code } => {
            if let Some(outcome) = session.lookup_code(&code).await {
                render_outcome(outcome);
            } else {
                eprintln!("{}", "Enter an IFSC code to search.".yellow());
            }
        }
        Command::Browse => {
            session.init().await;
            browse(&mut session).await?;
        }
    }

    Ok(())
}

/// Interactive cascade loop. Each round shows the options of the deepest
/// enabled level and reads one command from stdin.
async fn browse(session: &mut LookupSession) -> Result<()> {
    let stdin = io::stdin();
    let mut feedback = CopyFeedback::new();
    let mut clipboard = Osc52Clipboard;

    println!("{}", "IFSC Code Lookup".bold());
    println!("Search by bank, state, district and branch.\n");

    loop {
        let level = match next_level(session) {
            Some(level) => level,
            None => {
                // Cascade complete: resolve the branch IFSC to a record.
                if let Some(outcome) = session.lookup_selected().await {
                    render_outcome(outcome);
                }
                prompt_after_result(session, &stdin, &mut feedback, &mut clipboard)?;
                continue;
            }
        };

        let options = session.cascade().options(level);
        if options.is_empty() {
            println!(
                "{}",
                format!("No options available for {}.", level_name(level)).yellow()
            );
            prompt_after_result(session, &stdin, &mut feedback, &mut clipboard)?;
            continue;
        }

        println!("{}", format!("Select {}:", level_name(level)).bold());
        for (i, option) in options.iter().enumerate() {
            println!("  {:>3}. {}", i + 1, option.label);
        }
        print!("{} ", "choice (number, r=reset, q=quit):".dimmed());
        io::stdout().flush()?;

        let Some(line) = read_line(&stdin)? else {
            break;
        };
        match line.trim() {
            "q" => break,
            "r" => {
                session.reset();
                println!("{}", "Reset.".green());
            }
            raw => {
                let options = session.cascade().options(level).clone();
                match raw.parse::<usize>() {
                    Ok(n) if (1..=options.len()).contains(&n) => {
                        let choice = options[n - 1].clone();
                        session.cascade_mut().select(level, choice).await;
                    }
                    _ => println!("{}", "Enter a number from the list.".yellow()),
                }
            }
        }
    }

    Ok(())
}

/// The first level that still lacks a selection, or None when the cascade is
/// complete. The first unselected level always has a selected parent, so it
/// is always enabled.
fn next_level(session: &LookupSession) -> Option<CascadeLevel> {
    CascadeLevel::ALL
        .into_iter()
        .find(|&level| session.cascade().selected(level).is_none())
}

fn prompt_after_result(
    session: &mut LookupSession,
    stdin: &io::Stdin,
    feedback: &mut CopyFeedback,
    clipboard: &mut Osc52Clipboard,
) -> Result<()> {
    loop {
        print!("{} ", "(c=copy code, r=new search, q=quit):".dimmed());
        io::stdout().flush()?;
        let Some(line) = read_line(stdin)? else {
            std::process::exit(0);
        };
        match line.trim() {
            "q" => std::process::exit(0),
            "r" => {
                session.reset();
                return Ok(());
            }
            "c" => {
                let code = session
                    .outcome()
                    .and_then(LookupOutcome::record)
                    .and_then(|record| record.ifsc.clone());
                match code {
                    Some(code) => {
                        feedback.copy(clipboard, &code)?;
                        println!("{}", "Copied!".green().bold());
                    }
                    None => println!("{}", "Nothing to copy.".yellow()),
                }
            }
            _ => {}
        }
    }
}

fn read_line(stdin: &io::Stdin) -> Result<Option<String>> {
    let mut line = String::new();
    let read = stdin.lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn render_outcome(outcome: &LookupOutcome) {
    match outcome {
        LookupOutcome::Error(message) => println!("{}", message.red()),
        LookupOutcome::Record(record) => render_record(record),
    }
}

fn render_record(record: &LookupRecord) {
    println!();
    println!(
        "  {}",
        record.ifsc.as_deref().unwrap_or("-").bold().blue()
    );
    render_row("Bank", record.bank.as_deref());
    render_row("Branch", record.branch.as_deref());
    render_row("District", record.district.as_deref().or(record.city.as_deref()));
    render_row("City", record.city.as_deref());
    render_row("State", record.state.as_deref());
    render_row("Contact", record.contact.as_deref());
    render_row("MICR", record.micr.as_deref());
    render_flag("NEFT", record.neft);
    render_flag("RTGS", record.rtgs);
    render_flag("IMPS", record.imps);
    render_flag("UPI", record.upi);
    render_row("SWIFT", record.swift.as_deref());
    render_row("Address", record.address.as_deref());
    println!();
}

fn render_row(label: &str, value: Option<&str>) {
    let shown = match value {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    };
    println!("  {:>9}: {}", label.dimmed(), shown);
}

fn render_flag(label: &str, value: Option<bool>) {
    let shown = match value {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "-",
    };
    println!("  {:>9}: {}", label.dimmed(), shown);
}

fn level_name(level: CascadeLevel) -> &'static str {
    match level {
        CascadeLevel::Bank => "bank",
        CascadeLevel::State => "state",
        CascadeLevel::District => "district",
        CascadeLevel::Branch => "branch",
    }
}
