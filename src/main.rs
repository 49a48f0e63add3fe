//! # Ringback CLI
//!
//! Schedule call reminders for contacts and dial them when the reminder fires.
//!
//! Usage:
//!   ringback schedule --name Alice --phone 555-1234 --at 2025-01-01T10:00:00Z
//!   ringback schedule --contact 0 --at 2025-01-01T10:00:00Z
//!   ringback list
//!   ringback delete <id>
//!   ringback watch                   # show due reminders
//!   ringback tap 555-1234            # tap a shown reminder to dial

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use ringback_core::traits::ContactDirectory;
use ringback_core::{Contact, NotificationPayload, RingbackConfig};
use ringback_scheduler::SchedulingError;
use ringback_scheduler::app::{RingbackApp, check_permissions};
use ringback_scheduler::contacts::{display_number, pick};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ringback", version, about = "📞 Ringback — scheduled call reminders")]
struct Cli {
    /// Config file (default: ~/.ringback/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Schedule a call reminder
    Schedule {
        /// Contact name (with --phone)
        #[arg(long, requires = "phone", conflicts_with = "contact")]
        name: Option<String>,
        /// Contact phone number (with --name)
        #[arg(long, requires = "name")]
        phone: Option<String>,
        /// Index into the contact directory (see `ringback contacts`)
        #[arg(long)]
        contact: Option<usize>,
        /// When to remind, RFC 3339 (e.g. 2025-01-01T10:00:00Z)
        #[arg(long)]
        at: String,
    },
    /// List scheduled calls
    List,
    /// Delete a scheduled call and cancel its reminder
    Delete { id: String },
    /// Call a scheduled contact now (if still within the grace window)
    Call { id: String },
    /// Simulate tapping a reminder carrying this number
    Tap { phone: String },
    /// List contacts from the directory
    Contacts,
    /// Watch for due reminders and show them (tap with `ringback tap`)
    Watch,
    /// Write the default config file
    InitConfig,
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "ringback=debug,ringback_scheduler=debug,ringback_core=debug"
    } else {
        "ringback=info,ringback_scheduler=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let explicit_config = cli.config.as_deref().map(expand_path);

    if let Command::InitConfig = cli.command {
        let config_path = explicit_config.unwrap_or_else(RingbackConfig::default_path);
        if config_path.exists() {
            println!("⚠️  Config already exists at {}", config_path.display());
        } else {
            RingbackConfig::default().save_to(&config_path)?;
            println!("✅ Wrote default config to {}", config_path.display());
        }
        return Ok(());
    }

    let config = match &explicit_config {
        Some(path) => RingbackConfig::load_from(path)?,
        None => RingbackConfig::load()?,
    };

    let data_dir = expand_path(&config.storage.data_dir);
    let contacts_file = expand_path(&config.contacts.file);
    let mut app = RingbackApp::init(config, &data_dir, &contacts_file)
        .context("failed to initialize ringback")?;
    check_permissions(app.notifier.as_ref(), app.directory.as_ref()).await;

    let result = run(&mut app, cli.command).await;
    app.shutdown();
    result
}

async fn run(app: &mut RingbackApp, command: Command) -> Result<()> {
    match command {
        Command::Schedule {
            name,
            phone,
            contact,
            at,
        } => {
            let at: DateTime<Utc> = DateTime::parse_from_rfc3339(&at)
                .with_context(|| format!("invalid --at '{at}', expected RFC 3339"))?
                .with_timezone(&Utc);

            let contact = match (name, phone, contact) {
                (Some(name), Some(phone), _) => Contact::new(name, phone),
                (_, _, Some(index)) => {
                    let entries = app.directory.list_contacts().await?;
                    pick(&entries, index)
                        .with_context(|| format!("no contact at index {index}"))?
                }
                _ => anyhow::bail!("give either --name/--phone or --contact"),
            };

            match app.scheduler.schedule_call(contact, at).await {
                Ok(call) => {
                    println!("✅ Call scheduled successfully!");
                    println!("   ID:      {}", call.id);
                    println!(
                        "   Contact: {} ({})",
                        call.contact.name, call.contact.phone_number
                    );
                    println!("   At:      {}", call.scheduled_at.to_rfc3339());
                }
                Err(SchedulingError::MissingPhoneNumber { name }) => {
                    println!("⚠️  '{name}' has no phone number. Please select another contact.");
                }
                Err(SchedulingError::PartialFailure { record, source }) => {
                    println!("⚠️  Reminder armed but saving failed ({source}), retrying once...");
                    let call = app.scheduler.retry_persist(&record).await?;
                    println!("✅ Call scheduled: {}", call.id);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::List => {
            let list = app.view_model.refresh().await;
            if let Some(warning) = &list.warning {
                println!("⚠️  {warning}");
            }
            let rows = app.view_model.rows(Utc::now());
            if rows.is_empty() {
                println!("No scheduled calls");
            }
            for row in rows {
                let marker = if row.callable { "📞" } else { "⌛" };
                println!(
                    "{marker} {}  {:<20} {:<16} {}",
                    row.call.id,
                    row.call.contact.name,
                    display_number(&row.call.contact),
                    row.call
                        .scheduled_at
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M")
                );
            }
        }
        Command::Delete { id } => {
            app.view_model.refresh().await;
            let remaining = app.view_model.delete_call(&id).await?;
            println!("🗑️  Deleted {id} ({} remaining)", remaining.len());
        }
        Command::Call { id } => {
            app.view_model.refresh().await;
            if !app.view_model.call_now(&id, Utc::now()) {
                println!("⌛ Call {id} is unknown or past its time");
            }
        }
        Command::Tap { phone } => {
            app.router.deliver(&NotificationPayload { phone_number: phone });
        }
        Command::Contacts => {
            let entries = app.directory.list_contacts().await?;
            if entries.is_empty() {
                println!("No contacts found in {}", app.config.contacts.file);
            }
            for (i, entry) in entries.iter().enumerate() {
                let contact = Contact::from_entry(entry);
                println!("{i:>3}  {:<24} {}", contact.name, display_number(&contact));
            }
        }
        Command::Watch => {
            let interval = app.config.watch.check_interval_secs;
            let watcher = ringback_scheduler::watch::run_watcher(
                app.notifier.clone(),
                app.router.presentation(),
                interval,
            );
            tokio::select! {
                _ = watcher => {}
                _ = tokio::signal::ctrl_c() => {
                    println!("\n👋 Stopped watching");
                }
            }
        }
        Command::InitConfig => {}
    }
    Ok(())
}
