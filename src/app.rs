//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds the store client from the environment
//! - runs one utility and prints its report

use chrono::{Local, Utc};
use clap::Parser;
use tracing::info;

use crate::cleanup::{DEFAULT_COLLECTIONS, DrainEvent, drain_collection};
use crate::cli::{CleanupArgs, Command, VerifyArgs};
use crate::config::{NotifyConfig, StoreConfig};
use crate::error::AppError;
use crate::monitor::{Notifier, NotifyOutcome, send_notification, webhook_from_config};
use crate::store::FirestoreClient;

pub mod pipeline;

use pipeline::AuditOutput;

/// Entry point for the `listing-ops` binary.
pub fn run() -> Result<(), AppError> {
    crate::telemetry::init_telemetry();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Audit => handle_audit(),
        Command::Verify(args) => handle_verify(args),
        Command::Cleanup(args) => handle_cleanup(args),
        Command::Monitor => handle_monitor(),
    }
}

fn connect() -> Result<FirestoreClient, AppError> {
    let config = StoreConfig::from_env()?;
    info!(project = %config.project_id, database = %config.database, "using document store");
    FirestoreClient::new(config)
}

fn handle_audit() -> Result<(), AppError> {
    let store = connect()?;
    let out = pipeline::run_audit(&store, store.config().max_pages);
    print!("{}", render_audit(&out));
    Ok(())
}

/// Listing and duplicate sections are skipped when nothing was fetched.
fn render_audit(out: &AuditOutput) -> String {
    let mut text = String::new();

    if out.listings.is_empty() {
        text.push_str("\nNo listings found.\n");
    } else {
        text.push_str(&format!("\n--- Listing Details ({} documents) ---\n", out.listings.len()));
        text.push_str(&crate::report::format_listing_table(&out.listings));
        text.push_str("\n--- Duplicate Check ---\n");
        text.push_str(&crate::report::format_duplicates(&out.duplicates));
    }

    text.push_str(&format!("\n--- Batch Status Details ({} documents) ---\n", out.batches.len()));
    text.push_str(&crate::report::format_batch_statuses(&out.batches));
    text
}

fn handle_verify(args: VerifyArgs) -> Result<(), AppError> {
    let store = connect()?;
    println!("\n🚀 Starting verification ({} URL filters)...", args.targets.len());

    let out = pipeline::run_verify(&store, &args.targets, store.config().max_pages);
    for v in &out.verified {
        print!("{}", crate::report::format_verification(&v.record, &v.result));
    }
    println!("{}", crate::report::format_verification_summary(&out.summary));

    if let Some(path) = &args.export {
        let export = crate::io::build_export(&out.verified, &out.summary, &args.targets, Utc::now());
        crate::io::write_verification_json(path, &export)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_cleanup(args: CleanupArgs) -> Result<(), AppError> {
    let collections: Vec<String> = if args.collections.is_empty() {
        DEFAULT_COLLECTIONS.iter().map(|c| c.to_string()).collect()
    } else {
        args.collections.clone()
    };

    if !args.yes {
        let prompt = format!(
            "⚠️  WARNING: This will delete ALL data in {}. Type 'yes' to proceed: ",
            quoted_list(&collections)
        );
        if !crate::cli::confirm::confirm_stdin(&prompt)? {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    let store = connect()?;
    let mut all_complete = true;
    for collection in &collections {
        println!("\n--- Cleaning {collection} ---");
        let report = drain_collection(&store, collection, args.max_rounds, |event| match event {
            DrainEvent::Deleted { id } => println!("Deleted: {id}"),
            DrainEvent::AlreadyGone { id } => println!("Already gone: {id}"),
            DrainEvent::Failed { name, error } => println!("Failed to delete {name}: {error}"),
        });
        all_complete &= report.is_complete();
        println!("{}", crate::report::format_drain_report(&report));
    }

    if all_complete {
        println!("\n✅ Database cleanup complete.");
    } else {
        println!("\n⚠️  Cleanup finished with documents remaining; rerun to continue.");
    }
    Ok(())
}

fn handle_monitor() -> Result<(), AppError> {
    info!(started = %Local::now(), "starting listing monitor");

    let store = connect()?;
    let notify_config = NotifyConfig::from_env()?;

    let out = pipeline::run_monitor(&store, store.config().max_pages);
    println!("Fetched {} listings, {} price drops.", out.fetched, out.drops.len());
    for drop in &out.drops {
        println!(
            "  {} {} -> ${:.0} (down ${:.0})",
            drop.listing.id,
            drop.listing.address.as_deref().unwrap_or("N/A"),
            drop.listing.price_usd,
            drop.amount_usd()
        );
    }

    let notifier = webhook_from_config(&notify_config);
    let outcome = send_notification(notifier.as_ref().map(|n| n as &dyn Notifier), &out.drops);
    if outcome == NotifyOutcome::Failed {
        println!("Notification could not be delivered (see log).");
    }

    info!(finished = %Local::now(), "listing monitor done");
    Ok(())
}

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(" and ")
}
