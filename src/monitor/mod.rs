//! Price-drop monitoring and webhook notification.
//!
//! A listing has dropped when the scraper recorded a previous price
//! (`last_price_usd`) and the current `price_usd` is lower. Listings that are no
//! longer on the market are ignored.

use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::config::NotifyConfig;
use crate::domain::ListingRecord;

pub mod notify;

pub use notify::*;

/// At most this many listings are spelled out in one message.
pub const MESSAGE_LISTING_LIMIT: usize = 5;

const ACTIVE_STATUSES: [&str; 2] = ["listed", "active"];

/// A listing whose price went down since the previous scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceDrop {
    pub listing: ListingRecord,
    pub previous_usd: f64,
}

impl PriceDrop {
    pub fn amount_usd(&self) -> f64 {
        self.previous_usd - self.listing.price_usd
    }
}

pub fn detect_price_drops(listings: &[ListingRecord]) -> Vec<PriceDrop> {
    listings
        .iter()
        .filter(|l| ACTIVE_STATUSES.iter().any(|s| l.listing_status.eq_ignore_ascii_case(s)))
        .filter_map(|l| {
            let previous = l.last_price_usd?;
            // A zero current price means "unknown", not "free".
            (l.price_usd > 0.0 && l.price_usd < previous).then(|| PriceDrop {
                listing: l.clone(),
                previous_usd: previous,
            })
        })
        .collect()
}

/// Human-readable alert text for the webhook.
pub fn build_message(drops: &[PriceDrop]) -> String {
    let mut out = format!("🏠 Price drop alert ({} listings)\n\n", drops.len());
    for drop in drops.iter().take(MESSAGE_LISTING_LIMIT) {
        let l = &drop.listing;
        out.push_str(&format!("📍 {}\n", l.address.as_deref().unwrap_or("N/A")));
        out.push_str(&format!(
            "💰 {} (was ${:.0})\n",
            l.price.as_deref().unwrap_or("N/A"),
            drop.previous_usd
        ));
        out.push_str(&format!("🔗 {}\n\n", l.url.as_deref().unwrap_or("")));
    }
    if drops.len() > MESSAGE_LISTING_LIMIT {
        out.push_str(&format!("... and {} more\n", drops.len() - MESSAGE_LISTING_LIMIT));
    }
    out
}

/// What `send_notification` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,
    SkippedNoWebhook,
    SkippedNoDrops,
    Failed,
}

/// Best-effort dispatch. Failures are logged and reported, never propagated.
pub fn send_notification(notifier: Option<&dyn Notifier>, drops: &[PriceDrop]) -> NotifyOutcome {
    let Some(notifier) = notifier else {
        warn!("notification webhook not configured; skipping notification");
        return NotifyOutcome::SkippedNoWebhook;
    };
    if drops.is_empty() {
        info!("no price drops; nothing to notify");
        return NotifyOutcome::SkippedNoDrops;
    }

    match notifier.notify(&build_message(drops)) {
        Ok(()) => {
            info!(count = drops.len(), "notification sent");
            NotifyOutcome::Sent
        }
        Err(err) => {
            warn!("notification failed: {err}");
            NotifyOutcome::Failed
        }
    }
}

/// Build the production notifier from config. `None` when no token is set.
pub fn webhook_from_config(config: &NotifyConfig) -> Option<WebhookNotifier> {
    let token = config.token.clone()?;
    match Client::builder().timeout(config.timeout).build() {
        Ok(client) => Some(WebhookNotifier::new(client, config.url.clone(), token)),
        Err(err) => {
            warn!("failed to build notification client: {err}");
            None
        }
    }
}
