//! `find` command: one store search through the configured browser agent.

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use storefinder_agent::{BrowserAgentClient, FinderSettings, StoreFinder};
use storefinder_core::{AppConfig, SearchParams};

#[derive(Debug, Args)]
pub struct FindArgs {
    /// Postal or ZIP code to search around
    #[arg(long)]
    pub postal_code: Option<String>,
    /// Street address to search around (wins over the other location forms)
    #[arg(long)]
    pub address: Option<String>,
    /// Latitude in decimal degrees (requires --lng)
    #[arg(long, allow_hyphen_values = true, requires = "lng")]
    pub lat: Option<f64>,
    /// Longitude in decimal degrees (requires --lat)
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lng: Option<f64>,
    /// Item to look for; repeat for several
    #[arg(long = "item")]
    pub items: Vec<String>,
    /// Search radius in kilometres (defaults to STOREFINDER_DEFAULT_RADIUS_KM)
    #[arg(long)]
    pub radius: Option<f64>,
}

impl FindArgs {
    pub fn into_params(self) -> SearchParams {
        SearchParams {
            postal_code: self.postal_code,
            address: self.address,
            latitude: self.lat,
            longitude: self.lng,
            desired_items: self.items,
            search_radius: self.radius,
        }
    }
}

pub async fn run_find(config: &AppConfig, args: FindArgs) -> anyhow::Result<()> {
    let agent = BrowserAgentClient::from_config(config)?;
    let finder = StoreFinder::new(FinderSettings::from_config(config), Arc::new(agent));

    let stores = finder
        .search(args.into_params())
        .await
        .context("store search failed")?;

    tracing::info!(count = stores.len(), "store search complete");
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({ "stores": stores }))?
    );
    Ok(())
}
