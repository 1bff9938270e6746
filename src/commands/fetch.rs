use anyhow::{bail, Result};
use fieldmap_core::{ClusterSet, GeoBounds, Vertex};
use fieldmap_communication::FetchOutcome;
use fieldmap_designer::NullPresenter;
use serde::Serialize;

use crate::cli::{Cli, FetchArgs};
use crate::console::MapConsole;

/// Printed result of a fetch.
#[derive(Debug, Serialize)]
pub struct FetchReport {
    pub bounds: GeoBounds,
    pub zoom: u8,
    pub sequence: u64,
    pub objects: usize,
    pub clusters: ClusterSet,
}

pub async fn run(cli: &Cli, args: &FetchArgs) -> Result<()> {
    let mut config = super::load_config(cli)?;
    if let Some(endpoint) = &args.endpoint {
        config.fetch.endpoint = endpoint.clone();
    }
    if !args.categories.is_empty() {
        config.fetch.categories = args.categories.clone();
    }

    let console = MapConsole::with_http(config, Box::new(NullPresenter::default()))?;
    move_viewport(&console, args);

    let report = fetch_once(&console).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Applies the center and zoom overrides from the command line.
pub fn move_viewport(console: &MapConsole, args: &FetchArgs) {
    let viewport = console.viewport();
    let center = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => Vertex::new(lat, lng),
        _ => viewport.center(),
    };
    let zoom = args.zoom.unwrap_or(viewport.zoom());
    if center != viewport.center() || zoom != viewport.zoom() {
        console.zoom_to(center, zoom);
    }
}

/// Runs one fetch and cluster cycle for the console's current viewport.
pub async fn fetch_once(console: &MapConsole) -> Result<FetchReport> {
    let viewport = console.viewport();
    let sequence = match console.refresh_now().await {
        FetchOutcome::Applied { sequence, .. } => sequence,
        FetchOutcome::Superseded { sequence, latest } => {
            bail!("fetch {sequence} superseded by {latest}")
        }
        FetchOutcome::Failed { error, .. } => bail!("fetch failed: {error}"),
    };

    Ok(FetchReport {
        bounds: viewport.bounds(),
        zoom: viewport.zoom(),
        sequence,
        objects: console.objects().len(),
        clusters: console.clusters(),
    })
}
