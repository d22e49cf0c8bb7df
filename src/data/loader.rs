//! Local dataset loading.
//!
//! Reads the same `salesReps` document the backend serves, so the
//! dashboard can be built without a running API.

use crate::analysis::validate_reps;
use crate::models::{Deal, SalesRep, SalesRepsResponse};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Load a `{"salesReps": [...]}` document from disk.
pub fn load_dataset(path: &Path) -> Result<Vec<SalesRep>> {
    info!("Loading dataset from: {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    let dataset: SalesRepsResponse = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dataset: {}", path.display()))?;

    let reps = validate_reps(dataset.sales_reps)
        .with_context(|| format!("Dataset contains a malformed deal: {}", path.display()))?;

    debug!("Dataset contains {} sales reps", reps.len());
    Ok(reps)
}

/// All deals across all representatives, each tagged with its owner's name.
///
/// Deals keep the order of their representatives, then their own order.
pub fn flatten_deals(reps: &[SalesRep]) -> Vec<Deal> {
    reps.iter()
        .flat_map(|rep| {
            rep.deals.iter().map(move |deal| Deal {
                sales_rep: Some(rep.name.clone()),
                ..deal.clone()
            })
        })
        .collect()
}

/// Look up a single representative by id.
pub fn find_rep(reps: &[SalesRep], id: u32) -> Option<&SalesRep> {
    reps.iter().find(|rep| rep.id == id)
}
