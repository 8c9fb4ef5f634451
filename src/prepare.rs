// ========================================================================================
//
//                  THE INPUT PARSING, VALIDATION & NETWORK-BUILDING ENGINE
//
// ========================================================================================
//
// This module is the sole authority on turning the three upstream artifacts
// (the adjacency JSON, the feature table, and the prediction table) into a
// ready-to-optimize `Network`. It is a strict airlock between the messy reality
// of delimited files and the clean, in-memory world of the selection loop: the
// successful return of a `PreparationResult` is a run-time guarantee that every
// weighted tract had a complete feature row and every referenced id has a node.
//
// Failure handling follows two distinct regimes, and the distinction matters:
//
// - **Structural failures are fatal.** Unreadable files, malformed JSON or CSV,
//   and a predicted tract with no feature row all abort preparation with a
//   `PrepError`. Every pick depends on a complete neighbor set, so there is no
//   meaningful partial result to continue with.
//
// - **Per-row prediction failures are defaulted.** A missing or unparseable
//   predicted-attainment value substitutes the tract's own baseline (so the
//   credited diff is zero) and preparation continues. The two fallback branches
//   are deliberately separate so each can be observed and tested on its own.
//
// ### Expected input schemas ###
//
// Column names are not configurable; enforcing one strict schema eliminates a
// whole class of configuration errors.
//
//   adjacency JSON:    { "<geo_id>": ["<geo_id>", ...], ... }
//   feature table:     geo_id,total_population,median_income,households,labor_force,baseline_pct
//   prediction table:  geo_id,predicted_pct

use crate::network::Network;
use crate::types::TractFeatures;
use crate::weight::{WeightPolicy, compute_weight};
use ahash::AHashMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

// ========================================================================================
//                                      PUBLIC API
// ========================================================================================

/// A comprehensive error type for all fatal preparation failures.
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed adjacency JSON: {0}")]
    Adjacency(#[from] serde_json::Error),
    #[error("Malformed delimited table: {0}")]
    Table(#[from] csv::Error),
    #[error(
        "Tract '{0}' appears in the prediction table but has no feature row; \
         the network is unusable without complete features for every weighted tract"
    )]
    MissingFeatures(String),
}

/// The validated, ready-to-optimize output of the preparation phase. This
/// struct is a "proof token": its existence guarantees the network is complete
/// and every weight has been resolved or explicitly defaulted.
#[derive(Debug)]
pub struct PreparationResult {
    /// The coverage network, fully populated and not yet sorted.
    pub network: Network,
    /// Total nodes in the arena, placeholders included.
    pub num_tracts: usize,
    /// Tracts that received a computed (possibly zero) weight.
    pub num_weighted: usize,
    /// Prediction rows whose value was missing or unparseable and fell back to
    /// the tract's baseline.
    pub num_defaulted: usize,
}

/// The single entry point for the preparation phase: parses all three inputs,
/// resolves every tract's weight, and assembles the coverage network.
pub fn prepare_network(
    adjacency_path: &Path,
    feature_path: &Path,
    prediction_path: &Path,
    policy: WeightPolicy,
) -> Result<PreparationResult, PrepError> {
    let adjacency = parse_adjacency(adjacency_path)?;
    let features = parse_feature_table(feature_path)?;
    let (weights, num_defaulted) = compute_weights(prediction_path, &features, policy)?;

    let num_weighted = weights.len();
    if num_defaulted > 0 {
        log::info!(
            "{num_defaulted} of {num_weighted} prediction rows had no usable value and were \
             credited zero benefit"
        );
    }

    let mut network = Network::new();
    for (geo_id, neighbor_ids) in &adjacency {
        let value = weights.get(geo_id).copied().unwrap_or(0.0);
        network.add_node(geo_id, value);
        network.add_neighbors(geo_id, neighbor_ids);
    }

    log::info!(
        "coverage network assembled: {} tracts from {} adjacency keys",
        network.node_count(),
        adjacency.len()
    );

    Ok(PreparationResult {
        num_tracts: network.node_count(),
        network,
        num_weighted,
        num_defaulted,
    })
}

// ========================================================================================
//                             PRIVATE IMPLEMENTATION HELPERS
// ========================================================================================

/// One row of the feature table, exactly as stored on disk. Numeric columns
/// deserialize directly; a malformed value here is fatal by construction.
#[derive(Debug, Deserialize)]
struct FeatureRow {
    geo_id: String,
    total_population: f64,
    median_income: f64,
    households: f64,
    labor_force: f64,
    baseline_pct: f64,
}

/// One row of the prediction table. The predicted value is kept as a raw string
/// so that an absent field and an unparseable one are distinguishable branches.
#[derive(Debug, Deserialize)]
struct PredictionRow {
    geo_id: String,
    predicted_pct: String,
}

/// Parses the adjacency mapping. A `BTreeMap` keeps key iteration order
/// deterministic regardless of the JSON's on-disk ordering; each neighbor array
/// keeps its order exactly as given.
fn parse_adjacency(path: &Path) -> Result<BTreeMap<String, Vec<String>>, PrepError> {
    let file = File::open(path)?;
    let adjacency = serde_json::from_reader(BufReader::new(file))?;
    Ok(adjacency)
}

/// Parses the feature table, deriving each tract's salary figure.
fn parse_feature_table(path: &Path) -> Result<AHashMap<String, TractFeatures>, PrepError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut features = AHashMap::new();
    for row in reader.deserialize() {
        let row: FeatureRow = row?;
        let salary_figure = if row.labor_force == 0.0 {
            // No labor-force participants reported: the per-earner scaling is
            // undefined, so fall back to the raw median income.
            row.median_income
        } else {
            row.median_income * row.households / row.labor_force
        };
        features.insert(
            row.geo_id,
            TractFeatures {
                population: row.total_population,
                salary_figure,
                baseline_pct: row.baseline_pct,
            },
        );
    }
    Ok(features)
}

/// Walks the prediction table and computes every weighted tract's benefit.
/// Returns the id→weight map and the count of rows that fell back to baseline.
fn compute_weights(
    path: &Path,
    features: &AHashMap<String, TractFeatures>,
    policy: WeightPolicy,
) -> Result<(AHashMap<String, f64>, usize), PrepError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut weights = AHashMap::new();
    let mut num_defaulted = 0;

    for row in reader.deserialize() {
        let row: PredictionRow = row?;
        let tract = features
            .get(&row.geo_id)
            .ok_or_else(|| PrepError::MissingFeatures(row.geo_id.clone()))?;

        let raw = row.predicted_pct.trim();
        let predicted_pct = if raw.is_empty() {
            log::warn!(
                "tract '{}' has no predicted attainment value; crediting zero benefit",
                row.geo_id
            );
            num_defaulted += 1;
            tract.baseline_pct
        } else {
            match raw.parse::<f64>() {
                Ok(value) => value,
                Err(_) => {
                    log::warn!(
                        "tract '{}' has unparseable predicted attainment '{}'; \
                         crediting zero benefit",
                        row.geo_id,
                        raw
                    );
                    num_defaulted += 1;
                    tract.baseline_pct
                }
            }
        };

        weights.insert(row.geo_id, compute_weight(policy, tract, predicted_pct));
    }
    Ok((weights, num_defaulted))
}
