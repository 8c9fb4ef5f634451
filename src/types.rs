// ========================================================================================
//
//                      CORE DATA TYPES FOR THE CATCHMENT ENGINE
//
// ========================================================================================
//
// This module is the canonical dictionary for the data structures that cross the
// major architectural boundaries of the application (e.g., `prepare`, `network`,
// `select`, `main`).
//
// By centralizing these definitions, we create a single source of truth and enforce
// a clean, one-way dependency graph where high-level modules can depend on these
// core types, but not on each other's implementation details.
//
// This file is ONLY for types that are SHARED BETWEEN FILES, not types that are
// used in one file alone.

/// The per-tract socioeconomic features consumed by the weight function.
///
/// One instance exists per row of the feature table. The `salary_figure` is not a
/// raw input column: it is derived during preparation from median income,
/// household count, and labor-force participation (see `prepare`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TractFeatures {
    /// Total population of the tract.
    pub population: f64,
    /// The salary-derived figure: `median_income * households / labor_force`,
    /// or raw `median_income` when the tract reports no labor-force participants.
    pub salary_figure: f64,
    /// Baseline attainment, as a fraction in [0, 1].
    pub baseline_pct: f64,
}

/// One entry of the ranked selection result: a tract id and the marginal
/// benefit credited to it at the moment it was picked.
#[derive(Debug, Clone, PartialEq)]
pub struct Pick {
    pub geo_id: String,
    pub value: f64,
}
