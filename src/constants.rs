//! Engine-wide constants and scoring tables
//!
//! This module centralizes the neutral fallback values, tier tables and
//! keyword lists so they can be tuned in one place.

/// Fallback values used when a financial signal is absent
pub mod neutral {
    /// Current ratio assumed when the balance sheet is incomplete
    pub const CURRENT_RATIO: f64 = 1.0;

    /// Debt-to-asset ratio assumed when the balance sheet is incomplete
    pub const DEBT_TO_ASSET_RATIO: f64 = 0.5;

    /// Profit margin assumed with no financial data
    pub const PROFIT_MARGIN: f64 = 0.0;

    /// Health score reported when no financial bundle exists at all
    pub const HEALTH_SCORE: u8 = 50;
}

/// Tier tables for the health score. Each entry is (threshold, points),
/// checked top to bottom; the first satisfied threshold wins.
pub mod health {
    pub const REVENUE_TIERS: [(f64, i64); 4] = [
        (5_000_000.0, 20),
        (1_000_000.0, 15),
        (500_000.0, 10),
        (100_000.0, 5),
    ];

    /// Profit margin as a fraction; the last tier is "any positive margin"
    pub const PROFITABILITY_TIERS: [(f64, i64); 4] =
        [(0.20, 25), (0.15, 20), (0.10, 15), (0.05, 10)];
    pub const POSITIVE_MARGIN_POINTS: i64 = 5;

    pub const LIQUIDITY_TIERS: [(f64, i64); 4] = [(2.5, 15), (2.0, 12), (1.5, 8), (1.0, 5)];

    /// Upper bounds (exclusive) on debt-to-asset ratio
    pub const STABILITY_TIERS: [(f64, i64); 4] = [(0.2, 15), (0.4, 12), (0.6, 8), (0.8, 4)];

    /// Industry growth at or above this adds `GROWTH_BONUS`
    pub const STRONG_GROWTH_RATE: f64 = 0.05;
    pub const GROWTH_BONUS: i64 = 5;
    pub const CONTRACTION_PENALTY: i64 = -5;
}

/// Closeability score weights
pub mod closeability {
    pub const BASE: i64 = 50;
    pub const POINTS_PER_BUYING_SIGNAL: i64 = 8;
    pub const MAX_BUYING_SIGNAL_POINTS: i64 = 40;
    pub const URGENCY_MARKER_POINTS: i64 = 15;
    pub const HIGH_INFLUENCE_POINTS: i64 = 20;
    pub const OPEN_BUDGET_POINTS: i64 = 10;
    pub const PENALTY_PER_OBJECTION: i64 = 5;
    pub const CROWDED_COMPETITION_PENALTY: i64 = 10;
    /// More alternatives than this triggers the competition penalty
    pub const COMPETITION_THRESHOLD: usize = 2;
}

/// Urgency/readiness keyword and threshold tables
pub mod urgency {
    pub const HIGH_KEYWORDS: [&str; 5] = ["urgent", "immediate", "asap", "crisis", "critical"];
    pub const MEDIUM_KEYWORDS: [&str; 4] = ["soon", "quickly", "priority", "important"];

    /// A keyword preceded by one of these within `NEGATION_WINDOW` words does not count
    pub const NEGATORS: [&str; 10] = [
        "not", "no", "never", "isn't", "isnt", "aren't", "wasn't", "don't", "doesn't", "nothing",
    ];
    pub const NEGATION_WINDOW: usize = 2;

    /// Pressure point counts above these force at least high / medium
    pub const HIGH_PRESSURE_POINTS: usize = 2;
    pub const MEDIUM_PRESSURE_POINTS: usize = 0;
}

pub mod readiness {
    pub const READY_MIN_BUYING_SIGNALS: usize = 3;
    pub const READY_MAX_OBJECTIONS: usize = 1;
    pub const EVALUATING_MIN_BUYING_SIGNALS: usize = 2;
    pub const MIN_HIGH_INFLUENCE: usize = 1;
}

/// Recommendation thresholds and opportunity template rates
pub mod recommendations {
    pub const HIGH_CLOSEABILITY: u8 = 80;
    pub const MID_CLOSEABILITY: u8 = 50;
    pub const WEAK_HEALTH: u8 = 60;
    pub const HIGH_LEVERAGE_RATIO: f64 = 0.6;
    pub const LOW_LIQUIDITY_RATIO: f64 = 1.2;

    pub const WORKING_CAPITAL_RATE: f64 = 0.03;
    pub const EXPENSE_REVIEW_RATE: f64 = 0.08;
    pub const CASH_FLOW_FORECAST_RATE: f64 = 0.01;
    pub const DEBT_RESTRUCTURING_RATE: f64 = 0.05;
}

/// Workflow bookkeeping
pub mod workflow {
    /// Read-modify-write attempts before a version conflict is surfaced
    pub const MAX_ADVANCE_ATTEMPTS: u32 = 3;
}

/// Collector defaults
pub mod collector {
    pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;
}

/// Logging event names for structured logging
pub mod events {
    pub const INTELLIGENCE_COMPUTED: &str = "intelligence_computed";
    pub const SOURCE_DEGRADED: &str = "source_degraded";
    pub const SCORE_CACHE_FAILED: &str = "score_cache_failed";
    pub const STAGE_ADVANCED: &str = "stage_advanced";
    pub const WORKFLOW_RESET: &str = "workflow_reset";
    pub const VERSION_CONFLICT: &str = "version_conflict";
    pub const INVARIANT_VIOLATION: &str = "invariant_violation";
}
