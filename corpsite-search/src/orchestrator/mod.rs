//! Search orchestrator: concurrent source fan-out, ranking, highlighting, stats.
//!
//! This module queries every admitted content source concurrently, merges
//! their candidates in the fixed source order, ranks and truncates them,
//! then shapes the surviving results for the response.

pub mod highlight;
pub mod rank;
pub mod search;
pub mod stats;
