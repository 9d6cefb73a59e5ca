//! Rule-based risk scoring engine.
//!
//! This crate provides:
//! - Rule compiler for markdown pipe tables (`| expression | weight | description |`)
//! - Watchlist loader keyed by normalized full name
//! - Expression evaluator producing one boolean mask per rule
//! - Scoring aggregator for row scores, risk levels and identity aggregates
//! - Point queries for a single identity

pub mod compiler;
pub mod evaluator;
pub mod query;
pub mod scoring;
pub mod watchlist;

pub use compiler::{load_rules, parse_rules, Rule, RuleSet};
pub use evaluator::{EvalContext, EvalError, ExpressionEvaluator, Mask, MaskEvaluator};
pub use query::{query_name, QueryError, RiskProfile, WatchlistStatus};
pub use scoring::{
    detect_name_columns, Activation, ActivationWeight, IdentityAggregate, IgnoredRule, NameSource,
    RiskScorer, RowScore, ScoringReport,
};
pub use watchlist::{load_watchlist, Watchlist, WatchlistEntry};
