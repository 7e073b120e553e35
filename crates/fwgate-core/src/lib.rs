//! Business logic between `fwgate-api` and the `fwgate` binary.
//!
//! - **[`Syncer`]**: Runs the pipeline one step at a time: resolve the
//!   firewall ID from its label, fetch the current rule set, plan the new
//!   one, submit it. The caller drives the steps so it can report progress
//!   in between.
//!
//! - **[`rules`]**: The pure transform: strip every rule carrying the
//!   marker label from both directions, then append one freshly built
//!   [`AllowRule`] to outbound.
//!
//! - **[`SyncConfig`]**: Everything the pipeline needs, pre-resolved by
//!   the binary from files, environment and flags.

pub mod config;
pub mod error;
pub mod rules;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::SyncConfig;
pub use error::{CoreError, Step};
pub use rules::{AllowRule, Plan, RuleChanges, apply_allow_rule};
pub use sync::Syncer;

// Wire types callers need when rendering a plan.
pub use fwgate_api::{FirewallRule, Protocol, RuleAction, RuleAddresses, RuleSet};
