// fwgate-api: Async Rust client for the Linode Cloud Firewall API (v4)

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::FirewallClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{
    Firewall, FirewallRule, Page, Protocol, RuleAction, RuleAddresses, RuleSet, RulesUpdate,
};
