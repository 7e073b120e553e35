//! CLI-level configuration: flag overrides on top of `fwgate-config`,
//! plus translation to `fwgate_core::SyncConfig`.

use std::path::PathBuf;

use secrecy::SecretString;

use fwgate_config::Config;
use fwgate_core::SyncConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file in use: `--config` / `FWGATE_CONFIG`, else the platform path.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(fwgate_config::config_path)
}

/// Load file + env config, then apply flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = fwgate_config::load_config_from(&config_file(global))?;
    apply_overrides(&mut cfg, global);
    Ok(cfg)
}

fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref label) = global.firewall {
        cfg.firewall.label.clone_from(label);
    }
    if let Some(ref ports) = global.ports {
        cfg.rule.ports.clone_from(ports);
    }
    if let Some(ref url) = global.api_url {
        cfg.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
}

/// Resolve the token: flag / `LINODE_TOKEN` first, then the config chain.
fn resolve_token(cfg: &Config, global: &GlobalOpts) -> Result<SecretString, CliError> {
    if let Some(ref token) = global.token {
        return Ok(SecretString::from(token.clone()));
    }
    Ok(fwgate_config::resolve_token(cfg)?)
}

/// Build the `SyncConfig` for a pipeline run.
pub fn build_sync_config(cfg: &Config, global: &GlobalOpts) -> Result<SyncConfig, CliError> {
    let token = resolve_token(cfg, global)?;
    Ok(fwgate_config::to_sync_config(cfg, token)?)
}
