//! CLI configuration: thin wrapper around `vpnly_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides (--endpoint,
//! --region, --access-key-id, --secret, --insecure, --timeout).

use secrecy::SecretString;

use vpnly_config::{Config, Profile, build_session_config, resolve_secret};
use vpnly_core::SessionConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use vpnly_config::{config_path, load_config, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Build a `SessionConfig` from the config file, profile, and CLI overrides.
///
/// Flags win over profile values. Without a matching profile the session is
/// built from flags and `VPNLY_*` env vars alone.
pub fn resolve_session_config(global: &GlobalOpts) -> Result<SessionConfig, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => apply_overrides(profile.clone(), global),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                available: available_profiles(&cfg),
                name: profile_name,
            });
        }
        None => {
            if global.endpoint.is_none() {
                return Err(CliError::NoConfig {
                    path: config_path().display().to_string(),
                });
            }
            apply_overrides(Profile::default(), global)
        }
    };

    let secret = match global.secret {
        Some(ref secret) => SecretString::from(secret.clone()),
        None => resolve_secret(&profile, &profile_name)?,
    };

    Ok(build_session_config(&profile, secret, &cfg.defaults)?)
}

fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(ref endpoint) = global.endpoint {
        profile.endpoint.clone_from(endpoint);
    }
    if let Some(ref region) = global.region {
        profile.region.clone_from(region);
    }
    if let Some(ref key_id) = global.access_key_id {
        profile.access_key_id.clone_from(key_id);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    profile
}
