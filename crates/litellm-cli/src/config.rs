use anyhow::{Context, Result};
use litellm_client::ProviderConfig;
use litellm_provider::ResourceData;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "~/.litellm/provider.json";

pub fn expand_tilde(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(path)),
    }
}

/// Read the provider block, then fill unset fields from the environment.
///
/// A missing file is treated as an empty block so that environment variables
/// alone can configure the provider.
pub fn load_provider_config(path: &str) -> Result<ProviderConfig> {
    let resolved = expand_tilde(path)
        .with_context(|| format!("cannot resolve home directory for {path}"))?;

    let value = if resolved.exists() {
        let content = std::fs::read_to_string(&resolved)
            .with_context(|| format!("failed to read {}", resolved.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", resolved.display()))?
    } else {
        tracing::debug!(
            path = %resolved.display(),
            "provider config not found, using environment only"
        );
        serde_json::json!({})
    };

    Ok(ProviderConfig::from_value(value)?.with_env_defaults())
}

pub fn read_state(path: &Path) -> Result<ResourceData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("invalid JSON in {}", path.display()))?;
    Ok(ResourceData::from_value(value)?)
}

pub fn write_state(path: &Path, data: &ResourceData) -> Result<()> {
    let content = serde_json::to_string_pretty(data)?;
    std::fs::write(path, content + "\n")
        .with_context(|| format!("failed to write {}", path.display()))
}
