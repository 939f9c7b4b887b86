use std::collections::HashMap;

pub(crate) const SERVICE_NAME: &str = "quickcap";
const KEYRING_SERVER: &str = "anthropic-api";

/// Environment variables checked, in order, before the keyring.
pub const API_KEY_VARS: [&str; 2] = ["QUICKCAP_API_KEY", "ANTHROPIC_API_KEY"];

#[derive(Debug, thiserror::Error)]
#[error("keyring: {0}")]
pub struct KeyringError(String);

/// First non-empty key from the environment.
pub fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// Environment first, then the system keyring. Keyring trouble is logged and
/// treated as "no key".
pub async fn resolve_api_key() -> Option<String> {
    if let Some(key) = api_key_from_env() {
        return Some(key);
    }
    match load_api_key().await {
        Ok(key) => key,
        Err(e) => {
            log::warn!("Could not read API key from keyring: {}", e);
            None
        }
    }
}

/// Store the API key in the system keyring.
pub async fn store_api_key(key: &str) -> Result<(), KeyringError> {
    let keyring = oo7::Keyring::new()
        .await
        .map_err(|e| KeyringError(format!("failed to connect: {}", e)))?;

    let mut attrs = HashMap::new();
    attrs.insert("service", SERVICE_NAME);
    attrs.insert("server", KEYRING_SERVER);

    keyring
        .create_item("QuickCap API Key", &attrs, key.as_bytes(), true)
        .await
        .map_err(|e| KeyringError(format!("failed to store API key: {}", e)))?;

    Ok(())
}

/// Load the API key from the system keyring.
pub async fn load_api_key() -> Result<Option<String>, KeyringError> {
    let keyring = oo7::Keyring::new()
        .await
        .map_err(|e| KeyringError(format!("failed to connect: {}", e)))?;

    let mut attrs = HashMap::new();
    attrs.insert("service", SERVICE_NAME);
    attrs.insert("server", KEYRING_SERVER);

    let items = keyring
        .search_items(&attrs)
        .await
        .map_err(|e| KeyringError(format!("failed to search: {}", e)))?;

    if let Some(item) = items.first() {
        let secret_bytes = item
            .secret()
            .await
            .map_err(|e| KeyringError(format!("failed to read secret: {}", e)))?;
        let key = String::from_utf8(secret_bytes.to_vec())
            .map_err(|e| KeyringError(format!("invalid UTF-8 in secret: {}", e)))?;
        if !key.is_empty() {
            return Ok(Some(key));
        }
    }

    Ok(None)
}
