use keyring::Entry;

use crate::error::ClientError;

const SERVICE_NAME: &str = "batch-renamer";

/// API key lookup: environment first, then the OS credential store
pub struct CredentialManager;

impl CredentialManager {
    /// Environment variable holding the key for `provider`, e.g. `ANTHROPIC_API_KEY`
    pub fn env_var_name(provider: &str) -> String {
        format!("{}_API_KEY", provider.to_uppercase())
    }

    /// Get an API key from the environment, falling back to the keychain
    pub fn get_api_key(provider: &str) -> Result<String, ClientError> {
        if let Ok(key) = std::env::var(Self::env_var_name(provider)) {
            if !key.trim().is_empty() {
                tracing::debug!(provider, "Using API key from environment");
                return Ok(key.trim().to_string());
            }
        }

        let entry = Entry::new(SERVICE_NAME, provider)
            .map_err(|e| ClientError::Credentials(e.to_string()))?;

        match entry.get_password() {
            Ok(password) => {
                tracing::debug!(provider, "Using API key from keychain");
                Ok(password)
            }
            Err(keyring::Error::NoEntry) => Err(ClientError::MissingApiKey(provider.to_string())),
            Err(e) => Err(ClientError::Credentials(e.to_string())),
        }
    }
}
