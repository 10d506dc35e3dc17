use crate::infrastructure::config::types::AppConfig;

const MAX_RPC_TIMEOUT_SECS: u64 = 600;
const MAX_PERSIST_DEBOUNCE_MS: u64 = 60_000;

impl AppConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let url = self.node.rpc_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("node.rpc_url must be an http(s) URL: {}", crate::infrastructure::rpc::redact_url(url)));
        }
        if self.node.rpc_password.is_some() && self.node.rpc_user.is_none() {
            errors.push("node.rpc_password is set without node.rpc_user".to_string());
        }
        if self.node.timeout_secs == 0 {
            errors.push("node.timeout_secs must be > 0".to_string());
        }
        if self.node.timeout_secs > MAX_RPC_TIMEOUT_SECS {
            errors.push(format!("node.timeout_secs should not exceed {}", MAX_RPC_TIMEOUT_SECS));
        }
        if self.node.chain.trim().chars().any(|c| !(c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')) {
            errors.push(format!("node.chain contains characters not allowed in a storage key: {}", self.node.chain));
        }

        if !self.storage.ephemeral && self.storage.data_dir.trim().is_empty() {
            errors.push("storage.data_dir is required unless storage.ephemeral=true".to_string());
        }
        if self.storage.persist_debounce_ms > MAX_PERSIST_DEBOUNCE_MS {
            errors.push(format!("storage.persist_debounce_ms should not exceed {}", MAX_PERSIST_DEBOUNCE_MS));
        }

        if let Some(fee) = self.offers.default_fee {
            if !fee.is_finite() || fee < 0.0 {
                errors.push(format!("offers.default_fee must be a non-negative number: {fee}"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
