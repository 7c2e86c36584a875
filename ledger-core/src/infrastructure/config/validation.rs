use crate::domain::signing::SignatureScheme;
use crate::foundation::{AccountId, PRIVATE_KEY_SIZE};
use crate::infrastructure::config::types::ClientConfig;

impl ClientConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (index, entry) in self.network.iter().enumerate() {
            if entry.account_id.parse::<AccountId>().is_err() {
                errors.push(format!("invalid network[{}].account_id: {}", index, entry.account_id));
            }
            if entry.address.trim().is_empty() {
                errors.push(format!("network[{}].address must not be empty", index));
            }
        }

        if let Some(operator) = self.operator.as_ref() {
            if operator.account_id.parse::<AccountId>().is_err() {
                errors.push(format!("invalid operator.account_id: {}", operator.account_id));
            }
            if operator.key_scheme.parse::<SignatureScheme>().is_err() {
                errors.push(format!("unsupported operator.key_scheme: {}", operator.key_scheme));
            }
            let key = operator.private_key_hex.trim();
            match hex::decode(key.strip_prefix("0x").unwrap_or(key)) {
                Ok(bytes) if bytes.len() == PRIVATE_KEY_SIZE => {}
                Ok(bytes) => errors.push(format!("operator.private_key_hex must be {} bytes, got {}", PRIVATE_KEY_SIZE, bytes.len())),
                Err(_) => errors.push("operator.private_key_hex is not valid hex".to_string()),
            }
        }

        let execution = &self.execution;
        if execution.max_attempts == 0 {
            errors.push("execution.max_attempts must be > 0".to_string());
        }
        if execution.min_backoff_ms > execution.max_backoff_ms {
            errors.push(format!(
                "execution.min_backoff_ms ({}) cannot exceed execution.max_backoff_ms ({})",
                execution.min_backoff_ms, execution.max_backoff_ms
            ));
        }
        if execution.grpc_deadline_ms == 0 {
            errors.push("execution.grpc_deadline_ms must be > 0".to_string());
        }
        if execution.request_timeout_ms == 0 {
            errors.push("execution.request_timeout_ms must be > 0".to_string());
        }
        if execution.max_nodes_per_request == Some(0) {
            errors.push("execution.max_nodes_per_request must be > 0 when set".to_string());
        }

        if self.node_backoff.min_backoff_ms > self.node_backoff.max_backoff_ms {
            errors.push(format!(
                "node_backoff.min_backoff_ms ({}) cannot exceed node_backoff.max_backoff_ms ({})",
                self.node_backoff.min_backoff_ms, self.node_backoff.max_backoff_ms
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
