use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::id_macro::impl_id;

/// Stable per-install client identifier sent with every session request.
/// Format: "{username}-{uuid}"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl_id!(ClientId);

impl ClientId {
    /// Generate a fresh identifier bound to `username`.
    pub fn generate(username: &str) -> Self {
        Self(format!("{}-{}", username.trim(), Uuid::new_v4().simple()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_prefixes_username() {
        let id = ClientId::generate("alice");
        assert!(id.as_str().starts_with("alice-"));
        assert_eq!(id.as_str().len(), "alice-".len() + 32);
    }

    #[test]
    fn test_generate_is_unique() {
        assert_ne!(ClientId::generate("bob"), ClientId::generate("bob"));
    }
}
