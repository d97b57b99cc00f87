use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppDirsError {
    #[error("system data-local directory is unavailable")]
    DataLocalDirUnavailable,
}

/// Failures talking to the remote store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteStoreError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("session rejected by server")]
    Unauthorized,

    #[error("server returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("malformed server response: {0}")]
    Protocol(String),

    #[error("no session token configured")]
    NotConfigured,
}

impl RemoteStoreError {
    /// Transport-class failures count toward connection degradation;
    /// protocol failures only discard the offending item.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Protocol(_))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeystrokeError {
    #[error("keystroke injection is unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("keystroke injection failed: {0}")]
    Injection(String),

    #[error("typing cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_protocol_errors_are_not_transport() {
        assert!(RemoteStoreError::Timeout.is_transport());
        assert!(RemoteStoreError::Unauthorized.is_transport());
        assert!(RemoteStoreError::Http {
            status: 503,
            body: String::new()
        }
        .is_transport());
        assert!(RemoteStoreError::Transport("refused".into()).is_transport());
        assert!(!RemoteStoreError::Protocol("bad json".into()).is_transport());
    }
}
