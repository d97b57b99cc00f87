use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Identifier of a remotely issued typing command.
///
/// Opaque to the agent; the issuer guarantees uniqueness per command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(String);

impl_id!(CommandId);
