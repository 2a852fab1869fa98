use serde::{Deserialize, Serialize};

use crate::ids::ContextId;

/// Data-isolation model for the ledger: one ledger per conversation, or
/// a single shared ledger for every conversation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerScope {
    #[default]
    PerContext,
    Global,
}

impl LedgerScope {
    /// The storage context for a message originating from `origin`.
    pub fn resolve(&self, origin: &ContextId) -> ContextId {
        match self {
            Self::PerContext => origin.clone(),
            Self::Global => ContextId::global(),
        }
    }
}

impl std::fmt::Display for LedgerScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PerContext => write!(f, "per_context"),
            Self::Global => write!(f, "global"),
        }
    }
}

impl std::str::FromStr for LedgerScope {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per_context" => Ok(Self::PerContext),
            "global" => Ok(Self::Global),
            other => Err(format!("unknown ledger scope: {other}")),
        }
    }
}
