use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! branded_id {
    ($name:ident, $prefix:expr) => {
        #[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(format!("{}_{}", $prefix, Uuid::now_v7()))
            }

            pub fn from_raw(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_owned()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

branded_id!(ContextId, "ctx");
branded_id!(ExportId, "exp");

impl ContextId {
    /// Sentinel context used when the ledger runs in global scope.
    pub fn global() -> Self {
        Self::from_raw("global")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_id_has_prefix() {
        let id = ExportId::new();
        assert!(id.as_str().starts_with("exp_"), "got: {id}");
    }

    #[test]
    fn context_id_wraps_platform_value() {
        let id = ContextId::from_raw("U1234567890abcdef");
        assert_eq!(id.as_str(), "U1234567890abcdef");
    }

    #[test]
    fn global_sentinel_is_stable() {
        assert_eq!(ContextId::global(), ContextId::global());
        assert_eq!(ContextId::global().as_str(), "global");
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(ExportId::new(), ExportId::new());
    }

    #[test]
    fn display_and_from_str_roundtrip() {
        let id = ContextId::from_raw("Cdeadbeef");
        let parsed: ContextId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn serde_roundtrip() {
        let id = ExportId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: ExportId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
