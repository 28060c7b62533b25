//! MediatorConfig - Mediator の設定
//!
//! ```json
//! { "notification_strategy": "parallel-wait-all", "route_cache": true }
//! ```
//!
//! Missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};

use crate::error::CourierError;
use crate::strategy::StrategyKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediatorConfig {
    pub notification_strategy: StrategyKind,
    /// Memoize type-only command routes.
    pub route_cache: bool,
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            notification_strategy: StrategyKind::default(),
            route_cache: true,
        }
    }
}

impl MediatorConfig {
    pub fn from_json(json: &str) -> Result<Self, CourierError> {
        serde_json::from_str(json)
            .map_err(|e| CourierError::illegal_argument(format!("invalid mediator config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = MediatorConfig::from_json("{}").unwrap();

        assert_eq!(config, MediatorConfig::default());
        assert_eq!(config.notification_strategy, StrategyKind::StopOnFirstFailure);
        assert!(config.route_cache);
    }

    #[test]
    fn reads_every_field() {
        let config = MediatorConfig::from_json(
            r#"{ "notification_strategy": "async-wait-all", "route_cache": false }"#,
        )
        .unwrap();

        assert_eq!(config.notification_strategy, StrategyKind::AsyncWaitAll);
        assert!(!config.route_cache);
    }

    #[test]
    fn unknown_strategy_is_an_illegal_argument() {
        let err = MediatorConfig::from_json(r#"{ "notification_strategy": "round-robin" }"#)
            .unwrap_err();

        assert!(matches!(err, CourierError::IllegalArgument(ref m) if m.starts_with("invalid mediator config")));
    }
}
