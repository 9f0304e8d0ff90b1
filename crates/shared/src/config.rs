//! Engine configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Engine configuration.
///
/// Provides the startup defaults for mutable process-wide state; runtime
/// changes made by an administrator are not written back here.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Approval workflow configuration.
    #[serde(default)]
    pub approval: ApprovalConfig,
    /// Anomaly detection configuration.
    #[serde(default)]
    pub anomaly: AnomalyConfig,
}

/// Approval workflow configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalConfig {
    /// Amount above which a new record requires administrative approval.
    #[serde(default = "default_approval_threshold")]
    pub threshold: Decimal,
}

fn default_approval_threshold() -> Decimal {
    Decimal::from(10_000)
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            threshold: default_approval_threshold(),
        }
    }
}

/// Anomaly detection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AnomalyConfig {
    /// Relative deviation from the owner mean flagged as anomalous.
    #[serde(default = "default_anomaly_threshold")]
    pub threshold: Decimal,
}

fn default_anomaly_threshold() -> Decimal {
    Decimal::from(2)
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            threshold: default_anomaly_threshold(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BURSAR").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_thresholds() {
        let approval = ApprovalConfig::default();
        assert_eq!(approval.threshold, dec!(10000));

        let anomaly = AnomalyConfig::default();
        assert_eq!(anomaly.threshold, dec!(2));
    }

    #[test]
    fn test_deserialize_overrides_defaults() {
        let config: EngineConfig = config::Config::builder()
            .set_override("approval.threshold", "2500")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.approval.threshold, dec!(2500));
        assert_eq!(config.anomaly.threshold, dec!(2));
    }
}
