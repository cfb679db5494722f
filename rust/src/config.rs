//! Configuration for the matching engine.

use thiserror::Error;

/// Errors raised by [`MatchingConfig::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Minimum quota {min} exceeds maximum quota {max}")]
    QuotaOrder { min: u32, max: u32 },
    #[error("Maximum quota must be positive")]
    ZeroQuota,
    #[error("Slot occupancy must be 1 or 2, got {0}")]
    Occupancy(usize),
    #[error("Weight parameter {name} must be finite and non-negative, got {value}")]
    Parameter { name: &'static str, value: f64 },
}

/// Quotas, operating mode and weight-model parameters.
///
/// Quotas are measured in 30-minute units.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchingConfig {
    /// Units a person should reach before their weights are damped.
    pub min_quota: u32,
    /// Hard cap on a person's assigned units.
    pub max_quota: u32,
    /// People allowed per slot (1 or 2).
    pub occupancy: usize,
    /// Scarcity numerator for the first and last slot of a day.
    pub edge_priority: f64,
    /// Scarcity numerator for every other slot.
    pub interior_priority: f64,
    /// Added to the candidate count in the scarcity denominator.
    pub scarcity_epsilon: f64,
    /// Bonus next to a single-slot work run.
    pub singleton_bonus: f64,
    /// Bonus next to a longer work run.
    pub run_bonus: f64,
    /// Coefficient of the squared distance from the class window.
    pub proximity_decay: f64,
    /// Per-unit reduction of the person-wide factor.
    pub workload_decay: f64,
    /// Extra factor once the minimum quota is met.
    pub fill_damping: f64,
    /// Limit each person to one edge slot per week.
    pub edge_exclusive: bool,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_quota: 10,
            max_quota: 13,
            occupancy: 1,
            edge_priority: 300.0,
            interior_priority: 100.0,
            scarcity_epsilon: 1.0,
            singleton_bonus: 50.0,
            run_bonus: 10.0,
            proximity_decay: 0.01,
            workload_decay: 0.01,
            fill_damping: 0.5,
            edge_exclusive: true,
            verbosity: 0,
        }
    }
}

impl MatchingConfig {
    /// Check quota ordering, occupancy mode and weight parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_quota == 0 {
            return Err(ConfigError::ZeroQuota);
        }
        if self.min_quota > self.max_quota {
            return Err(ConfigError::QuotaOrder {
                min: self.min_quota,
                max: self.max_quota,
            });
        }
        if !(1..=2).contains(&self.occupancy) {
            return Err(ConfigError::Occupancy(self.occupancy));
        }
        let params = [
            ("edge_priority", self.edge_priority),
            ("interior_priority", self.interior_priority),
            ("scarcity_epsilon", self.scarcity_epsilon),
            ("singleton_bonus", self.singleton_bonus),
            ("run_bonus", self.run_bonus),
            ("proximity_decay", self.proximity_decay),
            ("workload_decay", self.workload_decay),
            ("fill_damping", self.fill_damping),
        ];
        for (name, value) in params {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Parameter { name, value });
            }
        }
        // Zero candidates plus zero epsilon would divide by zero.
        if self.scarcity_epsilon == 0.0 {
            return Err(ConfigError::Parameter {
                name: "scarcity_epsilon",
                value: 0.0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MatchingConfig::default();
        assert_eq!(config.min_quota, 10);
        assert_eq!(config.max_quota, 13);
        assert_eq!(config.occupancy, 1);
        assert!(config.edge_priority > config.interior_priority);
        assert!(config.edge_exclusive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_quota_validation() {
        let config = MatchingConfig {
            min_quota: 14,
            ..MatchingConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::QuotaOrder { min: 14, max: 13 })
        );

        let config = MatchingConfig {
            min_quota: 0,
            max_quota: 0,
            ..MatchingConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroQuota));
    }

    #[test]
    fn test_occupancy_validation() {
        for occupancy in [0, 3] {
            let config = MatchingConfig {
                occupancy,
                ..MatchingConfig::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::Occupancy(occupancy)));
        }
        let config = MatchingConfig {
            occupancy: 2,
            ..MatchingConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parameter_validation() {
        let config = MatchingConfig {
            run_bonus: -1.0,
            ..MatchingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Parameter { name: "run_bonus", .. })
        ));

        let config = MatchingConfig {
            proximity_decay: f64::NAN,
            ..MatchingConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MatchingConfig {
            scarcity_epsilon: 0.0,
            ..MatchingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Parameter { name: "scarcity_epsilon", .. })
        ));
    }
}
