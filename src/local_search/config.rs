//! Local search configuration.

use serde::{Deserialize, Serialize};

use super::moves::EPSILON;

/// Which improving move is applied after a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AcceptancePolicy {
    /// Query every operator and apply the globally best move.
    #[default]
    BestImprovement,
    /// Apply the first operator's improving move, then restart the scan
    /// from the first operator.
    FirstImprovement,
}

/// Configuration parameters for [`LocalSearch`](super::LocalSearch).
///
/// # Examples
///
/// ```
/// use u_localsearch::local_search::{AcceptancePolicy, LocalSearchConfig};
///
/// let config = LocalSearchConfig::default()
///     .with_policy(AcceptancePolicy::FirstImprovement)
///     .with_max_iterations(1000);
/// assert_eq!(config.max_iterations, Some(1000));
/// assert_eq!(config.tolerance, 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSearchConfig {
    /// Acceptance policy.
    pub policy: AcceptancePolicy,
    /// Maximum number of applied moves (None for no limit).
    pub max_iterations: Option<usize>,
    /// A move is applied only if it lowers the cost by more than this.
    ///
    /// Operators already discard moves that improve by [`EPSILON`] or less,
    /// so smaller values act as [`EPSILON`].
    pub tolerance: f64,
    /// Reject an empty operator list instead of returning immediately.
    pub require_operators: bool,
    /// Recompute every touched route from scratch after each move and
    /// fail on divergence.
    pub verify: bool,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            policy: AcceptancePolicy::BestImprovement,
            max_iterations: None,
            tolerance: 1e-9,
            require_operators: false,
            verify: false,
        }
    }
}

impl LocalSearchConfig {
    /// Sets the acceptance policy.
    pub fn with_policy(mut self, policy: AcceptancePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the maximum number of applied moves.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Sets the improvement tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Tolerance the driver applies, never below [`EPSILON`].
    pub fn effective_tolerance(&self) -> f64 {
        self.tolerance.max(EPSILON)
    }

    /// Requires at least one operator.
    pub fn with_require_operators(mut self, require: bool) -> Self {
        self.require_operators = require;
        self
    }

    /// Enables full recomputation checks after each move.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LocalSearchConfig::default();
        assert_eq!(config.policy, AcceptancePolicy::BestImprovement);
        assert_eq!(config.max_iterations, None);
        assert!(!config.require_operators);
        assert!(!config.verify);
    }

    #[test]
    fn test_effective_tolerance() {
        assert_eq!(LocalSearchConfig::default().with_tolerance(1e-12).effective_tolerance(), EPSILON);
        assert_eq!(LocalSearchConfig::default().with_tolerance(0.5).effective_tolerance(), 0.5);
    }

    #[test]
    fn test_from_json() {
        let config: LocalSearchConfig =
            serde_json::from_str(r#"{"policy": "FirstImprovement", "max_iterations": 50}"#).expect("valid json");
        assert_eq!(config.policy, AcceptancePolicy::FirstImprovement);
        assert_eq!(config.max_iterations, Some(50));
        assert_eq!(config.tolerance, 1e-9);
    }
}
