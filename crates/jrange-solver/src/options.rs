//! Solver configuration.

use jrange_common::limits;
use serde::{Deserialize, Serialize};

/// Knobs for one analysis run.
///
/// Missing fields in a JSON document take their defaults:
///
/// ```
/// use jrange_solver::SolverOptions;
/// let opts = SolverOptions::from_json(r#"{ "max_propagation_steps": 500 }"#).unwrap();
/// assert_eq!(opts.max_propagation_steps, 500);
/// assert!(opts.report_incomplete_hierarchy);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverOptions {
    /// Superclass/interface edges followed from one class before the ancestry
    /// is truncated.
    pub max_hierarchy_depth: u32,
    /// Node evaluations one `Propagator::run` may perform.
    pub max_propagation_steps: u32,
    /// Emit a diagnostic the first time a class with an incomplete hierarchy
    /// influences a subtype answer.
    pub report_incomplete_hierarchy: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_hierarchy_depth: limits::MAX_HIERARCHY_DEPTH,
            max_propagation_steps: limits::MAX_PROPAGATION_STEPS,
            report_incomplete_hierarchy: true,
        }
    }
}

impl SolverOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_max_hierarchy_depth(mut self, depth: u32) -> Self {
        self.max_hierarchy_depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_propagation_steps(mut self, steps: u32) -> Self {
        self.max_propagation_steps = steps;
        self
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
