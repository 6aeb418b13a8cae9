//! Validator configuration, loaded from YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pddl::{Plan, Problem};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Longest plan accepted. Checked before execution starts.
    pub max_steps: Option<usize>,

    /// Largest object pool (constants included) accepted.
    pub max_objects: Option<usize>,

    /// Attach the sorted final state to the report
    pub include_final_state: bool,

    /// List unsatisfied preconditions and goal conditions
    pub verbose_diagnostics: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            max_objects: None,
            include_final_state: false,
            verbose_diagnostics: true,
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Work bounds around a whole run.
    pub fn check_bounds(&self, problem: &Problem, plan: &Plan) -> Result<()> {
        if let Some(max) = self.max_steps {
            if plan.len() > max {
                return Err(Error::Config(format!("plan has {} steps, the limit is {}", plan.len(), max)));
            }
        }
        if let Some(max) = self.max_objects {
            let objects = problem.objects().len();
            if objects > max {
                return Err(Error::Config(format!("problem has {} objects, the limit is {}", objects, max)));
            }
        }
        Ok(())
    }
}
