use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Valid,
    InvalidType,
    InvalidPrecondition,
    GoalUnmet,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Valid => "VALID",
            Verdict::InvalidType => "INVALID_TYPE",
            Verdict::InvalidPrecondition => "INVALID_PRECONDITION",
            Verdict::GoalUnmet => "GOAL_UNMET",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a step could not be executed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    ArityMismatch { expected: usize, found: usize },
    /// `position` is 1-based.
    TypeMismatch { position: usize, object: String, expected: String, found: String },
    PreconditionUnsatisfied { unsatisfied: Vec<String> },
}

impl FailureReason {
    pub fn verdict(&self) -> Verdict {
        match self {
            FailureReason::ArityMismatch { .. } | FailureReason::TypeMismatch { .. } => Verdict::InvalidType,
            FailureReason::PreconditionUnsatisfied { .. } => Verdict::InvalidPrecondition,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    /// 1-based: step k is the k-th action of the plan.
    pub step: usize,
    pub action: String,
    pub reason: FailureReason,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub failure: Option<Failure>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub unsatisfied_goals: Vec<String>,
    pub steps_executed: usize,
    pub final_cost: f64,
    /// The problem's `:metric`, e.g. `minimize total-cost`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub final_state: Option<Vec<String>>,
}

impl Report {
    pub fn is_valid(&self) -> bool {
        self.verdict == Verdict::Valid
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            None => {
                writeln!(f, "Plan executed successfully - checking goal")?;
                if self.is_valid() {
                    writeln!(f, "Plan valid")?;
                    writeln!(f, "Final value: {}", self.final_cost)?;
                } else {
                    writeln!(f, "Goal not satisfied")?;
                    writeln!(f, "Plan invalid")?;
                    for goal in &self.unsatisfied_goals {
                        writeln!(f, "  unsatisfied goal: {}", goal)?;
                    }
                }
            }
            Some(failure) => {
                writeln!(f, "Plan failed to execute")?;
                match &failure.reason {
                    FailureReason::ArityMismatch { expected, found } => writeln!(
                        f,
                        "Plan failed because {} at step {} takes {} arguments, {} given",
                        failure.action, failure.step, expected, found
                    )?,
                    FailureReason::TypeMismatch { position, object, expected, found } => writeln!(
                        f,
                        "Plan failed because of a type error in {} at step {}: argument {} ({}) is {}, expected {}",
                        failure.action, failure.step, position, object, found, expected
                    )?,
                    FailureReason::PreconditionUnsatisfied { unsatisfied } => {
                        writeln!(f, "Plan failed because of unsatisfied precondition in:")?;
                        writeln!(f, "{} at step {}", failure.action, failure.step)?;
                        for condition in unsatisfied {
                            writeln!(f, "  unsatisfied: {}", condition)?;
                        }
                    }
                }
            }
        }
        if let Some(state) = &self.final_state {
            writeln!(f, "Final state:")?;
            for atom in state {
                writeln!(f, "  {}", atom)?;
            }
        }
        Ok(())
    }
}

/// A problem that compiled against its domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProblemSummary {
    pub domain: String,
    pub problem: String,
    pub objects: usize,
    pub init_atoms: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metric: Option<String>,
}

impl fmt::Display for ProblemSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Problem {} is well-formed for domain {}", self.problem, self.domain)?;
        writeln!(f, "{} objects, {} initial atoms", self.objects, self.init_atoms)?;
        if let Some(metric) = &self.metric {
            writeln!(f, "Metric: {}", metric)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Failure, FailureReason, ProblemSummary, Report, Verdict};

    fn failed() -> Report {
        Report {
            verdict: Verdict::InvalidPrecondition,
            failure: Some(Failure {
                step: 3,
                action: "(input_text body txt)".into(),
                reason: FailureReason::PreconditionUnsatisfied { unsatisfied: vec!["(text-ready txt)".into()] },
            }),
            unsatisfied_goals: vec![],
            steps_executed: 2,
            final_cost: 2.0,
            metric: None,
            final_state: None,
        }
    }

    #[test]
    fn test_json() {
        let json = serde_json::to_value(failed()).unwrap();
        assert_eq!(json["verdict"], "INVALID_PRECONDITION");
        assert_eq!(json["failure"]["step"], 3);
        assert_eq!(json["failure"]["reason"]["kind"], "precondition_unsatisfied");
        assert_eq!(json["failure"]["reason"]["unsatisfied"][0], "(text-ready txt)");
        assert!(json.get("final_state").is_none());
        assert!(json.get("metric").is_none());
        let back: Report = serde_json::from_value(json).unwrap();
        assert_eq!(back, failed());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            failed().to_string(),
            "Plan failed to execute\nPlan failed because of unsatisfied precondition in:\n(input_text body txt) at step 3\n  unsatisfied: (text-ready txt)\n"
        );
        let valid = Report {
            verdict: Verdict::Valid,
            failure: None,
            unsatisfied_goals: vec![],
            steps_executed: 4,
            final_cost: 4.0,
            metric: Some("minimize total-cost".into()),
            final_state: Some(vec!["(locked)".into()]),
        };
        assert_eq!(serde_json::to_value(&valid).unwrap()["metric"], "minimize total-cost");
        assert_eq!(
            valid.to_string(),
            "Plan executed successfully - checking goal\nPlan valid\nFinal value: 4\nFinal state:\n  (locked)\n"
        );
    }

    #[test]
    fn test_problem_summary_display() {
        let summary = ProblemSummary {
            domain: "mobileworld_generic".into(),
            problem: "search_and_type".into(),
            objects: 8,
            init_atoms: 8,
            metric: None,
        };
        assert_eq!(summary.to_string(), "Problem search_and_type is well-formed for domain mobileworld_generic\n8 objects, 8 initial atoms\n");
    }
}
