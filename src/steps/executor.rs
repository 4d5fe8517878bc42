//! Step execution engine.
//!
//! Runs an ordered list of convergent steps. Each step is checked first;
//! only steps that need action are applied, and every applied step is
//! verified again afterwards. A step whose postcondition still does not
//! hold halts the run when it is fatal and is recorded as degraded when it
//! is not.

use std::time::{Duration, Instant};

use crate::error::Result;

use super::context::StepContext;

/// Outcome of a precondition or postcondition check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Nothing to do.
    Satisfied,
    /// Corrective action required, with the reason.
    NeedsAction(String),
}

impl Readiness {
    /// Shorthand for `NeedsAction`.
    pub fn needs(reason: impl Into<String>) -> Self {
        Readiness::NeedsAction(reason.into())
    }

    /// Whether the condition holds.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Readiness::Satisfied)
    }
}

/// One idempotent unit of provisioning work.
///
/// `apply` must be safe to call when a previous run partially completed it.
/// Steps never assume an earlier step succeeded; `check` re-probes the host
/// for whatever the step needs.
pub trait ProvisioningStep {
    /// Stable step name.
    fn name(&self) -> &str;

    /// Whether an unsatisfied postcondition halts the run.
    fn fatal(&self) -> bool;

    /// Precondition: is the desired state already in place?
    fn check(&self, ctx: &mut StepContext<'_>) -> Readiness;

    /// Corrective action.
    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<()>;

    /// Postcondition; defaults to the precondition.
    fn verify(&self, ctx: &mut StepContext<'_>) -> Readiness {
        self.check(ctx)
    }

    /// Runs once the desired state holds (skipped or completed), e.g. to
    /// publish bin directories into the session search path.
    fn settle(&self, _ctx: &mut StepContext<'_>) {}

    /// A manual command that would satisfy this step.
    fn remedy(&self, _ctx: &StepContext<'_>) -> Option<String> {
        None
    }
}

/// Status of a step in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Already satisfied; no action taken.
    Skipped,
    /// Action taken and postcondition holds.
    Completed,
    /// Non-fatal step whose postcondition does not hold.
    Degraded,
    /// Fatal step whose postcondition does not hold; the run stopped here.
    Halted,
}

impl StepStatus {
    /// Get a display character for this status.
    pub fn display_char(&self) -> char {
        match self {
            StepStatus::Skipped => '⊘',
            StepStatus::Completed => '✓',
            StepStatus::Degraded => '⚠',
            StepStatus::Halted => '✗',
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepStatus::Skipped => "skipped",
            StepStatus::Completed => "completed",
            StepStatus::Degraded => "degraded",
            StepStatus::Halted => "halted",
        };
        write!(f, "{}", s)
    }
}

/// Result of executing one step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Step name.
    pub name: String,

    /// Final status.
    pub status: StepStatus,

    /// Why the step needed action or failed.
    pub detail: Option<String>,

    /// Manual remedy for a failed step.
    pub remedy: Option<String>,

    /// Execution duration.
    pub duration: Duration,
}

impl StepResult {
    /// Generate a summary line for display.
    pub fn summary_line(&self) -> String {
        let icon = self.status.display_char();
        match self.status {
            StepStatus::Skipped => format!("{} {} (already satisfied)", icon, self.name),
            StepStatus::Completed => format!("{} {}", icon, self.name),
            StepStatus::Degraded | StepStatus::Halted => {
                let detail = self.detail.as_deref().unwrap_or("unknown error");
                format!("{} {} - {}", icon, self.name, detail)
            }
        }
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Results of the steps that ran, in order.
    pub steps: Vec<StepResult>,
    /// Soft mismatches, fallbacks and skipped entries.
    pub warnings: Vec<String>,
    /// Total duration.
    pub duration: Duration,
}

impl RunReport {
    /// The step that halted the run, if any.
    pub fn halted(&self) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.status == StepStatus::Halted)
    }

    /// Names of degraded steps.
    pub fn degraded(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Degraded)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Look up a step result by name.
    pub fn step(&self, name: &str) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Whether a step with this name ran at all.
    pub fn ran(&self, name: &str) -> bool {
        self.step(name).is_some()
    }

    /// Process exit code: 1 when halted, 0 otherwise (warnings included).
    pub fn exit_code(&self) -> i32 {
        if self.halted().is_some() {
            1
        } else {
            0
        }
    }

    /// The final one-line verdict.
    pub fn outcome_line(&self) -> String {
        if let Some(step) = self.halted() {
            return format!(
                "Provisioning halted at '{}': {}",
                step.name,
                step.detail.as_deref().unwrap_or("unknown error")
            );
        }
        let mut notes: Vec<String> = self
            .degraded()
            .into_iter()
            .map(|name| format!("{} degraded", name))
            .collect();
        notes.extend(self.warnings.iter().cloned());
        if notes.is_empty() {
            "Provisioning complete".to_string()
        } else {
            format!("Provisioning complete with warnings: {}", notes.join("; "))
        }
    }
}

/// Runs steps strictly in declaration order.
#[derive(Debug, Default)]
pub struct StepExecutor;

impl StepExecutor {
    /// Create an executor.
    pub fn new() -> Self {
        Self
    }

    /// Run `steps` against `ctx`.
    pub fn run(&self, steps: &[Box<dyn ProvisioningStep>], ctx: &mut StepContext<'_>) -> RunReport {
        let start = Instant::now();
        let mut report = RunReport::default();

        for step in steps {
            let result = self.run_step(step.as_ref(), ctx);
            let halted = result.status == StepStatus::Halted;
            report.steps.push(result);
            if halted {
                break;
            }
        }

        report.warnings = ctx.take_warnings();
        report.duration = start.elapsed();
        report
    }

    fn run_step(&self, step: &dyn ProvisioningStep, ctx: &mut StepContext<'_>) -> StepResult {
        let start = Instant::now();
        let name = step.name().to_string();

        let reason = match step.check(ctx) {
            Readiness::Satisfied => {
                tracing::debug!("{}: already satisfied", name);
                step.settle(ctx);
                return StepResult {
                    name,
                    status: StepStatus::Skipped,
                    detail: None,
                    remedy: None,
                    duration: start.elapsed(),
                };
            }
            Readiness::NeedsAction(reason) => reason,
        };

        tracing::debug!("{}: {}", name, reason);
        let mut spinner = ctx.ui.start_spinner(&format!("{}: {}", name, reason));

        let applied = step.apply(ctx);
        if let Err(e) = &applied {
            tracing::debug!("{}: action failed: {}", name, e);
        }

        match step.verify(ctx) {
            Readiness::Satisfied => {
                if let Err(e) = &applied {
                    ctx.warn(format!("{}: {}", name, e));
                }
                step.settle(ctx);
                spinner.finish_success(&name);
                StepResult {
                    name,
                    status: StepStatus::Completed,
                    detail: None,
                    remedy: None,
                    duration: start.elapsed(),
                }
            }
            Readiness::NeedsAction(still) => {
                let (detail, remedy) = match applied {
                    Err(e) => {
                        let remedy = e.remedy().map(str::to_string).or_else(|| step.remedy(ctx));
                        (e.to_string(), remedy)
                    }
                    Ok(()) => (still, step.remedy(ctx)),
                };
                let status = if step.fatal() {
                    StepStatus::Halted
                } else {
                    StepStatus::Degraded
                };
                spinner.finish_error(&format!("{} - {}", name, detail));
                tracing::debug!("{} {}: {}", name, status, detail);
                StepResult {
                    name,
                    status,
                    detail: Some(detail),
                    remedy,
                    duration: start.elapsed(),
                }
            }
        }
    }
}
