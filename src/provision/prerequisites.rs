//! System prerequisites installed through the system package manager.

use crate::error::{RigupError, Result};
use crate::shell::{is_elevated, Invocation};
use crate::steps::{ProvisioningStep, Readiness, StepContext};
use crate::tools::catalog::{curl, git};
use crate::tools::Tool;

/// Ensures `curl` (and `git` for git-sourced installs).
#[derive(Debug)]
pub struct PrerequisitesStep {
    tools: Vec<Tool>,
}

impl PrerequisitesStep {
    /// Step name.
    pub const NAME: &'static str = "prerequisites";

    /// Require curl, plus git when `needs_git`.
    pub fn new(needs_git: bool) -> Self {
        let mut tools = vec![curl()];
        if needs_git {
            tools.push(git());
        }
        Self { tools }
    }

    fn missing(&self, ctx: &StepContext<'_>) -> Vec<String> {
        self.tools
            .iter()
            .filter(|t| !ctx.has(t))
            .map(|t| t.name.clone())
            .collect()
    }

    fn apt_remedy(names: &[String]) -> String {
        let sudo = if is_elevated() { "" } else { "sudo " };
        format!("{}apt-get install -y {}", sudo, names.join(" "))
    }
}

impl ProvisioningStep for PrerequisitesStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fatal(&self) -> bool {
        true
    }

    fn check(&self, ctx: &mut StepContext<'_>) -> Readiness {
        let missing = self.missing(ctx);
        if missing.is_empty() {
            Readiness::Satisfied
        } else {
            Readiness::needs(format!("missing {}", missing.join(", ")))
        }
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<()> {
        let missing = self.missing(ctx);
        if !ctx.has(&Tool::executable("brew")) {
            return Err(RigupError::step(
                Self::NAME,
                format!("{} not installed and Homebrew is unavailable", missing.join(", ")),
                Some(Self::apt_remedy(&missing)),
            ));
        }
        let mut args = vec!["install".to_string()];
        args.extend(missing);
        ctx.run_checked(&Invocation::new("brew", args))?;
        Ok(())
    }

    fn remedy(&self, ctx: &StepContext<'_>) -> Option<String> {
        let missing = self.missing(ctx);
        (!missing.is_empty()).then(|| Self::apt_remedy(&missing))
    }
}
