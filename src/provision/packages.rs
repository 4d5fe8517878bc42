//! Package manager and Python tool steps.

use crate::error::{RigupError, Result};
use crate::steps::{ProvisioningStep, Readiness, StepContext};
use crate::tools::catalog::{curl, npm, pnpm, uv, uvx};

/// Installs (or upgrades) pnpm through npm.
#[derive(Debug, Default)]
pub struct PackageManagerStep {
    upgrade: bool,
}

impl PackageManagerStep {
    /// Step name.
    pub const NAME: &'static str = "package-manager";

    /// `upgrade` runs pnpm's upgrade action when it is already present.
    pub fn new(upgrade: bool) -> Self {
        Self { upgrade }
    }
}

impl ProvisioningStep for PackageManagerStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fatal(&self) -> bool {
        false
    }

    fn check(&self, ctx: &mut StepContext<'_>) -> Readiness {
        if !ctx.has(&pnpm()) {
            Readiness::needs("pnpm not installed")
        } else if self.upgrade {
            Readiness::needs("upgrade requested")
        } else {
            Readiness::Satisfied
        }
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<()> {
        if !ctx.has(&npm()) {
            return Err(RigupError::step(Self::NAME, "npm is not available", None));
        }
        let tool = pnpm();
        let action = if ctx.has(&tool) {
            &tool.upgrade
        } else {
            &tool.install
        };
        if let Some(action) = action {
            ctx.run_checked(action)?;
        }
        Ok(())
    }

    fn verify(&self, ctx: &mut StepContext<'_>) -> Readiness {
        if ctx.has(&pnpm()) {
            Readiness::Satisfied
        } else {
            Readiness::needs("pnpm still not found after install")
        }
    }

    fn remedy(&self, _ctx: &StepContext<'_>) -> Option<String> {
        pnpm().install.map(|i| i.display())
    }
}

/// Installs (or upgrades) uv and uvx into `~/.local/bin`.
#[derive(Debug, Default)]
pub struct PythonToolsStep {
    upgrade: bool,
}

impl PythonToolsStep {
    /// Step name.
    pub const NAME: &'static str = "python-tools";

    /// `upgrade` runs uv's self-update when both tools are already present.
    pub fn new(upgrade: bool) -> Self {
        Self { upgrade }
    }

    fn missing(ctx: &StepContext<'_>) -> Vec<String> {
        [uv(ctx.layout), uvx(ctx.layout)]
            .iter()
            .filter(|t| !ctx.has(t))
            .map(|t| t.name.clone())
            .collect()
    }
}

impl ProvisioningStep for PythonToolsStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fatal(&self) -> bool {
        false
    }

    fn check(&self, ctx: &mut StepContext<'_>) -> Readiness {
        let missing = Self::missing(ctx);
        if !missing.is_empty() {
            Readiness::needs(format!("{} not installed", missing.join(", ")))
        } else if self.upgrade {
            Readiness::needs("upgrade requested")
        } else {
            Readiness::Satisfied
        }
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<()> {
        let tool = uv(ctx.layout);
        if Self::missing(ctx).is_empty() {
            if let Some(upgrade) = &tool.upgrade {
                ctx.run_checked(upgrade)?;
            }
            return Ok(());
        }

        if !ctx.has(&curl()) {
            return Err(RigupError::step(Self::NAME, "curl is required", None));
        }
        if let Some(install) = &tool.install {
            ctx.run_checked(install)?;
        }
        // The installer does not touch PATH; uvx must resolve before verify.
        ctx.publish_tool(&tool);
        Ok(())
    }

    fn verify(&self, ctx: &mut StepContext<'_>) -> Readiness {
        let missing = Self::missing(ctx);
        if missing.is_empty() {
            Readiness::Satisfied
        } else {
            Readiness::needs(format!("{} not installed", missing.join(", ")))
        }
    }

    fn settle(&self, ctx: &mut StepContext<'_>) {
        let tool = uv(ctx.layout);
        ctx.publish_tool(&tool);
    }

    fn remedy(&self, ctx: &StepContext<'_>) -> Option<String> {
        uv(ctx.layout).install.map(|i| i.display())
    }
}
