//! Registration and registry document steps.

use std::cell::{Cell, RefCell};

use crate::config::Scope;
use crate::error::{RigupError, Result};
use crate::registration::{
    CliRegistryClient, RegistrationManager, RegistrationOutcome, RegistryEntry,
};
use crate::status::{diff_registrations, missing_entries, purge, repair_merge, Drift};
use crate::steps::{ProvisioningStep, Readiness, StepContext};
use crate::tools::catalog::application;
use crate::tools::CapabilityProbe;

fn require_application(ctx: &StepContext<'_>, step: &str) -> Result<()> {
    if ctx.has(&application(ctx.settings)) {
        Ok(())
    } else {
        Err(RigupError::step(
            step,
            format!("{} is not installed", ctx.settings.app.command),
            None,
        ))
    }
}

/// Registers the server catalog.
#[derive(Debug)]
pub struct RegistrationsStep {
    entries: Vec<RegistryEntry>,
    scope: Scope,
    failed: RefCell<Option<Vec<String>>>,
}

impl RegistrationsStep {
    /// Step name.
    pub const NAME: &'static str = "registrations";

    /// Register `entries` at `scope`.
    pub fn new(entries: Vec<RegistryEntry>, scope: Scope) -> Self {
        Self {
            entries,
            scope,
            failed: RefCell::new(None),
        }
    }
}

impl ProvisioningStep for RegistrationsStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fatal(&self) -> bool {
        false
    }

    fn check(&self, _ctx: &mut StepContext<'_>) -> Readiness {
        // Always re-registered; remove-then-add replaces stale launch commands.
        Readiness::needs(format!(
            "register {} entries ({} scope)",
            self.entries.len(),
            self.scope
        ))
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<()> {
        require_application(ctx, Self::NAME)?;

        let report = {
            let client = CliRegistryClient::new(ctx.runner, &ctx.paths, ctx.settings, ctx.layout);
            let probe = CapabilityProbe::new(ctx.runner, &ctx.paths);
            RegistrationManager::new(&client, probe, &ctx.layout.home)
                .register_all(&self.entries, self.scope)
        };

        for entry in &report.entries {
            if let RegistrationOutcome::Skipped(reason) = &entry.outcome {
                ctx.warn(format!("{} skipped ({})", entry.name, reason));
            }
        }
        let failed: Vec<String> = report.failed().iter().map(|s| s.to_string()).collect();
        *self.failed.borrow_mut() = Some(failed.clone());

        if failed.is_empty() {
            Ok(())
        } else {
            Err(RigupError::step(
                Self::NAME,
                format!("failed to register {}", failed.join(", ")),
                None,
            ))
        }
    }

    fn verify(&self, ctx: &mut StepContext<'_>) -> Readiness {
        match self.failed.borrow().as_ref() {
            None => Readiness::needs(format!("{} is not installed", ctx.settings.app.command)),
            Some(failed) if failed.is_empty() => Readiness::Satisfied,
            Some(failed) => Readiness::needs(format!("failed to register {}", failed.join(", "))),
        }
    }
}

/// Compares registrations visible from home and from the project directory.
#[derive(Debug, Default)]
pub struct LocationCheckStep {
    compared: Cell<bool>,
}

impl LocationCheckStep {
    /// Step name.
    pub const NAME: &'static str = "location-check";
}

impl ProvisioningStep for LocationCheckStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fatal(&self) -> bool {
        false
    }

    fn check(&self, _ctx: &mut StepContext<'_>) -> Readiness {
        Readiness::needs("compare registrations between home and project")
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<()> {
        require_application(ctx, Self::NAME)?;
        let (home_list, project_list) = {
            let client = CliRegistryClient::new(ctx.runner, &ctx.paths, ctx.settings, ctx.layout);
            diff_registrations(&client, &ctx.layout.home, &ctx.layout.project_dir)?
        };
        self.compared.set(true);

        let drift = Drift::between(&home_list, &project_list);
        if !drift.is_empty() {
            ctx.warn(format!(
                "registrations differ by location: {}",
                drift.describe("home", "project")
            ));
        }
        Ok(())
    }

    fn verify(&self, _ctx: &mut StepContext<'_>) -> Readiness {
        if self.compared.get() {
            Readiness::Satisfied
        } else {
            Readiness::needs("could not list registrations")
        }
    }
}

/// Copies user-scope entries missing from the project document into it.
#[derive(Debug, Default)]
pub struct RepairProjectConfigStep;

impl RepairProjectConfigStep {
    /// Step name.
    pub const NAME: &'static str = "repair-project-config";
}

impl ProvisioningStep for RepairProjectConfigStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fatal(&self) -> bool {
        false
    }

    fn check(&self, ctx: &mut StepContext<'_>) -> Readiness {
        let user = ctx.layout.user_document(ctx.settings);
        let project = ctx.layout.project_document(ctx.settings);
        match missing_entries(&user, &project) {
            Ok(missing) if missing.is_empty() => Readiness::Satisfied,
            Ok(missing) => Readiness::needs(format!("project config lacks {}", missing.join(", "))),
            Err(e) => Readiness::needs(e.to_string()),
        }
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<()> {
        let user = ctx.layout.user_document(ctx.settings);
        let project = ctx.layout.project_document(ctx.settings);
        repair_merge(&user, &project)?;
        Ok(())
    }
}

/// Moves the project document aside.
#[derive(Debug, Default)]
pub struct PurgeProjectConfigStep;

impl PurgeProjectConfigStep {
    /// Step name.
    pub const NAME: &'static str = "purge-project-config";
}

impl ProvisioningStep for PurgeProjectConfigStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fatal(&self) -> bool {
        false
    }

    fn check(&self, ctx: &mut StepContext<'_>) -> Readiness {
        let document = ctx.layout.project_document(ctx.settings);
        if document.is_file() {
            Readiness::needs(format!("{} present", document.display()))
        } else {
            Readiness::Satisfied
        }
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<()> {
        let document = ctx.layout.project_document(ctx.settings);
        let auto_confirm = ctx.settings.auto_confirm;
        let outcome = purge(&[document], ctx.ui, auto_confirm)?;
        if outcome.declined {
            return Err(RigupError::step(Self::NAME, "declined", None));
        }
        Ok(())
    }
}
