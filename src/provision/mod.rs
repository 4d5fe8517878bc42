//! The provisioning pipeline.
//!
//! Steps run in a fixed order; settings decide which of them are present:
//!
//! 1. prerequisites
//! 2. runtime manager (unless the runtime is skipped)
//! 3. runtime
//! 4. package manager
//! 5. python tools
//! 6. application
//! 7. onboarding
//! 8. stale aliases
//! 9. persisted search path
//! 10. registrations, location check, project config repair and purge

pub mod application;
pub mod packages;
pub mod prerequisites;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod shell;

pub use application::{ApplicationStep, OnboardingStep, ONBOARDING_KEY};
pub use packages::{PackageManagerStep, PythonToolsStep};
pub use prerequisites::PrerequisitesStep;
pub use registry::{
    LocationCheckStep, PurgeProjectConfigStep, RegistrationsStep, RepairProjectConfigStep,
};
pub use render::render_report;
pub use runtime::{RuntimeManagerStep, RuntimeStep};
pub use shell::{PersistPathStep, StaleAliasStep};

use crate::config::{HostLayout, Settings, Source};
use crate::paths::PathRegistry;
use crate::registration::default_catalog;
use crate::runtime::VersionPreference;
use crate::shell::{CommandRunner, ShellType};
use crate::status::StatusReport;
use crate::steps::{ProvisioningStep, RunReport, StepContext, StepExecutor};
use crate::tools::catalog::status_tools;
use crate::tools::CapabilityProbe;
use crate::ui::UserInterface;

/// Per-invocation knobs that are not part of the settings file.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Run upgrade actions for pnpm, uv and the application even when present.
    pub upgrade: bool,
    /// Shell whose startup file receives persisted lines.
    pub shell: ShellType,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            upgrade: false,
            shell: ShellType::detect(),
        }
    }
}

/// Assemble the steps for one run.
pub fn build_pipeline(
    settings: &Settings,
    layout: &HostLayout,
    options: PipelineOptions,
) -> Vec<Box<dyn ProvisioningStep>> {
    let preference =
        VersionPreference::new(settings.preferred_node_major, settings.fallback_node_major);

    let mut steps: Vec<Box<dyn ProvisioningStep>> = vec![Box::new(PrerequisitesStep::new(
        settings.source == Source::Git,
    ))];

    if settings.skip_runtime {
        steps.push(Box::new(RuntimeStep::unmanaged(preference)));
    } else {
        steps.push(Box::new(RuntimeManagerStep));
        steps.push(Box::new(RuntimeStep::managed(preference)));
    }

    steps.push(Box::new(PackageManagerStep::new(options.upgrade)));
    steps.push(Box::new(PythonToolsStep::new(options.upgrade)));
    steps.push(Box::new(ApplicationStep::new(options.upgrade)));

    if settings.skip_wizard {
        steps.push(Box::new(OnboardingStep));
    }
    steps.push(Box::new(StaleAliasStep));
    if settings.persist_path {
        steps.push(Box::new(PersistPathStep::new(
            options.shell.startup_file(&layout.home),
            !settings.skip_runtime,
        )));
    }

    if settings.register_servers {
        steps.push(Box::new(RegistrationsStep::new(
            default_catalog(&layout.home),
            settings.registration_scope,
        )));
    }
    if settings.validate_locations {
        steps.push(Box::new(LocationCheckStep::default()));
    }
    if settings.repair_project_config {
        steps.push(Box::new(RepairProjectConfigStep));
    }
    if settings.purge_project_config {
        steps.push(Box::new(PurgeProjectConfigStep));
    }

    steps
}

/// Run the full pipeline, then render its report and the toolchain summary.
pub fn provision(
    runner: &dyn CommandRunner,
    paths: PathRegistry,
    settings: &Settings,
    layout: &HostLayout,
    ui: &mut dyn UserInterface,
    options: PipelineOptions,
) -> RunReport {
    let steps = build_pipeline(settings, layout, options);
    tracing::debug!(
        "pipeline: {}",
        steps.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
    );

    let (report, paths) = {
        let mut ctx = StepContext::new(runner, paths, settings, layout, &mut *ui);
        let report = StepExecutor::new().run(&steps, &mut ctx);
        (report, ctx.paths)
    };

    render_report(&report, ui);

    let probe = CapabilityProbe::new(runner, &paths);
    let status = StatusReport::collect(&probe, &status_tools(settings, layout));
    ui.message("");
    for line in status.lines() {
        ui.message(&line);
    }

    if report.halted().is_none() && settings.persist_path {
        ui.show_hint(&format!(
            "Open a new shell or run: {}",
            options.shell.reload_hint(&layout.home)
        ));
    }
    report
}
