//! Runtime manager and runtime version steps.

use std::cell::RefCell;

use crate::error::{RigupError, Result};
use crate::runtime::{Activation, RuntimeManager, VersionPreference, VersionResolver};
use crate::steps::{ProvisioningStep, Readiness, StepContext};
use crate::tools::catalog::{curl, node, nvm};
use crate::tools::leading_major;

/// Installs the runtime manager.
#[derive(Debug, Default)]
pub struct RuntimeManagerStep;

impl RuntimeManagerStep {
    /// Step name.
    pub const NAME: &'static str = "runtime-manager";
}

impl ProvisioningStep for RuntimeManagerStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fatal(&self) -> bool {
        true
    }

    fn check(&self, ctx: &mut StepContext<'_>) -> Readiness {
        if ctx.has(&nvm(ctx.layout)) {
            Readiness::Satisfied
        } else {
            Readiness::needs("nvm not installed")
        }
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<()> {
        if !ctx.has(&curl()) {
            return Err(RigupError::step(Self::NAME, "curl is required", None));
        }
        let tool = nvm(ctx.layout);
        if let Some(install) = &tool.install {
            ctx.run_checked(install)?;
        }
        Ok(())
    }

    fn remedy(&self, ctx: &StepContext<'_>) -> Option<String> {
        nvm(ctx.layout).install.map(|i| i.display())
    }
}

/// Activates the preferred (or fallback) runtime major as the default.
#[derive(Debug)]
pub struct RuntimeStep {
    preference: VersionPreference,
    managed: bool,
    activation: RefCell<Option<Activation>>,
}

impl RuntimeStep {
    /// Step name.
    pub const NAME: &'static str = "runtime";

    /// Manage the runtime through the runtime manager.
    pub fn managed(preference: VersionPreference) -> Self {
        Self {
            preference,
            managed: true,
            activation: RefCell::new(None),
        }
    }

    /// Only verify a runtime is present.
    pub fn unmanaged(preference: VersionPreference) -> Self {
        Self {
            preference,
            managed: false,
            activation: RefCell::new(None),
        }
    }

    fn manager(ctx: &StepContext<'_>) -> RuntimeManager {
        RuntimeManager::new(&ctx.layout.nvm_dir).with_search_path(&ctx.paths)
    }
}

impl ProvisioningStep for RuntimeStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fatal(&self) -> bool {
        true
    }

    fn check(&self, ctx: &mut StepContext<'_>) -> Readiness {
        if !self.managed {
            return if ctx.has(&node()) {
                Readiness::Satisfied
            } else {
                Readiness::needs("node not found and runtime management is skipped")
            };
        }
        if !ctx.has(&nvm(ctx.layout)) {
            return Readiness::needs("nvm not installed");
        }
        match Self::manager(ctx).current_default(ctx.runner) {
            Some(version) => match leading_major(&version) {
                Some(major) if self.preference.accepts(major) => Readiness::Satisfied,
                _ => Readiness::needs(format!(
                    "default runtime is {}, want {} or {}",
                    version, self.preference.preferred_major, self.preference.fallback_major
                )),
            },
            None => Readiness::needs("no default runtime"),
        }
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<()> {
        if !self.managed {
            return Err(RigupError::step(
                Self::NAME,
                "node is not installed",
                Some("RIGUP_SKIP_RUNTIME=off rigup run".to_string()),
            ));
        }
        let manager = Self::manager(ctx);
        let activation = VersionResolver::new(ctx.runner, &manager).resolve(&self.preference)?;
        if activation.fell_back {
            ctx.warn(format!(
                "runtime fell back to {} ({} unavailable)",
                activation.activated_major, self.preference.preferred_major
            ));
        }
        if let Some(note) = &activation.mismatch {
            ctx.warn(note.clone());
        }
        ctx.publish(&manager.bin_dir(&activation.version));
        self.activation.replace(Some(activation));
        Ok(())
    }

    // Accepts whatever version this run activated, whatever its major.
    fn verify(&self, ctx: &mut StepContext<'_>) -> Readiness {
        let activated = self.activation.borrow().as_ref().map(|a| a.version.clone());
        match activated {
            Some(version) => match Self::manager(ctx).current_default(ctx.runner) {
                Some(default) if default == version => Readiness::Satisfied,
                Some(default) => Readiness::needs(format!(
                    "default runtime is {} after activating {}",
                    default, version
                )),
                None => Readiness::needs("no default runtime"),
            },
            None => self.check(ctx),
        }
    }

    fn settle(&self, ctx: &mut StepContext<'_>) {
        if !self.managed {
            return;
        }
        let manager = Self::manager(ctx);
        if let Some(version) = manager.current_default(ctx.runner) {
            ctx.publish(&manager.bin_dir(&version));
        }
    }

    fn remedy(&self, ctx: &StepContext<'_>) -> Option<String> {
        self.managed
            .then(|| Self::manager(ctx).install(self.preference.preferred_major).display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HostLayout, Settings};
    use crate::paths::PathRegistry;
    use crate::shell::{Scripted, ScriptedRunner};
    use crate::steps::{RunReport, StepExecutor, StepStatus};
    use crate::ui::MockUI;
    use std::path::PathBuf;

    fn run(runner: &ScriptedRunner, step: RuntimeStep) -> (RunReport, PathRegistry) {
        let settings = Settings::default();
        let layout = HostLayout::new("/home/dev", "/work");
        let mut ui = MockUI::new();
        let mut ctx = StepContext::new(runner, PathRegistry::new(), &settings, &layout, &mut ui);
        let report = StepExecutor::new().run(&[Box::new(step)], &mut ctx);
        (report, ctx.paths.clone())
    }

    fn nvm_host() -> ScriptedRunner {
        ScriptedRunner::new().with_file("/home/dev/.nvm/nvm.sh")
    }

    #[test]
    fn accepted_default_is_skipped_and_published() {
        let runner = nvm_host().on("nvm version default", Scripted::ok("v20.11.1"));
        let (report, paths) = run(&runner, RuntimeStep::managed(VersionPreference::new(22, 20)));
        assert_eq!(report.steps[0].status, StepStatus::Skipped);
        assert!(!runner.ran("nvm install"));
        assert!(paths.contains(&PathBuf::from("/home/dev/.nvm/versions/node/v20.11.1/bin")));
    }

    #[test]
    fn falls_back_and_warns() {
        let runner = nvm_host()
            .on("nvm install 22", Scripted::fail(3, "download failed"))
            .on("nvm install 20", Scripted::ok("").provides("node", "v20.11.1"))
            .on("nvm version 20", Scripted::ok("v20.11.1"))
            .on("nvm alias default 20", Scripted::ok("default -> 20 (-> v20.11.1)"))
            .on_sequence(
                "nvm version default",
                vec![Scripted::ok("N/A"), Scripted::ok("v20.11.1")],
            );
        let (report, paths) = run(&runner, RuntimeStep::managed(VersionPreference::new(22, 20)));
        assert_eq!(report.steps[0].status, StepStatus::Completed);
        assert_eq!(report.warnings, vec!["runtime fell back to 20 (22 unavailable)"]);
        assert!(paths.contains(&PathBuf::from("/home/dev/.nvm/versions/node/v20.11.1/bin")));
    }

    #[test]
    fn both_failing_halts_with_install_remedy() {
        let runner = nvm_host().on("nvm install", Scripted::fail(3, "offline"));
        let (report, _) = run(&runner, RuntimeStep::managed(VersionPreference::new(22, 20)));
        let halted = report.halted().unwrap();
        assert!(halted.remedy.as_deref().unwrap().ends_with("nvm install 22"));
    }

    #[test]
    fn unexpected_activated_major_completes_with_warning() {
        let runner = nvm_host()
            .on("nvm install 22", Scripted::ok(""))
            .on("nvm version 22", Scripted::ok("v23.0.0"))
            .on("nvm alias default 22", Scripted::ok(""))
            .on_sequence(
                "nvm version default",
                vec![Scripted::ok("N/A"), Scripted::ok("v23.0.0")],
            );
        let (report, paths) = run(&runner, RuntimeStep::managed(VersionPreference::new(22, 20)));

        assert_eq!(report.steps[0].status, StepStatus::Completed);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(
            report.warnings,
            vec!["requested runtime 22 but the manager reports v23.0.0"]
        );
        assert!(!runner.ran("nvm install 20"));
        assert!(paths.contains(&PathBuf::from("/home/dev/.nvm/versions/node/v23.0.0/bin")));
    }

    #[test]
    fn default_changed_after_activation_is_not_verified() {
        let runner = nvm_host()
            .on("nvm install 22", Scripted::ok(""))
            .on("nvm version 22", Scripted::ok("v22.3.0"))
            .on("nvm alias default 22", Scripted::ok(""))
            .on_sequence(
                "nvm version default",
                vec![
                    Scripted::ok("N/A"),
                    Scripted::ok("v22.3.0"),
                    Scripted::ok("v18.20.0"),
                ],
            );
        let (report, _) = run(&runner, RuntimeStep::managed(VersionPreference::new(22, 20)));
        let halted = report.halted().unwrap();
        assert!(halted.detail.as_deref().unwrap().contains("v18.20.0"));
    }

    #[test]
    fn unmanaged_only_checks_presence() {
        let runner = ScriptedRunner::new().with_tool("node", "v18.19.0");
        let (report, _) = run(&runner, RuntimeStep::unmanaged(VersionPreference::new(22, 20)));
        assert_eq!(report.steps[0].status, StepStatus::Skipped);
        assert!(runner.calls().is_empty());

        let bare = ScriptedRunner::new();
        let (report, _) = run(&bare, RuntimeStep::unmanaged(VersionPreference::new(22, 20)));
        assert!(report.halted().is_some());
    }
}
