//! Application install and first-run onboarding.

use serde_json::{Map, Value};

use crate::config::{InstallMethod, Source};
use crate::document::{read_document, write_document};
use crate::error::{RigupError, Result};
use crate::shell::Invocation;
use crate::steps::{ProvisioningStep, Readiness, StepContext};
use crate::tools::catalog::{application, curl, git, npm};

/// Installs (or upgrades) the application.
#[derive(Debug)]
pub struct ApplicationStep {
    upgrade: bool,
}

impl ApplicationStep {
    /// Step name.
    pub const NAME: &'static str = "application";

    /// `upgrade` re-runs the upgrade action when the app is already present.
    pub fn new(upgrade: bool) -> Self {
        Self { upgrade }
    }

    /// `auto` resolves to npm when npm is present.
    fn method(ctx: &StepContext<'_>) -> InstallMethod {
        match ctx.settings.install_method {
            InstallMethod::Auto if ctx.has(&npm()) => InstallMethod::Npm,
            InstallMethod::Auto => InstallMethod::Native,
            other => other,
        }
    }

    fn native_install(ctx: &StepContext<'_>) -> Invocation {
        Invocation::shell(format!("curl -fsSL {} | bash", ctx.settings.app.installer_url))
    }

    /// The command that installs the app from scratch with `method`.
    fn install_command(ctx: &StepContext<'_>, method: InstallMethod) -> Invocation {
        let app = &ctx.settings.app;
        match (method, ctx.settings.source) {
            (InstallMethod::Npm, Source::Git) => Invocation::new(
                "npm",
                [
                    "install".to_string(),
                    "-g".to_string(),
                    ctx.layout.checkout_dir(ctx.settings).to_string_lossy().into_owned(),
                ],
            ),
            (InstallMethod::Npm, Source::Registry) => {
                Invocation::new("npm", ["install", "-g", app.package.as_str()])
            }
            _ => Self::native_install(ctx),
        }
    }

    fn upgrade_command(ctx: &StepContext<'_>, method: InstallMethod) -> Invocation {
        let app = &ctx.settings.app;
        match (method, ctx.settings.source) {
            (InstallMethod::Npm, Source::Registry) => Invocation::new(
                "npm",
                ["install".to_string(), "-g".to_string(), format!("{}@latest", app.package)],
            ),
            (InstallMethod::Npm, Source::Git) => Self::install_command(ctx, method),
            _ => Invocation::new(app.command.clone(), ["update"]),
        }
    }

    /// Clone the repository, or fast-forward an existing checkout.
    fn sync_checkout(ctx: &StepContext<'_>) -> Result<()> {
        if !ctx.has(&git()) {
            return Err(RigupError::step(Self::NAME, "git is required for source=git", None));
        }
        let checkout = ctx.layout.checkout_dir(ctx.settings);
        let dir = checkout.to_string_lossy().into_owned();
        let sync = if checkout.join(".git").exists() {
            Invocation::new("git", ["-C", dir.as_str(), "pull", "--ff-only"])
        } else {
            if let Some(parent) = checkout.parent() {
                std::fs::create_dir_all(parent)?;
            }
            Invocation::new(
                "git",
                [
                    "clone",
                    "--depth",
                    "1",
                    ctx.settings.app.repository.as_str(),
                    dir.as_str(),
                ],
            )
        };
        ctx.run_checked(&sync)?;
        Ok(())
    }
}

impl ProvisioningStep for ApplicationStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fatal(&self) -> bool {
        true
    }

    fn check(&self, ctx: &mut StepContext<'_>) -> Readiness {
        if !ctx.has(&application(ctx.settings)) {
            Readiness::needs(format!("{} not installed", ctx.settings.app.command))
        } else if self.upgrade {
            Readiness::needs("upgrade requested")
        } else {
            Readiness::Satisfied
        }
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<()> {
        let method = Self::method(ctx);
        let present = ctx.has(&application(ctx.settings));

        if method == InstallMethod::Native && ctx.settings.source == Source::Git {
            ctx.warn("source=git is not supported by the native installer; using the installer");
        }

        match method {
            InstallMethod::Npm => {
                if !ctx.has(&npm()) {
                    return Err(RigupError::step(Self::NAME, "npm is not available", None));
                }
                if ctx.settings.source == Source::Git {
                    Self::sync_checkout(ctx)?;
                }
            }
            _ => {
                if !present && !ctx.has(&curl()) {
                    return Err(RigupError::step(Self::NAME, "curl is required", None));
                }
            }
        }

        let command = if present {
            Self::upgrade_command(ctx, method)
        } else {
            Self::install_command(ctx, method)
        };
        ctx.run_checked(&command)?;

        if method != InstallMethod::Npm {
            // The native installer drops the binary into ~/.local/bin.
            let local_bin = ctx.layout.home.join(".local/bin");
            ctx.publish(&local_bin);
        }
        Ok(())
    }

    fn verify(&self, ctx: &mut StepContext<'_>) -> Readiness {
        if ctx.has(&application(ctx.settings)) {
            Readiness::Satisfied
        } else {
            Readiness::needs(format!(
                "{} still not found after install",
                ctx.settings.app.command
            ))
        }
    }

    fn remedy(&self, ctx: &StepContext<'_>) -> Option<String> {
        Some(Self::install_command(ctx, Self::method(ctx)).display())
    }
}

/// Key the application reads to skip its first-run wizard.
pub const ONBOARDING_KEY: &str = "hasCompletedOnboarding";

/// Marks the first-run wizard as completed in the user document.
#[derive(Debug, Default)]
pub struct OnboardingStep;

impl OnboardingStep {
    /// Step name.
    pub const NAME: &'static str = "onboarding";
}

impl ProvisioningStep for OnboardingStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fatal(&self) -> bool {
        false
    }

    fn check(&self, ctx: &mut StepContext<'_>) -> Readiness {
        let path = ctx.layout.user_document(ctx.settings);
        match read_document(&path) {
            Ok(Some(doc)) if doc.get(ONBOARDING_KEY) == Some(&Value::Bool(true)) => {
                Readiness::Satisfied
            }
            Ok(_) => Readiness::needs("onboarding not marked complete"),
            Err(e) => Readiness::needs(e.to_string()),
        }
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<()> {
        let path = ctx.layout.user_document(ctx.settings);
        let mut doc = read_document(&path)?.unwrap_or_else(Map::new);
        doc.insert(ONBOARDING_KEY.to_string(), Value::Bool(true));
        write_document(&path, &doc)
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
    use std::fs;
    use tempfile::TempDir;

    fn run_with(
        runner: &ScriptedRunner,
        settings: &Settings,
        layout: &HostLayout,
        step: Box<dyn ProvisioningStep>,
    ) -> RunReport {
        let mut ui = MockUI::new();
        let mut ctx = StepContext::new(runner, PathRegistry::new(), settings, layout, &mut ui);
        StepExecutor::new().run(&[step], &mut ctx)
    }

    fn layout() -> HostLayout {
        HostLayout::new("/home/dev", "/work")
    }

    #[test]
    fn auto_prefers_npm() {
        let runner = ScriptedRunner::new().with_tool("npm", "10.8.2").on(
            "npm install -g @anthropic-ai/claude-code",
            Scripted::ok("").provides("claude", "1.0.0 (Claude Code)"),
        );
        let report = run_with(
            &runner,
            &Settings::default(),
            &layout(),
            Box::new(ApplicationStep::new(false)),
        );
        assert_eq!(report.steps[0].status, StepStatus::Completed);
    }

    #[test]
    fn auto_without_npm_uses_native_installer() {
        let runner = ScriptedRunner::new().with_tool("curl", "curl 8.5.0").on(
            "claude.ai/install.sh | bash",
            Scripted::ok("").provides("claude", "1.0.0"),
        );
        let report = run_with(
            &runner,
            &Settings::default(),
            &layout(),
            Box::new(ApplicationStep::new(false)),
        );
        assert_eq!(report.steps[0].status, StepStatus::Completed);
    }

    #[test]
    fn present_app_is_skipped_unless_upgrading() {
        let runner = ScriptedRunner::new()
            .with_tool("npm", "10.8.2")
            .with_tool("claude", "1.0.0");
        let settings = Settings::default();
        let report = run_with(&runner, &settings, &layout(), Box::new(ApplicationStep::new(false)));
        assert_eq!(report.steps[0].status, StepStatus::Skipped);

        let report = run_with(&runner, &settings, &layout(), Box::new(ApplicationStep::new(true)));
        assert_eq!(report.steps[0].status, StepStatus::Completed);
        assert!(runner.ran("npm install -g @anthropic-ai/claude-code@latest"));
    }

    #[test]
    fn git_source_clones_then_installs_checkout() {
        let runner = ScriptedRunner::new()
            .with_tool("npm", "10.8.2")
            .with_tool("git", "git version 2.43.0")
            .on(
                "npm install -g /",
                Scripted::ok("").provides("claude", "1.0.0"),
            );
        let temp = TempDir::new().unwrap();
        let layout = HostLayout::new(temp.path(), "/work");
        let settings = Settings {
            source: Source::Git,
            ..Settings::default()
        };
        let report = run_with(&runner, &settings, &layout, Box::new(ApplicationStep::new(false)));
        assert_eq!(report.steps[0].status, StepStatus::Completed);
        let lines = runner.call_lines();
        assert!(lines[0].starts_with("git clone --depth 1 https://github.com/anthropics/claude-code.git"));
        assert!(lines[1].ends_with("/.local/share/rigup/src/claude"));
    }

    #[test]
    fn native_with_git_source_warns() {
        let runner = ScriptedRunner::new().with_tool("curl", "curl 8.5.0").on(
            "install.sh",
            Scripted::ok("").provides("claude", "1.0.0"),
        );
        let settings = Settings {
            source: Source::Git,
            install_method: InstallMethod::Native,
            ..Settings::default()
        };
        let report = run_with(&runner, &settings, &layout(), Box::new(ApplicationStep::new(false)));
        assert_eq!(report.steps[0].status, StepStatus::Completed);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn failed_install_halts_with_install_remedy() {
        let runner = ScriptedRunner::new()
            .with_tool("npm", "10.8.2")
            .on("npm install -g", Scripted::fail(243, "EACCES"));
        let report = run_with(
            &runner,
            &Settings::default(),
            &layout(),
            Box::new(ApplicationStep::new(false)),
        );
        let halted = report.halted().unwrap();
        assert_eq!(
            halted.remedy.as_deref(),
            Some("npm install -g @anthropic-ai/claude-code")
        );
    }

    #[test]
    fn onboarding_sets_flag_once() {
        let temp = TempDir::new().unwrap();
        let layout = HostLayout::new(temp.path(), "/work");
        let settings = Settings::default();
        let doc = temp.path().join(".claude.json");
        fs::write(&doc, r#"{"numStartups": 4}"#).unwrap();
        let runner = ScriptedRunner::new();

        let report = run_with(&runner, &settings, &layout, Box::new(OnboardingStep));
        assert_eq!(report.steps[0].status, StepStatus::Completed);
        let written = fs::read_to_string(&doc).unwrap();
        assert!(written.contains("\"numStartups\": 4"));
        assert!(written.contains("\"hasCompletedOnboarding\": true"));

        let report = run_with(&runner, &settings, &layout, Box::new(OnboardingStep));
        assert_eq!(report.steps[0].status, StepStatus::Skipped);
        assert_eq!(fs::read_to_string(&doc).unwrap(), written);
    }
}
