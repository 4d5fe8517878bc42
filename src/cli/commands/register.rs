//! Register command implementation.
//!
//! The `rigup register` command registers the server catalog without
//! running the rest of the pipeline.

use crate::cli::args::RegisterArgs;
use crate::error::Result;
use crate::registration::{
    default_catalog, CliRegistryClient, RegistrationManager, RegistrationOutcome,
};
use crate::tools::catalog::application;
use crate::tools::CapabilityProbe;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Session};

/// The register command implementation.
pub struct RegisterCommand {
    session: Session,
    args: RegisterArgs,
}

impl RegisterCommand {
    /// Create a new register command.
    pub fn new(session: Session, args: RegisterArgs) -> Self {
        Self { session, args }
    }
}

impl Command for RegisterCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let session = &self.session;
        let runner = session.runner.as_ref();
        let probe = CapabilityProbe::new(runner, &session.paths);
        if !probe.is_present(&application(&session.settings)) {
            ui.error(&format!("{} is not installed", session.settings.app.command));
            ui.show_hint("Run `rigup run` first");
            return Ok(CommandResult::failure(1));
        }

        let scope = self.args.scope.unwrap_or(session.settings.registration_scope);
        let client =
            CliRegistryClient::new(runner, &session.paths, &session.settings, &session.layout);
        let manager = RegistrationManager::new(&client, probe, &session.layout.home);
        let report = manager.register_all(&default_catalog(&session.layout.home), scope);

        ui.show_header(&format!("Registering servers ({} scope)", scope));
        for entry in &report.entries {
            let line = format!("{}: {}", entry.name, entry.outcome);
            match &entry.outcome {
                RegistrationOutcome::Registered => ui.success(&line),
                RegistrationOutcome::Skipped(_) => ui.warning(&line),
                RegistrationOutcome::Failed(_) => ui.error(&line),
            }
            if ui.output_mode().shows_detail() {
                ui.show_hint(&entry.launch);
            }
        }

        if report.failed().is_empty() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HostLayout, Scope, Settings};
    use crate::paths::PathRegistry;
    use crate::shell::{Scripted, ScriptedRunner};
    use crate::ui::MockUI;

    fn session(runner: ScriptedRunner) -> Session {
        Session::new(
            Settings::default(),
            HostLayout::new("/home/dev", "/home/dev/src/app"),
            PathRegistry::new(),
            Box::new(runner),
        )
    }

    #[test]
    fn requires_application() {
        let mut ui = MockUI::new();
        let result = RegisterCommand::new(session(ScriptedRunner::new()), RegisterArgs::default())
            .execute(&mut ui)
            .unwrap();
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("claude is not installed"));
    }

    #[test]
    fn project_scope_registers_every_entry() {
        let runner = ScriptedRunner::new()
            .with_tool("claude", "1.0.0")
            .with_tool("uvx", "uv 0.5.0");
        let cmd = RegisterCommand::new(
            session(runner),
            RegisterArgs {
                scope: Some(Scope::Project),
            },
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_success("fetch: registered"));
        assert_eq!(ui.successes().len(), 5);
    }

    #[test]
    fn failed_entry_exits_one() {
        let runner = ScriptedRunner::new()
            .with_tool("claude", "1.0.0")
            .on("mcp add --scope user memory", Scripted::fail(1, "boom"));
        let mut ui = MockUI::new();

        let result = RegisterCommand::new(session(runner), RegisterArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("memory: failed"));
        assert!(ui.has_warning("fetch: skipped (missing capability: uvx)"));
    }
}
