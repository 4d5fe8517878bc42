//! Run command implementation.
//!
//! The `rigup run` command executes the full provisioning pipeline.

use crate::cli::args::RunArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::provision::{provision, PipelineOptions};
use crate::shell::ShellType;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Session};

/// The run command implementation.
pub struct RunCommand {
    session: Session,
    args: RunArgs,
    shell: ShellType,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(session: Session, args: RunArgs) -> Self {
        Self {
            session,
            args,
            shell: ShellType::detect(),
        }
    }

    /// Override the detected shell.
    pub fn with_shell(mut self, shell: ShellType) -> Self {
        self.shell = shell;
        self
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Session settings with this invocation's flags applied.
    pub fn effective_settings(&self) -> Settings {
        let mut settings = self.session.settings.clone();
        if self.args.yes {
            settings.auto_confirm = true;
        }
        if let Some(scope) = self.args.scope {
            settings.registration_scope = scope;
        }
        settings
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = self.effective_settings();
        let options = PipelineOptions {
            upgrade: self.args.upgrade,
            shell: self.shell,
        };

        ui.show_header("rigup");
        let report = provision(
            self.session.runner.as_ref(),
            self.session.paths.clone(),
            &settings,
            &self.session.layout,
            ui,
            options,
        );
        tracing::debug!(
            "run finished in {:.1}s: {}",
            report.duration.as_secs_f64(),
            report.outcome_line()
        );

        match report.exit_code() {
            0 => Ok(CommandResult::success()),
            code => Ok(CommandResult::failure(code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HostLayout, Scope};
    use crate::paths::PathRegistry;
    use crate::shell::{Scripted, ScriptedRunner};
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn session(temp: &TempDir, runner: ScriptedRunner) -> Session {
        let settings = Settings {
            register_servers: false,
            ..Settings::default()
        };
        let layout = HostLayout::new(temp.path(), temp.path().join("work"));
        Session::new(settings, layout, PathRegistry::new(), Box::new(runner))
    }

    #[test]
    fn missing_curl_without_brew_exits_one() {
        let temp = TempDir::new().unwrap();
        let cmd = RunCommand::new(session(&temp, ScriptedRunner::new()), RunArgs::default())
            .with_shell(ShellType::Bash);
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("Provisioning halted at 'prerequisites'"));
        assert!(ui.has_hint("apt-get install -y curl"));
    }

    #[test]
    fn flags_override_session_settings() {
        let temp = TempDir::new().unwrap();
        let args = RunArgs {
            yes: true,
            upgrade: false,
            scope: Some(Scope::Project),
        };
        let cmd = RunCommand::new(session(&temp, ScriptedRunner::new()), args);

        let settings = cmd.effective_settings();
        assert!(settings.auto_confirm);
        assert_eq!(settings.registration_scope, Scope::Project);

        let plain = RunCommand::new(session(&temp, ScriptedRunner::new()), RunArgs::default());
        assert_eq!(plain.effective_settings().registration_scope, Scope::User);
    }

    #[test]
    fn satisfied_host_exits_zero() {
        let temp = TempDir::new().unwrap();
        let nvm_sh = temp.path().join(".nvm/nvm.sh");
        let runner = ScriptedRunner::new()
            .with_tool("curl", "curl 8.5.0")
            .with_tool("node", "v22.11.0")
            .with_tool("npm", "10.9.0")
            .with_tool("pnpm", "9.12.0")
            .with_tool("uv", "uv 0.5.0")
            .with_tool("uvx", "uv 0.5.0")
            .with_tool("claude", "1.0.0")
            .with_file(nvm_sh)
            .on("nvm version default", Scripted::ok("v22.11.0\n"));
        let cmd = RunCommand::new(session(&temp, runner), RunArgs::default())
            .with_shell(ShellType::Bash);
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 0);
        assert!(ui.has_message("⊘ application (already satisfied)"));
    }
}
