//! Purge command implementation.
//!
//! The `rigup purge` command renames the project-local registry document to
//! a timestamped backup so user-scope registrations take effect.

use crate::cli::args::PurgeArgs;
use crate::error::Result;
use crate::status::purge;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Session};

/// The purge command implementation.
pub struct PurgeCommand {
    session: Session,
    args: PurgeArgs,
}

impl PurgeCommand {
    /// Create a new purge command.
    pub fn new(session: Session, args: PurgeArgs) -> Self {
        Self { session, args }
    }
}

impl Command for PurgeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = &self.session.settings;
        let document = self.session.layout.project_document(settings);
        if !document.is_file() {
            ui.message(&format!("No project config at {}", document.display()));
            return Ok(CommandResult::success());
        }

        let auto_confirm = self.args.yes || settings.auto_confirm;
        let outcome = purge(&[document], ui, auto_confirm)?;
        if outcome.declined {
            ui.warning("Purge declined; nothing was moved");
            return Ok(CommandResult::failure(1));
        }
        for moved in &outcome.moved {
            ui.success(&format!(
                "Moved {} to {}",
                moved.original.display(),
                moved.backup.display()
            ));
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HostLayout, Settings};
    use crate::paths::PathRegistry;
    use crate::shell::ScriptedRunner;
    use crate::status::PURGE_PROMPT;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Session) {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("proj");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join(".mcp.json"), "{}").unwrap();
        let session = Session::new(
            Settings::default(),
            HostLayout::new(temp.path(), project),
            PathRegistry::new(),
            Box::new(ScriptedRunner::new()),
        );
        (temp, session)
    }

    #[test]
    fn declined_prompt_keeps_document() {
        let (temp, session) = setup();
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.set_confirm_response(PURGE_PROMPT, false);

        let result = PurgeCommand::new(session, PurgeArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(temp.path().join("proj/.mcp.json").exists());
    }

    #[test]
    fn yes_moves_without_asking() {
        let (temp, session) = setup();
        let mut ui = MockUI::new();
        ui.set_interactive(true);

        let result = PurgeCommand::new(session, PurgeArgs { yes: true })
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.prompts_shown().is_empty());
        assert!(!temp.path().join("proj/.mcp.json").exists());
        assert!(ui.has_success("Moved"));
    }
}
