//! Repair command implementation.
//!
//! The `rigup repair` command copies user-scope registry entries that the
//! project document lacks into it, leaving existing entries alone.

use crate::error::Result;
use crate::status::repair_merge;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Session};

/// The repair command implementation.
pub struct RepairCommand {
    session: Session,
}

impl RepairCommand {
    /// Create a new repair command.
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

impl Command for RepairCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = &self.session.settings;
        let user = self.session.layout.user_document(settings);
        let project = self.session.layout.project_document(settings);

        if !project.is_file() {
            ui.message(&format!("No project config at {}", project.display()));
            return Ok(CommandResult::success());
        }

        let outcome = repair_merge(&user, &project)?;
        if outcome.written {
            ui.success(&format!(
                "Added {} to {}",
                outcome.inserted.join(", "),
                project.display()
            ));
        } else {
            ui.success("Project config already has every user entry");
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
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn session(temp: &TempDir) -> Session {
        Session::new(
            Settings::default(),
            HostLayout::new(temp.path(), temp.path().join("proj")),
            PathRegistry::new(),
            Box::new(ScriptedRunner::new()),
        )
    }

    #[test]
    fn inserts_missing_and_keeps_existing() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("proj")).unwrap();
        fs::write(
            temp.path().join(".claude.json"),
            r#"{"mcpServers": {"memory": {"command": "npx"}, "local": {"command": "user"}}}"#,
        )
        .unwrap();
        let project = temp.path().join("proj/.mcp.json");
        fs::write(&project, r#"{"mcpServers": {"local": {"command": "mine"}}}"#).unwrap();
        let mut ui = MockUI::new();

        RepairCommand::new(session(&temp)).execute(&mut ui).unwrap();

        assert!(ui.has_success("Added memory"));
        let written = fs::read_to_string(&project).unwrap();
        assert!(written.contains("\"mine\""));
        assert!(written.contains("\"memory\""));
    }

    #[test]
    fn missing_project_document_is_left_alone() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        let result = RepairCommand::new(session(&temp)).execute(&mut ui).unwrap();
        assert!(result.success);
        assert!(ui.has_message("No project config"));
        assert!(!temp.path().join("proj/.mcp.json").exists());
    }
}
