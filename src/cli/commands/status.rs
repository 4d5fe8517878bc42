//! Status command implementation.
//!
//! The `rigup status` command shows which tools are installed and their
//! versions, without changing anything.

use crate::error::Result;
use crate::status::StatusReport;
use crate::tools::catalog::status_tools;
use crate::tools::CapabilityProbe;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Session};

/// The status command implementation.
pub struct StatusCommand {
    session: Session,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let probe = CapabilityProbe::new(self.session.runner.as_ref(), &self.session.paths);
        let report = StatusReport::collect(
            &probe,
            &status_tools(&self.session.settings, &self.session.layout),
        );

        ui.show_header("rigup - Status");
        for line in report.lines() {
            ui.message(&line);
        }

        let missing = report.missing();
        if !missing.is_empty() {
            ui.message("");
            ui.show_hint(&format!(
                "Run `rigup run` to install {}",
                missing.join(", ")
            ));
        }

        Ok(CommandResult::success())
    }
}
