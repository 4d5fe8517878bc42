//! Diff command implementation.
//!
//! The `rigup diff` command lists registrations as seen from two
//! directories (home and the project directory by default) and reports
//! entries visible from only one of them.

use crate::cli::args::DiffArgs;
use crate::error::Result;
use crate::registration::{entry_names, CliRegistryClient};
use crate::status::{diff_registrations, Drift};
use crate::tools::catalog::application;
use crate::tools::CapabilityProbe;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Session};

/// The diff command implementation.
pub struct DiffCommand {
    session: Session,
    args: DiffArgs,
}

impl DiffCommand {
    /// Create a new diff command.
    pub fn new(session: Session, args: DiffArgs) -> Self {
        Self { session, args }
    }
}

impl Command for DiffCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let session = &self.session;
        let runner = session.runner.as_ref();
        if !CapabilityProbe::new(runner, &session.paths).is_present(&application(&session.settings))
        {
            ui.error(&format!("{} is not installed", session.settings.app.command));
            return Ok(CommandResult::failure(1));
        }

        let location_a = self
            .args
            .location_a
            .clone()
            .unwrap_or_else(|| session.layout.home.clone());
        let location_b = self
            .args
            .location_b
            .clone()
            .unwrap_or_else(|| session.layout.project_dir.clone());

        let client =
            CliRegistryClient::new(runner, &session.paths, &session.settings, &session.layout);
        let (list_a, list_b) = diff_registrations(&client, &location_a, &location_b)?;

        let label_a = location_a.display().to_string();
        let label_b = location_b.display().to_string();
        ui.show_header("Registrations by location");
        ui.message(&format!("{}: {}", label_a, entry_names(&list_a).join(", ")));
        ui.message(&format!("{}: {}", label_b, entry_names(&list_b).join(", ")));
        ui.message("");

        let drift = Drift::between(&list_a, &list_b);
        if drift.is_empty() {
            ui.success("Both locations see the same registrations");
        } else {
            ui.warning(&drift.describe(&label_a, &label_b));
        }
        Ok(CommandResult::success())
    }
}
