//! Shared state threaded through every provisioning step.

use std::path::Path;

use crate::config::{HostLayout, Settings};
use crate::error::Result;
use crate::paths::PathRegistry;
use crate::shell::{CommandResult, CommandRunner, Invocation};
use crate::tools::{CapabilityProbe, ProbeResult, Tool};
use crate::ui::UserInterface;

/// Everything a step may read or mutate.
///
/// The path registry is the only in-memory state shared between steps;
/// everything else a step produces lives on the host and is re-probed by
/// whichever later step needs it.
pub struct StepContext<'a> {
    /// Command capability interface.
    pub runner: &'a dyn CommandRunner,
    /// Session search path.
    pub paths: PathRegistry,
    /// Effective settings.
    pub settings: &'a Settings,
    /// Host locations.
    pub layout: &'a HostLayout,
    /// Status stream.
    pub ui: &'a mut dyn UserInterface,
    warnings: Vec<String>,
}

impl<'a> StepContext<'a> {
    /// Create a context.
    pub fn new(
        runner: &'a dyn CommandRunner,
        paths: PathRegistry,
        settings: &'a Settings,
        layout: &'a HostLayout,
        ui: &'a mut dyn UserInterface,
    ) -> Self {
        Self {
            runner,
            paths,
            settings,
            layout,
            ui,
            warnings: Vec::new(),
        }
    }

    /// A probe over the current search path.
    pub fn probe(&self) -> CapabilityProbe<'_> {
        CapabilityProbe::new(self.runner, &self.paths)
    }

    /// Probe one tool.
    pub fn probe_tool(&self, tool: &Tool) -> ProbeResult {
        self.probe().probe(tool)
    }

    /// Whether a tool is present (no version query).
    pub fn has(&self, tool: &Tool) -> bool {
        self.probe().is_present(tool)
    }

    /// Prepare an invocation with the session `PATH` and `NVM_DIR`.
    pub fn prepare(&self, invocation: &Invocation) -> Invocation {
        let prepared = invocation.clone().with_search_path(&self.paths);
        if prepared.env_var("NVM_DIR").is_some() {
            prepared
        } else {
            prepared.with_env("NVM_DIR", self.layout.nvm_dir.to_string_lossy())
        }
    }

    /// Run an invocation; non-zero exits are reported in the result.
    pub fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        self.runner.run(&self.prepare(invocation))
    }

    /// Run an invocation and require a zero exit.
    pub fn run_checked(&self, invocation: &Invocation) -> Result<CommandResult> {
        let prepared = self.prepare(invocation);
        self.runner.run(&prepared)?.into_checked(invocation)
    }

    /// Make `dir` searchable for the rest of the run.
    pub fn publish(&mut self, dir: &Path) {
        if self.paths.ensure_searchable(dir) {
            tracing::debug!("added {} to search path", dir.display());
        }
    }

    /// Make every bin directory of `tool` searchable.
    pub fn publish_tool(&mut self, tool: &Tool) {
        for dir in &tool.bin_dirs {
            self.publish(dir);
        }
    }

    /// Record a soft mismatch or other non-fatal note for the run report.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("{}", message);
        self.warnings.push(message);
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Take the recorded warnings, leaving none behind.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ScriptedRunner;
    use crate::ui::MockUI;

    #[test]
    fn prepare_adds_path_and_nvm_dir() {
        let runner = ScriptedRunner::new();
        let settings = Settings::default();
        let layout = HostLayout::new("/home/dev", "/work");
        let mut ui = MockUI::new();
        let mut ctx = StepContext::new(&runner, PathRegistry::new(), &settings, &layout, &mut ui);
        ctx.publish(Path::new("/home/dev/.local/bin"));

        let inv = ctx.prepare(&Invocation::new("uv", ["--version"]));
        assert_eq!(inv.env_var("PATH"), Some("/home/dev/.local/bin"));
        assert_eq!(inv.env_var("NVM_DIR"), Some("/home/dev/.nvm"));
    }

    #[test]
    fn prepare_keeps_explicit_nvm_dir() {
        let runner = ScriptedRunner::new();
        let settings = Settings::default();
        let layout = HostLayout::new("/home/dev", "/work");
        let mut ui = MockUI::new();
        let ctx = StepContext::new(&runner, PathRegistry::new(), &settings, &layout, &mut ui);

        let inv = ctx.prepare(&Invocation::new("bash", ["-c", "true"]).with_env("NVM_DIR", "/opt/nvm"));
        assert_eq!(inv.env_var("NVM_DIR"), Some("/opt/nvm"));
    }

    #[test]
    fn warnings_accumulate_and_drain() {
        let runner = ScriptedRunner::new();
        let settings = Settings::default();
        let layout = HostLayout::new("/home/dev", "/work");
        let mut ui = MockUI::new();
        let mut ctx = StepContext::new(&runner, PathRegistry::new(), &settings, &layout, &mut ui);
        ctx.warn("first");
        ctx.warn("second");
        assert_eq!(ctx.warnings().len(), 2);
        assert_eq!(ctx.take_warnings(), vec!["first", "second"]);
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn run_checked_reports_unprepared_command_as_remedy() {
        let runner = ScriptedRunner::new()
            .with_tool("npm", "10.8.2")
            .on("install -g pnpm", crate::shell::Scripted::fail(1, "EACCES"));
        let settings = Settings::default();
        let layout = HostLayout::new("/home/dev", "/work");
        let mut ui = MockUI::new();
        let ctx = StepContext::new(&runner, PathRegistry::new(), &settings, &layout, &mut ui);

        let err = ctx
            .run_checked(&Invocation::new("npm", ["install", "-g", "pnpm"]))
            .unwrap_err();
        assert_eq!(err.remedy(), Some("npm install -g pnpm"));
    }
}
