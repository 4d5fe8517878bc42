//! Run report rendering.

use crate::steps::RunReport;
use crate::ui::UserInterface;

/// Print one line per step, the warnings, and the final verdict.
///
/// A halted run is followed by a "Try running manually:" hint when the
/// failing step has a remedy.
pub fn render_report(report: &RunReport, ui: &mut dyn UserInterface) {
    for step in &report.steps {
        ui.message(&step.summary_line());
    }

    if !report.warnings.is_empty() {
        ui.message("");
        for warning in &report.warnings {
            ui.warning(warning);
        }
    }

    ui.message("");
    match report.halted() {
        Some(step) => {
            ui.error(&report.outcome_line());
            if let Some(remedy) = &step.remedy {
                ui.show_hint(&format!("Try running manually: {}", remedy));
            }
        }
        None if report.warnings.is_empty() && report.degraded().is_empty() => {
            ui.success(&report.outcome_line());
        }
        None => {
            ui.warning(&report.outcome_line());
            for step in &report.steps {
                if let Some(remedy) = &step.remedy {
                    ui.show_hint(&format!("{}: try running manually: {}", step.name, remedy));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::{StepResult, StepStatus};
    use crate::ui::MockUI;
    use std::time::Duration;

    fn step(name: &str, status: StepStatus, detail: Option<&str>, remedy: Option<&str>) -> StepResult {
        StepResult {
            name: name.to_string(),
            status,
            detail: detail.map(str::to_string),
            remedy: remedy.map(str::to_string),
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn clean_run_ends_with_success() {
        let report = RunReport {
            steps: vec![
                step("prerequisites", StepStatus::Skipped, None, None),
                step("runtime", StepStatus::Completed, None, None),
            ],
            ..Default::default()
        };
        let mut ui = MockUI::new();
        render_report(&report, &mut ui);
        assert!(ui.has_message("⊘ prerequisites (already satisfied)"));
        assert!(ui.has_message("✓ runtime"));
        assert!(ui.has_success("Provisioning complete"));
    }

    #[test]
    fn halted_run_shows_remedy_hint() {
        let report = RunReport {
            steps: vec![step(
                "runtime",
                StepStatus::Halted,
                Some("no runtime version could be activated"),
                Some(". ~/.nvm/nvm.sh && nvm install 22"),
            )],
            ..Default::default()
        };
        let mut ui = MockUI::new();
        render_report(&report, &mut ui);
        assert!(ui.has_error("Provisioning halted at 'runtime'"));
        assert!(ui.has_hint("Try running manually: . ~/.nvm/nvm.sh && nvm install 22"));
    }

    #[test]
    fn warnings_are_listed_before_verdict() {
        let report = RunReport {
            steps: vec![step(
                "package-manager",
                StepStatus::Degraded,
                Some("npm is not available"),
                Some("npm install -g pnpm"),
            )],
            warnings: vec!["runtime fell back to 20 (22 unavailable)".to_string()],
            ..Default::default()
        };
        let mut ui = MockUI::new();
        render_report(&report, &mut ui);
        assert_eq!(ui.warnings()[0], "runtime fell back to 20 (22 unavailable)");
        assert!(ui.warnings()[1].starts_with("Provisioning complete with warnings: package-manager degraded"));
        assert!(ui.has_hint("package-manager: try running manually: npm install -g pnpm"));
    }
}
