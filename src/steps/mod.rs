//! Convergent step execution.
//!
//! - [`ProvisioningStep`] - check, apply, verify for one unit of work
//! - [`StepContext`] - runner, search path, settings and status stream
//! - [`StepExecutor`] - runs steps in order and produces a [`RunReport`]
//!
//! # Example
//!
//! ```
//! use rigup::config::{HostLayout, Settings};
//! use rigup::error::Result;
//! use rigup::paths::PathRegistry;
//! use rigup::shell::ScriptedRunner;
//! use rigup::steps::{ProvisioningStep, Readiness, StepContext, StepExecutor, StepStatus};
//! use rigup::ui::MockUI;
//!
//! struct AlwaysDone;
//!
//! impl ProvisioningStep for AlwaysDone {
//!     fn name(&self) -> &str { "noop" }
//!     fn fatal(&self) -> bool { false }
//!     fn check(&self, _ctx: &mut StepContext<'_>) -> Readiness { Readiness::Satisfied }
//!     fn apply(&self, _ctx: &mut StepContext<'_>) -> Result<()> { Ok(()) }
//! }
//!
//! let runner = ScriptedRunner::new();
//! let settings = Settings::default();
//! let layout = HostLayout::new("/home/dev", "/work");
//! let mut ui = MockUI::new();
//! let mut ctx = StepContext::new(&runner, PathRegistry::new(), &settings, &layout, &mut ui);
//!
//! let steps: Vec<Box<dyn ProvisioningStep>> = vec![Box::new(AlwaysDone)];
//! let report = StepExecutor::new().run(&steps, &mut ctx);
//! assert_eq!(report.steps[0].status, StepStatus::Skipped);
//! assert_eq!(report.exit_code(), 0);
//! ```

pub mod context;
pub mod executor;

pub use context::StepContext;
pub use executor::{ProvisioningStep, Readiness, RunReport, StepExecutor, StepResult, StepStatus};
