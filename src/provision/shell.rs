//! Shell startup file steps.

use std::path::PathBuf;

use crate::error::Result;
use crate::paths::{home_relative, path_line, PersistenceTarget};
use crate::scrub::{find_stale, scrub, StaleAlias};
use crate::shell::startup_files;
use crate::steps::{ProvisioningStep, Readiness, StepContext};

/// Removes `alias <app>=...` lines that shadow the installed application.
#[derive(Debug, Default)]
pub struct StaleAliasStep;

impl StaleAliasStep {
    /// Step name.
    pub const NAME: &'static str = "stale-aliases";
}

impl ProvisioningStep for StaleAliasStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fatal(&self) -> bool {
        false
    }

    fn check(&self, ctx: &mut StepContext<'_>) -> Readiness {
        let matcher = StaleAlias::new(&ctx.settings.app.command);
        match find_stale(&startup_files(&ctx.layout.home), &matcher) {
            Ok(stale) if stale.is_empty() => Readiness::Satisfied,
            Ok(stale) => {
                let names: Vec<String> = stale
                    .iter()
                    .map(|p| home_relative(p, &ctx.layout.home))
                    .collect();
                Readiness::needs(format!("stale alias in {}", names.join(", ")))
            }
            Err(e) => Readiness::needs(e.to_string()),
        }
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<()> {
        let matcher = StaleAlias::new(&ctx.settings.app.command);
        for file in scrub(&startup_files(&ctx.layout.home), &matcher)? {
            tracing::debug!(
                "removed {} alias line(s) from {} (backup {})",
                file.removed,
                file.path.display(),
                file.backup.display()
            );
        }
        Ok(())
    }
}

/// Persists this run's search path additions into the shell startup file.
#[derive(Debug)]
pub struct PersistPathStep {
    startup_file: PathBuf,
    nvm_activation: bool,
}

impl PersistPathStep {
    /// Step name.
    pub const NAME: &'static str = "persist-path";

    /// Persist into `startup_file`; `nvm_activation` adds the runtime
    /// manager's activation lines.
    pub fn new(startup_file: PathBuf, nvm_activation: bool) -> Self {
        Self {
            startup_file,
            nvm_activation,
        }
    }

    fn target(&self, ctx: &StepContext<'_>) -> PersistenceTarget {
        let home = &ctx.layout.home;
        let mut target = PersistenceTarget::new(&self.startup_file);
        for dir in ctx.paths.run_additions() {
            // Version-specific runtime dirs go stale on upgrade; nvm.sh
            // activation covers them.
            if self.nvm_activation && dir.starts_with(&ctx.layout.nvm_dir) {
                continue;
            }
            target = target.line(path_line(dir, home));
        }
        if self.nvm_activation {
            target = target
                .line(format!(
                    "export NVM_DIR=\"{}\"",
                    home_relative(&ctx.layout.nvm_dir, home)
                ))
                .line(r#"[ -s "$NVM_DIR/nvm.sh" ] && . "$NVM_DIR/nvm.sh""#);
        }
        target
    }
}

impl ProvisioningStep for PersistPathStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fatal(&self) -> bool {
        false
    }

    fn check(&self, ctx: &mut StepContext<'_>) -> Readiness {
        match self.target(ctx).missing(&ctx.layout.home) {
            Ok(missing) if missing.is_empty() => Readiness::Satisfied,
            Ok(missing) => Readiness::needs(format!(
                "{} line(s) missing from {}",
                missing.len(),
                home_relative(&self.startup_file, &ctx.layout.home)
            )),
            Err(e) => Readiness::needs(e.to_string()),
        }
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<()> {
        self.target(ctx).apply(&ctx.layout.home)?;
        Ok(())
    }
}
