//! Well-known tool descriptors.

use crate::config::{HostLayout, Settings};
use crate::runtime::RuntimeManager;
use crate::shell::Invocation;

use super::tool::Tool;

/// Pinned runtime manager installer.
pub const NVM_INSTALLER_URL: &str =
    "https://raw.githubusercontent.com/nvm-sh/nvm/v0.40.1/install.sh";

/// Python tool installer (provides `uv` and `uvx`).
pub const UV_INSTALLER_URL: &str = "https://astral.sh/uv/install.sh";

/// `curl`, required for every download.
pub fn curl() -> Tool {
    Tool::executable("curl")
}

/// `git`, required for git-sourced application installs.
pub fn git() -> Tool {
    Tool::executable("git")
}

/// The runtime manager, detected by its shell script.
pub fn nvm(layout: &HostLayout) -> Tool {
    Tool::file("nvm", layout.nvm_dir.join("nvm.sh"))
        .with_version_query(RuntimeManager::new(&layout.nvm_dir).command("nvm --version"))
        .with_install(
            Invocation::shell(format!(
                "curl -fsSL {} | PROFILE=/dev/null bash",
                NVM_INSTALLER_URL
            ))
            .with_env("NVM_DIR", layout.nvm_dir.to_string_lossy()),
        )
}

/// The runtime itself.
pub fn node() -> Tool {
    Tool::executable("node")
}

/// The runtime's bundled package manager.
pub fn npm() -> Tool {
    Tool::executable("npm")
}

/// Alternative package manager installed through npm.
pub fn pnpm() -> Tool {
    Tool::executable("pnpm")
        .with_install(Invocation::new("npm", ["install", "-g", "pnpm"]))
        .with_upgrade(Invocation::new("npm", ["install", "-g", "pnpm@latest"]))
}

/// Python tool runner. Installs into `~/.local/bin` without touching profiles.
pub fn uv(layout: &HostLayout) -> Tool {
    Tool::executable("uv")
        .with_install(
            Invocation::shell(format!("curl -LsSf {} | sh", UV_INSTALLER_URL))
                .with_env("UV_NO_MODIFY_PATH", "1"),
        )
        .with_upgrade(Invocation::new("uv", ["self", "update"]))
        .publishes(layout.home.join(".local/bin"))
}

/// `uvx`, shipped alongside `uv`.
pub fn uvx(layout: &HostLayout) -> Tool {
    Tool::executable("uvx").publishes(layout.home.join(".local/bin"))
}

/// The application, without install actions (those depend on method and source).
pub fn application(settings: &Settings) -> Tool {
    Tool::executable(&settings.app.command)
}

/// Tools shown by the status summary, in display order.
pub fn status_tools(settings: &Settings, layout: &HostLayout) -> Vec<Tool> {
    vec![
        curl(),
        git(),
        nvm(layout),
        node(),
        npm(),
        pnpm(),
        uv(layout),
        uvx(layout),
        application(settings),
    ]
}
