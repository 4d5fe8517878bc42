//! Launch mechanisms and their argument grammars.
//!
//! Each mechanism parses its own command line differently, so the exact
//! argv is fixed here per mechanism:
//!
//! | Mechanism | argv | `--` |
//! |---|---|---|
//! | npx | `npx -y <package> <args>` | must not appear |
//! | npm exec | `npm exec --yes --package=<package> -- <bin> <args>` | required |
//! | uvx | `uvx <package> <args>` | none |
//! | command | `<program> <args>` | none |

use std::path::Path;

use crate::shell::quote;

/// How a registered server is started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launcher {
    /// `npx -y <package>`; npx treats a following `--` as a package argument.
    Npx { package: String },
    /// `npm exec`; the `--` separates npm's flags from the binary's.
    NpmExec { package: String, bin: String },
    /// `uvx <package>`.
    Uvx { package: String },
    /// A plain executable.
    Command { program: String },
}

impl Launcher {
    /// Whether the mechanism resolves packages relative to its working
    /// directory (and can therefore pick up unrelated project manifests).
    pub fn resolves_from_cwd(&self) -> bool {
        matches!(self, Launcher::Npx { .. } | Launcher::NpmExec { .. })
    }

    /// Program name the launch depends on.
    pub fn program(&self) -> &str {
        match self {
            Launcher::Npx { .. } => "npx",
            Launcher::NpmExec { .. } => "npm",
            Launcher::Uvx { .. } => "uvx",
            Launcher::Command { program } => program,
        }
    }

    /// Full argv for this mechanism with pass-through `args`.
    pub fn argv(&self, args: &[String]) -> Vec<String> {
        let mut argv: Vec<String> = match self {
            Launcher::Npx { package } => vec!["npx".into(), "-y".into(), package.clone()],
            Launcher::NpmExec { package, bin } => vec![
                "npm".into(),
                "exec".into(),
                "--yes".into(),
                format!("--package={}", package),
                "--".into(),
                bin.clone(),
            ],
            Launcher::Uvx { package } => vec!["uvx".into(), package.clone()],
            Launcher::Command { program } => vec![program.clone()],
        };
        argv.extend(args.iter().cloned());
        argv
    }
}

/// The command line handed to the registry client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    /// Program to run.
    pub program: String,
    /// Its arguments.
    pub args: Vec<String>,
}

impl LaunchCommand {
    /// Run `argv` as-is.
    pub fn direct(argv: Vec<String>) -> Self {
        let mut words = argv.into_iter();
        let program = words.next().unwrap_or_default();
        Self {
            program,
            args: words.collect(),
        }
    }

    /// Run `argv` from `dir`, whatever directory the launcher is started in.
    pub fn pinned(dir: &Path, argv: &[String]) -> Self {
        let words: Vec<String> = argv.iter().map(|w| quote(w)).collect();
        let script = format!(
            "cd {} && exec {}",
            single_quote(&dir.to_string_lossy()),
            words.join(" ")
        );
        Self {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script],
        }
    }

    /// Program followed by arguments.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Shell-quoted rendering, stable for comparisons.
    pub fn display(&self) -> String {
        self.argv()
            .iter()
            .map(|w| quote(w))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Always single-quote, escaping embedded quotes.
fn single_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn npx_has_no_separator() {
        let argv = Launcher::Npx {
            package: "@modelcontextprotocol/server-memory".into(),
        }
        .argv(&args(&["--flag"]));
        assert_eq!(
            argv,
            args(&["npx", "-y", "@modelcontextprotocol/server-memory", "--flag"])
        );
        assert!(!argv.contains(&"--".to_string()));
    }

    #[test]
    fn npm_exec_requires_separator_before_bin() {
        let argv = Launcher::NpmExec {
            package: "@playwright/mcp@latest".into(),
            bin: "mcp-server-playwright".into(),
        }
        .argv(&[]);
        assert_eq!(
            argv,
            args(&[
                "npm",
                "exec",
                "--yes",
                "--package=@playwright/mcp@latest",
                "--",
                "mcp-server-playwright"
            ])
        );
    }

    #[test]
    fn uvx_and_command_are_plain() {
        assert_eq!(
            Launcher::Uvx {
                package: "mcp-server-fetch".into()
            }
            .argv(&[]),
            args(&["uvx", "mcp-server-fetch"])
        );
        assert_eq!(
            Launcher::Command {
                program: "/opt/srv".into()
            }
            .argv(&args(&["--port", "1"])),
            args(&["/opt/srv", "--port", "1"])
        );
    }

    #[test]
    fn only_package_resolvers_need_pinning() {
        assert!(Launcher::Npx { package: "p".into() }.resolves_from_cwd());
        assert!(Launcher::NpmExec {
            package: "p".into(),
            bin: "b".into()
        }
        .resolves_from_cwd());
        assert!(!Launcher::Uvx { package: "p".into() }.resolves_from_cwd());
    }

    #[test]
    fn pinned_wraps_in_sh() {
        let cmd = LaunchCommand::pinned(
            Path::new("/home/dev"),
            &args(&["npx", "-y", "@modelcontextprotocol/server-memory"]),
        );
        assert_eq!(cmd.program, "sh");
        assert_eq!(
            cmd.args,
            args(&[
                "-c",
                "cd '/home/dev' && exec npx -y @modelcontextprotocol/server-memory"
            ])
        );
    }

    #[test]
    fn pinned_escapes_quotes_in_home() {
        let cmd = LaunchCommand::pinned(Path::new("/home/o'neil"), &args(&["npx", "-y", "p"]));
        assert_eq!(cmd.args[1], r"cd '/home/o'\''neil' && exec npx -y p");
    }

    #[test]
    fn direct_splits_program() {
        let cmd = LaunchCommand::direct(args(&["uvx", "mcp-server-fetch"]));
        assert_eq!(cmd.program, "uvx");
        assert_eq!(cmd.display(), "uvx mcp-server-fetch");
    }
}
