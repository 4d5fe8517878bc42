//! Scripted command runner for testing.
//!
//! `ScriptedRunner` implements [`CommandRunner`] without touching the host.
//! Tools are "present" when registered with [`ScriptedRunner::with_tool`];
//! invocations matching a rule consume scripted results in order, and a
//! result can make new tools appear (an install that succeeded).
//!
//! # Example
//!
//! ```
//! use rigup::shell::{CommandRunner, Invocation, Scripted, ScriptedRunner};
//!
//! let runner = ScriptedRunner::new()
//!     .with_tool("npm", "10.8.2")
//!     .on("npm install -g pnpm", Scripted::ok("").provides("pnpm", "9.12.0"));
//!
//! assert!(runner.locate("pnpm", &[]).is_none());
//! let result = runner.run(&Invocation::new("npm", ["install", "-g", "pnpm"])).unwrap();
//! assert!(result.success);
//! assert!(runner.locate("pnpm", &[]).is_some());
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use crate::error::{RigupError, Result};

use super::command::{CommandResult, CommandRunner, Invocation};

/// Directory reported by `locate` for scripted tools.
pub const SCRIPTED_BIN: &str = "/scripted/bin";

/// One scripted outcome plus its side effects on the fake host.
#[derive(Debug, Clone)]
pub struct Scripted {
    result: CommandResult,
    provides: Vec<(String, Option<String>)>,
    removes: Vec<String>,
    creates: Vec<PathBuf>,
}

impl Scripted {
    /// Exit 0 with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            result: CommandResult::success(stdout),
            provides: Vec::new(),
            removes: Vec::new(),
            creates: Vec::new(),
        }
    }

    /// Exit with `code` and the given stderr.
    pub fn fail(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            result: CommandResult::failure(Some(code), stderr),
            provides: Vec::new(),
            removes: Vec::new(),
            creates: Vec::new(),
        }
    }

    /// After running, `tool` is present and reports `version`.
    pub fn provides(mut self, tool: &str, version: &str) -> Self {
        self.provides
            .push((tool.to_string(), Some(version.to_string())));
        self
    }

    /// After running, `tool` is no longer present.
    pub fn removes(mut self, tool: &str) -> Self {
        self.removes.push(tool.to_string());
        self
    }

    /// After running, `path` exists as a file.
    pub fn creates(mut self, path: impl Into<PathBuf>) -> Self {
        self.creates.push(path.into());
        self
    }
}

#[derive(Debug)]
struct Rule {
    pattern: String,
    queue: VecDeque<Scripted>,
    last: Scripted,
}

/// Command runner with scripted results and a fake tool inventory.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    tools: RefCell<HashMap<String, Option<String>>>,
    files: RefCell<HashSet<PathBuf>>,
    rules: RefCell<Vec<Rule>>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    /// Create a runner with no tools and no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `tool` present; `<tool> --version` prints `version`.
    pub fn with_tool(self, tool: &str, version: &str) -> Self {
        self.tools
            .borrow_mut()
            .insert(tool.to_string(), Some(version.to_string()));
        self
    }

    /// Mark `tool` present but with a failing version query.
    pub fn with_unversioned_tool(self, tool: &str) -> Self {
        self.tools.borrow_mut().insert(tool.to_string(), None);
        self
    }

    /// Mark `path` as an existing file.
    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        self.files.borrow_mut().insert(path.into());
        self
    }

    /// Answer invocations whose display line contains `pattern`.
    ///
    /// Rules are matched in registration order.
    pub fn on(self, pattern: &str, result: Scripted) -> Self {
        self.on_sequence(pattern, vec![result])
    }

    /// Answer with each result in turn; the last one repeats.
    pub fn on_sequence(self, pattern: &str, results: Vec<Scripted>) -> Self {
        let mut queue: VecDeque<Scripted> = results.into();
        let last = queue
            .back()
            .cloned()
            .unwrap_or_else(|| Scripted::fail(127, "no scripted result"));
        if queue.len() == 1 {
            queue.clear();
        }
        self.rules.borrow_mut().push(Rule {
            pattern: pattern.to_string(),
            queue,
            last,
        });
        self
    }

    /// All invocations seen so far.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Display lines of all invocations seen so far.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(Invocation::display).collect()
    }

    /// Number of invocations whose display line contains `pattern`.
    pub fn count(&self, pattern: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.display().contains(pattern))
            .count()
    }

    /// Whether any invocation contained `pattern`.
    pub fn ran(&self, pattern: &str) -> bool {
        self.count(pattern) > 0
    }

    /// Whether `tool` is currently present.
    pub fn has_tool(&self, tool: &str) -> bool {
        self.tools.borrow().contains_key(tool)
    }

    fn apply(&self, scripted: &Scripted) -> CommandResult {
        if scripted.result.success {
            let mut tools = self.tools.borrow_mut();
            for (tool, version) in &scripted.provides {
                tools.insert(tool.clone(), version.clone());
            }
            for tool in &scripted.removes {
                tools.remove(tool);
            }
            self.files
                .borrow_mut()
                .extend(scripted.creates.iter().cloned());
        }
        scripted.result.clone()
    }

    fn scripted_for(&self, line: &str) -> Option<Scripted> {
        let mut rules = self.rules.borrow_mut();
        let rule = rules.iter_mut().find(|r| line.contains(&r.pattern))?;
        Some(rule.queue.pop_front().unwrap_or_else(|| rule.last.clone()))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        self.calls.borrow_mut().push(invocation.clone());
        let line = invocation.display();

        if let Some(scripted) = self.scripted_for(&line) {
            return Ok(self.apply(&scripted));
        }

        let tools = self.tools.borrow();
        match tools.get(&invocation.program) {
            Some(version) if invocation.args == ["--version"] => Ok(match version {
                Some(v) => CommandResult::success(v.clone()),
                None => CommandResult::failure(Some(1), "unknown option"),
            }),
            Some(_) => Ok(CommandResult::success("")),
            None if invocation.program == "bash" || invocation.program == "sh" => {
                Ok(CommandResult::failure(Some(127), "command not found"))
            }
            None => Err(RigupError::CommandFailed {
                command: line,
                code: None,
            }),
        }
    }

    fn locate(&self, program: &str, _search_path: &[PathBuf]) -> Option<PathBuf> {
        self.tools
            .borrow()
            .contains_key(program)
            .then(|| PathBuf::from(SCRIPTED_BIN).join(program))
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.borrow().contains(path)
    }
}
