//! Registration and registry document behavior through the public API.

use std::fs;
use std::path::Path;

use rigup::config::{HostLayout, Scope, Settings};
use rigup::paths::PathRegistry;
use rigup::registration::{default_catalog, CliRegistryClient, RegistrationManager};
use rigup::shell::ScriptedRunner;
use rigup::status::{purge, repair_merge, PURGE_PROMPT};
use rigup::tools::CapabilityProbe;
use rigup::ui::MockUI;
use tempfile::TempDir;

/// `mcp add` lines issued when registering the default catalog from `project_dir`.
fn registered_from(project_dir: &str) -> Vec<String> {
    let runner = ScriptedRunner::new()
        .with_tool("claude", "1.0.0")
        .with_tool("uvx", "uv 0.5.0");
    let paths = PathRegistry::new();
    let settings = Settings::default();
    let layout = HostLayout::new("/home/dev", project_dir);

    let client = CliRegistryClient::new(&runner, &paths, &settings, &layout);
    let probe = CapabilityProbe::new(&runner, &paths);
    let manager = RegistrationManager::new(&client, probe, &layout.home);
    let report = manager.register_all(&default_catalog(&layout.home), Scope::User);
    assert!(report.is_clean(), "{:?}", report.lines());

    runner
        .calls()
        .iter()
        .filter(|c| c.args.get(1).map(String::as_str) == Some("add"))
        .map(|c| {
            assert_eq!(c.cwd.as_deref(), Some(Path::new("/home/dev")));
            c.display()
        })
        .collect()
}

#[test]
fn registration_is_independent_of_working_directory() {
    let from_home = registered_from("/home/dev");
    let from_nested = registered_from("/home/dev/src/monorepo/packages/web/node_modules/.bin");

    assert_eq!(from_home.len(), 5);
    assert_eq!(from_home, from_nested);
    assert!(from_home.iter().all(|l| !l.contains("monorepo")));
}

#[test]
fn cwd_sensitive_launchers_are_pinned_to_home() {
    let lines = registered_from("/work");
    let npx: Vec<&String> = lines.iter().filter(|l| l.contains("npx -y")).collect();
    assert_eq!(npx.len(), 3);
    for line in npx {
        assert!(line.contains("-- sh -c 'cd '\\''/home/dev'\\'' && exec npx -y "));
    }
    let playwright = lines.iter().find(|l| l.contains("playwright")).unwrap();
    assert!(playwright
        .contains("npm exec --yes --package=@playwright/mcp@latest -- mcp-server-playwright"));
    let fetch = lines.iter().find(|l| l.contains(" fetch ")).unwrap();
    assert!(fetch.ends_with("-- uvx mcp-server-fetch"));
}

#[test]
fn repair_never_overwrites_project_entries() {
    let temp = TempDir::new().unwrap();
    let user = temp.path().join(".claude.json");
    let project = temp.path().join(".mcp.json");
    fs::write(
        &user,
        r#"{"numStartups": 3, "mcpServers": {"a": {"command": "user-a"}, "b": {"command": "user-b"}}}"#,
    )
    .unwrap();
    fs::write(
        &project,
        r#"{"mcpServers": {"b": {"command": "project-b"}}, "other": true}"#,
    )
    .unwrap();

    let outcome = repair_merge(&user, &project).unwrap();
    assert_eq!(outcome.inserted, vec!["a"]);
    assert!(outcome.written);

    let merged: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&project).unwrap()).unwrap();
    assert_eq!(merged["mcpServers"]["a"]["command"], "user-a");
    assert_eq!(merged["mcpServers"]["b"]["command"], "project-b");
    assert_eq!(merged["other"], true);

    let modified = fs::metadata(&project).unwrap().modified().unwrap();
    let again = repair_merge(&user, &project).unwrap();
    assert!(!again.written);
    assert_eq!(fs::metadata(&project).unwrap().modified().unwrap(), modified);
}

#[test]
fn purge_renames_and_keeps_content() {
    let temp = TempDir::new().unwrap();
    let document = temp.path().join(".mcp.json");
    let content = r#"{"mcpServers": {"local": {"command": "x"}}}"#;
    fs::write(&document, content).unwrap();

    let mut ui = MockUI::new();
    ui.set_interactive(true);
    ui.set_confirm_response(PURGE_PROMPT, true);
    let outcome = purge(&[document.clone()], &mut ui, false).unwrap();

    assert_eq!(ui.prompts_shown(), &[PURGE_PROMPT]);
    assert!(!document.exists());
    assert_eq!(outcome.moved.len(), 1);
    assert_eq!(fs::read_to_string(&outcome.moved[0].backup).unwrap(), content);
}

#[test]
fn non_interactive_purge_does_not_prompt() {
    let temp = TempDir::new().unwrap();
    let document = temp.path().join(".mcp.json");
    fs::write(&document, "{}").unwrap();
    let missing = temp.path().join("absent.json");

    let mut ui = MockUI::new();
    let outcome = purge(&[document.clone(), missing], &mut ui, false).unwrap();

    assert!(ui.prompts_shown().is_empty());
    assert_eq!(outcome.moved.len(), 1);
    assert!(outcome.moved[0].backup.exists());
}
