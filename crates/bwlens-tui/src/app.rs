//! Application state management.

use crate::config::Config;
use bwlens_core::{Credential, Session};
use std::path::PathBuf;

/// Application state.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// Showing the credential list.
    Running,
    /// Application should quit.
    Quit,
}

/// Input mode for the application.
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Typing the path of an export to load.
    PathEntry,
}

/// Main application model.
pub struct App {
    /// Current application state.
    pub state: AppState,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Loaded credentials and their derived views.
    pub session: Session,
    /// Display settings.
    pub config: Config,
    /// Whether passwords are hidden behind the mask.
    pub masked: bool,
    /// Last successfully loaded export.
    pub export_path: Option<PathBuf>,
    /// Index of the selected row.
    pub selected_index: usize,
    /// Path being typed in path entry mode.
    pub path_input: String,
    /// Error message to display.
    pub error_message: Option<String>,
}

impl App {
    /// Create a new application instance.
    pub fn new(config: Config) -> Self {
        Self {
            state: AppState::Running,
            input_mode: InputMode::Normal,
            session: Session::new(),
            masked: config.start_masked,
            config,
            export_path: None,
            selected_index: 0,
            path_input: String::new(),
            error_message: None,
        }
    }

    /// Load an export, keeping the current list if it fails.
    pub fn load(&mut self, path: PathBuf) -> bool {
        match self.session.load_path(&path) {
            Ok(_) => {
                self.export_path = Some(path);
                self.selected_index = 0;
                self.error_message = None;
                true
            }
            Err(e) => {
                self.error_message = Some(e.user_message().to_string());
                false
            }
        }
    }

    /// Start typing a path to load.
    pub fn start_path_entry(&mut self) {
        self.input_mode = InputMode::PathEntry;
        self.path_input = self
            .export_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
    }

    /// Leave path entry without loading.
    pub fn cancel_path_entry(&mut self) {
        self.input_mode = InputMode::Normal;
        self.path_input.clear();
    }

    /// Load the typed path and return to normal mode.
    pub fn confirm_path_entry(&mut self) {
        let input = self.path_input.trim();
        if input.is_empty() {
            self.cancel_path_entry();
            return;
        }
        let path = expand_home(input);
        self.cancel_path_entry();
        self.load(path);
    }

    pub fn toggle_mask(&mut self) {
        self.masked = !self.masked;
    }

    pub fn sort_by_name(&mut self) {
        self.session.sort_by_name();
        self.selected_index = 0;
    }

    pub fn sort_by_username(&mut self) {
        self.session.sort_by_username();
        self.selected_index = 0;
    }

    pub fn sort_by_password(&mut self) {
        self.session.sort_by_password();
        self.selected_index = 0;
    }

    pub fn sort_by_revision_date(&mut self) {
        self.session.sort_by_revision_date();
        self.selected_index = 0;
    }

    pub fn reverse(&mut self) {
        self.session.reverse();
        self.selected_index = 0;
    }

    /// Group credentials sharing a password at the top of the list.
    pub fn highlight_reused_passwords(&mut self) {
        self.session.sort_by_reuse();
        self.selected_index = 0;
    }

    /// Move selection up.
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Move selection down.
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.session.len() {
            self.selected_index += 1;
        }
    }

    pub fn selected(&self) -> Option<&Credential> {
        self.session.credentials().get(self.selected_index)
    }

    /// Description of the current ordering for the status panel.
    pub fn order_label(&self) -> String {
        let label = self.session.order().label();
        if self.session.is_reversed() {
            format!("{label} (reversed)")
        } else {
            label.to_string()
        }
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bwlens_core::SortOrder;
    use std::fs;

    const EXPORT: &str = r#"{
        "encrypted": false,
        "folders": [],
        "items": [
            { "id": "1", "creationDate": "2023-01-01T00:00:00Z", "revisionDate": "2023-01-01T00:00:00Z",
              "name": "zeta", "favorite": false, "type": 1, "reprompt": 0,
              "login": { "username": "a", "password": "p", "uris": [], "fido2Credentials": [] } },
            { "id": "2", "creationDate": "2023-01-01T00:00:00Z", "revisionDate": "2024-01-01T00:00:00Z",
              "name": "alpha", "favorite": false, "type": 1, "reprompt": 0,
              "login": { "username": "b", "password": "p", "uris": [], "fido2Credentials": [] } }
        ]
    }"#;

    fn loaded_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        fs::write(&path, EXPORT).unwrap();
        let mut app = App::new(Config::default());
        assert!(app.load(path));
        (app, dir)
    }

    #[test]
    fn starts_masked_by_default() {
        let mut app = App::new(Config::default());
        assert!(app.masked);
        app.toggle_mask();
        assert!(!app.masked);
    }

    #[test]
    fn failed_load_shows_error_and_keeps_list() {
        let (mut app, dir) = loaded_app();
        app.move_down();
        assert_eq!(app.selected_index, 1);

        assert!(!app.load(dir.path().join("missing.json")));
        assert_eq!(app.error_message.as_deref(), Some("Error reading file."));
        assert_eq!(app.session.len(), 2);
        assert_eq!(app.selected_index, 1);

        assert!(!app.load(dir.path().join("notes.txt")));
        assert_eq!(app.error_message.as_deref(), Some("Please upload a valid JSON file."));
    }

    #[test]
    fn successful_load_clears_error() {
        let (mut app, dir) = loaded_app();
        app.load(dir.path().join("missing.json"));
        app.load(dir.path().join("export.json"));
        assert!(app.error_message.is_none());
    }

    #[test]
    fn path_entry_loads_typed_path() {
        let (mut app, dir) = loaded_app();
        app.start_path_entry();
        assert_eq!(app.input_mode, InputMode::PathEntry);
        assert!(app.path_input.ends_with("export.json"));

        app.path_input = dir.path().join("other.json").display().to_string();
        app.confirm_path_entry();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.error_message.as_deref(), Some("Error reading file."));
    }

    #[test]
    fn sorting_resets_selection_and_labels() {
        let (mut app, _dir) = loaded_app();
        app.move_down();
        app.sort_by_name();
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.selected().unwrap().name, "alpha");
        assert_eq!(app.session.order(), SortOrder::Name);

        app.reverse();
        assert_eq!(app.order_label(), "name (reversed)");
        assert_eq!(app.selected().unwrap().name, "zeta");
    }

    #[test]
    fn selection_stays_in_bounds() {
        let (mut app, _dir) = loaded_app();
        app.move_up();
        assert_eq!(app.selected_index, 0);
        app.move_down();
        app.move_down();
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn expands_home_prefix() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/vault.json"), home.join("vault.json"));
        }
        assert_eq!(expand_home("/tmp/vault.json"), PathBuf::from("/tmp/vault.json"));
    }
}
