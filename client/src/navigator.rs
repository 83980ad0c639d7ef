//! Navigation capability used by the API client, stores and router.

use parking_lot::Mutex;

/// Landing page.
pub const HOME_PATH: &str = "/";
/// Sign-in page; 401 responses redirect here.
pub const LOGIN_PATH: &str = "/login";

/// Where the user currently is, and how to send them somewhere else.
pub trait Navigator: Send + Sync {
    /// Path of the current location.
    fn current_path(&self) -> String;
    /// Push a new location.
    fn navigate(&self, path: &str);
}

/// In-memory history stack; the last entry is the current location.
#[derive(Debug)]
pub struct HistoryNavigator {
    entries: Mutex<Vec<String>>,
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new(HOME_PATH)
    }
}

impl HistoryNavigator {
    /// History holding just `start`.
    pub fn new(start: &str) -> Self {
        Self {
            entries: Mutex::new(vec![start.to_string()]),
        }
    }

    /// Every location visited so far, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

impl Navigator for HistoryNavigator {
    fn current_path(&self) -> String {
        self.entries.lock().last().cloned().unwrap_or_else(|| HOME_PATH.to_string())
    }

    fn navigate(&self, path: &str) {
        tracing::debug!("navigate -> {path}");
        self.entries.lock().push(path.to_string());
    }
}
