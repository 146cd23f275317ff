//! Player presence directory.
//!
//! Abstracts the server's online-player lookup. The engine only uses it
//! to resolve invite targets; everything else operates on stored names.

/// Online-player lookup and name resolution.
pub trait PresenceDirectory: Send {
    /// Resolve a (possibly partial) name to an online player's
    /// canonical name. Exact matches win over prefix matches.
    fn find_by_prefix(&self, prefix: &str) -> Option<String>;

    /// Resolve an exact name to an online player.
    fn find_exact(&self, name: &str) -> Option<String>;

    /// All currently online players.
    fn list_online(&self) -> Vec<String>;
}

/// Fixed directory for tests and offline development.
#[derive(Debug, Default)]
pub struct StaticPresence {
    online: Vec<String>,
}

impl StaticPresence {
    pub fn new(online: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            online: online.into_iter().map(Into::into).collect(),
        }
    }
}

impl PresenceDirectory for StaticPresence {
    fn find_by_prefix(&self, prefix: &str) -> Option<String> {
        if let Some(exact) = self.find_exact(prefix) {
            return Some(exact);
        }
        let prefix = prefix.to_lowercase();
        self.online
            .iter()
            .find(|name| name.to_lowercase().starts_with(&prefix))
            .cloned()
    }

    fn find_exact(&self, name: &str) -> Option<String> {
        self.online
            .iter()
            .find(|online| online.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn list_online(&self) -> Vec<String> {
        self.online.clone()
    }
}
