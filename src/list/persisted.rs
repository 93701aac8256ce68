//! Persisted subset of a list store: bookmarks and recently viewed ids

use serde::{Deserialize, Serialize};

/// Ids a user chose to keep across restarts
///
/// Both lists hold ids only, never entity copies, so a fetch can not make
/// them stale; they are resolved against the current collection on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmarks {
    /// Bookmarked ids, oldest first
    #[serde(default)]
    pub bookmarked: Vec<String>,

    /// Viewed ids, most recent first
    #[serde(default)]
    pub recently_viewed: Vec<String>,
}

impl Bookmarks {
    pub fn contains(&self, id: &str) -> bool {
        self.bookmarked.iter().any(|b| b == id)
    }

    /// Flip membership of `id` and return the new membership
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.bookmarked.iter().position(|b| b == id) {
            self.bookmarked.remove(pos);
            false
        } else {
            self.bookmarked.push(id.to_string());
            true
        }
    }

    /// Move `id` to the front of the recently viewed list
    ///
    /// The list keeps at most `limit` ids; a limit of 0 keeps nothing.
    pub fn push_recent(&mut self, id: &str, limit: usize) {
        self.recently_viewed.retain(|v| v != id);
        self.recently_viewed.insert(0, id.to_string());
        self.recently_viewed.truncate(limit);
    }
}
