//! Fixed keys the stores persist under.

/// Records that can be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Recipes,
    CookLog,
}

impl StorageKey {
    /// Returns the key name, shared with the browser version's local storage.
    pub fn name(&self) -> &'static str {
        match self {
            StorageKey::Recipes => "cookmate_recipes",
            StorageKey::CookLog => "cookmate_cooked_data",
        }
    }

    /// Returns the filename for this key.
    pub fn filename(&self) -> String {
        format!("{}.json", self.name())
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
