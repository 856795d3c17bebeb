use std::fs;
use std::path::Path;

use tracing::debug;

use crate::sav4::Version;
use crate::sav4::inventory::ItemNames;
use crate::sav4::offsets::table_for;

use super::error::{CoreError, CoreErrorCode};

/// Item names for one session, either loaded from a list file or generated
/// as numbered placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCatalog {
    names: ItemNames,
}

impl ItemCatalog {
    pub fn numbered(version: Version) -> Self {
        Self {
            names: ItemNames::numbered(table_for(version).max_item_id),
        }
    }

    /// Read a list with one item name per line; line `n` names item id `n`.
    pub fn load_from_file(path: &Path) -> Result<Self, CoreError> {
        let raw = fs::read(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        let text = String::from_utf8_lossy(&raw);
        let names = ItemNames::parse_lines(text.trim_start_matches('\u{feff}'));
        if names.is_empty() {
            return Err(CoreError::new(
                CoreErrorCode::Parse,
                format!("no item names found in {}", path.display()),
            ));
        }
        debug!(path = %path.display(), count = names.len(), "loaded item names");
        Ok(Self { names })
    }

    pub fn names(&self) -> &ItemNames {
        &self.names
    }

    pub fn name(&self, id: u16) -> Option<&str> {
        self.names.name(id)
    }
}
