mod engine;
mod error;
mod item_catalog;
mod types;

pub use engine::{Engine, Session};
pub use error::{CoreError, CoreErrorCode};
pub use item_catalog::ItemCatalog;
pub use types::{
    Capabilities, CapabilityIssue, Coordinates, GiftRecordSummary, GiftSummary, PlayTime,
    PouchEntry, PouchView, Snapshot,
};
