pub mod core_api;
pub mod gender;
pub mod layout;
pub mod reader;
pub mod sav4;
