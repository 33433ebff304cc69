pub mod loader;
pub mod types;
pub mod validator;

pub use loader::{load_name_map, load_sources, RawEntries};
pub use types::{Format, SourceEntry, SourceUrl, TAG_DEAD, TAG_IGNORE};
pub use validator::{validate, validate_and_shuffle};
