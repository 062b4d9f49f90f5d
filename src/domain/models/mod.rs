mod permissions;
mod revision;

pub use permissions::Permissions;
pub use revision::{RevisionRecord, LABEL_KEY};
