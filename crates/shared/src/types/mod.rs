//! Common types used across the application.

pub mod category;
pub mod id;
pub mod principal;
pub mod record;

pub use category::Category;
pub use id::*;
pub use principal::{Principal, Role};
pub use record::{RecordKind, RecordStatus};
