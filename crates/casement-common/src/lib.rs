pub mod errors;
pub mod id;
pub mod types;

pub use errors::{CasementError, ConfigError, ContentError, IpcError, WidgetError};
pub use id::{new_id, LogicalKey, WindowId};
pub use types::{Rect, Size};

pub type Result<T> = std::result::Result<T, CasementError>;
