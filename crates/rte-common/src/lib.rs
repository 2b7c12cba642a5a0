pub mod errors;
pub mod events;
pub mod id;

pub use errors::{BridgeError, ConfigError, DocError, RteError};
pub use events::{Event, EventBus};
pub use id::{new_id, SessionId};

pub type Result<T> = std::result::Result<T, RteError>;
