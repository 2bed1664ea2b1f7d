//! Core types, presence records, and session context for LiqureMate.

pub mod error;
pub mod events;
pub mod limits;
pub mod page;
pub mod presence;
pub mod reading;
pub mod session;
pub mod survey;
pub mod timestamp;

pub use error::{Error, Result};
pub use events::*;
pub use page::*;
pub use presence::*;
pub use reading::*;
pub use session::*;
pub use survey::*;
