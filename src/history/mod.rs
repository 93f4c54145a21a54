//! Client-side history.
//!
//! # Data Flow
//! ```text
//! push / replace / push_named / back / forward
//!     → navigator.rs (resolve through the shared Resolver)
//!     → mode.rs (encode final location for the address bar)
//!     → memory.rs (History entries, cursor)
//!     → mounted Resolution
//! ```
//!
//! # Design Decisions
//! - History mode only affects encoding, never matching
//! - The browser history API is a trait so navigation is testable in-process

pub mod memory;
pub mod mode;
pub mod navigator;

pub use memory::{History, MemoryHistory};
pub use mode::{Addressing, HistoryMode};
pub use navigator::Navigator;
