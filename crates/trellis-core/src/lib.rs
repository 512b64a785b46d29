//! Core systems for Trellis.
//!
//! This crate provides the foundational components of the Trellis row
//! view-model engine:
//!
//! - **Signal/Slot System**: Type-safe change notification between the
//!   engine and its host
//! - **Logging**: `tracing` targets used throughout Trellis
//!
//! # Signal/Slot Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let page_changed = Signal::<usize>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = page_changed.connect(|page| {
//!     println!("Page changed to: {}", page);
//! });
//!
//! // Emit the signal
//! page_changed.emit(2);
//!
//! // Disconnect when done
//! page_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use signal::{ConnectionId, Signal};
