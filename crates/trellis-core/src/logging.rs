//! Logging facilities for Trellis.
//!
//! Trellis uses the `tracing` crate for instrumentation. To see logs, you
//! need to install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     // Initialize tracing (you can customize this)
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! The engine logs each commit pass at trace level under the
//! [`targets::MODEL`] target, and absorbed degraded conditions (stale
//! sticky targets, pruned selections, disabled paging) at debug level.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "trellis_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// Row view-model engine target.
    pub const MODEL: &str = "trellis::model";
}
