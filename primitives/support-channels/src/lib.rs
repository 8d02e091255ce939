//! Support Channels - Bulk Join/Leave for Slack Support Duty
//!
//! Joins every customer channel (names starting with `_`) plus a configurable
//! set of default support channels, or leaves the customer channels again when
//! going off duty. Externally shared channels cannot be left through the API
//! and are reported for manual handling.
//!
//! The flow is authenticate, list every page of channels, select, then either
//! print the plan (dry run) or perform the calls one at a time, stopping at the
//! first failure.

pub mod channel;
pub mod directory;
pub mod driver;
pub mod error;
pub mod selector;
pub mod slack;

pub use channel::{Channel, ChannelId, Identity, RunMode};
pub use directory::{ChannelDirectory, ChannelPage, DirectoryError, fetch_all_channels};
pub use driver::{DEFAULT_SETTLE_DELAY, Driver, ExecutionOutcome, RunConfig, RunReport};
pub use error::{Action, RunError};
pub use selector::{DEFAULT_SUPPORT_CHANNELS, Selection, SelectionPolicy, select};
pub use slack::{DEFAULT_API_BASE, SlackDirectory};
