//! `ldd-notify`: cleanup reminders for users holding more than one LDD.
//!
//! Library crate: loads the two exports, picks who to remind, renders and
//! delivers the reminders. Argument parsing and logging setup live in the CLI.

pub mod aggregate;
pub mod config;
pub mod delivery;
pub mod eligibility;
pub mod error;
pub mod loader;
pub mod model;
pub mod notifier;
pub mod owner;
pub mod pipeline;
pub mod template;

pub use config::NotifyConfig;
pub use delivery::DeliveryChannel;
pub use error::NotifyError;
pub use model::{HostRecord, Notification, PipelineReport, RunReport};
pub use pipeline::{run, RunOptions};
