//! Rerun visualization of temperature fields.
//!
//! Requires a running (or spawnable) Rerun viewer unless the session is
//! saved to a file or buffered.

pub mod colormap;
pub mod config;
pub mod rerun;

pub use config::RerunConfig;
pub use self::rerun::{RerunFieldView, save_session, start_session};
