//! Job lifecycle tracking
//!
//! One `Job` record per submitted processing request, owned by the
//! `JobRegistry`. Status moves `Pending -> Processing -> Completed | Failed`;
//! terminal status is absorbing and duplicate terminal signals are no-ops.

mod model;
mod registry;

pub use model::{Job, JobParams, JobStatus, JobStatusView, SubtitleMode};
pub use registry::JobRegistry;
