pub mod engine;
pub mod pipeline;
pub mod report;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{
    Candidate, ClassificationPlan, FileReport, Outcome, Placement, ReportFormat, RunReport,
    Skipped,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
