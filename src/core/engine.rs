use crate::core::{Pipeline, RunReport};
use crate::utils::error::{ClassifyError, ErrorSeverity, Result};
use crate::utils::monitor::SystemMonitor;
use std::path::{Path, PathBuf};

/// 多個目錄執行後的結果
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<RunReport>,
    pub errors: Vec<(PathBuf, ClassifyError)>,
}

impl RunSummary {
    pub fn total_failures(&self) -> usize {
        self.reports.iter().map(RunReport::failures).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.total_failures() == 0
    }

    /// 取最嚴重的錯誤決定退出碼；只有個別檔案失敗時為 2
    pub fn exit_code(&self) -> i32 {
        self.errors
            .iter()
            .map(|(_, e)| e.severity())
            .max()
            .map(ErrorSeverity::exit_code)
            .unwrap_or_else(|| {
                if self.total_failures() > 0 {
                    ErrorSeverity::Medium.exit_code()
                } else {
                    0
                }
            })
    }
}

pub struct ClassifyEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ClassifyEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self, dir: &Path) -> Result<RunReport> {
        tracing::info!("Classifying files in {}", dir.display());

        let candidates = self.pipeline.extract(dir).await?;
        tracing::debug!("Extracted {} candidate files", candidates.len());
        self.monitor.log_stats("Extract");

        let plan = self.pipeline.transform(dir, candidates).await?;
        tracing::debug!(
            "Planned {} placements, {} files left in place",
            plan.placements.len(),
            plan.skipped.len()
        );
        self.monitor.log_stats("Transform");

        let report = self.pipeline.load(plan).await?;
        self.monitor.log_stats("Load");

        tracing::info!(
            "{}: {} moved, {} skipped, {} conflicts, {} failures",
            dir.display(),
            report.moved(),
            report.skipped(),
            report.conflicts(),
            report.failures()
        );

        Ok(report)
    }

    /// 依序處理每個目錄，單一目錄失敗不影響其他目錄
    pub async fn run_all<I, D>(&self, dirs: I) -> RunSummary
    where
        I: IntoIterator<Item = D>,
        D: AsRef<Path>,
    {
        let mut summary = RunSummary::default();

        for dir in dirs {
            let dir = dir.as_ref();
            match self.run(dir).await {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    tracing::error!("❌ Failed to classify {}: {}", dir.display(), e);
                    summary.errors.push((dir.to_path_buf(), e));
                }
            }
        }

        self.monitor.log_final_stats();
        summary
    }
}
