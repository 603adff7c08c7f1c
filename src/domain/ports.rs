use crate::domain::fiscal::FiscalCalendar;
use crate::domain::model::{Candidate, ClassificationPlan, ReportFormat, RunReport};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub trait Storage: Send + Sync {
    /// 目錄下的一般檔案（不遞迴），依路徑排序
    fn list_files(&self, dir: &Path)
        -> impl std::future::Future<Output = Result<Vec<PathBuf>>> + Send;
    fn exists(&self, path: &Path) -> impl std::future::Future<Output = bool> + Send;
    fn is_dir(&self, path: &Path) -> impl std::future::Future<Output = bool> + Send;
    fn create_dir(&self, path: &Path) -> impl std::future::Future<Output = Result<()>> + Send;
    fn move_file(
        &self,
        from: &Path,
        to: &Path,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn fiscal_calendar(&self) -> FiscalCalendar;
    fn folder_suffix(&self) -> &str;
    fn dry_run(&self) -> bool;
    fn report_path(&self) -> Option<&Path>;
    fn report_format(&self) -> ReportFormat;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, dir: &Path) -> Result<Vec<Candidate>>;
    async fn transform(&self, dir: &Path, candidates: Vec<Candidate>)
        -> Result<ClassificationPlan>;
    async fn load(&self, plan: ClassificationPlan) -> Result<RunReport>;
}
