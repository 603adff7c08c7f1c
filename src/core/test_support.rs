use crate::core::{ConfigProvider, Storage};
use crate::domain::fiscal::FiscalCalendar;
use crate::domain::model::ReportFormat;
use crate::utils::error::{ClassifyError, Result};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct MockFs {
    files: BTreeSet<PathBuf>,
    dirs: HashSet<PathBuf>,
    contents: HashMap<PathBuf, Vec<u8>>,
    failing_moves: HashSet<PathBuf>,
    // 搬移前一刻才出現的目標檔案
    created_on_move: HashMap<PathBuf, PathBuf>,
}

#[derive(Clone, Default)]
pub struct MockStorage {
    fs: Arc<Mutex<MockFs>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_dir(&self, path: &str) {
        let mut fs = self.fs.lock().await;
        for ancestor in Path::new(path).ancestors() {
            fs.dirs.insert(ancestor.to_path_buf());
        }
    }

    pub async fn add_file(&self, path: &str) {
        let path = PathBuf::from(path);
        let mut fs = self.fs.lock().await;
        for ancestor in path.ancestors().skip(1) {
            fs.dirs.insert(ancestor.to_path_buf());
        }
        fs.files.insert(path);
    }

    pub async fn fail_moves_from(&self, path: &str) {
        self.fs.lock().await.failing_moves.insert(PathBuf::from(path));
    }

    pub async fn create_on_move(&self, from: &str, appears: &str) {
        self.fs
            .lock()
            .await
            .created_on_move
            .insert(PathBuf::from(from), PathBuf::from(appears));
    }

    pub async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        self.fs.lock().await.contents.get(Path::new(path)).cloned()
    }
}

fn io_error(kind: io::ErrorKind, path: &Path) -> ClassifyError {
    ClassifyError::IoError(io::Error::new(kind, format!("{}", path.display())))
}

impl Storage for MockStorage {
    async fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let fs = self.fs.lock().await;
        Ok(fs
            .files
            .iter()
            .filter(|f| f.parent() == Some(dir))
            .cloned()
            .collect())
    }

    async fn exists(&self, path: &Path) -> bool {
        let fs = self.fs.lock().await;
        fs.files.contains(path) || fs.dirs.contains(path)
    }

    async fn is_dir(&self, path: &Path) -> bool {
        self.fs.lock().await.dirs.contains(path)
    }

    async fn create_dir(&self, path: &Path) -> Result<()> {
        let mut fs = self.fs.lock().await;
        if fs.files.contains(path) || fs.dirs.contains(path) {
            return Err(io_error(io::ErrorKind::AlreadyExists, path));
        }
        fs.dirs.insert(path.to_path_buf());
        Ok(())
    }

    async fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        let mut fs = self.fs.lock().await;
        if fs.failing_moves.contains(from) {
            return Err(io_error(io::ErrorKind::PermissionDenied, from));
        }
        if let Some(appears) = fs.created_on_move.remove(from) {
            fs.files.insert(appears);
        }
        if fs.files.contains(to) || fs.dirs.contains(to) {
            return Err(ClassifyError::DestinationExists {
                path: to.to_path_buf(),
            });
        }
        if !fs.files.remove(from) {
            return Err(io_error(io::ErrorKind::NotFound, from));
        }
        if let Some(data) = fs.contents.remove(from) {
            fs.contents.insert(to.to_path_buf(), data);
        }
        fs.files.insert(to.to_path_buf());
        Ok(())
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let mut fs = self.fs.lock().await;
        fs.files.insert(path.to_path_buf());
        fs.contents.insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }
}

pub struct MockConfig {
    pub start_month: u8,
    pub strict_dates: bool,
    pub suffix: String,
    pub dry_run: bool,
    pub report_path: Option<PathBuf>,
    pub report_format: ReportFormat,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            start_month: FiscalCalendar::DEFAULT_START_MONTH,
            strict_dates: false,
            suffix: "FY".to_string(),
            dry_run: false,
            report_path: None,
            report_format: ReportFormat::Csv,
        }
    }
}

impl ConfigProvider for MockConfig {
    fn fiscal_calendar(&self) -> FiscalCalendar {
        FiscalCalendar::new(self.start_month)
            .unwrap_or_default()
            .with_strict_dates(self.strict_dates)
    }

    fn folder_suffix(&self) -> &str {
        &self.suffix
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn report_path(&self) -> Option<&Path> {
        self.report_path.as_deref()
    }

    fn report_format(&self) -> ReportFormat {
        self.report_format
    }
}
