use crate::core::{
    Candidate, ClassificationPlan, ConfigProvider, FileReport, Outcome, Pipeline, Placement,
    RunReport, Skipped, Storage,
};
use crate::utils::error::{ClassifyError, Result};
use std::path::Path;

pub struct ClassifyPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ClassifyPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    async fn place(&self, placement: &Placement, dry_run: bool) -> FileReport {
        let mut report = FileReport {
            source: placement.source.clone(),
            destination: Some(placement.destination.clone()),
            fiscal_year: Some(placement.fiscal_year),
            outcome: Outcome::Failed,
            detail: None,
        };

        let Some(dest_dir) = placement.destination.parent() else {
            report.detail = Some("destination has no parent directory".to_string());
            return report;
        };

        if self.storage.exists(dest_dir).await {
            if !self.storage.is_dir(dest_dir).await {
                tracing::warn!(
                    "{} is not a directory, leaving {} in place",
                    dest_dir.display(),
                    placement.source.display()
                );
                report.detail = Some(format!("{} is not a directory", dest_dir.display()));
                return report;
            }
        } else if !dry_run {
            tracing::info!("Directory {} doesn't exist, creating it", dest_dir.display());
            if let Err(e) = self.storage.create_dir(dest_dir).await {
                tracing::error!("Could not create {}: {}", dest_dir.display(), e);
                report.detail = Some(e.to_string());
                return report;
            }
        }

        if self.storage.exists(&placement.destination).await {
            tracing::warn!(
                "{} already exists, leaving {} in place",
                placement.destination.display(),
                placement.source.display()
            );
            report.outcome = Outcome::Conflict;
            report.detail = Some("destination already exists".to_string());
            return report;
        }

        if dry_run {
            tracing::info!(
                "Would place {} in {}",
                placement.source.display(),
                placement.fiscal_year
            );
            report.outcome = Outcome::Planned;
            return report;
        }

        tracing::info!("Placing {} in {}", placement.source.display(), placement.fiscal_year);
        match self
            .storage
            .move_file(&placement.source, &placement.destination)
            .await
        {
            Ok(()) => report.outcome = Outcome::Moved,
            // 檢查後才出現的目標檔案，同樣不覆蓋
            Err(ClassifyError::DestinationExists { .. }) => {
                tracing::warn!(
                    "{} appeared before the move, leaving {} in place",
                    placement.destination.display(),
                    placement.source.display()
                );
                report.outcome = Outcome::Conflict;
                report.detail = Some("destination already exists".to_string());
            }
            Err(e) => {
                tracing::error!("Could not move {}: {}", placement.source.display(), e);
                report.detail = Some(e.to_string());
            }
        }
        report
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ClassifyPipeline<S, C> {
    async fn extract(&self, dir: &Path) -> Result<Vec<Candidate>> {
        if !self.storage.exists(dir).await {
            return Err(ClassifyError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }
        if !self.storage.is_dir(dir).await {
            return Err(ClassifyError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let files = self.storage.list_files(dir).await?;
        tracing::debug!("Found {} files in {}", files.len(), dir.display());

        let candidates = files
            .into_iter()
            .filter_map(|path| {
                let file_name = path.file_name()?.to_os_string();
                Some(Candidate { path, file_name })
            })
            .collect();

        Ok(candidates)
    }

    async fn transform(
        &self,
        dir: &Path,
        candidates: Vec<Candidate>,
    ) -> Result<ClassificationPlan> {
        let calendar = self.config.fiscal_calendar();
        let suffix = self.config.folder_suffix();
        let mut plan = ClassificationPlan {
            directory: dir.to_path_buf(),
            ..Default::default()
        };

        for candidate in candidates {
            tracing::debug!("Processing file name: {:?}", candidate.display_name());

            match calendar.fiscal_year_of_file(&candidate.path) {
                Ok(fiscal_year) => {
                    let destination = dir
                        .join(fiscal_year.folder_name(suffix))
                        .join(&candidate.file_name);
                    plan.placements.push(Placement {
                        source: candidate.path,
                        destination,
                        fiscal_year,
                    });
                }
                Err(e) => {
                    tracing::info!(
                        "Could not get FY for {}. Leaving in place: {}",
                        candidate.path.display(),
                        e
                    );
                    plan.skipped.push(Skipped {
                        path: candidate.path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(plan)
    }

    async fn load(&self, plan: ClassificationPlan) -> Result<RunReport> {
        let dry_run = self.config.dry_run();
        let mut report = RunReport::new(plan.directory, dry_run);

        for placement in &plan.placements {
            report.entries.push(self.place(placement, dry_run).await);
        }

        report
            .entries
            .extend(plan.skipped.into_iter().map(|skipped| FileReport {
                source: skipped.path,
                destination: None,
                fiscal_year: None,
                outcome: Outcome::Skipped,
                detail: Some(skipped.reason),
            }));

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{MockConfig, MockStorage};
    use crate::domain::fiscal::FiscalYear;
    use std::path::PathBuf;

    fn candidates(dir: &str, names: &[&str]) -> Vec<Candidate> {
        names
            .iter()
            .map(|name| Candidate {
                path: Path::new(dir).join(name),
                file_name: (*name).into(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_extract_missing_directory() {
        let pipeline = ClassifyPipeline::new(MockStorage::new(), MockConfig::default());

        let result = pipeline.extract(Path::new("/docs")).await;

        assert!(matches!(result, Err(ClassifyError::DirectoryNotFound { .. })));
    }

    #[tokio::test]
    async fn test_extract_rejects_files() {
        let storage = MockStorage::new();
        storage.add_file("/docs/a_JAN2020.txt").await;
        let pipeline = ClassifyPipeline::new(storage, MockConfig::default());

        let result = pipeline.extract(Path::new("/docs/a_JAN2020.txt")).await;

        assert!(matches!(result, Err(ClassifyError::NotADirectory { .. })));
    }

    #[tokio::test]
    async fn test_extract_lists_only_direct_files() {
        let storage = MockStorage::new();
        storage.add_dir("/docs").await;
        storage.add_file("/docs/b_FEB2021.txt").await;
        storage.add_file("/docs/a_JAN2021.txt").await;
        storage.add_file("/docs/2021FY/c_MAR2021.txt").await;
        let pipeline = ClassifyPipeline::new(storage, MockConfig::default());

        let result = pipeline.extract(Path::new("/docs")).await.unwrap();

        let names: Vec<&str> = result.iter().filter_map(|c| c.file_name.to_str()).collect();
        assert_eq!(names, vec!["a_JAN2021.txt", "b_FEB2021.txt"]);
    }

    #[tokio::test]
    async fn test_transform_splits_placements_and_skips() {
        let pipeline = ClassifyPipeline::new(MockStorage::new(), MockConfig::default());
        let input = candidates("/docs", &["text_10JUL2022.txt", "text.txt", "text_2020FY.txt"]);

        let plan = pipeline.transform(Path::new("/docs"), input).await.unwrap();

        assert_eq!(plan.placements.len(), 2);
        assert_eq!(
            plan.placements[0].destination,
            PathBuf::from("/docs/2023FY/text_10JUL2022.txt")
        );
        assert_eq!(plan.placements[0].fiscal_year, FiscalYear(2023));
        assert_eq!(
            plan.placements[1].destination,
            PathBuf::from("/docs/2020FY/text_2020FY.txt")
        );
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].path, PathBuf::from("/docs/text.txt"));
    }

    #[tokio::test]
    async fn test_transform_uses_configured_suffix_and_start_month() {
        let config = MockConfig {
            start_month: 1,
            suffix: "_tax".to_string(),
            ..Default::default()
        };
        let pipeline = ClassifyPipeline::new(MockStorage::new(), config);
        let input = candidates("/docs", &["bill_DEC2021.pdf"]);

        let plan = pipeline.transform(Path::new("/docs"), input).await.unwrap();

        assert_eq!(
            plan.placements[0].destination,
            PathBuf::from("/docs/2021_tax/bill_DEC2021.pdf")
        );
    }

    #[tokio::test]
    async fn test_load_moves_files_and_creates_folders() {
        let storage = MockStorage::new();
        storage.add_dir("/docs").await;
        storage.add_file("/docs/a_JAN2021.txt").await;
        storage.add_file("/docs/note.txt").await;
        let pipeline = ClassifyPipeline::new(storage.clone(), MockConfig::default());

        let candidates = pipeline.extract(Path::new("/docs")).await.unwrap();
        let plan = pipeline
            .transform(Path::new("/docs"), candidates)
            .await
            .unwrap();
        let report = pipeline.load(plan).await.unwrap();

        assert_eq!(report.moved(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(storage.is_dir(Path::new("/docs/2021FY")).await);
        assert!(storage.exists(Path::new("/docs/2021FY/a_JAN2021.txt")).await);
        assert!(!storage.exists(Path::new("/docs/a_JAN2021.txt")).await);
        assert!(storage.exists(Path::new("/docs/note.txt")).await);
    }

    #[tokio::test]
    async fn test_load_never_overwrites_existing_destination() {
        let storage = MockStorage::new();
        storage.add_dir("/docs").await;
        storage.add_file("/docs/a_JAN2021.txt").await;
        storage.add_file("/docs/2021FY/a_JAN2021.txt").await;
        let pipeline = ClassifyPipeline::new(storage.clone(), MockConfig::default());

        let plan = pipeline
            .transform(Path::new("/docs"), candidates("/docs", &["a_JAN2021.txt"]))
            .await
            .unwrap();
        let report = pipeline.load(plan).await.unwrap();

        assert_eq!(report.conflicts(), 1);
        assert_eq!(report.moved(), 0);
        assert!(storage.exists(Path::new("/docs/a_JAN2021.txt")).await);
    }

    #[tokio::test]
    async fn test_load_fails_when_folder_name_is_a_file() {
        let storage = MockStorage::new();
        storage.add_dir("/docs").await;
        storage.add_file("/docs/a_JAN2021.txt").await;
        storage.add_file("/docs/2021FY").await;
        let pipeline = ClassifyPipeline::new(storage.clone(), MockConfig::default());

        let plan = pipeline
            .transform(Path::new("/docs"), candidates("/docs", &["a_JAN2021.txt"]))
            .await
            .unwrap();
        let report = pipeline.load(plan).await.unwrap();

        assert_eq!(report.failures(), 1);
        assert_eq!(report.entries[0].outcome, Outcome::Failed);
        assert!(storage.exists(Path::new("/docs/a_JAN2021.txt")).await);
    }

    #[tokio::test]
    async fn test_load_reports_conflict_when_destination_appears_during_move() {
        let storage = MockStorage::new();
        storage.add_dir("/docs").await;
        storage.add_file("/docs/a_JAN2021.txt").await;
        storage
            .create_on_move("/docs/a_JAN2021.txt", "/docs/2021FY/a_JAN2021.txt")
            .await;
        let pipeline = ClassifyPipeline::new(storage.clone(), MockConfig::default());

        let plan = pipeline
            .transform(Path::new("/docs"), candidates("/docs", &["a_JAN2021.txt"]))
            .await
            .unwrap();
        let report = pipeline.load(plan).await.unwrap();

        assert_eq!(report.conflicts(), 1);
        assert_eq!(report.failures(), 0);
        assert!(storage.exists(Path::new("/docs/a_JAN2021.txt")).await);
    }

    #[tokio::test]
    async fn test_load_dry_run_touches_nothing() {
        let storage = MockStorage::new();
        storage.add_dir("/docs").await;
        storage.add_file("/docs/a_JAN2021.txt").await;
        let config = MockConfig {
            dry_run: true,
            ..Default::default()
        };
        let pipeline = ClassifyPipeline::new(storage.clone(), config);

        let plan = pipeline
            .transform(Path::new("/docs"), candidates("/docs", &["a_JAN2021.txt"]))
            .await
            .unwrap();
        let report = pipeline.load(plan).await.unwrap();

        assert!(report.dry_run);
        assert_eq!(report.entries[0].outcome, Outcome::Planned);
        assert!(!storage.exists(Path::new("/docs/2021FY")).await);
        assert!(storage.exists(Path::new("/docs/a_JAN2021.txt")).await);
    }

    #[tokio::test]
    async fn test_load_continues_after_move_failure() {
        let storage = MockStorage::new();
        storage.add_dir("/docs").await;
        storage.add_file("/docs/a_JAN2021.txt").await;
        storage.add_file("/docs/b_FEB2021.txt").await;
        storage.fail_moves_from("/docs/a_JAN2021.txt").await;
        let pipeline = ClassifyPipeline::new(storage.clone(), MockConfig::default());

        let plan = pipeline
            .transform(
                Path::new("/docs"),
                candidates("/docs", &["a_JAN2021.txt", "b_FEB2021.txt"]),
            )
            .await
            .unwrap();
        let report = pipeline.load(plan).await.unwrap();

        assert_eq!(report.failures(), 1);
        assert_eq!(report.moved(), 1);
        assert!(storage.exists(Path::new("/docs/2021FY/b_FEB2021.txt")).await);
    }
}
