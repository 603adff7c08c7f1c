use crate::core::{ReportFormat, RunReport, Storage};
use crate::utils::error::{ClassifyError, Result};
use serde::Serialize;
use std::path::Path;

/// CSV 報表的一列
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    directory: String,
    source: String,
    destination: String,
    fiscal_year: String,
    outcome: String,
    detail: &'a str,
}

pub fn render(reports: &[RunReport], format: ReportFormat) -> Result<Vec<u8>> {
    match format {
        ReportFormat::Csv => render_csv(reports),
        ReportFormat::Json => Ok(serde_json::to_vec_pretty(reports)?),
    }
}

fn render_csv(reports: &[RunReport]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for report in reports {
        let directory = report.directory.display().to_string();
        for entry in &report.entries {
            writer.serialize(ReportRow {
                directory: directory.clone(),
                source: entry.source.display().to_string(),
                destination: entry
                    .destination
                    .as_ref()
                    .map(|d| d.display().to_string())
                    .unwrap_or_default(),
                fiscal_year: entry
                    .fiscal_year
                    .map(|fy| fy.to_string())
                    .unwrap_or_default(),
                outcome: entry.outcome.to_string(),
                detail: entry.detail.as_deref().unwrap_or(""),
            })?;
        }
    }

    // 沒有資料時仍輸出標題列
    if reports.iter().all(|r| r.entries.is_empty()) {
        writer.write_record([
            "directory",
            "source",
            "destination",
            "fiscal_year",
            "outcome",
            "detail",
        ])?;
    }

    writer.into_inner().map_err(|e| ClassifyError::ReportError {
        message: e.to_string(),
    })
}

pub async fn write_report<S: Storage>(
    storage: &S,
    path: &Path,
    format: ReportFormat,
    reports: &[RunReport],
) -> Result<()> {
    let data = render(reports, format)?;
    tracing::debug!("Writing {:?} report ({} bytes) to {}", format, data.len(), path.display());
    storage.write_file(path, &data).await
}
