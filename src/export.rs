use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Chart, ChartType, Workbook, Worksheet};
use serde::Serialize;

use crate::correlate::CorrelationPair;
use crate::extract::{ExtractionStatus, MatchExtraction};
use crate::features::FeatureRow;

pub struct ExportReport {
    pub feature_rows: usize,
    pub feature_columns: usize,
    pub skipped: usize,
    pub correlation_pairs: usize,
}

/// Writes the feature table (and, when present, the strong-correlation
/// sheet) to one workbook. Failed matches are skipped, missing features
/// become blank cells.
pub fn export_workbook(
    path: &Path,
    results: &[MatchExtraction],
    pairs: &[CorrelationPair],
) -> Result<ExportReport> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Features")?;
    let (feature_rows, feature_columns, skipped) = write_feature_sheet(sheet, results)?;

    if !pairs.is_empty() {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Correlations")?;
        write_correlation_sheet(sheet, pairs)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    Ok(ExportReport {
        feature_rows,
        feature_columns,
        skipped,
        correlation_pairs: pairs.len(),
    })
}

/// Applies optional title and axis names to a chart in one place.
pub fn label_axes(
    chart: &mut Chart,
    title: Option<&str>,
    x_label: Option<&str>,
    y_label: Option<&str>,
) {
    if let Some(title) = title {
        chart.title().set_name(title);
    }
    if let Some(x_label) = x_label {
        chart.x_axis().set_name(x_label);
    }
    if let Some(y_label) = y_label {
        chart.y_axis().set_name(y_label);
    }
}

fn write_feature_sheet(
    sheet: &mut Worksheet,
    results: &[MatchExtraction],
) -> Result<(usize, usize, usize)> {
    let Some(first) = results.iter().find_map(|r| r.row.as_ref()) else {
        sheet.write_string(0, 0, "no extractable matches")?;
        return Ok((0, 0, results.len()));
    };
    let names: Vec<&String> = first.keys().collect();

    sheet.write_string(0, 0, "match_id")?;
    sheet.write_string(0, 1, "status")?;
    for (col, name) in names.iter().enumerate() {
        sheet.write_string(0, col as u16 + 2, name.as_str())?;
    }

    let mut written = 0usize;
    let mut skipped = 0usize;
    for result in results {
        let Some(row) = result.row.as_ref() else {
            skipped += 1;
            continue;
        };
        let out_row = written as u32 + 1;
        sheet.write_number(out_row, 0, result.match_id as f64)?;
        sheet.write_string(out_row, 1, status_key(&result.status))?;
        for (col, name) in names.iter().enumerate() {
            if let Some(Some(value)) = row.get(*name) {
                sheet.write_number(out_row, col as u16 + 2, *value)?;
            }
        }
        written += 1;
    }

    Ok((written, names.len(), skipped))
}

fn write_correlation_sheet(sheet: &mut Worksheet, pairs: &[CorrelationPair]) -> Result<()> {
    sheet.write_string(0, 0, "feature_a")?;
    sheet.write_string(0, 1, "feature_b")?;
    sheet.write_string(0, 2, "r")?;
    for (index, pair) in pairs.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string(row, 0, pair.a.as_str())?;
        sheet.write_string(row, 1, pair.b.as_str())?;
        sheet.write_number(row, 2, pair.r)?;
    }

    let mut chart = Chart::new(ChartType::Scatter);
    chart.add_series().set_values((
        "Correlations",
        1,
        2,
        pairs.len() as u32,
        2,
    ));
    label_axes(
        &mut chart,
        Some("Strongly correlated feature pairs"),
        Some("pair"),
        Some("r"),
    );
    sheet
        .insert_chart(1, 4, &chart)
        .context("insert correlation chart")?;
    Ok(())
}

fn status_key(status: &ExtractionStatus) -> &'static str {
    match status {
        ExtractionStatus::Full => "full",
        ExtractionStatus::Partial { .. } => "partial",
        ExtractionStatus::Failed(_) => "failed",
    }
}

#[derive(Serialize)]
struct JsonRow<'a> {
    match_id: i64,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<&'a FeatureRow>,
}

/// JSON rendering of the batch results, one object per match with its
/// triage status.
pub fn features_json(results: &[MatchExtraction]) -> Result<String> {
    let rows: Vec<JsonRow<'_>> = results
        .iter()
        .map(|result| JsonRow {
            match_id: result.match_id,
            status: status_key(&result.status),
            error: match &result.status {
                ExtractionStatus::Failed(err) => Some(err.to_string()),
                _ => None,
            },
            features: result.row.as_ref(),
        })
        .collect();
    serde_json::to_string_pretty(&rows).context("serialize feature rows")
}

pub fn export_features_json(path: &Path, results: &[MatchExtraction]) -> Result<()> {
    let json = features_json(results)?;
    std::fs::write(path, json).with_context(|| format!("write features {}", path.display()))
}
