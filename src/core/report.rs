use crate::domain::model::AccumulatorEntry;
use crate::utils::error::{PlacerError, Result};
use serde::Serialize;

/// 摘要輸出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ReportFormat {
    #[default]
    Table,
    Csv,
    Json,
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    place: i64,
    total: i64,
    description: &'a str,
}

fn rows(entries: &[AccumulatorEntry]) -> Vec<SummaryRow<'_>> {
    entries
        .iter()
        .map(|entry| SummaryRow {
            place: entry.place.id,
            total: entry.total,
            description: &entry.place.description,
        })
        .collect()
}

/// Right-aligned table; the description column is two wider than the
/// longest description. Nothing is rendered for an empty slice.
pub fn render_table(entries: &[AccumulatorEntry]) -> String {
    let Some(longest) = entries
        .iter()
        .map(|entry| entry.place.description.chars().count())
        .max()
    else {
        return String::new();
    };
    let width = longest + 2;

    let mut out = format!("{:>6}{:>6}{:>width$}\n", "place", "total", "desc");
    for entry in entries {
        out.push_str(&format!(
            "{:>6}{:>6}{:>width$}\n",
            entry.place.id, entry.total, entry.place.description
        ));
    }
    out
}

pub fn render_csv(entries: &[AccumulatorEntry]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows(entries) {
        writer.serialize(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PlacerError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| PlacerError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

pub fn render_json(entries: &[AccumulatorEntry]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(&rows(entries))?;
    json.push('\n');
    Ok(json)
}

pub fn render(entries: &[AccumulatorEntry], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Table => Ok(render_table(entries)),
        ReportFormat::Csv => render_csv(entries),
        ReportFormat::Json => render_json(entries),
    }
}
