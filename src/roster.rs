//! Bulk roster import from CSV (`name,gender,skill`; gender and skill optional).

use crate::models::{Gender, PlayerId, Session, SessionError, DEFAULT_SKILL};
use serde::{Deserialize, Serialize};
use std::io;

/// Errors that stop an import before any row is read.
#[derive(Debug)]
pub enum RosterError {
    Csv(csv::Error),
    /// The header row has no `name` column.
    MissingNameColumn,
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Csv(e) => write!(f, "Could not read CSV: {}", e),
            RosterError::MissingNameColumn => write!(f, "CSV header must include a 'name' column"),
        }
    }
}

impl std::error::Error for RosterError {}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv(e)
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    skill: Option<i64>,
}

/// A row that was not imported, with its 1-based line number.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RejectedRow {
    pub line: u64,
    pub reason: String,
}

/// Outcome of an import: who was added and which rows were skipped.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ImportReport {
    pub added: Vec<PlayerId>,
    pub rejected: Vec<RejectedRow>,
}

/// Add every valid row of `reader` to the roster. Invalid rows (bad skill,
/// duplicate or empty name, unparsable fields) are reported, not fatal.
pub fn import_roster_csv<R: io::Read>(
    session: &mut Session,
    reader: R,
) -> Result<ImportReport, RosterError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    if !headers.iter().any(|h| h.eq_ignore_ascii_case("name")) {
        return Err(RosterError::MissingNameColumn);
    }
    let headers: csv::StringRecord = headers.iter().map(|h| h.to_ascii_lowercase()).collect();

    let mut report = ImportReport::default();
    for (index, result) in rdr.records().enumerate() {
        // Header is line 1.
        let mut line = index as u64 + 2;
        let added = result
            .map_err(|e| e.to_string())
            .and_then(|record| {
                if let Some(pos) = record.position() {
                    line = pos.line();
                }
                record
                    .deserialize::<RosterRow>(Some(&headers))
                    .map_err(|e| e.to_string())
            })
            .and_then(|row| {
                let gender = row.gender.as_deref().map(Gender::from_alias).unwrap_or_default();
                let skill = row.skill.unwrap_or(i64::from(DEFAULT_SKILL));
                session
                    .add_player(&row.name, gender, skill)
                    .map_err(|e: SessionError| e.to_string())
            });
        match added {
            Ok(id) => report.added.push(id),
            Err(reason) => {
                log::warn!("Skipping roster row {}: {}", line, reason);
                report.rejected.push(RejectedRow { line, reason });
            }
        }
    }
    log::info!(
        "Imported {} player(s), skipped {}",
        report.added.len(),
        report.rejected.len()
    );
    Ok(report)
}
