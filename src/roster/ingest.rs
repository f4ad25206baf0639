// src/roster/ingest.rs
// Typed ingestion of tabular roster rows

use std::collections::HashSet;
use tracing::warn;

use crate::queue::Agent;

const NAME_HEADERS: &[&str] = &["name", "nome"];
const EMAIL_HEADERS: &[&str] = &["email", "e-mail"];
const PHONE_HEADERS: &[&str] = &["phone", "telefone"];

#[derive(Debug, Clone, Copy)]
struct Columns {
    name: usize,
    email: Option<usize>,
    phone: usize,
}

impl Columns {
    fn locate(header: &[String]) -> Option<Self> {
        let find = |aliases: &[&str]| {
            header
                .iter()
                .position(|h| aliases.iter().any(|a| h.trim().eq_ignore_ascii_case(a)))
        };

        Some(Self {
            name: find(NAME_HEADERS)?,
            email: find(EMAIL_HEADERS),
            phone: find(PHONE_HEADERS)?,
        })
    }
}

/// Why a row could not be ingested
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowRejection {
    #[error("missing header row with name and phone columns")]
    MissingHeader,
}

/// Maps header-first rows into agents.
///
/// Cells are trimmed. Rows without a name or phone are skipped, as are
/// repeated names (the first occurrence wins).
pub fn agents_from_rows(rows: &[Vec<String>]) -> Result<Vec<Agent>, RowRejection> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    let columns = Columns::locate(header).ok_or(RowRejection::MissingHeader)?;

    let cell = |row: &[String], index: usize| {
        row.get(index).map(|v| v.trim().to_string()).unwrap_or_default()
    };

    let mut seen = HashSet::new();
    let mut agents = Vec::with_capacity(body.len());

    for (offset, row) in body.iter().enumerate() {
        // Sheet row number, header is row 1
        let row_number = offset + 2;

        if row.iter().all(|v| v.trim().is_empty()) {
            continue;
        }

        let name = cell(row, columns.name);
        let phone = cell(row, columns.phone);
        let email = columns.email.map(|i| cell(row, i)).unwrap_or_default();

        if name.is_empty() {
            warn!("Skipping roster row {}: missing name", row_number);
            continue;
        }
        if phone.is_empty() {
            warn!("Skipping roster row {} ('{}'): missing phone", row_number, name);
            continue;
        }
        if !seen.insert(name.clone()) {
            warn!("Skipping roster row {}: duplicate name '{}'", row_number, name);
            continue;
        }

        agents.push(Agent { name, email, phone });
    }

    Ok(agents)
}
