//! One-shot spreadsheet bootstrap for the `lego` table.
//!
//! Destructive by design: the table is dropped and recreated with one text
//! column per sanitized spreadsheet header, then every data row is
//! bulk-inserted. Never invoked from the live API.

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use indexmap::IndexSet;
use sqlx::QueryBuilder;
use std::path::Path;
use tracing::{info, warn};

use crate::store::Db;

const INSERT_CHUNK: usize = 500;

/// Parsed worksheet: sanitized column names plus the deduplicated data rows.
#[derive(Debug)]
pub struct Sheet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Derive a column identifier from a header cell: lowercase, trim, collapse
/// whitespace runs to single underscores, strip the remaining non-word
/// characters. `"Part No."` becomes `part_no`.
pub fn sanitize_header(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_underscore = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            pending_underscore = true;
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_underscore && !out.is_empty() {
                out.push('_');
            }
            pending_underscore = false;
            out.push(ch);
        }
        // other characters are dropped outright
    }
    out
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Sanitize the header row into column names, remembering which cell index
/// feeds each column. The first cell is a row-number artifact and is
/// discarded; headers that sanitize to nothing are dropped with their data.
pub fn derive_columns(header: &[Data]) -> Result<(Vec<String>, Vec<usize>)> {
    let mut columns = Vec::new();
    let mut kept = Vec::new();
    for (idx, cell) in header.iter().enumerate().skip(1) {
        let name = sanitize_header(&cell_to_string(cell));
        if name.is_empty() {
            warn!(column = idx, "header sanitized to empty; dropping column");
            continue;
        }
        if columns.contains(&name) {
            bail!("duplicate column name after sanitizing: {name}");
        }
        columns.push(name);
        kept.push(idx);
    }
    if columns.is_empty() {
        bail!("no usable columns derived from header row");
    }
    Ok((columns, kept))
}

/// Project each data row onto the kept cell indices, using the empty string
/// for missing cells and skipping exact duplicates of already-seen rows.
pub fn extract_rows(kept: &[usize], data_rows: &[&[Data]]) -> Vec<Vec<String>> {
    let mut seen: IndexSet<Vec<String>> = IndexSet::with_capacity(data_rows.len());
    for row in data_rows {
        let values: Vec<String> = kept
            .iter()
            .map(|&i| row.get(i).map(cell_to_string).unwrap_or_default())
            .collect();
        seen.insert(values);
    }
    seen.into_iter().collect()
}

/// Read the first worksheet: header row becomes the schema, the last row is
/// treated as a footer artifact and skipped along with the header.
pub fn read_sheet(path: &Path) -> Result<Sheet> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening spreadsheet {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .context("spreadsheet has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows_iter = range.rows();
    let header = rows_iter.next().context("spreadsheet is empty")?;
    let (columns, kept) = derive_columns(header)?;

    let mut data_rows: Vec<&[Data]> = rows_iter.collect();
    data_rows.pop(); // trailing footer row
    let rows = extract_rows(&kept, &data_rows);

    Ok(Sheet { columns, rows })
}

/// Drop and recreate the destination table with a surrogate id plus one
/// text column per derived name.
pub async fn recreate_table(db: &Db, columns: &[String]) -> Result<()> {
    let cols = columns
        .iter()
        .map(|c| format!("\"{c}\" text"))
        .collect::<Vec<_>>()
        .join(",\n    ");
    let ddl = format!(
        "DROP TABLE IF EXISTS lego;\nCREATE TABLE lego (\n    id SERIAL PRIMARY KEY,\n    {cols}\n);"
    );
    sqlx::raw_sql(&ddl)
        .execute(&db.pool)
        .await
        .context("recreating lego table")?;
    info!(columns = columns.len(), "recreated lego table");
    Ok(())
}

/// Bulk insert in chunks. ON CONFLICT DO NOTHING on top of the in-memory
/// dedupe already done in `extract_rows`.
pub async fn insert_rows(db: &Db, sheet: &Sheet) -> Result<u64> {
    let cols = sheet
        .columns
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");

    let mut inserted = 0u64;
    for chunk in sheet.rows.chunks(INSERT_CHUNK) {
        let mut qb: QueryBuilder<'_, sqlx::Postgres> =
            QueryBuilder::new(format!("INSERT INTO lego ({cols}) "));
        qb.push_values(chunk, |mut b, row| {
            for value in row {
                b.push_bind(value);
            }
        });
        qb.push(" ON CONFLICT DO NOTHING");
        let res = qb
            .build()
            .persistent(false)
            .execute(&db.pool)
            .await
            .context("bulk inserting spreadsheet rows")?;
        inserted += res.rows_affected();
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_collapses_whitespace_and_strips_punctuation() {
        assert_eq!(sanitize_header("Part No."), "part_no");
        assert_eq!(sanitize_header("  Cant.  "), "cant");
        assert_eq!(sanitize_header("A  B-C"), "a_bc");
        assert_eq!(sanitize_header("Reemplazado?"), "reemplazado");
        assert_eq!(sanitize_header("___"), "___");
        assert_eq!(sanitize_header("..."), "");
    }

    #[test]
    fn derive_columns_discards_row_number_artifact_and_empties() {
        let header = vec![
            Data::Int(1), // row-number artifact
            Data::String("Code".into()),
            Data::String("...".into()), // sanitizes to nothing
            Data::String("Part No.".into()),
        ];
        let (columns, kept) = derive_columns(&header).unwrap();
        assert_eq!(columns, vec!["code", "part_no"]);
        assert_eq!(kept, vec![1, 3]);
    }

    #[test]
    fn derive_columns_rejects_duplicate_names() {
        let header = vec![
            Data::Int(1),
            Data::String("Part No.".into()),
            Data::String("part  no".into()),
        ];
        assert!(derive_columns(&header).is_err());
    }

    #[test]
    fn extract_rows_skips_exact_duplicates_and_fills_missing_cells() {
        let a: Vec<Data> = vec![
            Data::Int(1),
            Data::String("6093053".into()),
            Data::String("41092".into()),
        ];
        let b: Vec<Data> = vec![
            Data::Int(2),
            Data::String("6093053".into()),
            Data::String("41092".into()),
        ];
        let short: Vec<Data> = vec![Data::Int(3), Data::String("3001".into())];
        let rows = extract_rows(
            &[1, 2],
            &[a.as_slice(), b.as_slice(), short.as_slice()],
        );
        // a and b project to the same values once the row number is dropped.
        assert_eq!(
            rows,
            vec![
                vec!["6093053".to_string(), "41092".to_string()],
                vec!["3001".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn numeric_cells_render_without_a_trailing_fraction() {
        assert_eq!(cell_to_string(&Data::Float(41092.0)), "41092");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
