use crate::dataset::Dataset;
use crate::error::LoadError;
use crate::types::{Column, RawRow, Record};
use crate::util::{parse_date_safe, parse_f64_safe, text_or};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
}

/// Read the policy sheet at `path` into a [`Dataset`].
///
/// Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) are opened by sheet
/// name. A `.csv` file is a workbook with a single sheet named after the
/// file stem.
pub fn load(path: &Path, sheet: &str) -> Result<(Dataset, LoadReport), LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path, sheet)?,
        "csv" => read_csv(path, sheet)?,
        other => {
            return Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: other.to_string(),
            })
        }
    };

    let (dataset, report) = clean(rows);
    info!(
        "loaded {} of {} rows from {} [{}]",
        report.loaded_rows,
        report.total_rows,
        path.display(),
        sheet
    );
    if report.skipped_rows > 0 {
        warn!(
            "{} rows skipped due to unparseable Investment or Rating",
            report.skipped_rows
        );
    }
    Ok((dataset, report))
}

fn check_header<'a, I>(header: I) -> Result<(), LoadError>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<String> = header.into_iter().map(|h| h.trim().to_string()).collect();
    let missing: Vec<String> = Column::ALL
        .iter()
        .filter(|c| !present.iter().any(|h| h == c.name()))
        .map(|c| c.name().to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::MissingColumns(missing))
    }
}

fn read_csv(path: &Path, sheet: &str) -> Result<Vec<RawRow>, LoadError> {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    if stem != sheet {
        return Err(LoadError::SheetNotFound {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
            available: vec![stem.to_string()],
        });
    }

    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(csv_err)?;
    let headers = rdr.headers().map_err(csv_err)?.clone();
    check_header(headers.iter())?;

    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawRow>() {
        rows.push(result.map_err(csv_err)?);
    }
    Ok(rows)
}

fn read_workbook(path: &Path, sheet: &str) -> Result<Vec<RawRow>, LoadError> {
    let wb_err = |source: calamine::Error| LoadError::Workbook {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(wb_err)?;
    let available = workbook.sheet_names();
    if !available.iter().any(|s| s == sheet) {
        return Err(LoadError::SheetNotFound {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
            available,
        });
    }
    let range = workbook.worksheet_range(sheet).map_err(wb_err)?;

    let mut lines = range.rows();
    let header: Vec<String> = match lines.next() {
        Some(cells) => cells.iter().map(cell_text).collect(),
        None => Vec::new(),
    };
    check_header(header.iter().map(String::as_str))?;

    let positions: Vec<(Column, usize)> = Column::ALL
        .iter()
        .filter_map(|c| header.iter().position(|h| h == c.name()).map(|i| (*c, i)))
        .collect();

    let rows = lines
        .map(|cells| {
            let mut raw = RawRow::default();
            for (column, idx) in &positions {
                if let Some(cell) = cells.get(*idx) {
                    raw.set(*column, cell_text(cell));
                }
            }
            raw
        })
        .collect();
    Ok(rows)
}

/// Render a workbook cell as the text a CSV export of it would contain.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        Data::DurationIso(s) => s.clone(),
    }
}

fn clean(rows: Vec<RawRow>) -> (Dataset, LoadReport) {
    let mut total_rows = 0usize;
    let mut skipped_rows = 0usize;
    let mut records = Vec::with_capacity(rows.len());

    for (idx, row) in rows.into_iter().enumerate() {
        if row.is_blank() {
            continue;
        }
        total_rows += 1;
        // Header is line 1 of the sheet.
        let line = idx + 2;

        let investment = match parse_f64_safe(row.investment.as_deref()) {
            Some(v) => v,
            None => {
                debug!("line {}: unparseable Investment {:?}", line, row.investment);
                skipped_rows += 1;
                continue;
            }
        };
        let rating = match parse_f64_safe(row.rating.as_deref()) {
            Some(v) => v,
            None => {
                debug!("line {}: unparseable Rating {:?}", line, row.rating);
                skipped_rows += 1;
                continue;
            }
        };
        let expiry = parse_date_safe(row.expiry.as_deref());
        if expiry.is_none() {
            debug!("line {}: no usable Expiry date {:?}", line, row.expiry);
        }

        records.push(Record {
            policy: text_or(row.policy.as_deref(), ""),
            expiry,
            location: text_or(row.location.as_deref(), ""),
            state: text_or(row.state.as_deref(), ""),
            region: text_or(row.region.as_deref(), ""),
            investment,
            construction: text_or(row.construction.as_deref(), ""),
            business_type: text_or(row.business_type.as_deref(), ""),
            earthquake: text_or(row.earthquake.as_deref(), ""),
            flood: text_or(row.flood.as_deref(), ""),
            rating,
        });
    }

    let report = LoadReport {
        total_rows,
        loaded_rows: records.len(),
        skipped_rows,
    };
    (Dataset::from_records(records), report)
}
