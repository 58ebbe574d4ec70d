//! CSV workbook loader.
//!
//! A workbook is a directory holding one UTF-8 CSV file per sheet, named
//! `<sheet>.csv`. The main-line sheet is required; a missing branch sheet
//! means the feeder has no branches. Rows are turned into [`Segment`]s
//! through the configured [`FieldMappings`] and handed to
//! [`Topology::build`], so structural problems surface before any
//! calculation starts.

use crate::field_map::{BranchFieldMap, FieldMappings, MainFieldMap};
use crate::laying::parse_line_model;
use crate::settings::InputSettings;
use relia_core::{
    DiagnosticIssue, Diagnostics, LayingMethod, LayingMix, ReliaError, ReliaResult, Segment,
    Topology,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Validated topology plus non-fatal issues found while reading
#[derive(Debug)]
pub struct LoadResult {
    pub topology: Topology,
    pub diagnostics: Diagnostics,
}

/// Path of a sheet inside a workbook directory.
pub fn sheet_path(workbook: &Path, sheet: &str) -> PathBuf {
    workbook.join(format!("{sheet}.csv"))
}

/// Read both sheets of a workbook and build the feeder topology.
pub fn load_workbook(
    workbook: &Path,
    input: &InputSettings,
    mappings: &FieldMappings,
) -> ReliaResult<LoadResult> {
    if !workbook.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("workbook directory {} not found", workbook.display()),
        )
        .into());
    }
    let mut diagnostics = Diagnostics::new();

    let main_path = sheet_path(workbook, &input.main_sheet);
    let mut segments = read_main_sheet(&main_path, &mappings.main, input, &mut diagnostics)?;
    let trunk_count = segments.len();

    let branch_path = sheet_path(workbook, &input.branch_sheet);
    if branch_path.is_file() {
        segments.extend(read_branch_sheet(
            &branch_path,
            &mappings.branch,
            input,
            &mut diagnostics,
        )?);
    } else {
        let message = format!("branch sheet {} not found; feeder has no branches", branch_path.display());
        warn!("{}", message);
        diagnostics.add_warning("input", &message);
    }

    debug!(
        trunk = trunk_count,
        branch = segments.len() - trunk_count,
        "sheets read"
    );
    let topology = Topology::build(segments)?;
    info!(
        segments = topology.len(),
        branches = topology.branches().len(),
        customers = topology.total_customer_count(),
        "topology built"
    );

    Ok(LoadResult {
        topology,
        diagnostics,
    })
}

/// Read the main-line sheet into trunk segments.
pub fn read_main_sheet(
    path: &Path,
    fields: &MainFieldMap,
    input: &InputSettings,
    diagnostics: &mut Diagnostics,
) -> ReliaResult<Vec<Segment>> {
    let sheet = Sheet::read(path, "main")?;
    let id_col = sheet.column(&fields.id, "id")?;
    let seq_col = sheet.sequence_column(&fields.sequence, input, diagnostics)?;
    let length_col = sheet.column(&fields.length_km, "length_km")?;
    let customers_col = sheet.column(&fields.customers, "customers")?;
    let model_col = sheet.column(&fields.line_model, "line_model")?;
    let switch_col = sheet.switch_column(&fields.upstream_switch, input, diagnostics)?;
    let remote_col = sheet.column(&fields.remote_operable, "remote_operable")?;

    let mut segments = Vec::with_capacity(sheet.rows.len());
    for (ordinal, row) in sheet.rows.iter().enumerate() {
        let id = row.id(id_col, &sheet.name)?;
        let sequence = match seq_col {
            Some(col) => row.count(col, &id, "sequence")? as u32,
            None => ordinal as u32 + 1,
        };
        let segment = Segment::trunk(id.clone(), sequence);
        segments.push(row.fill(
            segment,
            &id,
            Columns {
                length: length_col,
                customers: customers_col,
                model: model_col,
                switch: switch_col,
                remote: remote_col,
            },
            diagnostics,
        )?);
    }
    Ok(segments)
}

/// Read the branch sheet into branch segments.
pub fn read_branch_sheet(
    path: &Path,
    fields: &BranchFieldMap,
    input: &InputSettings,
    diagnostics: &mut Diagnostics,
) -> ReliaResult<Vec<Segment>> {
    let sheet = Sheet::read(path, "branch")?;
    let id_col = sheet.column(&fields.id, "id")?;
    let seq_col = sheet.sequence_column(&fields.sequence, input, diagnostics)?;
    let branch_col = sheet.column(&fields.branch_id, "branch_id")?;
    let attach_col = sheet.column(&fields.attach_to, "attach_to")?;
    let length_col = sheet.column(&fields.length_km, "length_km")?;
    let customers_col = sheet.column(&fields.customers, "customers")?;
    let model_col = sheet.column(&fields.line_model, "line_model")?;
    let switch_col = sheet.switch_column(&fields.upstream_switch, input, diagnostics)?;
    let remote_col = sheet.column(&fields.remote_operable, "remote_operable")?;

    let mut next_in_branch: HashMap<String, u32> = HashMap::new();
    let mut segments = Vec::with_capacity(sheet.rows.len());
    for row in &sheet.rows {
        let id = row.id(id_col, &sheet.name)?;
        let branch = row.required(branch_col, &id, "branch_id")?.to_string();
        let counter = next_in_branch.entry(branch.clone()).or_insert(0);
        *counter += 1;
        let sequence = match seq_col {
            Some(col) => row.count(col, &id, "sequence")? as u32,
            None => *counter,
        };

        let mut segment = Segment::branch(id.clone(), branch, sequence);
        let attach = row.cell(attach_col);
        if !attach.is_empty() {
            segment = segment.attached_to(attach);
        }
        segments.push(row.fill(
            segment,
            &id,
            Columns {
                length: length_col,
                customers: customers_col,
                model: model_col,
                switch: switch_col,
                remote: remote_col,
            },
            diagnostics,
        )?);
    }
    Ok(segments)
}

struct Sheet {
    name: String,
    kind: &'static str,
    headers: HashMap<String, usize>,
    rows: Vec<Row>,
}

struct Row {
    line: u64,
    record: csv::StringRecord,
}

/// Column positions shared by both sheets
#[derive(Clone, Copy)]
struct Columns {
    length: usize,
    customers: usize,
    model: usize,
    switch: Option<usize>,
    remote: usize,
}

fn csv_error(path: &Path, err: csv::Error) -> ReliaError {
    let message = format!("{}: {err}", path.display());
    match err.into_kind() {
        csv::ErrorKind::Io(e) => std::io::Error::new(e.kind(), message).into(),
        _ => ReliaError::Parse(message),
    }
}

impl Sheet {
    fn read(path: &Path, kind: &'static str) -> ReliaResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| csv_error(path, e))?;

        let headers = reader
            .headers()
            .map_err(|e| csv_error(path, e))?
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim_start_matches('\u{feff}').trim().to_string(), i))
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| csv_error(path, e))?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            let line = record.position().map_or(0, |p| p.line());
            rows.push(Row { line, record });
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!(sheet = %name, rows = rows.len(), "sheet read");
        Ok(Self {
            name,
            kind,
            headers,
            rows,
        })
    }

    fn column(&self, header: &str, attribute: &str) -> ReliaResult<usize> {
        self.headers.get(header).copied().ok_or_else(|| {
            ReliaError::configuration(
                format!("field_mappings.{}.{attribute}", self.kind),
                format!("column '{header}' not found in {}", self.name),
            )
        })
    }

    /// `None` only when `input.assume_row_order` is set.
    fn sequence_column(
        &self,
        header: &str,
        input: &InputSettings,
        diagnostics: &mut Diagnostics,
    ) -> ReliaResult<Option<usize>> {
        if input.assume_row_order {
            self.assumed("sequence", "taken from row order", diagnostics);
            return Ok(None);
        }
        self.column(header, "sequence").map(Some)
    }

    /// `None` only when `input.assume_switch_per_row` is set.
    fn switch_column(
        &self,
        header: &str,
        input: &InputSettings,
        diagnostics: &mut Diagnostics,
    ) -> ReliaResult<Option<usize>> {
        if input.assume_switch_per_row {
            self.assumed("upstream_switch", "every row starts at a switch", diagnostics);
            return Ok(None);
        }
        self.column(header, "upstream_switch").map(Some)
    }

    fn assumed(&self, attribute: &str, assumption: &str, diagnostics: &mut Diagnostics) {
        let message = format!("{attribute} not read from {}: {assumption}", self.name);
        warn!("{}", message);
        diagnostics.add(DiagnosticIssue::new("input", message).with_entity(self.name.as_str()));
    }
}

impl Row {
    fn cell(&self, col: usize) -> &str {
        self.record.get(col).map_or("", str::trim)
    }

    fn id(&self, col: usize, sheet: &str) -> ReliaResult<String> {
        let id = self.cell(col);
        if id.is_empty() {
            return Err(ReliaError::invalid_field(
                format!("{sheet} line {}", self.line),
                "id",
                "segment id is blank",
            ));
        }
        Ok(id.to_string())
    }

    fn required(&self, col: usize, id: &str, field: &str) -> ReliaResult<&str> {
        let value = self.cell(col);
        if value.is_empty() {
            return Err(ReliaError::invalid_field(id, field, "value is blank"));
        }
        Ok(value)
    }

    fn number(&self, col: usize, id: &str, field: &str) -> ReliaResult<f64> {
        let raw = self.required(col, id, field)?;
        let value: f64 = raw.parse().map_err(|_| {
            ReliaError::invalid_field(id, field, format!("'{raw}' is not a number"))
        })?;
        if !value.is_finite() {
            return Err(ReliaError::invalid_field(id, field, format!("'{raw}' is not finite")));
        }
        if value < 0.0 {
            return Err(ReliaError::invalid_field(id, field, format!("{value} is negative")));
        }
        Ok(value)
    }

    fn count(&self, col: usize, id: &str, field: &str) -> ReliaResult<i64> {
        let value = self.number(col, id, field)?;
        if value.fract() != 0.0 || value > u32::MAX as f64 {
            return Err(ReliaError::invalid_field(
                id,
                field,
                format!("{value} is not a whole number"),
            ));
        }
        Ok(value as i64)
    }

    fn flag(&self, col: usize, id: &str, field: &str) -> ReliaResult<bool> {
        let raw = self.required(col, id, field)?;
        parse_bool(raw).ok_or_else(|| {
            ReliaError::invalid_field(id, field, format!("'{raw}' is not a yes/no value"))
        })
    }

    fn laying(&self, col: usize, id: &str, diagnostics: &mut Diagnostics) -> ReliaResult<LayingMix> {
        let raw = self.required(col, id, "line_model")?;
        Ok(parse_line_model(raw).unwrap_or_else(|| {
            let message = format!("line model '{raw}' names no conductor; assuming overhead");
            warn!(segment = id, "{}", message);
            diagnostics.add(
                DiagnosticIssue::new("laying", message)
                    .with_entity(id)
                    .with_line(self.line as usize),
            );
            LayingMix::pure(LayingMethod::Overhead)
        }))
    }

    fn fill(
        &self,
        segment: Segment,
        id: &str,
        cols: Columns,
        diagnostics: &mut Diagnostics,
    ) -> ReliaResult<Segment> {
        let segment = segment
            .with_length(self.number(cols.length, id, "length_km")?)
            .with_customers(self.count(cols.customers, id, "customers")?)
            .with_laying(self.laying(cols.model, id, diagnostics)?);

        let has_switch = match cols.switch {
            Some(col) => self.flag(col, id, "upstream_switch")?,
            None => true,
        };
        if !has_switch {
            return Ok(segment);
        }
        let remote = self.flag(cols.remote, id, "remote_operable")?;
        Ok(segment.with_upstream_switch(remote))
    }
}

/// Accepts true/false, 1/0, yes/no, 是/否 and 有/无.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "是" | "有" => Some(true),
        "false" | "0" | "no" | "n" | "否" | "无" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("是"), Some(true));
        assert_eq!(parse_bool("无"), Some(false));
        assert_eq!(parse_bool(" YES "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_sheet_path() {
        assert_eq!(
            sheet_path(Path::new("wb"), "主线"),
            PathBuf::from("wb/主线.csv")
        );
    }
}
