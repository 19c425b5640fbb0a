use crate::domain::{CellValue, Record, RecordSink};
use crate::error::Result;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use rust_xlsxwriter::{Format, Formula, Workbook};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const DURATION_FORMAT: &str = "[h]:mm:ss";

/// A cell as read back from an existing workbook. Anything that isn't a plain
/// value keeps its own variant so rewriting the file doesn't flatten it.
#[derive(Debug, Clone, PartialEq)]
enum SheetCell {
    Value(CellValue),
    Bool(bool),
    DateTime { serial: f64, duration: bool },
    Formula { formula: String, cached: String },
}

impl SheetCell {
    const EMPTY: SheetCell = SheetCell::Value(CellValue::Empty);

    /// Text used to match header cells against record columns.
    fn label(&self) -> String {
        match self {
            SheetCell::Value(value) => value.to_string(),
            SheetCell::Bool(b) => b.to_string(),
            SheetCell::DateTime { serial, .. } => serial.to_string(),
            SheetCell::Formula { cached, .. } => cached.clone(),
        }
    }
}

impl From<&Data> for SheetCell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => SheetCell::EMPTY,
            Data::String(s) => SheetCell::Value(CellValue::Text(s.clone())),
            Data::Float(f) => SheetCell::Value(CellValue::Number(*f)),
            Data::Int(i) => SheetCell::Value(CellValue::Number(*i as f64)),
            Data::Bool(b) => SheetCell::Bool(*b),
            Data::DateTime(dt) => SheetCell::DateTime {
                serial: dt.as_f64(),
                duration: dt.is_duration(),
            },
            // ISO dates only come from ods files; error values only from formulas,
            // which are restored from the formula range below
            other => SheetCell::Value(CellValue::Text(other.to_string())),
        }
    }
}

type Grid = Vec<Vec<SheetCell>>;

struct Sheet {
    name: String,
    rows: Grid,
}

/// Appends records to one worksheet of an xlsx file. The workbook is read in
/// full, extended, and written back on every append so other sheets survive.
pub struct XlsxStore {
    path: PathBuf,
    sheet: String,
}

impl XlsxStore {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_sheets(&self) -> Result<Vec<Sheet>> {
        if !self.path.exists() {
            info!("Creating new spreadsheet {:?}", self.path);
            return Ok(Vec::new());
        }

        let mut workbook: Xlsx<_> = open_workbook(&self.path)?;
        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let values = workbook.worksheet_range(&name)?;
            let formulas = workbook.worksheet_formula(&name)?;
            sheets.push(Sheet {
                name,
                rows: grid_from_ranges(&values, &formulas),
            });
        }
        Ok(sheets)
    }

    fn save_sheets(&self, sheets: &[Sheet]) -> Result<()> {
        let mut workbook = Workbook::new();
        let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);
        let duration_format = Format::new().set_num_format(DURATION_FORMAT);

        for sheet in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(sheet.name.as_str())?;

            for (r, row) in sheet.rows.iter().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    let (r, c) = (r as u32, c as u16);
                    match cell {
                        SheetCell::Value(CellValue::Text(s)) => {
                            worksheet.write_string(r, c, s.as_str())?;
                        }
                        SheetCell::Value(CellValue::Number(n)) => {
                            worksheet.write_number(r, c, *n)?;
                        }
                        SheetCell::Value(CellValue::Empty) => {}
                        SheetCell::Bool(b) => {
                            worksheet.write_boolean(r, c, *b)?;
                        }
                        SheetCell::DateTime { serial, duration } => {
                            let format = if *duration {
                                &duration_format
                            } else {
                                &datetime_format
                            };
                            worksheet.write_number_with_format(r, c, *serial, format)?;
                        }
                        SheetCell::Formula { formula, cached } => {
                            let formula = Formula::new(formula.as_str()).set_result(cached.as_str());
                            worksheet.write_formula(r, c, formula)?;
                        }
                    }
                }
            }
        }

        // Save beside the target, then swap it in
        let tmp_path = self.path.with_extension("xlsx.tmp");
        workbook.save(&tmp_path)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl RecordSink for XlsxStore {
    fn append(&mut self, record: &Record) -> Result<()> {
        let mut sheets = self.load_sheets()?;

        let index = match sheets.iter().position(|s| s.name == self.sheet) {
            Some(index) => index,
            None => {
                sheets.push(Sheet {
                    name: self.sheet.clone(),
                    rows: Vec::new(),
                });
                sheets.len() - 1
            }
        };

        append_row(&mut sheets[index].rows, record);
        self.save_sheets(&sheets)?;

        debug!(
            "Appended row {} to {:?} ({})",
            sheets[index].rows.len() - 1,
            self.path,
            self.sheet
        );
        Ok(())
    }
}

fn put(grid: &mut Grid, row: usize, col: usize, cell: SheetCell) {
    if grid.len() <= row {
        grid.resize(row + 1, Vec::new());
    }
    let cells = &mut grid[row];
    if cells.len() <= col {
        cells.resize(col + 1, SheetCell::EMPTY);
    }
    cells[col] = cell;
}

/// Lays the cell values out at their absolute positions, then puts formulas
/// over the cells that hold them, keeping the value as the cached result.
fn grid_from_ranges(values: &Range<Data>, formulas: &Range<String>) -> Grid {
    let mut grid = Grid::new();

    if let Some((first_row, first_col)) = values.start() {
        for (r, c, data) in values.used_cells() {
            put(
                &mut grid,
                first_row as usize + r,
                first_col as usize + c,
                SheetCell::from(data),
            );
        }
    }

    if let Some((first_row, first_col)) = formulas.start() {
        for (r, c, formula) in formulas.used_cells() {
            if formula.is_empty() {
                continue;
            }
            let (row, col) = (first_row as usize + r, first_col as usize + c);
            let cached = grid
                .get(row)
                .and_then(|cells| cells.get(col))
                .map(SheetCell::label)
                .unwrap_or_default();
            let formula = formula.clone();
            put(&mut grid, row, col, SheetCell::Formula { formula, cached });
        }
    }

    grid
}

/// Writes the header on an empty sheet. Otherwise lines the record up with
/// the existing header by column name, adding any columns it doesn't have yet.
fn append_row(rows: &mut Grid, record: &Record) {
    if rows.is_empty() {
        rows.push(
            record
                .columns()
                .map(|column| SheetCell::Value(column.into()))
                .collect(),
        );
    }

    let header = &mut rows[0];
    for column in record.columns() {
        if !header.iter().any(|cell| cell.label() == column) {
            info!("Adding column '{}' to the sheet header", column);
            header.push(SheetCell::Value(column.into()));
        }
    }

    let row: Vec<SheetCell> = header
        .iter()
        .map(|cell| {
            record
                .get(&cell.label())
                .cloned()
                .map(SheetCell::Value)
                .unwrap_or(SheetCell::EMPTY)
        })
        .collect();
    rows.push(row);
}
