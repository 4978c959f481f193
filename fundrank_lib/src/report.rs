//! Styled xlsx report: one sheet per category, widths fitted at the end.

use std::path::Path;

use chrono::Datelike;
use rust_xlsxwriter::{Color, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::error::FundRankError;
use crate::highlight::{Emphasis, HighlightPlan};
use crate::model::{EnrichedFundRecord, FundCategoryResult, ReportColumn};

/// Fill of a top-N return cell.
pub const TOP_N_FILL: u32 = 0xFFFF00;
/// Fill of a strongly emphasized name cell.
pub const STRONG_FILL: u32 = 0xFFD700;

/// Characters added to the longest cell text of a column.
const WIDTH_PADDING: usize = 2;

/// Accumulates category sheets in one workbook.
///
/// Column widths are tracked while sheets are written and applied to every
/// sheet by [`ReportWriter::finish`].
pub struct ReportWriter {
    workbook: Workbook,
    columns: Vec<ReportColumn>,
    sheets: Vec<SheetWidths>,
    header_format: Format,
    date_format: Format,
    top_n_format: Format,
    strong_format: Format,
}

struct SheetWidths {
    name: String,
    widths: Vec<usize>,
}

impl SheetWidths {
    fn observe(&mut self, col: usize, text: &str) {
        let len = text.chars().count();
        if len > self.widths[col] {
            self.widths[col] = len;
        }
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
            columns: ReportColumn::layout(),
            sheets: Vec::new(),
            header_format: Format::new()
                .set_bold()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center),
            date_format: Format::new().set_num_format("yyyy-mm-dd"),
            top_n_format: Format::new().set_background_color(Color::RGB(TOP_N_FILL)),
            strong_format: Format::new().set_background_color(Color::RGB(STRONG_FILL)),
        }
    }

    /// Names of the sheets written so far, in order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Writes one category as a new sheet.
    ///
    /// Returns `false` without touching the workbook when the category has no
    /// records.
    pub fn add_category(
        &mut self,
        result: &FundCategoryResult,
        plan: &HighlightPlan,
    ) -> Result<bool, FundRankError> {
        if result.is_empty() {
            tracing::info!("Category {} is empty, no sheet written", result.category);
            return Ok(false);
        }

        let name = result.sheet_name();
        let mut widths = SheetWidths {
            name: name.clone(),
            widths: vec![0; self.columns.len()],
        };

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&name)?;

        for (col, column) in self.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, column.header(), &self.header_format)?;
            widths.observe(col, column.header());
        }

        for (idx, record) in result.records.iter().enumerate() {
            let row = idx as u32 + 1;
            for (col, column) in self.columns.iter().enumerate() {
                let format = match column {
                    ReportColumn::Name => match plan.name_emphasis(idx) {
                        Emphasis::Strong => Some(&self.strong_format),
                        _ => None,
                    },
                    ReportColumn::Return(ret) => match plan.cell(idx, *ret) {
                        Emphasis::TopN => Some(&self.top_n_format),
                        _ => None,
                    },
                    _ => None,
                };
                if let Some(text) = write_cell(
                    worksheet,
                    row,
                    col as u16,
                    *column,
                    record,
                    format,
                    &self.date_format,
                )? {
                    widths.observe(col, &text);
                }
            }
        }

        tracing::info!("Wrote sheet {} with {} funds", name, result.records.len());
        self.sheets.push(widths);
        Ok(true)
    }

    /// Fits every sheet's column widths and saves the workbook to `path`.
    ///
    /// Returns `false` and writes nothing when no sheet was added.
    pub fn finish(mut self, path: &Path) -> Result<bool, FundRankError> {
        if self.sheets.is_empty() {
            tracing::warn!("No category produced rows, {} not written", path.display());
            return Ok(false);
        }
        for sheet in &self.sheets {
            let worksheet = self.workbook.worksheet_from_name(&sheet.name)?;
            for (col, width) in sheet.widths.iter().enumerate() {
                worksheet.set_column_width(col as u16, (width + WIDTH_PADDING) as f64)?;
            }
        }
        self.workbook.save(path)?;
        tracing::info!("Saved {} sheets to {}", self.sheets.len(), path.display());
        Ok(true)
    }
}

/// Writes one cell and returns the text its width is measured by.
/// Missing values leave the cell blank and return `None`.
fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    column: ReportColumn,
    record: &EnrichedFundRecord,
    format: Option<&Format>,
    date_format: &Format,
) -> Result<Option<String>, FundRankError> {
    let entry = &record.entry;
    match column {
        ReportColumn::Seq => number(worksheet, row, col, Some(entry.seq as f64), format),
        ReportColumn::Code => text(worksheet, row, col, Some(entry.code.as_str()), format),
        ReportColumn::Name => text(worksheet, row, col, entry.name.as_deref(), format),
        ReportColumn::NavDate => {
            let Some(date) = entry.nav_date else {
                return Ok(None);
            };
            let cell = ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8)?;
            worksheet.write_datetime_with_format(row, col, &cell, format.unwrap_or(date_format))?;
            Ok(Some(date.format("%Y-%m-%d").to_string()))
        }
        ReportColumn::UnitNav => number(worksheet, row, col, entry.unit_nav, format),
        ReportColumn::AccumNav => number(worksheet, row, col, entry.accum_nav, format),
        ReportColumn::Return(ret) => number(worksheet, row, col, entry.return_of(ret), format),
        ReportColumn::Fee => text(worksheet, row, col, entry.fee.as_deref(), format),
        ReportColumn::InceptionDate => {
            text(worksheet, row, col, record.inception_date.as_deref(), format)
        }
        ReportColumn::LatestSize => text(worksheet, row, col, record.latest_size.as_deref(), format),
    }
}

fn number(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
    format: Option<&Format>,
) -> Result<Option<String>, FundRankError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match format {
        Some(format) => worksheet.write_number_with_format(row, col, value, format)?,
        None => worksheet.write_number(row, col, value)?,
    };
    Ok(Some(value.to_string()))
}

fn text(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&str>,
    format: Option<&Format>,
) -> Result<Option<String>, FundRankError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match format {
        Some(format) => worksheet.write_string_with_format(row, col, value, format)?,
        None => worksheet.write_string(row, col, value)?,
    };
    Ok(Some(value.to_string()))
}
