//! Workbook sink implementation
//!
//! `rust_xlsxwriter` can only write whole files, so the sink keeps every row in
//! memory and rewrites the workbook on each flush. An existing workbook is read
//! back with `calamine` when the sink is opened, which is what lets a new run
//! append after the rows of a previous one.

use crate::record::{Record, COLUMN_HEADERS};
use crate::storage::traits::{RecordSink, SinkError, SinkResult};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

/// Longest text Excel accepts in a single cell
pub const MAX_CELL_CHARS: usize = 32_767;

/// Header and rows read back from an existing workbook
#[derive(Debug, Clone, Default)]
pub struct WorkbookContents {
    /// Name of the first worksheet
    pub sheet_name: Option<String>,

    /// First row of the sheet; empty if the sheet has no cells
    pub header: Vec<String>,

    /// Every row after the header
    pub rows: Vec<Vec<String>>,
}

/// Reads the first worksheet of a workbook into strings
///
/// # Arguments
///
/// * `path` - Path to an existing `.xlsx` file
///
/// # Returns
///
/// * `Ok(WorkbookContents)` - Header and data rows of the first sheet
/// * `Err(SinkError)` - The file could not be opened or decoded
pub fn read_workbook(path: &Path) -> SinkResult<WorkbookContents> {
    let read_error = |message: String| SinkError::Read {
        path: path.display().to_string(),
        message,
    };

    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e: calamine::XlsxError| read_error(e.to_string()))?;
    let sheet_name = workbook.sheet_names().first().cloned();

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| read_error(e.to_string()))?,
        None => {
            return Ok(WorkbookContents {
                sheet_name,
                ..Default::default()
            })
        }
    };

    let mut table = range_to_strings(&range).into_iter();
    let header = table.next().unwrap_or_default();
    let rows = table.collect();

    Ok(WorkbookContents {
        sheet_name,
        header,
        rows,
    })
}

/// Converts a cell range to rows of strings, anchored at A1
fn range_to_strings(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((last_row, last_col)) = range.end() else {
        return Vec::new();
    };

    (0..=last_row)
        .map(|row| {
            (0..=last_col)
                .map(|col| {
                    range
                        .get_value((row, col))
                        .map(|cell| unescape_cell(&cell.to_string()))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect()
}

/// Reverses the `_xHHHH_` escaping applied to cell text on write
///
/// The writer stores control characters as `_xHHHH_` and literal `_xHHHH_`
/// text as `_x005F_xHHHH_`. The reader hands both back verbatim, so without
/// this every reopen and save would escape them again.
fn unescape_cell(value: &str) -> String {
    if !value.contains("_x") {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("_x") {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match decode_escape(candidate) {
            Some(c) => {
                out.push(c);
                rest = &candidate[7..];
            }
            None => {
                out.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decodes a leading `_xHHHH_` sequence
fn decode_escape(candidate: &str) -> Option<char> {
    if candidate.len() < 7 || candidate.as_bytes()[6] != b'_' {
        return None;
    }
    let hex = candidate.get(2..6)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    char::from_u32(u32::from_str_radix(hex, 16).ok()?)
}

/// Cuts a cell value to Excel's per-cell limit
fn clamp_cell(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((byte_index, _)) => &value[..byte_index],
        None => value,
    }
}

/// Append-only `.xlsx` record store
///
/// The sink is flushed on `close` and, as a last resort, when dropped with
/// unsaved rows, so an early return never loses the rows of the current page.
pub struct XlsxSink {
    path: PathBuf,
    sheet_name: String,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    dirty: bool,
}

impl XlsxSink {
    /// Opens the workbook at `path`, creating it if it does not exist
    ///
    /// An existing workbook keeps its sheet name, header and rows; new rows
    /// are appended after the last one. A new workbook gets the nine column
    /// headers in bold and is written immediately.
    pub fn open(path: &Path, sheet_name: &str) -> SinkResult<Self> {
        if path.exists() {
            let contents = read_workbook(path)?;
            let header = if contents.header.is_empty() {
                default_header()
            } else {
                contents.header
            };

            tracing::info!(
                "Reopened workbook {} with {} existing rows",
                path.display(),
                contents.rows.len()
            );

            return Ok(Self {
                path: path.to_path_buf(),
                sheet_name: contents.sheet_name.unwrap_or_else(|| sheet_name.to_string()),
                header,
                rows: contents.rows,
                dirty: false,
            });
        }

        tracing::info!("Creating workbook {}", path.display());
        let mut sink = Self {
            path: path.to_path_buf(),
            sheet_name: sheet_name.to_string(),
            header: default_header(),
            rows: Vec::new(),
            dirty: true,
        };
        sink.flush()?;
        Ok(sink)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Flushes pending rows and releases the sink
    pub fn close(mut self) -> SinkResult<()> {
        if self.dirty {
            self.flush()?;
        }
        Ok(())
    }

    /// Writes the whole workbook to a sibling temp file, then renames it over
    /// the target
    fn save(&self) -> SinkResult<()> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (col, title) in self.header.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, title.as_str(), &bold)?;
        }

        for (index, row) in self.rows.iter().enumerate() {
            let row_num = (index + 1) as u32;
            for (col, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let cell = clamp_cell(value);
                if cell.len() < value.len() {
                    tracing::warn!(
                        "Truncated cell at row {}, column {} to {} characters",
                        row_num + 1,
                        col + 1,
                        MAX_CELL_CHARS
                    );
                }
                worksheet.write_string(row_num, col as u16, cell)?;
            }
        }

        let tmp_path = temp_path(&self.path);
        workbook.save(&tmp_path)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl RecordSink for XlsxSink {
    fn append(&mut self, record: &Record) -> SinkResult<()> {
        self.rows
            .push(record.to_row().iter().map(|cell| cell.to_string()).collect());
        self.dirty = true;
        Ok(())
    }

    fn flush(&mut self) -> SinkResult<()> {
        self.save()?;
        self.dirty = false;
        tracing::debug!(
            "Saved {} rows to {}",
            self.rows.len(),
            self.path.display()
        );
        Ok(())
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl Drop for XlsxSink {
    fn drop(&mut self) {
        if !self.dirty {
            return;
        }
        match self.save() {
            Ok(()) => tracing::info!(
                "Saved {} rows to {} on shutdown",
                self.rows.len(),
                self.path.display()
            ),
            Err(e) => tracing::error!(
                "Failed to save workbook {} on shutdown: {}",
                self.path.display(),
                e
            ),
        }
    }
}

fn default_header() -> Vec<String> {
    COLUMN_HEADERS.iter().map(|h| h.to_string()).collect()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
