//! State-aware grid builder

use log::{debug, warn};

use super::cell::{InputCell, InputRow, NormalizedTable, OutputCell, OutputRow};
use super::options::GridOptions;
use super::tracker::{ColumnSpanTracker, PendingRun};
use crate::utils::diagnostics::{CheckResult, Diagnostic, DiagnosticKind};
use crate::utils::error::{GridError, GridResult, SpanAxis};

/// State-aware grid builder
///
/// Consumes input rows one at a time and emits normalized rows in which
/// every column is covered by an origin cell, a continuation of a vertical
/// run opened above, or (for rows that ran out of cells early) a vacant
/// cell. State flows forward only: each row depends on the runs left open
/// by the rows before it.
#[derive(Debug, Clone)]
pub struct GridBuilder {
    /// Pending vertical runs per column
    tracker: ColumnSpanTracker,
    /// Width of the widest row emitted so far
    column_count: usize,
    /// Number of rows emitted so far
    rows_emitted: usize,
    /// Column limit from the options
    max_columns: usize,
    /// Absorbed irregularities
    diagnostics: CheckResult,
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GridBuilder {
    /// Create a builder with default options
    pub fn new() -> Self {
        Self::with_options(&GridOptions::default())
    }

    /// Create a builder with the given options
    pub fn with_options(options: &GridOptions) -> Self {
        GridBuilder {
            tracker: ColumnSpanTracker::new(),
            column_count: 0,
            rows_emitted: 0,
            max_columns: options.max_columns,
            diagnostics: CheckResult::new(),
        }
    }

    /// Width of the widest row emitted so far
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Number of rows emitted so far
    pub fn rows_emitted(&self) -> usize {
        self.rows_emitted
    }

    /// Pending vertical runs
    pub fn tracker(&self) -> &ColumnSpanTracker {
        &self.tracker
    }

    /// Diagnostics gathered so far
    pub fn diagnostics(&self) -> &CheckResult {
        &self.diagnostics
    }

    /// Normalize the next input row
    ///
    /// This method implements the state machine logic:
    /// 1. For each column position, check if a run from a previous row owns it
    /// 2. If owned: emit one continuation for the run's columns, consume them
    /// 3. If free: take the next input cell, open runs if rowspan > 1
    ///
    /// The row is validated before any state changes, so an error leaves the
    /// builder as it was.
    pub fn push_row<T>(&mut self, row: InputRow<T>) -> GridResult<OutputRow<T>> {
        let index = self.rows_emitted;
        self.validate(index, &row)?;

        let mut output = OutputRow::new(index);
        let mut input_iter = row.cells.into_iter();
        let mut current_col = 0;

        loop {
            if self.tracker.is_pending(current_col) {
                current_col = self.emit_continuation(&mut output, current_col);
            } else if let Some(cell) = input_iter.next() {
                current_col = self.emit_origin(&mut output, current_col, cell);
            } else {
                break;
            }
        }

        // Out of input: keep walking only while a run further right still
        // needs its continuation in this row.
        while self.tracker.has_pending_from(current_col) {
            if self.tracker.is_pending(current_col) {
                current_col = self.emit_continuation(&mut output, current_col);
            } else {
                self.report(
                    Diagnostic::warning(
                        DiagnosticKind::RowGap,
                        "row ran out of cells before a pending vertical run; column left vacant",
                    )
                    .with_location(index, current_col),
                );
                output.cells.push(OutputCell::Vacant {
                    column: current_col,
                });
                current_col += 1;
            }
        }

        self.record_width(index, current_col);
        self.rows_emitted += 1;

        debug!(
            "row {}: {} cell(s) covering {} of {} column(s)",
            index,
            output.cells.len(),
            current_col,
            self.column_count
        );

        Ok(output)
    }

    /// End the table, reporting runs that extend past the last row
    pub fn finish(mut self) -> CheckResult {
        for run in self.tracker.pending_runs() {
            let covered = self.rows_emitted - run.origin_row;
            let declared = covered.saturating_add(run.remaining_rows);
            self.report(
                Diagnostic::warning(
                    DiagnosticKind::TruncatedRun,
                    format!(
                        "rowspan {} extends {} row(s) past the end of the table",
                        declared, run.remaining_rows
                    ),
                )
                .with_location(run.origin_row, run.anchor)
                .with_suggestion(format!("use rowspan {}", covered)),
            );
        }
        self.diagnostics
    }

    /// Emit one continuation covering the contiguous columns of the run at `col`
    fn emit_continuation<T>(&mut self, output: &mut OutputRow<T>, col: usize) -> usize {
        let anchor = self.tracker.run_at(col).map_or(col, |(anchor, _)| anchor);
        let mut end = col;
        while self
            .tracker
            .run_at(end)
            .is_some_and(|(owner, _)| owner == anchor)
        {
            self.tracker.consume(end);
            end += 1;
        }

        output.cells.push(OutputCell::Continuation { columns: col..end });
        end
    }

    /// Emit an origin cell at `col`, clipped to the free columns it can claim
    fn emit_origin<T>(&mut self, output: &mut OutputRow<T>, col: usize, cell: InputCell<T>) -> usize {
        let width = self.free_width(col, cell.col_span);
        if width < cell.col_span {
            self.report(
                Diagnostic::warning(
                    DiagnosticKind::ClippedSpan,
                    format!(
                        "colspan {} clipped to {} by a vertical run from an earlier row",
                        cell.col_span, width
                    ),
                )
                .with_location(output.index, col + width),
            );
        }

        let columns = col..col + width;
        self.tracker.ensure_columns(columns.end);

        if cell.row_span > 1 {
            let run = PendingRun {
                origin_row: output.index,
                anchor: col,
                width,
                remaining_rows: cell.row_span - 1,
            };
            for c in columns.clone() {
                self.tracker.open(c, run);
            }
            debug!(
                "row {}: opened {}-row run over columns {:?}",
                output.index, cell.row_span, columns
            );
        }

        output.cells.push(OutputCell::Origin {
            content: cell.content,
            columns,
            vertical_merge_restart: cell.row_span > 1,
        });
        col + width
    }

    /// Consecutive free columns starting at `col`, at most `span`
    fn free_width(&self, col: usize, span: usize) -> usize {
        (col..col + span)
            .take_while(|&c| !self.tracker.is_pending(c))
            .count()
    }

    /// Width the row will reach, without touching any state
    fn measure<T>(&self, row: &InputRow<T>) -> usize {
        let mut col = 0;
        for cell in &row.cells {
            while self.tracker.is_pending(col) {
                col += 1;
            }
            col += self.free_width(col, cell.col_span);
        }
        let trailing_pending = (col..self.tracker.len())
            .rev()
            .find(|&c| self.tracker.is_pending(c))
            .map_or(col, |c| c + 1);
        col.max(trailing_pending)
    }

    fn validate<T>(&self, index: usize, row: &InputRow<T>) -> GridResult<()> {
        for (cell_idx, cell) in row.cells.iter().enumerate() {
            if cell.row_span < 1 {
                return Err(GridError::invalid_span(
                    index,
                    cell_idx,
                    SpanAxis::Row,
                    cell.row_span,
                ));
            }
            if cell.col_span < 1 {
                return Err(GridError::invalid_span(
                    index,
                    cell_idx,
                    SpanAxis::Column,
                    cell.col_span,
                ));
            }
            if cell.col_span > self.max_columns {
                return Err(GridError::TooWide {
                    row: index,
                    columns: cell.col_span,
                    limit: self.max_columns,
                });
            }
        }

        let columns = self.measure(row);
        if columns > self.max_columns {
            return Err(GridError::TooWide {
                row: index,
                columns,
                limit: self.max_columns,
            });
        }
        Ok(())
    }

    fn record_width(&mut self, index: usize, width: usize) {
        if width > self.column_count {
            if index > 0 {
                self.report(
                    Diagnostic::warning(
                        DiagnosticKind::WideRow,
                        format!(
                            "row covers {} columns but earlier rows cover {}; they are not repadded",
                            width, self.column_count
                        ),
                    )
                    .with_row(index),
                );
            }
            self.column_count = width;
        } else if width < self.column_count {
            self.report(
                Diagnostic::warning(
                    DiagnosticKind::ShortRow,
                    format!(
                        "row covers {} of {} columns",
                        width, self.column_count
                    ),
                )
                .with_row(index),
            );
        }
    }

    fn report(&mut self, diag: Diagnostic) {
        warn!("{}", diag);
        self.diagnostics.add(diag);
    }
}

/// Normalize a whole table
///
/// Returns one output row per input row. An empty input yields an empty
/// output.
pub fn normalize_table<T>(
    rows: impl IntoIterator<Item = InputRow<T>>,
) -> GridResult<Vec<OutputRow<T>>> {
    Ok(normalize_table_with_options(rows, &GridOptions::default())?.rows)
}

/// Normalize a whole table with custom options, keeping the diagnostics
pub fn normalize_table_with_options<T>(
    rows: impl IntoIterator<Item = InputRow<T>>,
    options: &GridOptions,
) -> GridResult<NormalizedTable<T>> {
    let mut builder = GridBuilder::with_options(options);
    let mut output = Vec::new();

    for row in rows {
        output.push(builder.push_row(row)?);
    }

    let column_count = builder.column_count();
    let diagnostics = builder.finish();

    if options.pad_short_rows {
        for row in &mut output {
            row.pad_to(column_count);
        }
    }

    Ok(NormalizedTable {
        rows: output,
        column_count,
        diagnostics,
    })
}
