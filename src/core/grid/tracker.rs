//! Per-column tracking of pending vertical runs

/// A vertical run owning one or more columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingRun {
    /// Row of the origin cell that opened the run
    pub origin_row: usize,
    /// Leftmost column of the run
    pub anchor: usize,
    /// Number of columns the run covers
    pub width: usize,
    /// Rows the run still has to cover; 0 means the column is free
    pub remaining_rows: usize,
}

/// Column coverage tracking: remaining rows each column is owned by a
/// vertical run opened in an earlier row
#[derive(Debug, Clone, Default)]
pub struct ColumnSpanTracker {
    slots: Vec<PendingRun>,
}

impl ColumnSpanTracker {
    pub fn new() -> Self {
        ColumnSpanTracker { slots: Vec::new() }
    }

    /// Number of columns seen so far
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether a run started in an earlier row still owns `col`
    pub fn is_pending(&self, col: usize) -> bool {
        self.slots.get(col).is_some_and(|s| s.remaining_rows > 0)
    }

    /// Rows still owed to `col`
    pub fn remaining_rows(&self, col: usize) -> usize {
        self.slots.get(col).map_or(0, |s| s.remaining_rows)
    }

    /// Anchor column and width of the run owning `col`
    pub fn run_at(&self, col: usize) -> Option<(usize, usize)> {
        self.slots
            .get(col)
            .filter(|s| s.remaining_rows > 0)
            .map(|s| (s.anchor, s.width))
    }

    /// Whether any column at or after `col` is pending
    pub fn has_pending_from(&self, col: usize) -> bool {
        self.slots
            .iter()
            .skip(col)
            .any(|s| s.remaining_rows > 0)
    }

    /// Grow to at least `columns` columns
    pub fn ensure_columns(&mut self, columns: usize) {
        if columns > self.slots.len() {
            self.slots.resize(columns, PendingRun::default());
        }
    }

    /// Record that `col` belongs to `run` for `run.remaining_rows` more rows
    pub fn open(&mut self, col: usize, run: PendingRun) {
        self.ensure_columns(col + 1);
        let slot = &mut self.slots[col];
        debug_assert_eq!(slot.remaining_rows, 0, "column {col} already has a pending run");
        *slot = run;
    }

    /// Fill `col` with one continuation row of its run
    ///
    /// # Panics
    ///
    /// Panics if no run owns `col`. Row building only consumes pending
    /// columns, so this indicates a bug in the builder.
    pub fn consume(&mut self, col: usize) {
        let slot = self
            .slots
            .get_mut(col)
            .filter(|s| s.remaining_rows > 0)
            .unwrap_or_else(|| panic!("consume called on column {col} with no pending run"));
        slot.remaining_rows -= 1;
        if slot.remaining_rows == 0 {
            *slot = PendingRun::default();
        }
    }

    /// Runs still open, one entry per run, ordered by anchor column
    pub fn pending_runs(&self) -> Vec<PendingRun> {
        let mut runs: Vec<PendingRun> = Vec::new();
        for (col, slot) in self.slots.iter().enumerate() {
            if slot.remaining_rows == 0 {
                continue;
            }
            let same_run = runs
                .last()
                .is_some_and(|run| run.anchor == slot.anchor && col < run.anchor + run.width);
            if !same_run {
                runs.push(*slot);
            }
        }
        runs
    }
}
