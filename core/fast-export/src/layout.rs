//! FILENAME: core/fast-export/src/layout.rs
//! PURPOSE: Maps band elements onto a table grid without a layout engine.
//! CONTEXT: Column breaks are shared by every band of a run so that columns
//! line up across headers, items and footers. Row breaks are per band. An
//! element occupies the rectangle of cells between the breaks enclosing its
//! design bounds; its top-left cell is the span origin.

use report_model::{Band, Bounds, Element, LeafElement, Report};

// ============================================================================
// BREAKS
// ============================================================================

/// Sorted, de-duplicated x positions that always start at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBreaks {
    edges: Vec<u32>,
}

impl ColumnBreaks {
    pub fn from_edges(edges: impl IntoIterator<Item = u32>) -> Self {
        ColumnBreaks {
            edges: normalize(edges),
        }
    }

    /// Collects the x edges of every design-visible element of every root
    /// band, including banded sub-reports.
    pub fn from_report(report: &Report) -> Self {
        let mut edges = Vec::new();
        collect_report_edges(report, &mut edges);
        ColumnBreaks::from_edges(edges)
    }

    pub fn edges(&self) -> &[u32] {
        &self.edges
    }

    pub fn column_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Column widths in design units.
    pub fn widths(&self) -> impl Iterator<Item = u32> + '_ {
        self.edges.windows(2).map(|pair| pair[1] - pair[0])
    }

    /// First column and column count covered by `[x, right)`.
    pub fn span(&self, x: u32, right: u32) -> Option<(usize, usize)> {
        locate(&self.edges, x, right)
    }
}

fn collect_report_edges(report: &Report, edges: &mut Vec<u32>) {
    for band in report.root_bands() {
        for placed in placed_leaves(band) {
            edges.push(placed.bounds.x);
            edges.push(placed.bounds.right());
        }
        for sub in &band.subreports {
            collect_report_edges(&sub.report, edges);
        }
    }
}

fn normalize(edges: impl IntoIterator<Item = u32>) -> Vec<u32> {
    let mut edges: Vec<u32> = std::iter::once(0).chain(edges).collect();
    edges.sort_unstable();
    edges.dedup();
    edges
}

/// Start index (greatest edge <= start) and cell count (up to the smallest
/// edge >= end, at least one).
fn locate(edges: &[u32], start: u32, end: u32) -> Option<(usize, usize)> {
    let cells = edges.len().checked_sub(1)?;
    let first = edges.partition_point(|e| *e <= start).checked_sub(1)?;
    if first >= cells {
        return None;
    }
    let last = edges.partition_point(|e| *e < end).min(cells);
    Some((first, last.saturating_sub(first).max(1)))
}

// ============================================================================
// PLACED ELEMENTS
// ============================================================================

/// A leaf element with bounds relative to the root band.
#[derive(Debug, Clone, Copy)]
pub struct PlacedLeaf<'a> {
    pub leaf: &'a LeafElement,
    pub bounds: Bounds,
}

/// Design-visible leaf elements of a band in document order. Nested bands
/// are flattened; sub-reports are not entered. Elements without area are
/// skipped.
pub fn placed_leaves(band: &Band) -> Vec<PlacedLeaf<'_>> {
    let mut out = Vec::new();
    collect_leaves(band, 0, 0, &mut out);
    out
}

fn collect_leaves<'a>(band: &'a Band, dx: u32, dy: u32, out: &mut Vec<PlacedLeaf<'a>>) {
    for child in &band.children {
        match child {
            Element::Band(inner) => {
                if inner.style.is_visible() {
                    collect_leaves(
                        inner,
                        dx.saturating_add(inner.bounds.x),
                        dy.saturating_add(inner.bounds.y),
                        out,
                    );
                }
            }
            Element::Leaf(leaf) => {
                if leaf.style.is_visible() && leaf.bounds.width > 0 && leaf.bounds.height > 0 {
                    out.push(PlacedLeaf {
                        leaf,
                        bounds: leaf.bounds.offset(dx, dy),
                    });
                }
            }
            Element::SubReport(_) => {}
        }
    }
}

// ============================================================================
// GRID
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSlot {
    Empty,
    /// Top-left cell of item `n`.
    Origin(usize),
    /// Cell inside the span of item `n`, other than its origin.
    Covered(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub item: usize,
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl Span {
    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }

    pub fn last_row(&self) -> usize {
        self.row + self.row_span - 1
    }

    pub fn last_col(&self) -> usize {
        self.col + self.col_span - 1
    }
}

/// Cell grid of one band.
#[derive(Debug, Clone)]
pub struct GridLayout {
    row_edges: Vec<u32>,
    columns: usize,
    slots: Vec<GridSlot>,
    spans: Vec<Option<Span>>,
}

impl GridLayout {
    /// Places `items` (bounds relative to the band, document order) on the
    /// shared columns. When two items claim the same origin cell the earlier
    /// one wins and the later one is dropped; overlapping cells keep their
    /// first owner.
    pub fn build(columns: &ColumnBreaks, items: &[Bounds]) -> Self {
        GridLayout::build_masked(columns, items, |_| true)
    }

    /// Like `build`, but only items for which `shown` holds are placed.
    /// Every item contributes row breaks, so hiding an element blanks its
    /// cells without changing the shape of the grid.
    pub fn build_masked(
        columns: &ColumnBreaks,
        items: &[Bounds],
        shown: impl Fn(usize) -> bool,
    ) -> Self {
        let row_edges = normalize(items.iter().flat_map(|b| [b.y, b.bottom()]));
        let rows = row_edges.len().saturating_sub(1);
        let cols = columns.column_count();
        let mut layout = GridLayout {
            row_edges,
            columns: cols,
            slots: vec![GridSlot::Empty; rows * cols],
            spans: vec![None; items.len()],
        };

        for (item, bounds) in items.iter().enumerate() {
            if !shown(item) {
                continue;
            }
            let Some((col, col_span)) = columns.span(bounds.x, bounds.right()) else {
                continue;
            };
            let Some((row, row_span)) = locate(&layout.row_edges, bounds.y, bounds.bottom())
            else {
                continue;
            };
            if layout.slot(row, col) != GridSlot::Empty {
                continue;
            }

            for r in row..row + row_span {
                for c in col..col + col_span {
                    let index = r * cols + c;
                    if layout.slots[index] == GridSlot::Empty {
                        layout.slots[index] = if r == row && c == col {
                            GridSlot::Origin(item)
                        } else {
                            GridSlot::Covered(item)
                        };
                    }
                }
            }
            layout.spans[item] = Some(Span {
                item,
                row,
                col,
                row_span,
                col_span,
            });
        }
        layout
    }

    pub fn rows(&self) -> usize {
        self.row_edges.len().saturating_sub(1)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn slot(&self, row: usize, col: usize) -> GridSlot {
        if row >= self.rows() || col >= self.columns {
            return GridSlot::Empty;
        }
        self.slots[row * self.columns + col]
    }

    /// The span of an item, or None when it was not placed.
    pub fn span_of(&self, item: usize) -> Option<&Span> {
        self.spans.get(item).and_then(Option::as_ref)
    }

    /// Row height in design units.
    pub fn row_height(&self, row: usize) -> u32 {
        match (self.row_edges.get(row), self.row_edges.get(row + 1)) {
            (Some(top), Some(bottom)) => bottom - top,
            _ => 0,
        }
    }

    /// True when some item originates in the row.
    pub fn row_has_origin(&self, row: usize) -> bool {
        (0..self.columns).any(|col| matches!(self.slot(row, col), GridSlot::Origin(_)))
    }
}
