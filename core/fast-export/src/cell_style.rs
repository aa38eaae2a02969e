//! FILENAME: core/fast-export/src/cell_style.rs
//! PURPOSE: Flyweight cache of native spreadsheet cell styles.
//! CONTEXT: Building a native style is expensive for most spreadsheet
//! writers, and workbooks cap the number of distinct styles. Cells that look
//! identical share one handle. The key is composed so that two cells share a
//! handle only when their visual result is identical.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use report_model::{BorderEdge, Color, ElementId, LeafElement};

use crate::sink::CellFormatSpec;
use crate::snapshot::StyleSnapshot;

/// Borders and fill of one cell. Compared by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellBackground {
    pub top: BorderEdge,
    pub right: BorderEdge,
    pub bottom: BorderEdge,
    pub left: BorderEdge,
    pub fill: Color,
}

impl Default for CellBackground {
    fn default() -> Self {
        CellBackground::none()
    }
}

impl CellBackground {
    pub const fn none() -> Self {
        CellBackground {
            top: BorderEdge::none(),
            right: BorderEdge::none(),
            bottom: BorderEdge::none(),
            left: BorderEdge::none(),
            fill: Color::transparent(),
        }
    }

    pub fn filled(fill: Color) -> Self {
        CellBackground {
            fill,
            ..CellBackground::none()
        }
    }

    pub fn from_spec(spec: &CellFormatSpec) -> Self {
        CellBackground {
            top: spec.border_top,
            right: spec.border_right,
            bottom: spec.border_bottom,
            left: spec.border_left,
            fill: spec.fill,
        }
    }

    /// The background of the cell at (`row`, `col`) inside a span of
    /// `row_span` x `col_span` cells: the fill everywhere, each border only on
    /// the span's outer edge.
    pub fn for_position(&self, row: usize, col: usize, row_span: usize, col_span: usize) -> Self {
        let keep = |edge: BorderEdge, on_edge: bool| {
            if on_edge {
                edge
            } else {
                BorderEdge::none()
            }
        };
        CellBackground {
            top: keep(self.top, row == 0),
            right: keep(self.right, col + 1 >= col_span),
            bottom: keep(self.bottom, row + 1 >= row_span),
            left: keep(self.left, col == 0),
            fill: self.fill,
        }
    }

    /// Writes the borders and fill back into a format spec.
    pub fn apply_to(&self, spec: &mut CellFormatSpec) {
        spec.border_top = self.top;
        spec.border_right = self.right;
        spec.border_bottom = self.bottom;
        spec.border_left = self.left;
        spec.fill = self.fill;
    }

    pub fn is_blank(&self) -> bool {
        self.fill.is_transparent()
            && !self.top.is_visible()
            && !self.right.is_visible()
            && !self.bottom.is_visible()
            && !self.left.is_visible()
    }
}

// ============================================================================
// KEY
// ============================================================================

/// Cache key of a cell style: intrinsic identity, background and the
/// element's current dynamic style values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellStyleKey {
    pub identity: ElementId,
    pub background: CellBackground,
    pub styling: StyleSnapshot,
}

impl CellStyleKey {
    /// Identity is the element's id when the cell has an element, otherwise
    /// the caller's fallback (typically the band id).
    pub fn new(fallback: ElementId, element: Option<&LeafElement>, background: CellBackground) -> Self {
        CellStyleKey {
            identity: element.map(|e| e.id).unwrap_or(fallback),
            background,
            styling: StyleSnapshot::default(),
        }
    }

    pub fn with_styling(mut self, snapshot: &StyleSnapshot) -> Self {
        self.styling = snapshot.clone();
        self
    }
}

// ============================================================================
// CACHE
// ============================================================================

/// Style handles of one run. Entries are never replaced.
#[derive(Debug)]
pub struct CellStyleCache<H> {
    entries: FxHashMap<CellStyleKey, Rc<H>>,
    constructed: usize,
}

impl<H> Default for CellStyleCache<H> {
    fn default() -> Self {
        CellStyleCache {
            entries: FxHashMap::default(),
            constructed: 0,
        }
    }
}

impl<H> CellStyleCache<H> {
    pub fn new() -> Self {
        CellStyleCache::default()
    }

    /// Returns the cached handle, constructing it only on a miss.
    pub fn get_or_create<F>(&mut self, key: CellStyleKey, create: F) -> Rc<H>
    where
        F: FnOnce() -> H,
    {
        if let Some(handle) = self.entries.get(&key) {
            return Rc::clone(handle);
        }
        self.constructed += 1;
        let handle = Rc::new(create());
        self.entries.insert(key, Rc::clone(&handle));
        handle
    }

    /// Shorthand for `get_or_create` with a key built from its parts.
    pub fn create_cell_style<F>(
        &mut self,
        fallback: ElementId,
        element: Option<&LeafElement>,
        background: CellBackground,
        create: F,
    ) -> Rc<H>
    where
        F: FnOnce() -> H,
    {
        self.get_or_create(CellStyleKey::new(fallback, element, background), create)
    }

    /// Number of native styles built so far.
    pub fn constructed(&self) -> usize {
        self.constructed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_model::Bounds;

    fn leaf(id: u64) -> LeafElement {
        LeafElement::label(ElementId(id), Bounds::new(0, 0, 10, 10), "x")
    }

    fn grey() -> CellBackground {
        CellBackground::filled(Color::new(0xE0, 0xE0, 0xE0))
    }

    #[test]
    fn test_same_element_same_background_hits() {
        let mut cache: CellStyleCache<String> = CellStyleCache::new();
        let element = leaf(1);

        let first = cache.create_cell_style(ElementId(100), Some(&element), grey(), || "a".into());
        let second = cache.create_cell_style(ElementId(100), Some(&element), grey(), || "b".into());

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.constructed(), 1);
    }

    #[test]
    fn test_different_background_misses() {
        let mut cache: CellStyleCache<String> = CellStyleCache::new();
        let element = leaf(1);

        let first = cache.create_cell_style(ElementId(100), Some(&element), grey(), || "a".into());
        let second = cache.create_cell_style(
            ElementId(100),
            Some(&element),
            CellBackground::none(),
            || "b".into(),
        );

        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(cache.constructed(), 2);
    }

    #[test]
    fn test_empty_cells_use_fallback_identity() {
        let mut cache: CellStyleCache<String> = CellStyleCache::new();

        let first = cache.create_cell_style(ElementId(7), None, grey(), || "a".into());
        let same = cache.create_cell_style(ElementId(7), None, grey(), || "b".into());
        let other = cache.create_cell_style(ElementId(8), None, grey(), || "c".into());

        assert!(Rc::ptr_eq(&first, &same));
        assert!(!Rc::ptr_eq(&first, &other));
        assert_eq!(cache.constructed(), 2);
    }

    #[test]
    fn test_different_elements_miss() {
        let mut cache: CellStyleCache<String> = CellStyleCache::new();
        let (a, b) = (leaf(1), leaf(2));

        let first = cache.create_cell_style(ElementId(100), Some(&a), grey(), || "a".into());
        let second = cache.create_cell_style(ElementId(100), Some(&b), grey(), || "b".into());

        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(cache.constructed(), 2);
    }

    #[test]
    fn test_element_identity_wins_over_fallback() {
        let element = leaf(1);
        let key = CellStyleKey::new(ElementId(100), Some(&element), grey());
        assert_eq!(key.identity, ElementId(1));
        assert_eq!(CellStyleKey::new(ElementId(100), None, grey()).identity, ElementId(100));
    }

    #[test]
    fn test_borders_only_on_outer_edges() {
        let edge = BorderEdge::solid(1, Color::black());
        let boxed = CellBackground {
            top: edge,
            right: edge,
            bottom: edge,
            left: edge,
            fill: Color::white(),
        };

        let top_left = boxed.for_position(0, 0, 2, 2);
        assert!(top_left.top.is_visible() && top_left.left.is_visible());
        assert!(!top_left.right.is_visible() && !top_left.bottom.is_visible());

        let bottom_right = boxed.for_position(1, 1, 2, 2);
        assert!(bottom_right.bottom.is_visible() && bottom_right.right.is_visible());
        assert!(!bottom_right.top.is_visible() && !bottom_right.left.is_visible());
        assert_eq!(bottom_right.fill, Color::white());

        assert_eq!(boxed.for_position(0, 0, 1, 1), boxed);
    }
}
