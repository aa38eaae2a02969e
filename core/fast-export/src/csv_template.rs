//! FILENAME: core/fast-export/src/csv_template.rs
//! PURPOSE: Template writing bands as CSV records.
//! CONTEXT: Each band is laid out on the shared column grid once and turned
//! into a placeholder template. The template is reused for every row while
//! the band's element snapshots stay value-equal; filling it only resolves
//! placeholder values.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use report_model::{Band, ElementId, LeafElement, Report};

use crate::context::RuntimeContext;
use crate::error::ExportResult;
use crate::layout::{placed_leaves, ColumnBreaks, GridLayout, GridSlot, PlacedLeaf};
use crate::logging::CATEGORY;
use crate::placeholder::{BandTemplate, RowCell, TemplatePlaceholderBuilder, TemplateToken};
use crate::sink::TextSink;
use crate::snapshot::{StyleChangeCache, StyleSnapshot};
use crate::template::Template;

struct CachedBand {
    snapshots: Vec<Rc<StyleSnapshot>>,
    template: Rc<BandTemplate>,
}

pub struct CsvTemplate<S: TextSink> {
    sink: S,
    columns: ColumnBreaks,
    changes: StyleChangeCache,
    bands: FxHashMap<ElementId, CachedBand>,
    measurement_pass: bool,
    finished: bool,
    templates_built: usize,
    filled_rows: usize,
    finished_rows: usize,
}

impl<S: TextSink> CsvTemplate<S> {
    pub fn new(sink: S) -> Self {
        CsvTemplate {
            sink,
            columns: ColumnBreaks::from_edges([]),
            changes: StyleChangeCache::new(),
            bands: FxHashMap::default(),
            measurement_pass: false,
            finished: false,
            templates_built: 0,
            filled_rows: 0,
            finished_rows: 0,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Number of band templates built (cache misses).
    pub fn templates_built(&self) -> usize {
        self.templates_built
    }

    /// Grid rows emitted so far.
    pub fn filled_rows(&self) -> usize {
        self.filled_rows
    }

    /// Emitted grid rows in which some element originates.
    pub fn finished_rows(&self) -> usize {
        self.finished_rows
    }

    fn band_template(
        &mut self,
        band: &Band,
        placed: &[PlacedLeaf<'_>],
        snapshots: Vec<Rc<StyleSnapshot>>,
    ) -> Rc<BandTemplate> {
        if let Some(cached) = self.bands.get(&band.id) {
            if same_snapshots(&cached.snapshots, &snapshots) {
                return Rc::clone(&cached.template);
            }
        }

        let template = Rc::new(build_band_template(&self.columns, placed, &snapshots));
        self.templates_built += 1;
        self.bands.insert(
            band.id,
            CachedBand {
                snapshots,
                template: Rc::clone(&template),
            },
        );
        template
    }
}

fn same_snapshots(cached: &[Rc<StyleSnapshot>], current: &[Rc<StyleSnapshot>]) -> bool {
    cached.len() == current.len()
        && cached
            .iter()
            .zip(current)
            .all(|(a, b)| Rc::ptr_eq(a, b) || a == b)
}

fn build_band_template(
    columns: &ColumnBreaks,
    placed: &[PlacedLeaf<'_>],
    snapshots: &[Rc<StyleSnapshot>],
) -> BandTemplate {
    // Hidden elements keep their rows; their cells stay empty.
    let bounds: Vec<_> = placed.iter().map(|p| p.bounds).collect();
    let layout = GridLayout::build_masked(columns, &bounds, |item| {
        snapshots.get(item).map_or(true, |snapshot| snapshot.is_visible())
    });

    let mut builder = TemplatePlaceholderBuilder::new();
    let mut cells = Vec::with_capacity(layout.columns());
    for row in 0..layout.rows() {
        cells.clear();
        for col in 0..layout.columns() {
            cells.push(match layout.slot(row, col) {
                GridSlot::Origin(item) => {
                    let leaf = placed[item].leaf;
                    if leaf.content.has_content() {
                        RowCell::Content(leaf.id)
                    } else {
                        RowCell::Decoration(leaf.id)
                    }
                }
                GridSlot::Covered(_) => RowCell::Covered,
                GridSlot::Empty => RowCell::Empty,
            });
        }
        builder.add_row(&cells);
    }
    builder.build()
}

impl<S: TextSink> Template for CsvTemplate<S> {
    fn initialize(
        &mut self,
        report: &Report,
        _ctx: &RuntimeContext<'_>,
        is_measurement_pass: bool,
    ) -> ExportResult<()> {
        self.columns = ColumnBreaks::from_report(report);
        self.changes.clear();
        self.bands.clear();
        self.measurement_pass = is_measurement_pass;
        self.finished = false;
        log_debug!(
            CATEGORY,
            "csv template for '{}': {} column(s)",
            report.name,
            self.columns.column_count()
        );
        Ok(())
    }

    fn write(&mut self, band: &Band, ctx: &RuntimeContext<'_>) -> ExportResult<()> {
        if self.measurement_pass {
            return Ok(());
        }

        let placed = placed_leaves(band);
        let snapshots: Vec<Rc<StyleSnapshot>> = placed
            .iter()
            .map(|p| {
                let keys = ctx.dynamic_keys(band.id, p.leaf.id);
                self.changes.snapshot(p.leaf.id, keys, ctx.styles)
            })
            .collect();
        let template = self.band_template(band, &placed, snapshots);

        let leaves: FxHashMap<ElementId, &LeafElement> =
            placed.iter().map(|p| (p.leaf.id, p.leaf)).collect();
        for token in template.tokens() {
            match token {
                TemplateToken::Separator => self.sink.write_empty_field()?,
                TemplateToken::Placeholder(id) => match leaves.get(id) {
                    Some(leaf) => self.sink.write_field(&ctx.value_of(leaf).to_string())?,
                    None => self.sink.write_empty_field()?,
                },
                TemplateToken::LineEnd => self.sink.end_record()?,
            }
        }

        self.filled_rows += template.filled_rows();
        self.finished_rows += template.finished_rows();
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<()> {
        if self.finished || self.measurement_pass {
            return Ok(());
        }
        self.sink.flush()?;
        self.finished = true;
        log_debug!(
            CATEGORY,
            "csv template finished: {} row(s), {} band template(s) built, snapshot hits {} / misses {}",
            self.filled_rows,
            self.templates_built,
            self.changes.hits(),
            self.changes.misses()
        );
        Ok(())
    }
}
