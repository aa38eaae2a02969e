//! FILENAME: core/report-model/src/element.rs
//! PURPOSE: The report element tree: bands, leaf elements and sub-reports.
//! CONTEXT: The tree is a closed set of shapes (`Element`). Passes over the
//! tree (validation, analysis, layout) match on it exhaustively.
//! Identity tokens (`ElementId`) are assigned once and survive `Clone`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::attributes::{AttributeKey, AttributeValue, Attributes};
use crate::expression::StyleExpression;
use crate::report::Report;
use crate::style::{StyleKey, StyleSheet, StyleValue};

// ============================================================================
// IDENTITY
// ============================================================================

/// Stable identity token of a report node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out unique ids while a report definition is being built.
/// Scoped to one definition; there is no global counter.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator { next: 1 }
    }

    pub fn next_id(&mut self) -> ElementId {
        let id = ElementId(self.next.max(1));
        self.next = id.0 + 1;
        id
    }
}

// ============================================================================
// GEOMETRY AND CONTENT
// ============================================================================

/// Design-time position relative to the parent band, in 1/1000 pt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Bounds { x, y, width, height }
    }

    /// Right edge, clamped to the coordinate range.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Moves the bounds by the origin of the enclosing band.
    pub fn offset(&self, dx: u32, dy: u32) -> Bounds {
        Bounds::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }
}

/// What a leaf element displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Content {
    /// Static text.
    Label(String),
    /// Value of a data field of the current row.
    Field(String),
}

impl Content {
    /// Whether the element produces content at all. An empty label is
    /// decoration only.
    pub fn has_content(&self) -> bool {
        match self {
            Content::Label(text) => !text.is_empty(),
            Content::Field(_) => true,
        }
    }
}

// ============================================================================
// ELEMENT SHAPES
// ============================================================================

/// Structural role of a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BandKind {
    PageHeader,
    ReportHeader,
    GroupHeader,
    GroupFooter,
    DetailsHeader,
    ItemBand,
    DetailsFooter,
    NoData,
    ReportFooter,
    PageFooter,
    /// A band nested inside another band.
    Inline,
    /// Cross-tabulation section.
    Crosstab,
}

/// A leaf element (text field, label, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafElement {
    pub id: ElementId,
    #[serde(default)]
    pub name: Option<String>,
    pub bounds: Bounds,
    pub content: Content,
    #[serde(default)]
    pub style: StyleSheet,
    #[serde(default)]
    pub style_expressions: Vec<StyleExpression>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl LeafElement {
    pub fn label(id: ElementId, bounds: Bounds, text: impl Into<String>) -> Self {
        LeafElement::new(id, bounds, Content::Label(text.into()))
    }

    pub fn field(id: ElementId, bounds: Bounds, field: impl Into<String>) -> Self {
        LeafElement::new(id, bounds, Content::Field(field.into()))
    }

    pub fn new(id: ElementId, bounds: Bounds, content: Content) -> Self {
        LeafElement {
            id,
            name: None,
            bounds,
            content,
            style: StyleSheet::default(),
            style_expressions: Vec::new(),
            attributes: Attributes::default(),
        }
    }

    pub fn with_style(mut self, key: StyleKey, value: StyleValue) -> Self {
        self.style.set(key, value);
        self
    }

    pub fn with_expression(mut self, expression: StyleExpression) -> Self {
        self.style_expressions.push(expression);
        self
    }

    pub fn with_attribute(mut self, key: AttributeKey, value: AttributeValue) -> Self {
        self.attributes.set(key, value);
        self
    }
}

/// A structural section holding child elements. `subreports` is the band's
/// designated sub-report slot; sub-reports there are processed after the
/// band itself has been written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub id: ElementId,
    pub kind: BandKind,
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default)]
    pub style: StyleSheet,
    #[serde(default)]
    pub style_expressions: Vec<StyleExpression>,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub children: Vec<Element>,
    #[serde(default)]
    pub subreports: Vec<SubReport>,
}

impl Band {
    pub fn new(id: ElementId, kind: BandKind) -> Self {
        Band {
            id,
            kind,
            bounds: Bounds::default(),
            style: StyleSheet::default(),
            style_expressions: Vec::new(),
            attributes: Attributes::default(),
            children: Vec::new(),
            subreports: Vec::new(),
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_child(mut self, child: impl Into<Element>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_style(mut self, key: StyleKey, value: StyleValue) -> Self {
        self.style.set(key, value);
        self
    }

    pub fn with_expression(mut self, expression: StyleExpression) -> Self {
        self.style_expressions.push(expression);
        self
    }

    pub fn with_subreport(mut self, subreport: SubReport) -> Self {
        self.subreports.push(subreport);
        self
    }

    pub fn push(&mut self, child: impl Into<Element>) {
        self.children.push(child.into());
    }

    /// True when the band has neither children nor sub-reports.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.subreports.is_empty()
    }
}

/// A nested report definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubReport {
    pub id: ElementId,
    #[serde(default)]
    pub bounds: Bounds,
    pub report: Box<Report>,
}

impl SubReport {
    pub fn new(id: ElementId, report: Report) -> Self {
        SubReport {
            id,
            bounds: Bounds::default(),
            report: Box::new(report),
        }
    }
}

/// Any node below a band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Band(Band),
    Leaf(LeafElement),
    SubReport(SubReport),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Band(band) => band.id,
            Element::Leaf(leaf) => leaf.id,
            Element::SubReport(sub) => sub.id,
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            Element::Band(band) => band.bounds,
            Element::Leaf(leaf) => leaf.bounds,
            Element::SubReport(sub) => sub.bounds,
        }
    }
}

impl From<Band> for Element {
    fn from(band: Band) -> Self {
        Element::Band(band)
    }
}

impl From<LeafElement> for Element {
    fn from(leaf: LeafElement) -> Self {
        Element::Leaf(leaf)
    }
}

impl From<SubReport> for Element {
    fn from(sub: SubReport) -> Self {
        Element::SubReport(sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generator_is_monotonic() {
        let mut ids = IdGenerator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
        assert_eq!(a, ElementId(1));
    }

    #[test]
    fn test_bounds_clamp_at_the_coordinate_range() {
        let far = Bounds::new(u32::MAX - 5, 7, 10, u32::MAX);
        assert_eq!(far.right(), u32::MAX);
        assert_eq!(far.bottom(), u32::MAX);
        assert_eq!(far.offset(100, 1), Bounds::new(u32::MAX, 8, 10, u32::MAX));
        assert_eq!(Bounds::new(1, 2, 3, 4).offset(10, 20), Bounds::new(11, 22, 3, 4));
    }

    #[test]
    fn test_clone_keeps_identity() {
        let leaf = LeafElement::label(ElementId(7), Bounds::new(0, 0, 10, 10), "Total");
        let copy = leaf.clone();
        assert_eq!(copy.id, leaf.id);
    }

    #[test]
    fn test_empty_label_has_no_content() {
        assert!(!Content::Label(String::new()).has_content());
        assert!(Content::Field("amount".into()).has_content());
    }
}
