//! FILENAME: core/report-model/src/lib.rs
//! PURPOSE: Main library entry point for the report definition model.
//! CONTEXT: Re-exports public types and modules for use by the export crates.

pub mod attributes;
pub mod computed;
pub mod element;
pub mod expression;
pub mod report;
pub mod style;
pub mod value;

// Re-export commonly used types at the crate root
pub use attributes::{AttributeKey, AttributeValue, Attributes, CORE_NAMESPACE, ONLY_SHOW_CHANGING_VALUES};
pub use computed::{ComputedStyleTable, ComputedStyles, Fingerprint};
pub use element::{Band, BandKind, Bounds, Content, Element, ElementId, IdGenerator, LeafElement, SubReport};
pub use expression::{Expression, ReportFunction, StyleExpression};
pub use report::{Group, Report};
pub use style::{
    BorderEdge, BorderLineStyle, Color, StyleKey, StyleSheet, StyleValue, TextAlign, VerticalAlign,
};
pub use value::{DataRow, Value};
