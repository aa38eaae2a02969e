//! FILENAME: core/report-model/src/expression.rs
//! PURPOSE: Style expressions attached to elements and report-level functions.
//! CONTEXT: Expressions are identified by their type name. Evaluating them is
//! the job of the host's expression engine; the export pipeline only needs
//! to know which style key an expression targets and what type it is.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An expression instance: a type name plus its configured properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    pub name: String,
    pub type_name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Expression {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Expression {
            name: name.into(),
            type_name: type_name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// An expression computing one style property of the element it is attached to.
/// `style_key` is the registered key name (see `StyleKey::name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleExpression {
    pub style_key: String,
    pub expression: Expression,
}

impl StyleExpression {
    pub fn new(style_key: impl Into<String>, expression: Expression) -> Self {
        StyleExpression {
            style_key: style_key.into(),
            expression,
        }
    }
}

/// A report-level function (running totals, page counters, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFunction {
    pub name: String,
    pub type_name: String,
    /// Whether the function receives page-boundary events.
    #[serde(default)]
    pub listens_to_page_events: bool,
}

impl ReportFunction {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        ReportFunction {
            name: name.into(),
            type_name: type_name.into(),
            listens_to_page_events: false,
        }
    }

    pub fn with_page_events(mut self) -> Self {
        self.listens_to_page_events = true;
        self
    }
}
