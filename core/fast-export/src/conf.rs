//! FILENAME: core/fast-export/src/conf.rs
//! PURPOSE: Fixed allow-lists of the fast-path eligibility gate.
//! CONTEXT: These are not user options. Anything outside them may depend on
//! the full layout engine and sends the report down the slow path.

/// Report pre-processors that only rewrite the definition before the run.
pub const ALLOWED_PREPROCESSORS: [&str; 2] =
    ["RelationalAutoGeneratorPreProcessor", "WizardProcessor"];

/// Style expression type computing alternating row fills.
pub const ROW_BANDING_FUNCTION: &str = "RowBandingFunction";

/// Style expression types the fast path can evaluate without layout.
pub const ALLOWED_STYLE_EXPRESSIONS: [&str; 1] = [ROW_BANDING_FUNCTION];

/// The only report function allowed to listen to page events.
pub const PAGE_FUNCTION: &str = "PageFunction";

pub fn is_allowed_preprocessor(type_name: &str) -> bool {
    ALLOWED_PREPROCESSORS.contains(&type_name)
}

pub fn is_allowed_style_expression(type_name: &str) -> bool {
    ALLOWED_STYLE_EXPRESSIONS.contains(&type_name)
}
