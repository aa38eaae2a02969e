//! FILENAME: core/fast-export/src/validator.rs
//! PURPOSE: Structural eligibility gate for the fast export path.
//! CONTEXT: Pure predicate over the static report definition. A report that
//! fails any check must be exported by the full layout engine instead; there
//! is no partial fast-path execution.

use std::fmt;

use report_model::{Band, BandKind, Element, ElementId, Report, StyleExpression};

use crate::conf::{is_allowed_preprocessor, is_allowed_style_expression, PAGE_FUNCTION};
use crate::logging::CATEGORY;

/// One reason why a report cannot take the fast path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ineligibility {
    /// A style expression outside the allow-list.
    StyleExpression { element: ElementId, type_name: String },
    /// A report pre-processor outside the allow-list.
    PreProcessor { type_name: String },
    /// A sub-report placed inline instead of in a root band's sub-report slot.
    InlineSubReport { element: ElementId },
    /// A cross-tabulation band.
    Crosstab { band: ElementId },
    /// A report function listening to page events.
    PageEventFunction { name: String, type_name: String },
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::StyleExpression { element, type_name } => {
                write!(f, "element {} uses style expression '{}'", element, type_name)
            }
            Ineligibility::PreProcessor { type_name } => {
                write!(f, "pre-processor '{}' is not supported", type_name)
            }
            Ineligibility::InlineSubReport { element } => {
                write!(f, "sub-report {} is inline", element)
            }
            Ineligibility::Crosstab { band } => write!(f, "band {} is a crosstab", band),
            Ineligibility::PageEventFunction { name, type_name } => {
                write!(f, "function '{}' ({}) listens to page events", name, type_name)
            }
        }
    }
}

/// Collects every reason the report cannot take the fast path, including
/// reasons found inside banded sub-report definitions.
pub fn validate(report: &Report) -> Vec<Ineligibility> {
    let mut reasons = Vec::new();
    validate_report(report, &mut reasons);
    reasons
}

/// True when the report can be exported without the layout engine.
pub fn is_eligible(report: &Report) -> bool {
    let reasons = validate(report);
    for reason in &reasons {
        log_debug!(CATEGORY, "report '{}' not eligible: {}", report.name, reason);
    }
    reasons.is_empty()
}

fn validate_report(report: &Report, reasons: &mut Vec<Ineligibility>) {
    for type_name in &report.preprocessors {
        if !is_allowed_preprocessor(type_name) {
            reasons.push(Ineligibility::PreProcessor {
                type_name: type_name.clone(),
            });
        }
    }

    for function in &report.functions {
        if function.listens_to_page_events && function.type_name != PAGE_FUNCTION {
            reasons.push(Ineligibility::PageEventFunction {
                name: function.name.clone(),
                type_name: function.type_name.clone(),
            });
        }
    }

    for band in report.root_bands() {
        validate_band(band, true, reasons);
    }
}

fn validate_band(band: &Band, is_root: bool, reasons: &mut Vec<Ineligibility>) {
    if band.kind == BandKind::Crosstab {
        reasons.push(Ineligibility::Crosstab { band: band.id });
    }
    check_expressions(band.id, &band.style_expressions, reasons);

    for child in &band.children {
        match child {
            Element::Band(inner) => validate_band(inner, false, reasons),
            Element::Leaf(leaf) => check_expressions(leaf.id, &leaf.style_expressions, reasons),
            Element::SubReport(sub) => {
                reasons.push(Ineligibility::InlineSubReport { element: sub.id })
            }
        }
    }

    // Only the sub-report slot of a root band is processed as a banded
    // structure; anywhere else the sub-report would need inline layout.
    for sub in &band.subreports {
        if is_root {
            validate_report(&sub.report, reasons);
        } else {
            reasons.push(Ineligibility::InlineSubReport { element: sub.id });
        }
    }
}

fn check_expressions(
    element: ElementId,
    expressions: &[StyleExpression],
    reasons: &mut Vec<Ineligibility>,
) {
    for expr in expressions {
        if !is_allowed_style_expression(&expr.expression.type_name) {
            reasons.push(Ineligibility::StyleExpression {
                element,
                type_name: expr.expression.type_name.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::ROW_BANDING_FUNCTION;
    use report_model::{
        Bounds, Expression, IdGenerator, LeafElement, ReportFunction, SubReport,
    };

    fn banded_field(ids: &mut IdGenerator) -> LeafElement {
        LeafElement::field(ids.next_id(), Bounds::new(0, 0, 100, 20), "amount").with_expression(
            StyleExpression::new(
                "background-color",
                Expression::new("banding", ROW_BANDING_FUNCTION),
            ),
        )
    }

    #[test]
    fn test_row_banding_only_is_eligible() {
        let mut ids = IdGenerator::new();
        let mut report = Report::new("list", &mut ids);
        report.item_band.push(banded_field(&mut ids));

        assert!(is_eligible(&report));
        assert!(validate(&report).is_empty());
    }

    #[test]
    fn test_other_style_expression_is_rejected() {
        let mut ids = IdGenerator::new();
        let mut report = Report::new("list", &mut ids);
        let leaf = LeafElement::field(ids.next_id(), Bounds::default(), "amount").with_expression(
            StyleExpression::new("text-color", Expression::new("neg", "NegativeNumberFunction")),
        );
        let leaf_id = leaf.id;
        report.item_band.push(leaf);

        assert_eq!(
            validate(&report),
            vec![Ineligibility::StyleExpression {
                element: leaf_id,
                type_name: "NegativeNumberFunction".to_string(),
            }]
        );
    }

    #[test]
    fn test_inline_subreport_child_is_rejected() {
        let mut ids = IdGenerator::new();
        let mut report = Report::new("master", &mut ids);
        let sub = SubReport::new(ids.next_id(), Report::new("detail", &mut ids));
        let sub_id = sub.id;
        report.item_band.push(sub);

        assert!(!is_eligible(&report));
        assert_eq!(
            validate(&report),
            vec![Ineligibility::InlineSubReport { element: sub_id }]
        );
    }

    #[test]
    fn test_subreport_in_nested_band_slot_is_inline() {
        let mut ids = IdGenerator::new();
        let mut report = Report::new("master", &mut ids);
        let sub = SubReport::new(ids.next_id(), Report::new("detail", &mut ids));
        let sub_id = sub.id;
        let inner = Band::new(ids.next_id(), BandKind::Inline).with_subreport(sub);
        report.report_header.push(inner);

        assert_eq!(
            validate(&report),
            vec![Ineligibility::InlineSubReport { element: sub_id }]
        );
    }

    #[test]
    fn test_banded_subreport_is_validated_recursively() {
        let mut ids = IdGenerator::new();
        let mut report = Report::new("master", &mut ids);
        let mut detail = Report::new("detail", &mut ids);
        detail.item_band.push(banded_field(&mut ids));
        report
            .item_band
            .subreports
            .push(SubReport::new(ids.next_id(), detail.clone()));
        assert!(is_eligible(&report));

        detail.preprocessors.push("ScriptPreProcessor".to_string());
        report.item_band.subreports[0] = SubReport::new(ids.next_id(), detail);
        assert_eq!(
            validate(&report),
            vec![Ineligibility::PreProcessor {
                type_name: "ScriptPreProcessor".to_string()
            }]
        );
    }

    #[test]
    fn test_preprocessor_allow_list() {
        let mut ids = IdGenerator::new();
        let mut report = Report::new("list", &mut ids);
        report.preprocessors = vec![
            "RelationalAutoGeneratorPreProcessor".to_string(),
            "WizardProcessor".to_string(),
        ];
        assert!(is_eligible(&report));

        report.preprocessors.push("CrosstabPreProcessor".to_string());
        assert!(!is_eligible(&report));
    }

    #[test]
    fn test_crosstab_band_is_rejected() {
        let mut ids = IdGenerator::new();
        let mut report = Report::new("list", &mut ids);
        let crosstab = Band::new(ids.next_id(), BandKind::Crosstab);
        let crosstab_id = crosstab.id;
        report.report_header.push(crosstab);

        assert_eq!(
            validate(&report),
            vec![Ineligibility::Crosstab { band: crosstab_id }]
        );
    }

    #[test]
    fn test_page_event_functions() {
        let mut ids = IdGenerator::new();
        let mut report = Report::new("list", &mut ids);
        report
            .functions
            .push(ReportFunction::new("page", PAGE_FUNCTION).with_page_events());
        report.functions.push(ReportFunction::new("sum", "ItemSumFunction"));
        assert!(is_eligible(&report));

        report
            .functions
            .push(ReportFunction::new("pages", "PageTotalFunction").with_page_events());
        assert_eq!(
            validate(&report),
            vec![Ineligibility::PageEventFunction {
                name: "pages".to_string(),
                type_name: "PageTotalFunction".to_string(),
            }]
        );
    }
}
