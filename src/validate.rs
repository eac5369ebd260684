//! Schema validation for employer declarations
//!
//! The validator never fails: malformed input becomes a report with one
//! explanatory error, and a parsed tree is checked against every rule with
//! all violations accumulated. Only a missing root element short-circuits.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::node::XmlNode;
use crate::path::{extract, extract_text};
use crate::schema::{self, paths, AbsenceType};
use crate::xml;

/// Outcome of a validation run
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationReport {
    pub valid: bool,
    /// Human-readable rule violations in evaluation order
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    fn single(error: impl Into<String>) -> Self {
        Self::from_errors(vec![error.into()])
    }
}

/// Validate raw XML text against the declaration schema.
///
/// Parse failures and empty input yield a report with a single error
/// instead of propagating.
pub fn validate(text: &str) -> ValidationReport {
    if text.trim().is_empty() {
        return ValidationReport::single("The document is empty");
    }
    match xml::parse(text) {
        Ok(document) => validate_tree(&document),
        Err(err) => ValidationReport::single(format!("The document is not well-formed XML: {err}")),
    }
}

/// Validate an already parsed document node
pub fn validate_tree(document: &XmlNode) -> ValidationReport {
    let Some(root) = extract(document, schema::ROOT) else {
        return ValidationReport::single(format!("{} root element is missing", schema::ROOT));
    };

    let mut errors = Vec::new();
    check_root_attributes(root, &mut errors);
    check_sender(root, &mut errors);
    check_forms(root, &mut errors);
    check_absences(root, &mut errors);

    let report = ValidationReport::from_errors(errors);
    debug!(
        valid = report.valid,
        errors = report.errors.len(),
        "validated declaration"
    );
    report
}

fn check_root_attributes(root: &XmlNode, errors: &mut Vec<String>) {
    if root.attr(schema::XMLNS).is_none() {
        errors.push(format!(
            "{} must carry an {} attribute",
            schema::ROOT,
            schema::XMLNS
        ));
    }
    if root.attr(schema::XMLNS_XSI).is_none() {
        errors.push(format!(
            "{} must carry an {} attribute",
            schema::ROOT,
            schema::XMLNS_XSI
        ));
    }
}

fn check_sender(root: &XmlNode, errors: &mut Vec<String>) {
    required(root, paths::PROGRAM_NAME, paths::PROGRAM_NAME, errors);
    if let Some(org_id) = required(root, paths::SENDER_ORG_ID, paths::SENDER_ORG_ID, errors) {
        if !twelve_digits().is_match(org_id) {
            errors.push(format!(
                "{} must be exactly 12 digits",
                paths::SENDER_ORG_ID
            ));
        }
    }
    required(root, paths::CREATED, paths::CREATED, errors);
    required(root, paths::CONTACT_NAME, paths::CONTACT_NAME, errors);
    required(root, paths::CONTACT_PHONE, paths::CONTACT_PHONE, errors);
    if let Some(email) = required(root, paths::CONTACT_EMAIL, paths::CONTACT_EMAIL, errors) {
        if !email_shape().is_match(email) {
            errors.push(format!(
                "{} is not a valid email address",
                paths::CONTACT_EMAIL
            ));
        }
    }
}

fn check_forms(root: &XmlNode, errors: &mut Vec<String>) {
    let forms = root.children_named(schema::FORM);
    if forms.is_empty() {
        errors.push(format!(
            "The declaration contains no {} forms",
            schema::FORM
        ));
        return;
    }
    for (index, form) in forms.iter().enumerate() {
        let n = index + 1;
        let label = |path: &str| format!("{} {n}: {path}", schema::FORM);
        if let Some(owner) = required(form, paths::CASE_OWNER, &label(paths::CASE_OWNER), errors) {
            if !twelve_digits().is_match(owner) {
                errors.push(format!(
                    "{} must be exactly 12 digits",
                    label(paths::CASE_OWNER)
                ));
            }
        }
        required(form, paths::CASE_PERIOD, &label(paths::CASE_PERIOD), errors);
        if extract(form, schema::CONTENT).is_none_or(XmlNode::is_empty) {
            errors.push(format!("{} is missing or empty", label(schema::CONTENT)));
        }
    }
}

fn check_absences(root: &XmlNode, errors: &mut Vec<String>) {
    for (index, record) in root.children_named(schema::ABSENCE).iter().enumerate() {
        let n = index + 1;
        let label = |element: &str| format!("{} {n}: {element}", schema::ABSENCE);
        required(record, schema::EMPLOYER_ID, &label(schema::EMPLOYER_ID), errors);
        if let Some(recipient) =
            required(record, schema::RECIPIENT_ID, &label(schema::RECIPIENT_ID), errors)
        {
            if !twelve_digits().is_match(recipient) {
                errors.push(format!(
                    "{} must be exactly 12 digits",
                    label(schema::RECIPIENT_ID)
                ));
            }
        }
        required(record, schema::ABSENCE_DATE, &label(schema::ABSENCE_DATE), errors);
        required(
            record,
            schema::SPECIFICATION_NUMBER,
            &label(schema::SPECIFICATION_NUMBER),
            errors,
        );
        required(
            record,
            schema::REPORTING_PERIOD,
            &label(schema::REPORTING_PERIOD),
            errors,
        );
        let Some(raw_type) =
            required(record, schema::ABSENCE_TYPE, &label(schema::ABSENCE_TYPE), errors)
        else {
            continue;
        };
        let Some(absence_type) = AbsenceType::parse(raw_type) else {
            errors.push(format!(
                "{} must be {} or {}",
                label(schema::ABSENCE_TYPE),
                AbsenceType::Foraldrapenning,
                AbsenceType::TillfalligForaldrapenning
            ));
            continue;
        };
        let percent = absence_type.percent_element();
        let hours = absence_type.hours_element();
        if extract_text(record, percent).is_none() && extract_text(record, hours).is_none() {
            errors.push(format!(
                "{} {n}: {percent} or {hours} must be set for {absence_type}",
                schema::ABSENCE
            ));
        }
    }
}

/// Push a missing-or-empty error unless `path` resolves to non-blank text
fn required<'a>(
    node: &'a XmlNode,
    path: &str,
    label: &str,
    errors: &mut Vec<String>,
) -> Option<&'a str> {
    let value = extract_text(node, path);
    if value.is_none() {
        errors.push(format!("{label} is missing or empty"));
    }
    value
}

#[allow(clippy::expect_used)]
fn twelve_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{12}$").expect("digit regex must compile"))
}

#[allow(clippy::expect_used)]
fn email_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex must compile"))
}
