//! Case reconciliation: absence records matched to declaration forms
//!
//! A reconciliation session works on projections: [`extract_cases`] pulls
//! [`CaseRecord`]s out of a parsed document, the add and remove operations
//! produce new absence lists without touching their inputs, and
//! [`build_document`] folds the lists back into a fresh tree for the codec.

use tracing::debug;

use crate::error::{Error, Result};
use crate::node::{Children, XmlNode};
use crate::path::{extract, extract_text};
use crate::schema::{self, faltkod, paths, AbsenceType};

/// One declaration form selected for reconciliation
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseRecord {
    /// Case owner organisation number
    pub owner_id: String,
    /// Reporting period, YYYYMM
    pub period: String,
    /// Recipient personal number from the form's income record
    pub recipient_id: String,
    /// The form's content sub-tree, opaque to the reconciler
    pub content: XmlNode,
    /// Absence records whose recipient and period match this case
    pub absences: Vec<AbsenceRecord>,
    /// Most recent absence date among the matched records
    pub last_absence_date: Option<String>,
}

impl CaseRecord {
    /// Replace the absence list, recomputing the last absence date
    #[must_use]
    pub fn with_absences(self, absences: Vec<AbsenceRecord>) -> Self {
        let last_absence_date = last_date(&absences);
        Self {
            absences,
            last_absence_date,
            ..self
        }
    }
}

/// One `Franvarouppgift` element projected onto plain fields
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbsenceRecord {
    pub employer_id: String,
    pub recipient_id: String,
    pub date: String,
    /// Unique among the records sharing this recipient and period
    pub specification_number: u32,
    /// `None` when the source element is absent or outside the enumeration
    pub absence_type: Option<AbsenceType>,
    pub period: String,
    pub percent_fp: Option<String>,
    pub hours_fp: Option<String>,
    pub percent_tfp: Option<String>,
    pub hours_tfp: Option<String>,
}

impl AbsenceRecord {
    /// Project a `Franvarouppgift` element onto a record.
    ///
    /// Lenient: missing leaves become empty strings or `None` and a
    /// non-numeric specification number becomes 0. Complaints about such
    /// records are the validator's job, not the projection's.
    pub fn from_node(node: &XmlNode) -> Self {
        Self {
            employer_id: text_or_empty(node, schema::EMPLOYER_ID),
            recipient_id: text_or_empty(node, schema::RECIPIENT_ID),
            date: text_or_empty(node, schema::ABSENCE_DATE),
            specification_number: extract_text(node, schema::SPECIFICATION_NUMBER)
                .and_then(|value| value.parse().ok())
                .unwrap_or(0),
            absence_type: extract_text(node, schema::ABSENCE_TYPE).and_then(AbsenceType::parse),
            period: text_or_empty(node, schema::REPORTING_PERIOD),
            percent_fp: optional_text(node, schema::PERCENT_FP),
            hours_fp: optional_text(node, schema::HOURS_FP),
            percent_tfp: optional_text(node, schema::PERCENT_TFP),
            hours_tfp: optional_text(node, schema::HOURS_TFP),
        }
    }

    /// Serialize back to a `Franvarouppgift` element.
    ///
    /// Every leaf carries its fixed field code. Optional values that are
    /// `None` are omitted entirely, never written as empty elements.
    pub fn to_node(&self) -> XmlNode {
        let mut node = XmlNode::new();
        node.add_child(
            schema::EMPLOYER_ID,
            coded_leaf(&self.employer_id, faltkod::EMPLOYER_ID),
        );
        node.add_child(
            schema::RECIPIENT_ID,
            coded_leaf(&self.recipient_id, faltkod::RECIPIENT_ID),
        );
        node.add_child(
            schema::ABSENCE_DATE,
            coded_leaf(&self.date, faltkod::ABSENCE_DATE),
        );
        node.add_child(
            schema::SPECIFICATION_NUMBER,
            coded_leaf(
                &self.specification_number.to_string(),
                faltkod::SPECIFICATION_NUMBER,
            ),
        );
        if let Some(absence_type) = self.absence_type {
            node.add_child(
                schema::ABSENCE_TYPE,
                coded_leaf(absence_type.as_str(), faltkod::ABSENCE_TYPE),
            );
        }
        node.add_child(
            schema::REPORTING_PERIOD,
            coded_leaf(&self.period, faltkod::REPORTING_PERIOD),
        );
        let optionals = [
            (schema::PERCENT_FP, faltkod::PERCENT_FP, &self.percent_fp),
            (schema::HOURS_FP, faltkod::HOURS_FP, &self.hours_fp),
            (schema::PERCENT_TFP, faltkod::PERCENT_TFP, &self.percent_tfp),
            (schema::HOURS_TFP, faltkod::HOURS_TFP, &self.hours_tfp),
        ];
        for (element, code, value) in optionals {
            if let Some(value) = value {
                node.add_child(element, coded_leaf(value, code));
            }
        }
        node
    }
}

/// Raw values collected for a new absence entry
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewAbsence {
    pub date: String,
    pub absence_type: AbsenceType,
    /// Percentage for the chosen type; empty or whitespace counts as absent
    pub percent: Option<String>,
    /// Hours for the chosen type; empty or whitespace counts as absent
    pub hours: Option<String>,
}

/// Build the case list from a parsed document.
///
/// Forms whose content block lacks an income record are skipped, they are
/// out of scope for reconciliation rather than an error. Each top-level
/// absence record is matched to a case when its recipient id and reporting
/// period both equal the case's key. Document order is preserved on both
/// sides.
pub fn extract_cases(document: &XmlNode) -> Vec<CaseRecord> {
    let Some(root) = extract(document, schema::ROOT) else {
        return Vec::new();
    };
    let all_absences: Vec<AbsenceRecord> = root
        .children_named(schema::ABSENCE)
        .iter()
        .map(AbsenceRecord::from_node)
        .collect();

    let mut cases = Vec::new();
    for form in root.children_named(schema::FORM) {
        let Some(content) = extract(form, schema::CONTENT) else {
            continue;
        };
        if !content.has_child(schema::INCOME_RECORD) {
            continue;
        }
        let period = text_or_empty(form, paths::CASE_PERIOD);
        let recipient_id = text_or_empty(form, paths::RECIPIENT_ID);
        let absences: Vec<AbsenceRecord> = all_absences
            .iter()
            .filter(|record| record.recipient_id == recipient_id && record.period == period)
            .cloned()
            .collect();
        let last_absence_date = last_date(&absences);
        cases.push(CaseRecord {
            owner_id: text_or_empty(form, paths::CASE_OWNER),
            period,
            recipient_id,
            content: content.clone(),
            absences,
            last_absence_date,
        });
    }
    debug!(cases = cases.len(), "extracted case records");
    cases
}

/// Next intra-case specification number, one above the current maximum
pub fn next_specification_number(absences: &[AbsenceRecord]) -> u32 {
    absences
        .iter()
        .map(|record| record.specification_number)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

/// Append a record built from `input` to a copy of the case's list.
///
/// The new record takes the case's owner id, recipient id and period, gets
/// the next specification number and carries the percentage or hours value
/// under the elements of its type. The case itself is not touched.
pub fn add_absence(case: &CaseRecord, input: &NewAbsence) -> Vec<AbsenceRecord> {
    let mut record = AbsenceRecord {
        employer_id: case.owner_id.clone(),
        recipient_id: case.recipient_id.clone(),
        date: input.date.clone(),
        specification_number: next_specification_number(&case.absences),
        absence_type: Some(input.absence_type),
        period: case.period.clone(),
        percent_fp: None,
        hours_fp: None,
        percent_tfp: None,
        hours_tfp: None,
    };
    let percent = non_empty(input.percent.as_deref());
    let hours = non_empty(input.hours.as_deref());
    match input.absence_type {
        AbsenceType::Foraldrapenning => {
            record.percent_fp = percent;
            record.hours_fp = hours;
        }
        AbsenceType::TillfalligForaldrapenning => {
            record.percent_tfp = percent;
            record.hours_tfp = hours;
        }
    }
    debug!(
        specification_number = record.specification_number,
        "adding absence record"
    );
    let mut absences = case.absences.clone();
    absences.push(record);
    absences
}

/// Remove the record at `index` from a copy of the case's list.
///
/// Fails when `index` is outside the list. Remaining records keep their
/// specification numbers and order.
pub fn remove_absence(case: &CaseRecord, index: usize) -> Result<Vec<AbsenceRecord>> {
    if index >= case.absences.len() {
        return Err(Error::index_out_of_range(index, case.absences.len()));
    }
    let mut absences = case.absences.clone();
    absences.remove(index);
    Ok(absences)
}

/// Rebuild the document with the absence collection replaced by the
/// concatenation of every case's current list.
///
/// An empty concatenation removes the collection entirely, and the sender
/// program name is overwritten with [`schema::GENERATOR_NAME`]. Everything
/// else passes through unchanged; the input tree itself is not mutated.
pub fn build_document(document: &XmlNode, cases: &[CaseRecord]) -> XmlNode {
    let mut result = document.clone();
    let Some(Children::One(root)) = result.children.get_mut(schema::ROOT) else {
        return result;
    };
    let combined: Vec<XmlNode> = cases
        .iter()
        .flat_map(|case| case.absences.iter().map(AbsenceRecord::to_node))
        .collect();
    debug!(records = combined.len(), "rebuilding declaration document");
    match Children::from_vec(combined) {
        Some(children) => root.set_child(schema::ABSENCE, children),
        None => {
            root.remove_child(schema::ABSENCE);
        }
    }
    set_program_name(root.as_mut());
    result
}

fn set_program_name(root: &mut XmlNode) {
    let Some(Children::One(sender)) = root.children.get_mut(schema::SENDER) else {
        return;
    };
    let Some(Children::One(program)) = sender.children.get_mut(schema::PROGRAM_NAME) else {
        return;
    };
    program.set_text(schema::GENERATOR_NAME);
}

fn last_date(absences: &[AbsenceRecord]) -> Option<String> {
    absences
        .iter()
        .map(|record| record.date.as_str())
        .max()
        .map(str::to_string)
}

fn text_or_empty(node: &XmlNode, path: &str) -> String {
    extract_text(node, path).unwrap_or_default().to_string()
}

fn optional_text(node: &XmlNode, path: &str) -> Option<String> {
    extract_text(node, path).map(str::to_string)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

fn coded_leaf(text: &str, code: &str) -> XmlNode {
    let mut leaf = XmlNode::with_text(text);
    leaf.set_attr(schema::FALTKOD, code);
    leaf
}
