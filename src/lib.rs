//! franvaro - codec, schema validator and absence reconciler for Swedish
//! employer payroll declarations (arbetsgivardeklaration, AGI)
//!
//! # Quick Start
//!
//! ```
//! use franvaro::{generate, parse, validate};
//! # fn main() -> Result<(), franvaro::Error> {
//! let text = r#"<Skatteverket xmlns="urn:agd" xmlns:xsi="urn:xsi">
//!   <Avsandare>
//!     <Programnamn>lonesystemet</Programnamn>
//!   </Avsandare>
//! </Skatteverket>"#;
//! let document = parse(text)?;
//! let report = validate(&generate(&document)?);
//! assert!(!report.valid);
//! # Ok(())
//! # }
//! ```
//!
//! The tree model and codec are declaration-agnostic; the schema, validator
//! and reconciler modules carry the AGI-specific rules.

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod node;
pub use node::{Children, XmlNode};

pub mod xml;
pub use xml::{
    generate, generate_with_config, parse, parse_with_config, Parser, ParserConfig, WriterConfig,
    XML_DECLARATION,
};

pub mod path;
pub use path::{extract, extract_text};

pub mod schema;
pub use schema::AbsenceType;

pub mod validate;
pub use validate::{validate, validate_tree, ValidationReport};

pub mod reconcile;
pub use reconcile::{
    add_absence, build_document, extract_cases, next_specification_number, remove_absence,
    AbsenceRecord, CaseRecord, NewAbsence,
};
