//! Element names, field codes and paths of the employer declaration format
//!
//! The wire format is the Skatteverket arbetsgivardeklaration (AGI) XML
//! layout. Element names are Swedish and fixed by the format; the constants
//! here are the single place they are spelled out.

use std::fmt;

/// Document root
pub const ROOT: &str = "Skatteverket";
/// Sender block under the root
pub const SENDER: &str = "Avsandare";
pub const PROGRAM_NAME: &str = "Programnamn";
pub const SENDER_ORG_ID: &str = "Organisationsnummer";
pub const TECHNICAL_CONTACT: &str = "TekniskKontaktperson";
pub const CONTACT_NAME: &str = "Namn";
pub const CONTACT_PHONE: &str = "Telefon";
pub const CONTACT_EMAIL: &str = "Epostadress";
pub const CREATED: &str = "Skapad";
/// One declaration form, repeated under the root
pub const FORM: &str = "Blankett";
pub const CASE_INFO: &str = "Arendeinformation";
pub const CASE_OWNER: &str = "Arendeagare";
pub const PERIOD: &str = "Period";
pub const CONTENT: &str = "Blankettinnehall";
/// Income-record marker inside a form's content block
pub const INCOME_RECORD: &str = "IU";
/// One absence record, repeated under the root
pub const ABSENCE: &str = "Franvarouppgift";
pub const EMPLOYER_ID: &str = "AgRegistreradId";
pub const RECIPIENT_ID: &str = "Inkomsttagare";
pub const ABSENCE_DATE: &str = "Franvarodatum";
pub const SPECIFICATION_NUMBER: &str = "Specifikationsnummer";
pub const ABSENCE_TYPE: &str = "Franvarotyp";
pub const REPORTING_PERIOD: &str = "RedovisningsPeriod";
pub const PERCENT_FP: &str = "ProcentFP";
pub const HOURS_FP: &str = "TimmarFP";
pub const PERCENT_TFP: &str = "ProcentTFP";
pub const HOURS_TFP: &str = "TimmarTFP";

/// Attribute carrying a leaf element's field code
pub const FALTKOD: &str = "faltkod";
pub const XMLNS: &str = "xmlns";
pub const XMLNS_XSI: &str = "xmlns:xsi";

/// Program name written into documents produced by this crate
pub const GENERATOR_NAME: &str = "franvaro";
/// File name offered when a generated document is downloaded
pub const DOWNLOAD_FILE_NAME: &str = "arbetsgivardeklaration.xml";
/// MIME type of the produced artifact
pub const MIME_TYPE: &str = "text/xml";

/// Fixed field codes attached to absence-record leaves when serializing.
///
/// Codes are strings, not numbers: `006` keeps its leading zero on the wire.
pub mod faltkod {
    pub const EMPLOYER_ID: &str = "201";
    pub const RECIPIENT_ID: &str = "215";
    pub const ABSENCE_DATE: &str = "821";
    pub const SPECIFICATION_NUMBER: &str = "822";
    pub const ABSENCE_TYPE: &str = "823";
    pub const REPORTING_PERIOD: &str = "006";
    pub const PERCENT_FP: &str = "826";
    pub const HOURS_FP: &str = "827";
    pub const PERCENT_TFP: &str = "824";
    pub const HOURS_TFP: &str = "825";
}

/// Dotted paths used with [`extract`](crate::path::extract)
pub mod paths {
    /// Paths below relative to the root element
    pub const PROGRAM_NAME: &str = "Avsandare.Programnamn";
    pub const SENDER_ORG_ID: &str = "Avsandare.Organisationsnummer";
    pub const CREATED: &str = "Avsandare.Skapad";
    pub const CONTACT_NAME: &str = "Avsandare.TekniskKontaktperson.Namn";
    pub const CONTACT_PHONE: &str = "Avsandare.TekniskKontaktperson.Telefon";
    pub const CONTACT_EMAIL: &str = "Avsandare.TekniskKontaktperson.Epostadress";

    /// Paths below relative to one `Blankett` form
    pub const CASE_OWNER: &str = "Arendeinformation.Arendeagare";
    pub const CASE_PERIOD: &str = "Arendeinformation.Period";
    pub const INCOME_RECORD: &str = "Blankettinnehall.IU";
    pub const RECIPIENT_ID: &str =
        "Blankettinnehall.IU.InkomsttagareIUGROUP.InkomsttagareIU.Inkomsttagare";
}

/// The two government leave categories an absence record may carry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbsenceType {
    /// Parental benefit (`FORALDRAPENNING`)
    #[cfg_attr(feature = "serde", serde(rename = "FORALDRAPENNING"))]
    Foraldrapenning,
    /// Temporary parental benefit (`TILLFALLIG_FORALDRAPENNING`)
    #[cfg_attr(feature = "serde", serde(rename = "TILLFALLIG_FORALDRAPENNING"))]
    TillfalligForaldrapenning,
}

impl AbsenceType {
    /// Wire literal for this type
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Foraldrapenning => "FORALDRAPENNING",
            Self::TillfalligForaldrapenning => "TILLFALLIG_FORALDRAPENNING",
        }
    }

    /// Parse a wire literal, `None` for anything outside the enumeration
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "FORALDRAPENNING" => Some(Self::Foraldrapenning),
            "TILLFALLIG_FORALDRAPENNING" => Some(Self::TillfalligForaldrapenning),
            _ => None,
        }
    }

    /// Element holding the percentage value for this type
    pub const fn percent_element(self) -> &'static str {
        match self {
            Self::Foraldrapenning => PERCENT_FP,
            Self::TillfalligForaldrapenning => PERCENT_TFP,
        }
    }

    /// Element holding the hours value for this type
    pub const fn hours_element(self) -> &'static str {
        match self {
            Self::Foraldrapenning => HOURS_FP,
            Self::TillfalligForaldrapenning => HOURS_TFP,
        }
    }
}

impl fmt::Display for AbsenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
