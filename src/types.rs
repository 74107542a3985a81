use serde::Deserialize;

/// One selectable choice at a cascade level.
///
/// For bank/state/district levels the label and value are the same upstream
/// name; for the branch level the label is the branch name and the value is
/// the branch IFSC code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub label: String,
    pub value: String,
}

impl OptionItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose label and value are the same string.
    pub fn plain(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            value: name.clone(),
            label: name,
        }
    }
}

/// Ordered sequence of selectable choices at one cascade level.
pub type OptionList = Vec<OptionItem>;

/// One entry of the `/branches` endpoint response.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BranchEntry {
    #[serde(rename = "BRANCH")]
    pub branch: String,
    #[serde(rename = "IFSC")]
    pub ifsc: String,
}

impl From<BranchEntry> for OptionItem {
    fn from(entry: BranchEntry) -> Self {
        OptionItem::new(entry.branch, entry.ifsc)
    }
}

/// Full branch detail record returned by the `/ifsc/<code>` endpoint.
///
/// Field names mirror the upstream uppercase JSON keys. Everything is optional:
/// the proxy omits or nulls fields freely, and error payloads carry none of
/// them. The payment-rail flags (`NEFT`, `RTGS`, `IMPS`, `UPI`) arrive as JSON
/// booleans.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LookupRecord {
    #[serde(rename = "IFSC", default)]
    pub ifsc: Option<String>,
    #[serde(rename = "BANK", default)]
    pub bank: Option<String>,
    #[serde(rename = "BRANCH", default)]
    pub branch: Option<String>,
    #[serde(rename = "CITY", default)]
    pub city: Option<String>,
    #[serde(rename = "DISTRICT", default)]
    pub district: Option<String>,
    #[serde(rename = "STATE", default)]
    pub state: Option<String>,
    #[serde(rename = "ADDRESS", default)]
    pub address: Option<String>,
    #[serde(rename = "CONTACT", default)]
    pub contact: Option<String>,
    #[serde(rename = "MICR", default)]
    pub micr: Option<String>,
    #[serde(rename = "NEFT", default)]
    pub neft: Option<bool>,
    #[serde(rename = "RTGS", default)]
    pub rtgs: Option<bool>,
    #[serde(rename = "IMPS", default)]
    pub imps: Option<bool>,
    #[serde(rename = "UPI", default)]
    pub upi: Option<bool>,
    #[serde(rename = "SWIFT", default)]
    pub swift: Option<String>,
}

/// Placeholder shown for any failed or empty final lookup.
pub const LOOKUP_ERROR_MESSAGE: &str = "No details found or network error.";

/// Displayed result of a final lookup: either the fetched record or the
/// collapsed error placeholder. Never cached; exists only as transient
/// display state.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Record(LookupRecord),
    Error(String),
}

impl LookupOutcome {
    /// The generic error outcome. All failure kinds (network, malformed body,
    /// not-found) collapse into this one placeholder.
    pub fn error() -> Self {
        LookupOutcome::Error(LOOKUP_ERROR_MESSAGE.to_string())
    }

    pub fn record(&self) -> Option<&LookupRecord> {
        match self {
            LookupOutcome::Record(record) => Some(record),
            LookupOutcome::Error(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_entry_maps_branch_to_label_and_ifsc_to_value() {
        let entry = BranchEntry {
            branch: "FORT MUMBAI".to_string(),
            ifsc: "SBIN0000300".to_string(),
        };
        let option: OptionItem = entry.into();
        assert_eq!(option.label, "FORT MUMBAI");
        assert_eq!(option.value, "SBIN0000300");
    }

    #[test]
    fn lookup_record_deserializes_upstream_keys() {
        let body = r#"{
            "IFSC": "SBIN0000001",
            "BANK": "STATE BANK OF INDIA",
            "BRANCH": "KOLKATA MAIN",
            "STATE": "WEST BENGAL",
            "NEFT": true,
            "SWIFT": null
        }"#;
        let record: LookupRecord = serde_json::from_str(body).unwrap();
        assert_eq!(record.ifsc.as_deref(), Some("SBIN0000001"));
        assert_eq!(record.bank.as_deref(), Some("STATE BANK OF INDIA"));
        assert_eq!(record.neft, Some(true));
        assert_eq!(record.swift, None);
        assert_eq!(record.micr, None);
    }

    #[test]
    fn error_payload_deserializes_to_empty_record() {
        let record: LookupRecord = serde_json::from_str(r#"{"error": "not found"}"#).unwrap();
        assert_eq!(record.ifsc, None);
    }
}
