//! Core entity types shared by the resolver, the prediction client, the
//! assembler and the history store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::DrugscopeError;

/// Placeholder substituted for any prediction property the backend omitted.
pub const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A validated analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    /// A drug known by (some) name, resolved through the registry.
    Named { name: String },
    /// A compound described only by formula, scored against a receptor.
    Unknown { chemical_formula: String, receptor_id: String },
}

impl AnalysisRequest {
    /// Build a named request; the name is trimmed and must be non-empty.
    pub fn named(raw: &str) -> Result<Self, DrugscopeError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(DrugscopeError::InvalidInput("drug name is empty".to_string()));
        }
        Ok(Self::Named { name: name.to_string() })
    }

    /// Build an unknown-drug request; both fields are required.
    pub fn unknown(chemical_formula: &str, receptor_id: &str) -> Result<Self, DrugscopeError> {
        let chemical_formula = chemical_formula.trim();
        let receptor_id = receptor_id.trim();
        if chemical_formula.is_empty() || receptor_id.is_empty() {
            return Err(DrugscopeError::InvalidInput(
                "chemical formula and receptor id are both required".to_string(),
            ));
        }
        Ok(Self::Unknown {
            chemical_formula: chemical_formula.to_string(),
            receptor_id: receptor_id.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// A single successful resolution of a name to a registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryMatch {
    pub cid: String,
    pub smiles: String,
}

/// Result of a direct formula lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaCheck {
    pub exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
}

impl FormulaCheck {
    pub fn missing() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// A property value as produced by the prediction backend.
///
/// Numbers are kept as `serde_json::Number` so that `85` is echoed back as
/// `85`, not `85.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(serde_json::Number),
    Text(String),
}

impl PropertyValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn not_available() -> Self {
        Self::Text(NOT_AVAILABLE.to_string())
    }

    /// Lenient conversion from an arbitrary JSON value. `null`, blank
    /// strings, and structured values count as absent.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n)),
            Value::String(s) if !s.trim().is_empty() => Some(Self::Text(s)),
            _ => None,
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

fn de_property<'de, D>(deserializer: D) -> Result<Option<PropertyValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(PropertyValue::from_json))
}

fn de_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

/// Properties returned by the prediction backend. Every field is optional.
///
/// Decoding is lenient: `null`, blank strings and structured values read as
/// absent so the assembler can put placeholders in their place. Fields
/// beyond the known set are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default, deserialize_with = "de_property", skip_serializing_if = "Option::is_none")]
    pub binding_affinity: Option<PropertyValue>,
    #[serde(default, deserialize_with = "de_property", skip_serializing_if = "Option::is_none")]
    pub toxicity: Option<PropertyValue>,
    #[serde(default, deserialize_with = "de_property", skip_serializing_if = "Option::is_none")]
    pub drug_likeness: Option<PropertyValue>,
    #[serde(default, deserialize_with = "de_property", skip_serializing_if = "Option::is_none")]
    pub effectiveness: Option<PropertyValue>,
    #[serde(default, deserialize_with = "de_property", skip_serializing_if = "Option::is_none")]
    pub genome_report: Option<PropertyValue>,
    #[serde(default, deserialize_with = "de_property", skip_serializing_if = "Option::is_none")]
    pub molecular_weight: Option<PropertyValue>,
    #[serde(default, deserialize_with = "de_property", skip_serializing_if = "Option::is_none")]
    pub molecular_formula: Option<PropertyValue>,
    #[serde(default, deserialize_with = "de_property", skip_serializing_if = "Option::is_none")]
    pub iupac_name: Option<PropertyValue>,
    #[serde(default, deserialize_with = "de_property", skip_serializing_if = "Option::is_none")]
    pub h_bond_donor_count: Option<PropertyValue>,
    #[serde(default, deserialize_with = "de_property", skip_serializing_if = "Option::is_none")]
    pub h_bond_acceptor_count: Option<PropertyValue>,
    #[serde(default, deserialize_with = "de_property", skip_serializing_if = "Option::is_none")]
    pub rotatable_bond_count: Option<PropertyValue>,
    #[serde(default, deserialize_with = "de_property", skip_serializing_if = "Option::is_none")]
    pub xlogp: Option<PropertyValue>,
    #[serde(default, deserialize_with = "de_property", skip_serializing_if = "Option::is_none")]
    pub description: Option<PropertyValue>,
    #[serde(default, deserialize_with = "de_text", skip_serializing_if = "Option::is_none")]
    pub inchikey: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PredictionResult {
    /// Properties every prediction is expected to carry.
    pub const REQUIRED_FIELDS: [&'static str; 4] =
        ["binding_affinity", "toxicity", "drug_likeness", "effectiveness"];

    /// Look up a known property by its wire name.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        match name {
            "binding_affinity" => self.binding_affinity.as_ref(),
            "toxicity" => self.toxicity.as_ref(),
            "drug_likeness" => self.drug_likeness.as_ref(),
            "effectiveness" => self.effectiveness.as_ref(),
            "genome_report" => self.genome_report.as_ref(),
            "molecular_weight" => self.molecular_weight.as_ref(),
            "molecular_formula" => self.molecular_formula.as_ref(),
            "iupac_name" => self.iupac_name.as_ref(),
            "h_bond_donor_count" => self.h_bond_donor_count.as_ref(),
            "h_bond_acceptor_count" => self.h_bond_acceptor_count.as_ref(),
            "rotatable_bond_count" => self.rotatable_bond_count.as_ref(),
            "xlogp" => self.xlogp.as_ref(),
            "description" => self.description.as_ref(),
            _ => None,
        }
    }

    /// Required properties the backend left out.
    pub fn missing_required(&self) -> Vec<&'static str> {
        Self::REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| self.property(field).is_none())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Analysis record
// ---------------------------------------------------------------------------

/// External lookup URLs derived from the registry identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLinks {
    pub pubchem_url: String,
    pub chembl_url: String,
    pub drugbank_url: String,
    pub molecule_image_url: String,
    pub structure3d_url: String,
}

/// The persisted and returned analysis of a named drug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    #[serde(rename = "drugName")]
    pub drug_name: String,
    pub cid: String,
    pub smiles: String,
    pub binding_affinity: PropertyValue,
    pub toxicity: PropertyValue,
    pub drug_likeness: PropertyValue,
    pub effectiveness: PropertyValue,
    pub genome_report: PropertyValue,
    pub molecular_weight: PropertyValue,
    pub molecular_formula: PropertyValue,
    pub iupac_name: PropertyValue,
    pub h_bond_donor_count: PropertyValue,
    pub h_bond_acceptor_count: PropertyValue,
    pub rotatable_bond_count: PropertyValue,
    pub xlogp: PropertyValue,
    pub description: PropertyValue,
    #[serde(flatten)]
    pub links: ReferenceLinks,
    /// Assigned by the history store; `None` until persisted.
    #[serde(rename = "predictedAt")]
    pub predicted_at: Option<DateTime<Utc>>,
}
