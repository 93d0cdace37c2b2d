//! PubChem PUG-REST client.
//!
//! PubChem is the NCBI's open chemistry database. We only use four of its
//! read-only endpoints:
//!   - name -> CIDs            `compound/name/{name}/cids/JSON`
//!   - formula -> CIDs         `compound/fastformula/{formula}/cids/JSON`
//!   - CID -> canonical SMILES `compound/cid/{cid}/property/CanonicalSMILES/JSON`
//!   - CID -> IUPAC name       `compound/cid/{cid}/property/IUPACName/JSON`
//!
//! API docs: https://pubchem.ncbi.nlm.nih.gov/docs/pug-rest
//!
//! PubChem answers 404 when a lookup has no match; that is reported as an
//! empty result, not as an error.

use async_trait::async_trait;
use drugscope_common::SandboxClient as Client;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{NameMatch, Registry, RegistryError};

pub const PUBCHEM_API_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";

/// Property names PubChem has used for the canonical SMILES over time.
/// Newer deployments answer a `CanonicalSMILES` request with `ConnectivitySMILES`.
const SMILES_PROPERTIES: &[&str] = &["CanonicalSMILES", "SMILES", "ConnectivitySMILES"];

/// PubChem client for compound lookups.
#[derive(Debug, Clone)]
pub struct PubChemClient {
    client: Client,
    base_url: String,
}

impl PubChemClient {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, PUBCHEM_API_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn name_url(&self, name: &str, mode: NameMatch) -> String {
        let url = format!("{}/compound/name/{}/cids/JSON", self.base_url, urlencoding::encode(name));
        match mode {
            NameMatch::Exact => url,
            NameMatch::Word => format!("{}?name_type=word", url),
        }
    }

    fn formula_url(&self, formula: &str) -> String {
        format!("{}/compound/fastformula/{}/cids/JSON", self.base_url, urlencoding::encode(formula))
    }

    fn property_url(&self, cid: &str, property: &str) -> String {
        format!(
            "{}/compound/cid/{}/property/{}/JSON",
            self.base_url,
            urlencoding::encode(cid),
            property
        )
    }

    /// GET `url` and decode the JSON body. `Ok(None)` on 404.
    async fn get_json(&self, url: &str) -> Result<Option<Value>, RegistryError> {
        let resp = self.client.get(url)?.send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(RegistryError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(Some(resp.json().await?))
    }

    async fn lookup_cids(&self, url: &str) -> Result<Vec<String>, RegistryError> {
        Ok(self.get_json(url).await?.map(|json| parse_cids(&json)).unwrap_or_default())
    }
}

/// Extract `IdentifierList.CID` as strings, preserving registry order.
pub fn parse_cids(json: &Value) -> Vec<String> {
    json["IdentifierList"]["CID"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|cid| match cid {
                    Value::Number(n) => Some(n.to_string()),
                    Value::String(s) if !s.is_empty() => Some(s.clone()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// First non-empty value among `names` in `PropertyTable.Properties[0]`.
pub fn parse_property(json: &Value, names: &[&str]) -> Option<String> {
    let props = &json["PropertyTable"]["Properties"][0];
    names
        .iter()
        .filter_map(|name| props[*name].as_str())
        .find(|value| !value.trim().is_empty())
        .map(String::from)
}

#[async_trait]
impl Registry for PubChemClient {
    #[instrument(skip(self))]
    async fn find_cids_by_name(&self, name: &str, mode: NameMatch) -> Result<Vec<String>, RegistryError> {
        debug!(name = name, ?mode, "Looking up PubChem CIDs by name");
        self.lookup_cids(&self.name_url(name, mode)).await
    }

    #[instrument(skip(self))]
    async fn find_cids_by_formula(&self, formula: &str) -> Result<Vec<String>, RegistryError> {
        debug!(formula = formula, "Looking up PubChem CIDs by formula");
        self.lookup_cids(&self.formula_url(formula)).await
    }

    #[instrument(skip(self))]
    async fn fetch_structure(&self, cid: &str) -> Result<String, RegistryError> {
        let url = self.property_url(cid, "CanonicalSMILES");
        let missing = || RegistryError::MissingProperty {
            cid: cid.to_string(),
            property: "CanonicalSMILES".to_string(),
        };

        let json = self.get_json(&url).await?.ok_or_else(missing)?;
        parse_property(&json, SMILES_PROPERTIES).ok_or_else(missing)
    }

    #[instrument(skip(self))]
    async fn fetch_display_name(&self, cid: &str) -> Result<Option<String>, RegistryError> {
        let url = self.property_url(cid, "IUPACName");
        Ok(self
            .get_json(&url)
            .await?
            .and_then(|json| parse_property(&json, &["IUPACName"])))
    }
}
