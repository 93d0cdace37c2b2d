//! Builds an [`AnalysisRecord`] from a registry match and a prediction.
//!
//! Missing properties get placeholders so the record is always complete.

use drugscope_common::{AnalysisRecord, PredictionResult, PropertyValue, ReferenceLinks, RegistryMatch};
use uuid::Uuid;

pub const NO_GENOME_REPORT: &str = "No report available";
pub const NO_DESCRIPTION: &str = "No description available";

const PUBCHEM_COMPOUND_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/compound";
const PUBCHEM_REST_CID_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/cid";
const CHEMBL_REPORT_CARD_URL: &str = "https://www.ebi.ac.uk/chembl/compound_report_card";
const CHEMBL_SEARCH_URL: &str = "https://www.ebi.ac.uk/chembl/g/#search_results/compounds";
const DRUGBANK_SEARCH_URL: &str = "https://go.drugbank.com/drugs/search?q=";

/// External lookup links. ChEMBL gets a direct report card when the
/// InChIKey is known, a name search otherwise.
pub fn reference_links(drug_name: &str, cid: &str, inchikey: Option<&str>) -> ReferenceLinks {
    let name = urlencoding::encode(drug_name);
    let chembl_url = match inchikey.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => format!("{}/{}", CHEMBL_REPORT_CARD_URL, urlencoding::encode(key)),
        None => format!("{}/{}", CHEMBL_SEARCH_URL, name),
    };

    ReferenceLinks {
        pubchem_url: format!("{}/{}", PUBCHEM_COMPOUND_URL, cid),
        chembl_url,
        drugbank_url: format!("{}{}", DRUGBANK_SEARCH_URL, name),
        molecule_image_url: format!("{}/{}/PNG", PUBCHEM_REST_CID_URL, cid),
        structure3d_url: format!("{}/{}/record/SDF/?record_type=3d", PUBCHEM_REST_CID_URL, cid),
    }
}

fn or_na(value: Option<PropertyValue>) -> PropertyValue {
    value.unwrap_or_else(PropertyValue::not_available)
}

fn or_text(value: Option<PropertyValue>, fallback: &str) -> PropertyValue {
    value.unwrap_or_else(|| PropertyValue::text(fallback))
}

/// Pure and infallible. The record gets a fresh id; its timestamp is left
/// for the history store to assign.
pub fn assemble(drug_name: &str, found: RegistryMatch, prediction: PredictionResult) -> AnalysisRecord {
    let links = reference_links(drug_name, &found.cid, prediction.inchikey.as_deref());

    AnalysisRecord {
        id: Uuid::new_v4(),
        drug_name: drug_name.to_string(),
        cid: found.cid,
        smiles: found.smiles,
        binding_affinity: or_na(prediction.binding_affinity),
        toxicity: or_na(prediction.toxicity),
        drug_likeness: or_na(prediction.drug_likeness),
        effectiveness: or_na(prediction.effectiveness),
        genome_report: or_text(prediction.genome_report, NO_GENOME_REPORT),
        molecular_weight: or_na(prediction.molecular_weight),
        molecular_formula: or_na(prediction.molecular_formula),
        iupac_name: or_na(prediction.iupac_name),
        h_bond_donor_count: or_na(prediction.h_bond_donor_count),
        h_bond_acceptor_count: or_na(prediction.h_bond_acceptor_count),
        rotatable_bond_count: or_na(prediction.rotatable_bond_count),
        xlogp: or_na(prediction.xlogp),
        description: or_text(prediction.description, NO_DESCRIPTION),
        links,
        predicted_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn aspirin() -> RegistryMatch {
        RegistryMatch { cid: "2244".into(), smiles: "CC(=O)OC1=CC=CC=C1C(=O)O".into() }
    }

    #[test]
    fn test_missing_properties_get_placeholders() {
        let prediction: PredictionResult = serde_json::from_value(json!({
            "binding_affinity": "0.7",
            "drug_likeness": "0.9",
            "effectiveness": 85
        }))
        .unwrap();

        let record = assemble("aspirin", aspirin(), prediction);

        assert_eq!(record.toxicity, PropertyValue::text("N/A"));
        assert_eq!(record.xlogp, PropertyValue::text("N/A"));
        assert_eq!(record.genome_report, PropertyValue::text(NO_GENOME_REPORT));
        assert_eq!(record.description, PropertyValue::text(NO_DESCRIPTION));
        assert_eq!(record.binding_affinity, PropertyValue::text("0.7"));
        assert_eq!(record.effectiveness, PropertyValue::from(85));
        assert_eq!(record.predicted_at, None);
    }

    #[test]
    fn test_links_reference_cid_and_encoded_name() {
        let links = reference_links("acetyl salicylic acid", "2244", None);

        assert_eq!(links.pubchem_url, "https://pubchem.ncbi.nlm.nih.gov/compound/2244");
        assert_eq!(
            links.molecule_image_url,
            "https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/cid/2244/PNG"
        );
        assert_eq!(
            links.structure3d_url,
            "https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/cid/2244/record/SDF/?record_type=3d"
        );
        assert_eq!(links.drugbank_url, "https://go.drugbank.com/drugs/search?q=acetyl%20salicylic%20acid");
        assert_eq!(
            links.chembl_url,
            "https://www.ebi.ac.uk/chembl/g/#search_results/compounds/acetyl%20salicylic%20acid"
        );
    }

    #[test]
    fn test_chembl_report_card_when_inchikey_known() {
        let links = reference_links("aspirin", "2244", Some("BSYNRYMUTXBXSQ-UHFFFAOYSA-N"));
        assert_eq!(
            links.chembl_url,
            "https://www.ebi.ac.uk/chembl/compound_report_card/BSYNRYMUTXBXSQ-UHFFFAOYSA-N"
        );
        // Blank keys are ignored
        let links = reference_links("aspirin", "2244", Some("  "));
        assert!(links.chembl_url.contains("#search_results"));
    }

    #[test]
    fn test_record_serializes_with_wire_names() {
        let record = assemble("aspirin", aspirin(), PredictionResult::default());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["drugName"], "aspirin");
        assert_eq!(json["cid"], "2244");
        assert_eq!(json["pubchem_url"], "https://pubchem.ncbi.nlm.nih.gov/compound/2244");
        assert!(json["predictedAt"].is_null());
        assert!(json.get("links").is_none());
    }
}
