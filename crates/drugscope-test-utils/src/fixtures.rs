use drugscope_common::{AnalysisRecord, PredictionResult, PropertyValue, ReferenceLinks};
use serde_json::json;
use uuid::Uuid;

pub const ASPIRIN_CID: &str = "2244";
pub const ASPIRIN_SMILES: &str = "CC(=O)OC1=CC=CC=C1C(=O)O";

/// A complete backend reply for aspirin.
pub fn aspirin_prediction() -> PredictionResult {
    serde_json::from_value(json!({
        "binding_affinity": "-7.2 kcal/mol",
        "toxicity": "Low",
        "drug_likeness": "High",
        "effectiveness": 85,
        "genome_report": "No significant interactions",
        "molecular_weight": 180.16,
        "molecular_formula": "C9H8O4",
        "iupac_name": "2-acetyloxybenzoic acid",
        "h_bond_donor_count": 1,
        "h_bond_acceptor_count": 4,
        "rotatable_bond_count": 3,
        "xlogp": 1.2,
        "description": "Nonsteroidal anti-inflammatory drug",
        "inchikey": "BSYNRYMUTXBXSQ-UHFFFAOYSA-N"
    }))
    .expect("fixture is valid")
}

/// A minimal persisted-shape record; `predicted_at` is left unset.
pub fn sample_record(drug_name: &str, cid: &str) -> AnalysisRecord {
    let na = PropertyValue::not_available;
    AnalysisRecord {
        id: Uuid::new_v4(),
        drug_name: drug_name.to_string(),
        cid: cid.to_string(),
        smiles: "C".to_string(),
        binding_affinity: PropertyValue::text("-6.0 kcal/mol"),
        toxicity: PropertyValue::text("Low"),
        drug_likeness: PropertyValue::text("High"),
        effectiveness: PropertyValue::from(70),
        genome_report: PropertyValue::text("No report available"),
        molecular_weight: na(),
        molecular_formula: na(),
        iupac_name: na(),
        h_bond_donor_count: na(),
        h_bond_acceptor_count: na(),
        rotatable_bond_count: na(),
        xlogp: na(),
        description: PropertyValue::text("No description available"),
        links: ReferenceLinks {
            pubchem_url: format!("https://pubchem.ncbi.nlm.nih.gov/compound/{}", cid),
            chembl_url: format!("https://www.ebi.ac.uk/chembl/g/#search_results/compounds/{}", drug_name),
            drugbank_url: format!("https://go.drugbank.com/drugs/search?q={}", drug_name),
            molecule_image_url: format!("https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/cid/{}/PNG", cid),
            structure3d_url: format!(
                "https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/cid/{}/record/SDF/?record_type=3d",
                cid
            ),
        },
        predicted_at: None,
    }
}
