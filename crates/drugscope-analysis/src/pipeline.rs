//! Orchestrator for the analysis pipeline.

use std::fmt;
use std::sync::Arc;

use drugscope_common::{AnalysisRecord, AnalysisRequest, FormulaCheck, RegistryMatch};
use drugscope_db::HistoryStore;
use drugscope_predict::PredictionClient;
use drugscope_registry::RegistryResolver;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::assembler::assemble;
use crate::error::{AnalysisError, InvalidInput};

pub const MSG_SAVED: &str = "Analysis completed successfully";
pub const MSG_NOT_SAVED: &str = "Analysis completed but failed to save to history";

/// Pipeline stages, in execution order. Used for log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ValidatingInput,
    CheckingBackend,
    ResolvingRegistry,
    FetchingStructure,
    CallingPrediction,
    Assembling,
    Persisting,
    Responding,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidatingInput => "validating_input",
            Self::CheckingBackend => "checking_backend",
            Self::ResolvingRegistry => "resolving_registry",
            Self::FetchingStructure => "fetching_structure",
            Self::CallingPrediction => "calling_prediction",
            Self::Assembling => "assembling",
            Self::Persisting => "persisting",
            Self::Responding => "responding",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response for a named-drug analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub record: AnalysisRecord,
    pub message: String,
    pub history_saved: bool,
}

/// Either a full report or, for compounds the registry doesn't know, the
/// backend's reply as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Known(AnalysisReport),
    Unknown(Value),
}

pub struct Orchestrator {
    resolver: RegistryResolver,
    predictor: PredictionClient,
    history: Arc<dyn HistoryStore>,
}

fn stage(stage: Stage, subject: &str) {
    debug!(stage = %stage, subject = subject, "Pipeline stage");
}

impl Orchestrator {
    pub fn new(resolver: RegistryResolver, predictor: PredictionClient, history: Arc<dyn HistoryStore>) -> Self {
        Self { resolver, predictor, history }
    }

    /// Name -> CID -> structure -> prediction -> record, persisted.
    pub async fn analyze_named(&self, raw_name: &str) -> Result<AnalysisReport, AnalysisError> {
        stage(Stage::ValidatingInput, raw_name);
        let AnalysisRequest::Named { name } =
            AnalysisRequest::named(raw_name).map_err(|_| InvalidInput::DrugName)?
        else {
            return Err(InvalidInput::DrugName.into());
        };

        self.check_backend(&name).await?;

        stage(Stage::ResolvingRegistry, &name);
        let cid = self.resolver.resolve_cid(&name).await?;

        self.predict_and_record(&name, cid).await
    }

    /// Formula + receptor straight to the backend. Nothing is looked up,
    /// enriched or stored, and the reply is not reshaped.
    pub async fn analyze_unknown(
        &self,
        chemical_formula: &str,
        receptor_id: &str,
    ) -> Result<Value, AnalysisError> {
        let (formula, receptor) = validate_unknown(chemical_formula, receptor_id)?;
        self.check_backend(&formula).await?;
        self.predict_unknown(&formula, &receptor).await
    }

    /// Route on whether the registry knows the formula: a known formula is
    /// analysed through its CID, an unknown one goes to the backend as-is.
    pub async fn analyze_formula(
        &self,
        chemical_formula: &str,
        receptor_id: &str,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let (formula, receptor) = validate_unknown(chemical_formula, receptor_id)?;
        self.check_backend(&formula).await?;

        stage(Stage::ResolvingRegistry, &formula);
        let check = self.resolver.check_formula(&formula).await.map_err(AnalysisError::FormulaCheck)?;

        match check.cid {
            Some(cid) => {
                let name = check.name.unwrap_or_else(|| formula.clone());
                info!(formula = %formula, cid = %cid, name = %name, "Formula found in PubChem");
                self.predict_and_record(&name, cid).await.map(AnalysisOutcome::Known)
            }
            None => {
                info!(formula = %formula, "Formula not in PubChem, analysing as unknown compound");
                self.predict_unknown(&formula, &receptor).await.map(AnalysisOutcome::Unknown)
            }
        }
    }

    /// Direct formula lookup; does not involve the prediction backend.
    pub async fn check_formula(&self, raw_formula: &str) -> Result<FormulaCheck, AnalysisError> {
        stage(Stage::ValidatingInput, raw_formula);
        let formula = raw_formula.trim();
        if formula.is_empty() {
            return Err(InvalidInput::Formula.into());
        }

        self.resolver.check_formula(formula).await.map_err(AnalysisError::FormulaCheck)
    }

    /// Every stored analysis, newest first.
    pub async fn history(&self) -> Result<Vec<AnalysisRecord>, AnalysisError> {
        self.history.list().await.map_err(AnalysisError::History)
    }

    pub async fn backend_available(&self) -> bool {
        self.predictor.is_available().await
    }

    pub fn backend_url(&self) -> &str {
        self.predictor.backend_url()
    }

    async fn check_backend(&self, subject: &str) -> Result<(), AnalysisError> {
        stage(Stage::CheckingBackend, subject);
        self.predictor.ensure_available().await.map_err(AnalysisError::BackendUnavailable)
    }

    async fn predict_unknown(&self, formula: &str, receptor: &str) -> Result<Value, AnalysisError> {
        stage(Stage::CallingPrediction, formula);
        let result = self
            .predictor
            .predict_unknown(formula, receptor)
            .await
            .map_err(AnalysisError::UnknownPredictionFailure)?;

        stage(Stage::Responding, formula);
        Ok(result)
    }

    async fn predict_and_record(&self, name: &str, cid: String) -> Result<AnalysisReport, AnalysisError> {
        stage(Stage::FetchingStructure, name);
        let smiles = self.resolver.fetch_structure(&cid).await?;

        stage(Stage::CallingPrediction, name);
        let prediction = self
            .predictor
            .predict(&smiles, &cid)
            .await
            .map_err(AnalysisError::PredictionFailure)?;

        stage(Stage::Assembling, name);
        let mut record = assemble(name, RegistryMatch { cid, smiles }, prediction);

        stage(Stage::Persisting, name);
        let history_saved = match self.history.save(&record).await {
            Ok(stored) => {
                record.predicted_at = Some(stored.predicted_at);
                true
            }
            Err(e) => {
                warn!(drug = %name, id = %record.id, error = %e, "Failed to save analysis to history");
                false
            }
        };

        stage(Stage::Responding, name);
        info!(drug = %name, cid = %record.cid, history_saved, "Analysis complete");
        Ok(AnalysisReport {
            record,
            message: if history_saved { MSG_SAVED } else { MSG_NOT_SAVED }.to_string(),
            history_saved,
        })
    }
}

fn validate_unknown(chemical_formula: &str, receptor_id: &str) -> Result<(String, String), InvalidInput> {
    stage(Stage::ValidatingInput, chemical_formula);
    match AnalysisRequest::unknown(chemical_formula, receptor_id) {
        Ok(AnalysisRequest::Unknown { chemical_formula, receptor_id }) => Ok((chemical_formula, receptor_id)),
        _ => Err(InvalidInput::FormulaAndReceptor),
    }
}
