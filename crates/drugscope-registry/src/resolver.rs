//! Name and formula resolution on top of a [`Registry`].

use std::sync::Arc;

use drugscope_common::{FormulaCheck, RegistryMatch, RetryPolicy};
use tracing::{debug, info, warn};

use crate::{NameMatch, Registry, RegistryError, ResolveError};

/// Suggestions returned with every failed name resolution.
pub const NOT_FOUND_SUGGESTIONS: [&str; 4] = [
    "Check the spelling of the drug name",
    "Try using the generic name instead of brand name",
    "Use the chemical name if available",
    "Try alternative names or common variations",
];

type Transform = fn(&str) -> String;

fn verbatim(s: &str) -> String {
    s.to_string()
}

fn lowercase(s: &str) -> String {
    s.to_lowercase()
}

fn uppercase(s: &str) -> String {
    s.to_uppercase()
}

fn join_words(s: &str, sep: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(sep)
}

fn no_whitespace(s: &str) -> String {
    join_words(s, "")
}

fn hyphenated(s: &str) -> String {
    join_words(s, "-")
}

fn underscored(s: &str) -> String {
    join_words(s, "_")
}

/// Name normalizations, in the order they are tried.
const NAME_TRANSFORMS: [(&str, Transform); 6] = [
    ("verbatim", verbatim),
    ("lowercase", lowercase),
    ("uppercase", uppercase),
    ("no_whitespace", no_whitespace),
    ("hyphenated", hyphenated),
    ("underscored", underscored),
];

/// The distinct spellings of `name` to try, in order. A spelling equal to an
/// earlier one is dropped so the registry is never asked the same thing twice.
pub fn name_variants(name: &str) -> Vec<(&'static str, String)> {
    let mut variants: Vec<(&'static str, String)> = Vec::with_capacity(NAME_TRANSFORMS.len());
    for (label, transform) in NAME_TRANSFORMS {
        let candidate = transform(name);
        if !candidate.is_empty() && !variants.iter().any(|(_, seen)| *seen == candidate) {
            variants.push((label, candidate));
        }
    }
    variants
}

/// Resolves free-text drug names to a CID and its canonical structure.
#[derive(Clone)]
pub struct RegistryResolver {
    registry: Arc<dyn Registry>,
    retry: RetryPolicy,
}

impl RegistryResolver {
    pub fn new(registry: Arc<dyn Registry>, retry: RetryPolicy) -> Self {
        Self { registry, retry }
    }

    /// Resolve `name` to the first CID the registry reports for the first
    /// spelling that matches; falls back to a word-level search.
    pub async fn resolve_cid(&self, name: &str) -> Result<String, ResolveError> {
        for (label, variant) in name_variants(name) {
            match self.registry.find_cids_by_name(&variant, NameMatch::Exact).await {
                Ok(cids) => {
                    if let Some(cid) = cids.into_iter().next() {
                        info!(name = %name, variant = %variant, strategy = label, cid = %cid, "Found PubChem CID");
                        return Ok(cid);
                    }
                    debug!(variant = %variant, strategy = label, "No match for name variant");
                }
                Err(e) => {
                    debug!(variant = %variant, strategy = label, error = %e, "Name variant lookup failed");
                }
            }
        }

        match self.registry.find_cids_by_name(name, NameMatch::Word).await {
            Ok(cids) => {
                if let Some(cid) = cids.into_iter().next() {
                    info!(name = %name, cid = %cid, strategy = "word_search", "Found PubChem CID");
                    return Ok(cid);
                }
            }
            Err(e) => warn!(name = %name, error = %e, "PubChem word search failed"),
        }

        Err(ResolveError::NotFound {
            query: name.to_string(),
            suggestions: NOT_FOUND_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Fetch the canonical SMILES for an already-resolved CID, with retries.
    pub async fn fetch_structure(&self, cid: &str) -> Result<String, ResolveError> {
        let registry = &self.registry;
        let smiles = self
            .retry
            .run("pubchem_structure", || registry.fetch_structure(cid))
            .await
            .map_err(|source| ResolveError::Inconsistent { cid: cid.to_string(), source })?;

        debug!(cid = %cid, smiles = %smiles, "Retrieved SMILES");
        Ok(smiles)
    }

    /// Name -> CID -> SMILES.
    pub async fn resolve(&self, name: &str) -> Result<RegistryMatch, ResolveError> {
        let cid = self.resolve_cid(name).await?;
        let smiles = self.fetch_structure(&cid).await?;
        Ok(RegistryMatch { cid, smiles })
    }

    /// Direct formula lookup. A failed name lookup leaves `name` empty.
    pub async fn check_formula(&self, formula: &str) -> Result<FormulaCheck, RegistryError> {
        let Some(cid) = self.registry.find_cids_by_formula(formula).await?.into_iter().next() else {
            debug!(formula = %formula, "Formula not present in PubChem");
            return Ok(FormulaCheck::missing());
        };

        let name = match self.registry.fetch_display_name(&cid).await {
            Ok(name) => name,
            Err(e) => {
                warn!(formula = %formula, cid = %cid, error = %e, "Failed to fetch compound name");
                None
            }
        };

        Ok(FormulaCheck { exists: true, name, cid: Some(cid) })
    }
}
