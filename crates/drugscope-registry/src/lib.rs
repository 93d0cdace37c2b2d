//! drugscope-registry: resolution of drug names and formulas against PubChem.
//!
//! `Registry` is the raw lookup seam (one call per registry request);
//! `RegistryResolver` layers the name-variant fallback, the broad word
//! search and the retried structure fetch on top of it.

pub mod error;
pub mod pubchem;
pub mod resolver;

use async_trait::async_trait;

pub use error::{RegistryError, ResolveError};
pub use pubchem::PubChemClient;
pub use resolver::{name_variants, RegistryResolver, NOT_FOUND_SUGGESTIONS};

/// How a name lookup should match compound names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    /// The whole name must match a synonym.
    Exact,
    /// Any word of the name may match (broader, noisier).
    Word,
}

/// Read-only chemistry registry.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Compound identifiers matching `name`, in registry order. No match is `Ok(vec![])`.
    async fn find_cids_by_name(&self, name: &str, mode: NameMatch) -> Result<Vec<String>, RegistryError>;

    /// Compound identifiers matching a molecular formula, in registry order.
    async fn find_cids_by_formula(&self, formula: &str) -> Result<Vec<String>, RegistryError>;

    /// Canonical SMILES for a compound.
    async fn fetch_structure(&self, cid: &str) -> Result<String, RegistryError>;

    /// Human-readable (IUPAC) name for a compound, if the registry has one.
    async fn fetch_display_name(&self, cid: &str) -> Result<Option<String>, RegistryError>;
}
