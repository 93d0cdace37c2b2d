use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use drugscope_registry::{NameMatch, Registry, RegistryError};

fn outage(what: &str) -> RegistryError {
    RegistryError::Status { status: 503, url: format!("mock://pubchem/{}", what) }
}

/// Scripted in-memory [`Registry`] that records every call it receives.
#[derive(Default)]
pub struct MockRegistry {
    exact: HashMap<String, Vec<String>>,
    word: HashMap<String, Vec<String>>,
    formulas: HashMap<String, Vec<String>>,
    structures: HashMap<String, String>,
    display_names: HashMap<String, String>,
    failing_names: HashSet<String>,
    structure_failures: AtomicU32,
    display_name_fails: bool,
    formula_lookup_fails: bool,
    name_queries: Mutex<Vec<(String, NameMatch)>>,
    structure_calls: AtomicU32,
    display_name_calls: AtomicU32,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `name` (exact spelling) resolves to `cids`.
    pub fn with_name(mut self, name: &str, cids: &[&str]) -> Self {
        self.exact.insert(name.to_string(), cids.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Word-level search for `name` yields `cids`.
    pub fn with_word_match(mut self, name: &str, cids: &[&str]) -> Self {
        self.word.insert(name.to_string(), cids.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_formula(mut self, formula: &str, cids: &[&str]) -> Self {
        self.formulas.insert(formula.to_string(), cids.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_structure(mut self, cid: &str, smiles: &str) -> Self {
        self.structures.insert(cid.to_string(), smiles.to_string());
        self
    }

    pub fn with_display_name(mut self, cid: &str, name: &str) -> Self {
        self.display_names.insert(cid.to_string(), name.to_string());
        self
    }

    /// Lookups of this exact spelling fail with a transport error.
    pub fn with_failing_name(mut self, name: &str) -> Self {
        self.failing_names.insert(name.to_string());
        self
    }

    /// The next `n` structure fetches fail before the scripted answer is used.
    pub fn with_structure_failures(self, n: u32) -> Self {
        self.structure_failures.store(n, Ordering::SeqCst);
        self
    }

    pub fn with_failing_display_name(mut self) -> Self {
        self.display_name_fails = true;
        self
    }

    pub fn with_failing_formula_lookup(mut self) -> Self {
        self.formula_lookup_fails = true;
        self
    }

    /// Every name lookup so far, in order.
    pub fn name_queries(&self) -> Vec<(String, NameMatch)> {
        self.name_queries.lock().unwrap().clone()
    }

    pub fn structure_calls(&self) -> u32 {
        self.structure_calls.load(Ordering::SeqCst)
    }

    pub fn display_name_calls(&self) -> u32 {
        self.display_name_calls.load(Ordering::SeqCst)
    }

    /// Total number of calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.name_queries.lock().unwrap().len()
            + self.structure_calls() as usize
            + self.display_name_calls() as usize
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn find_cids_by_name(&self, name: &str, mode: NameMatch) -> Result<Vec<String>, RegistryError> {
        self.name_queries.lock().unwrap().push((name.to_string(), mode));
        if self.failing_names.contains(name) {
            return Err(outage("name"));
        }
        let table = match mode {
            NameMatch::Exact => &self.exact,
            NameMatch::Word => &self.word,
        };
        Ok(table.get(name).cloned().unwrap_or_default())
    }

    async fn find_cids_by_formula(&self, formula: &str) -> Result<Vec<String>, RegistryError> {
        if self.formula_lookup_fails {
            return Err(outage("fastformula"));
        }
        Ok(self.formulas.get(formula).cloned().unwrap_or_default())
    }

    async fn fetch_structure(&self, cid: &str) -> Result<String, RegistryError> {
        self.structure_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.structure_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.structure_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(outage("property"));
        }
        self.structures.get(cid).cloned().ok_or_else(|| RegistryError::MissingProperty {
            cid: cid.to_string(),
            property: "CanonicalSMILES".to_string(),
        })
    }

    async fn fetch_display_name(&self, cid: &str) -> Result<Option<String>, RegistryError> {
        self.display_name_calls.fetch_add(1, Ordering::SeqCst);
        if self.display_name_fails {
            return Err(outage("IUPACName"));
        }
        Ok(self.display_names.get(cid).cloned())
    }
}
