// Call-map data model and the run-scoped index
//
// Pass 1 inserts Definitions (last writer wins on ID collisions), Pass 2
// appends CallSites to existing Mappings. Everything is keyed by the
// synthesized symbol ID; there are no pointer cycles.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A declared function, method, or constructor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    /// Globally unique symbol ID: `<pkg>[.<receiver>].<name>`
    pub id: String,
    /// Bare identifier of the declaration
    pub name: String,
    /// Canonical import path of the enclosing package
    pub package: String,
    /// Declaring file, relative to the target root, forward slashes
    pub file_path: String,
    /// 1-based line of the declaration
    pub line: usize,
}

/// Where a Definition is called from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSite {
    pub file_path: String,
    pub line: usize,
    /// ID of the innermost enclosing declared function
    pub caller_id: String,
}

/// One Definition with all the places it is called
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub definition: Definition,
    pub call_sites: Vec<CallSite>,
}

/// Synthesize the globally unique ID for a declaration.
///
/// `pkg.recv.name` for methods, `pkg.name` for free functions. The
/// receiver component is the receiver type's verbatim source text.
pub fn symbol_id(package: &str, receiver: Option<&str>, name: &str) -> String {
    match receiver {
        Some(recv) => format!("{}.{}.{}", package, recv, name),
        None => format!("{}.{}", package, name),
    }
}

/// The run-scoped index of definitions and their observed call sites
#[derive(Debug, Default)]
pub struct CodeMap {
    definitions: HashMap<String, Definition>,
    mappings: HashMap<String, Mapping>,
}

impl CodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition, replacing any earlier one with the same ID
    pub fn insert_definition(&mut self, def: Definition) {
        self.mappings.insert(
            def.id.clone(),
            Mapping {
                definition: def.clone(),
                call_sites: Vec::new(),
            },
        );
        self.definitions.insert(def.id.clone(), def);
    }

    /// Whether a definition with this ID was observed in Pass 1
    pub fn contains(&self, id: &str) -> bool {
        self.mappings.contains_key(id)
    }

    /// Append a call site to the mapping for `callee_id`.
    ///
    /// Returns false when no such definition is indexed.
    pub fn add_call_site(&mut self, callee_id: &str, site: CallSite) -> bool {
        match self.mappings.get_mut(callee_id) {
            Some(mapping) => {
                mapping.call_sites.push(site);
                true
            }
            None => false,
        }
    }

    /// Number of indexed definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Look up a definition by ID
    pub fn definition(&self, id: &str) -> Option<&Definition> {
        self.definitions.get(id)
    }

    /// All indexed definitions, in no particular order
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.values()
    }

    /// Consume the index, keeping only mappings with observed call sites
    pub fn into_mappings(self) -> Vec<Mapping> {
        self.mappings
            .into_values()
            .filter(|m| !m.call_sites.is_empty())
            .collect()
    }
}
