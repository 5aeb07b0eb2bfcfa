use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque handle to a material owned by the external property toolkit.
///
/// The geometry core never inspects composition or cross sections; it only
/// threads handles from the registry into cell fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialRef(u32);

impl MaterialRef {
    pub fn index(&self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Error)]
pub enum MaterialError {
    #[error("material '{name}' is not present in the registry")]
    NotFound { name: String },
}

/// Typed name-to-handle registry over the external material collection.
///
/// Lookups either produce a handle or an explicit `NotFound`; a misspelled
/// material name cannot silently build an empty model.
#[derive(Debug, Clone, Default)]
pub struct MaterialRegistry {
    names: Vec<String>,
    by_name: HashMap<String, MaterialRef>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material name, returning its handle. Registering the same
    /// name twice returns the original handle.
    pub fn register(&mut self, name: &str) -> MaterialRef {
        if let Some(&m) = self.by_name.get(name) {
            return m;
        }
        let m = MaterialRef(self.names.len() as u32);
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), m);
        m
    }

    pub fn lookup(&self, name: &str) -> Result<MaterialRef, MaterialError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| MaterialError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn name(&self, material: MaterialRef) -> Option<&str> {
        self.names.get(material.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
