//! Library registry
//!
//! Maps a library identifier to the documentation domain searches are
//! scoped to. The registry is built once and handed to the pipeline; it is
//! never mutated while requests are served.

use crate::error::DocsError;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;

/// Built-in library table
const DEFAULT_LIBRARIES: &[(&str, &str)] = &[
    ("langchain", "python.langchain.com/docs"),
    ("llama-index", "docs.llamaindex.ai/en/stable"),
    ("openai", "platform.openai.com/docs"),
];

/// Ordered mapping from library identifier to documentation domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryRegistry {
    entries: Vec<(String, String)>,
}

impl LibraryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a registry holding the built-in libraries
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (library, domain) in DEFAULT_LIBRARIES {
            registry.register(*library, *domain);
        }
        registry
    }

    /// Parse a registry from a JSON object of `{"library": "domain"}` pairs
    ///
    /// Key order in the document is kept as registry order.
    pub fn from_json(json: &str) -> Result<Self, DocsError> {
        serde_json::from_str(json).map_err(|e| DocsError::InvalidRegistry(e.to_string()))
    }

    /// Register a library, replacing the domain of an existing entry in place
    pub fn register(&mut self, library: impl Into<String>, domain: impl Into<String>) {
        let library = library.into();
        let domain = domain.into();
        match self.entries.iter_mut().find(|(id, _)| *id == library) {
            Some(entry) => entry.1 = domain,
            None => self.entries.push((library, domain)),
        }
    }

    /// Look up the documentation domain for a library
    pub fn resolve(&self, library: &str) -> Result<&str, DocsError> {
        self.entries
            .iter()
            .find(|(id, _)| id == library)
            .map(|(_, domain)| domain.as_str())
            .ok_or_else(|| DocsError::UnsupportedLibrary {
                library: library.to_string(),
                supported: self.libraries().map(str::to_string).collect(),
            })
    }

    /// Registered identifiers, in registry order
    pub fn libraries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// Registered `(library, domain)` pairs, in registry order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(id, domain)| (id.as_str(), domain.as_str()))
    }

    /// Number of registered libraries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no library is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for LibraryRegistry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RegistryVisitor;

        impl<'de> Visitor<'de> for RegistryVisitor {
            type Value = LibraryRegistry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of library identifiers to documentation domains")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut registry = LibraryRegistry::new();
                while let Some((library, domain)) = map.next_entry::<String, String>()? {
                    registry.register(library, domain);
                }
                Ok(registry)
            }
        }

        deserializer.deserialize_map(RegistryVisitor)
    }
}
