// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Static syntax knowledge base.
//!
//! One TOML document per configured engine (`[meta]` plus `[types.*]`) is loaded
//! once at startup into an immutable [`SyntaxLibrary`]. Lookups are total: a miss
//! returns a [`LookupError`] enumerating the valid alternatives so an agent can
//! self-correct without another round trip.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Engines the process is configured to serve. Startup fails unless every one
/// of these has a loadable syntax document.
pub const CONFIGURED_ENGINES: &[&str] = &[
    "blockdiag",
    "c4plantuml",
    "d2",
    "dbml",
    "ditaa",
    "erd",
    "graphviz",
    "mermaid",
    "nomnoml",
    "nwdiag",
    "plantuml",
    "seqdiag",
    "svgbob",
    "wavedrom",
];

/// Syntax ruleset for one (engine, diagram-type) pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeSyntax {
    description: String,
    #[serde(default)]
    use_cases: Vec<String>,
    syntax_rules: String,
    examples: Vec<String>,
}

impl TypeSyntax {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn use_cases(&self) -> &[String] {
        &self.use_cases
    }

    pub fn syntax_rules(&self) -> &str {
        &self.syntax_rules
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }
}

/// Everything known about one engine: metadata plus its diagram-type rulesets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSyntax {
    name: String,
    description: String,
    docs_url: String,
    types: BTreeMap<String, TypeSyntax>,
}

impl EngineSyntax {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        docs_url: impl Into<String>,
        types: BTreeMap<String, TypeSyntax>,
    ) -> Self {
        let types = types.into_iter().map(|(key, value)| (key.to_lowercase(), value)).collect();
        Self {
            name: name.into(),
            description: description.into(),
            docs_url: docs_url.into(),
            types,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn docs_url(&self) -> &str {
        &self.docs_url
    }

    pub fn types(&self) -> &BTreeMap<String, TypeSyntax> {
        &self.types
    }

    pub fn type_names(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }
}

#[derive(Debug, Deserialize)]
struct MetaSection {
    language: String,
    description: String,
    #[serde(default)]
    docs_url: String,
}

#[derive(Debug, Deserialize)]
struct SyntaxDoc {
    meta: MetaSection,
    types: BTreeMap<String, TypeSyntax>,
}

/// Immutable process-lifetime mapping from engine to syntax rulesets.
///
/// Keys are stored lowercase; lookups are case-insensitive on both the engine
/// and the diagram-type key. Iteration order is the sorted key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxLibrary {
    engines: BTreeMap<String, EngineSyntax>,
}

impl SyntaxLibrary {
    /// Loads `<dir>/<engine>.toml` for every configured engine.
    ///
    /// Any missing or malformed document is fatal and names the engine; the
    /// library is never constructed partially loaded.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, SyntaxLoadError> {
        let dir = dir.as_ref();
        let mut engines = BTreeMap::new();
        for &engine in CONFIGURED_ENGINES {
            let path = dir.join(format!("{engine}.toml"));
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(source) if source.kind() == io::ErrorKind::NotFound => {
                    return Err(SyntaxLoadError::Missing { engine: engine.to_owned(), path });
                }
                Err(source) => {
                    return Err(SyntaxLoadError::Io { engine: engine.to_owned(), path, source });
                }
            };
            let doc: SyntaxDoc = toml::from_str(&text).map_err(|source| SyntaxLoadError::Parse {
                engine: engine.to_owned(),
                path: path.clone(),
                source,
            })?;
            engines.insert(
                engine.to_lowercase(),
                EngineSyntax::new(doc.meta.language, doc.meta.description, doc.meta.docs_url, doc.types),
            );
        }
        Ok(Self { engines })
    }

    /// Builds a library directly from engine entries (keys are lowercased).
    pub fn from_engines(engines: BTreeMap<String, EngineSyntax>) -> Self {
        let engines = engines.into_iter().map(|(key, value)| (key.to_lowercase(), value)).collect();
        Self { engines }
    }

    /// All engine keys, stable (sorted) order.
    pub fn engine_names(&self) -> Vec<String> {
        self.engines.keys().cloned().collect()
    }

    pub fn engines(&self) -> &BTreeMap<String, EngineSyntax> {
        &self.engines
    }

    /// Case-insensitive engine lookup; a miss enumerates every known engine.
    pub fn engine(&self, engine: &str) -> Result<&EngineSyntax, LookupError> {
        self.engines.get(&engine.to_lowercase()).ok_or_else(|| LookupError::UnknownEngine {
            engine: engine.to_owned(),
            supported_engines: self.engine_names(),
        })
    }

    /// Case-insensitive (engine, type) lookup; an unknown type on a known
    /// engine enumerates that engine's types only.
    pub fn diagram_type(
        &self,
        engine: &str,
        diagram_type: &str,
    ) -> Result<&TypeSyntax, LookupError> {
        let entry = self.engine(engine)?;
        entry.types.get(&diagram_type.to_lowercase()).ok_or_else(|| LookupError::UnknownType {
            engine: entry.name.clone(),
            diagram_type: diagram_type.to_owned(),
            supported_types: entry.type_names(),
        })
    }
}

/// Knowledge-base miss, carrying the valid alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    UnknownEngine {
        engine: String,
        supported_engines: Vec<String>,
    },
    UnknownType {
        engine: String,
        diagram_type: String,
        supported_types: Vec<String>,
    },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEngine { engine, .. } => write!(f, "unsupported engine: {engine}"),
            Self::UnknownType { engine, diagram_type, .. } => {
                write!(f, "engine {engine} does not support diagram type: {diagram_type}")
            }
        }
    }
}

impl Error for LookupError {}

/// Fatal startup failure while loading the knowledge base.
#[derive(Debug)]
pub enum SyntaxLoadError {
    Missing {
        engine: String,
        path: PathBuf,
    },
    Io {
        engine: String,
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        engine: String,
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for SyntaxLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { engine, path } => {
                write!(f, "syntax document for engine {engine} is missing at {path:?}")
            }
            Self::Io { engine, path, source } => {
                write!(f, "cannot read syntax document for engine {engine} at {path:?}: {source}")
            }
            Self::Parse { engine, path, source } => {
                write!(f, "cannot parse syntax document for engine {engine} at {path:?}: {source}")
            }
        }
    }
}

impl Error for SyntaxLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Missing { .. } => None,
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}
