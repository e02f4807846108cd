//! The generated member completion database.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{DatabaseError, Result};

/// Artifact format version written by the generator and required by the loader.
pub const FORMAT_VERSION: u32 = 1;

const BUNDLED_ARTIFACT: &str = include_str!("../data/dom-completions.json");

/// Whether a member is called or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Property,
    Method,
}

impl MemberKind {
    #[must_use]
    pub const fn from_is_method(is_method: bool) -> Self {
        if is_method {
            Self::Method
        } else {
            Self::Property
        }
    }

    #[must_use]
    pub const fn is_method(self) -> bool {
        matches!(self, Self::Method)
    }
}

/// A member of a DOM element type.
///
/// Serialized as the two-element tuple `["name", 0|1]`, where `1` marks a
/// callable member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(String, u8)", into = "(String, u8)")]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
}

impl Member {
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn property(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Property)
    }

    pub fn method(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Method)
    }
}

impl TryFrom<(String, u8)> for Member {
    type Error = String;

    fn try_from((name, flag): (String, u8)) -> std::result::Result<Self, Self::Error> {
        match flag {
            0 => Ok(Self::property(name)),
            1 => Ok(Self::method(name)),
            other => Err(format!(
                "member '{name}' has method flag {other}, expected 0 or 1"
            )),
        }
    }
}

impl From<Member> for (String, u8) {
    fn from(member: Member) -> Self {
        (member.name, u8::from(member.kind.is_method()))
    }
}

#[derive(Deserialize)]
struct VersionProbe {
    version: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct Artifact {
    version: u32,
    types: BTreeMap<String, Vec<Member>>,
}

/// Element type name → ordered member list.
///
/// Immutable once loaded. A type with no entry has no known members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionDatabase {
    types: BTreeMap<String, Vec<Member>>,
}

impl CompletionDatabase {
    /// Create an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the artifact compiled into this crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_ARTIFACT)
    }

    /// Load an artifact from disk.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| DatabaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let database = Self::from_json(&contents)?;
        tracing::info!(
            types = database.type_count(),
            members = database.member_count(),
            "Loaded completion database"
        );
        Ok(database)
    }

    /// Parse an artifact.
    ///
    /// The version is checked before the body so that an artifact written by
    /// a different generator reports a version error instead of a shape error.
    pub fn from_json(json: &str) -> Result<Self> {
        let probe: VersionProbe = serde_json::from_str(json)?;
        if probe.version != Some(FORMAT_VERSION) {
            return Err(DatabaseError::UnsupportedVersion {
                found: probe.version,
                expected: FORMAT_VERSION,
            });
        }

        let artifact: Artifact = serde_json::from_str(json)?;
        Ok(Self {
            types: artifact.types,
        })
    }

    /// Serialize to the artifact format.
    pub fn to_json(&self) -> Result<String> {
        let artifact = Artifact {
            version: FORMAT_VERSION,
            types: self.types.clone(),
        };
        Ok(serde_json::to_string(&artifact)?)
    }

    /// Set the member list for a type, replacing any previous entry.
    pub fn insert(&mut self, type_name: impl Into<String>, members: Vec<Member>) {
        self.types.insert(type_name.into(), members);
    }

    /// Members of a type, in generated order. Empty for unknown types.
    #[must_use]
    pub fn members(&self, type_name: &str) -> &[Member] {
        self.types.get(type_name).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contains_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Total number of members across all types.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.types.values().map(Vec::len).sum()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}
