//! # Model Identifiers and Revisions

use core::{fmt, str::FromStr};

use crate::errors::{HubtokError, HubtokResult};

/// The model fetched when none is given.
pub const DEFAULT_MODEL_ID: &str = "elyza/ELYZA-japanese-Llama-2-7b-instruct";

/// The revision fetched when none is given.
pub const DEFAULT_REVISION: &str = "main";

/// A validated hub repository identifier; `name` or `namespace/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId(String);

impl ModelId {
    /// Parse and validate a model identifier.
    ///
    /// Surrounding whitespace is trimmed.
    pub fn parse(id: &str) -> HubtokResult<Self> {
        let trimmed = id.trim();
        let reject = |reason| {
            Err(HubtokError::InvalidModelId {
                id: id.to_string(),
                reason,
            })
        };

        if trimmed.is_empty() {
            return reject("empty");
        }
        if trimmed.chars().any(char::is_whitespace) {
            return reject("contains whitespace");
        }

        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.len() > 2 {
            return reject("expected `name` or `namespace/name`");
        }
        for segment in &segments {
            if segment.is_empty() {
                return reject("empty path segment");
            }
            if *segment == "." || *segment == ".." {
                return reject("relative path segment");
            }
            if segment.contains('\\') {
                return reject("contains a backslash");
            }
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The namespace, if the id has one.
    pub fn namespace(&self) -> Option<&str> {
        self.0.split_once('/').map(|(ns, _)| ns)
    }

    /// The repository name, without the namespace.
    pub fn name(&self) -> &str {
        match self.0.split_once('/') {
            Some((_, name)) => name,
            None => &self.0,
        }
    }

    /// The id split on `/`; used as cache path context.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self(DEFAULT_MODEL_ID.to_string())
    }
}

impl fmt::Display for ModelId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModelId {
    type Err = HubtokError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ModelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A branch, tag, or commit in a hub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(String);

impl Revision {
    /// Parse and validate a revision.
    pub fn parse(revision: &str) -> HubtokResult<Self> {
        let trimmed = revision.trim();
        let reject = |reason| {
            Err(HubtokError::InvalidRevision {
                revision: revision.to_string(),
                reason,
            })
        };

        if trimmed.is_empty() {
            return reject("empty");
        }
        if trimmed.chars().any(char::is_whitespace) {
            return reject("contains whitespace");
        }
        if trimmed
            .split('/')
            .any(|s| s.is_empty() || s == "." || s == "..")
        {
            return reject("malformed path segment");
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The revision as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The revision as a single URL path segment.
    ///
    /// `refs/pr/1` becomes `refs%2Fpr%2F1`.
    pub fn url_segment(&self) -> String {
        self.0.replace('%', "%25").replace('/', "%2F")
    }

    /// The revision as a single file-system path component.
    ///
    /// Percent-encoded like [`Self::url_segment`], so distinct revisions
    /// never share a key.
    pub fn cache_key(&self) -> String {
        self.url_segment()
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self(DEFAULT_REVISION.to_string())
    }
}

impl fmt::Display for Revision {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Revision {
    type Err = HubtokError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
