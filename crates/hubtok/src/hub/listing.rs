//! # Repository Listings
//!
//! The hub's model-info JSON names every file in a repository at a revision:
//!
//! ```json
//! {"id": "gpt2", "sha": "607a30d7...", "siblings": [{"rfilename": "tokenizer.json"}]}
//! ```
//!
//! Only the fields needed to select a tokenizer bundle are kept.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::errors::HubtokResult;

/// A single file in a repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoSibling {
    /// Path of the file, relative to the repository root.
    pub rfilename: String,
}

/// The files of a repository at one revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepoListing {
    /// The resolved commit hash, when the hub reports one.
    #[serde(default)]
    pub sha: Option<String>,

    /// Every file in the repository.
    #[serde(default)]
    pub siblings: Vec<RepoSibling>,
}

impl RepoListing {
    /// Parse a listing from model-info JSON.
    pub fn from_json_str(json: &str) -> HubtokResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a listing from a model-info JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> HubtokResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The repository-relative file names.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.siblings.iter().map(|s| s.rfilename.as_str())
    }
}
