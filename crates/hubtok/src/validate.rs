//! # Bundle Validation
//!
//! Bundles are opaque; the only check made is that a `tokenizer.json`,
//! when present, loads with the `tokenizers` crate.

use std::path::Path;

use tokenizers::Tokenizer;

use crate::{
    bundle::TokenizerBundle,
    errors::{HubtokError, HubtokResult},
};

/// An added (or special) token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedTokenSummary {
    /// Token id.
    pub id: u32,

    /// Token text.
    pub content: String,

    /// Is this a special token?
    pub special: bool,
}

/// Summary of a loaded tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerSummary {
    /// Vocabulary size, including added tokens.
    pub vocab_size: usize,

    /// Added tokens, sorted by id.
    pub added_tokens: Vec<AddedTokenSummary>,
}

/// Load a `tokenizer.json` file.
pub fn load_tokenizer<P: AsRef<Path>>(path: P) -> HubtokResult<Tokenizer> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(HubtokError::MissingArtifact(path.display().to_string()));
    }
    Ok(Tokenizer::from_file(path)?)
}

/// Summarize a tokenizer.
pub fn summarize(tokenizer: &Tokenizer) -> TokenizerSummary {
    let mut added_tokens: Vec<AddedTokenSummary> = tokenizer
        .get_added_tokens_decoder()
        .into_iter()
        .map(|(id, token)| AddedTokenSummary {
            id,
            content: token.content,
            special: token.special,
        })
        .collect();
    added_tokens.sort_by_key(|t| t.id);

    TokenizerSummary {
        vocab_size: tokenizer.get_vocab_size(true),
        added_tokens,
    }
}

/// Load and summarize `dir/tokenizer.json`.
pub fn inspect_dir<P: AsRef<Path>>(dir: P) -> HubtokResult<TokenizerSummary> {
    let tokenizer = load_tokenizer(dir.as_ref().join("tokenizer.json"))?;
    Ok(summarize(&tokenizer))
}

/// Check that the bundle's `tokenizer.json`, if any, loads.
///
/// Returns `None` for bundles without one (`sentencepiece`-only repos, etc).
pub fn validate_bundle(bundle: &TokenizerBundle) -> HubtokResult<Option<TokenizerSummary>> {
    let Some(file) = bundle.tokenizer_json() else {
        log::info!("{}: no tokenizer.json; skipping validation", bundle.model);
        return Ok(None);
    };

    let summary = summarize(&load_tokenizer(&file.path)?);
    log::info!(
        "{}: vocab size {}, {} added token(s)",
        bundle.model,
        summary.vocab_size,
        summary.added_tokens.len()
    );
    Ok(Some(summary))
}
