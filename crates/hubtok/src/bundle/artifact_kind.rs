//! # Artifact Kinds

/// The role a file plays in a tokenizer bundle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::EnumIter,
    strum::Display,
)]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum ArtifactKind {
    /// Serialized `tokenizers` pipeline; `tokenizer.json`.
    TokenizerJson,

    /// Tokenizer class and options; `tokenizer_config.json`.
    TokenizerConfig,

    /// Named special tokens; `special_tokens_map.json`.
    SpecialTokensMap,

    /// Tokens added on top of the base vocabulary; `added_tokens.json`.
    AddedTokens,

    /// Base vocabulary; `vocab.json` or `vocab.txt`.
    Vocabulary,

    /// BPE merge rules; `merges.txt`.
    Merges,

    /// A `sentencepiece` model.
    SentencePiece,

    /// Chat prompt template.
    ChatTemplate,
}

impl ArtifactKind {
    /// The file names recognized for this kind.
    pub fn file_names(self) -> &'static [&'static str] {
        use ArtifactKind::*;
        match self {
            TokenizerJson => &["tokenizer.json"],
            TokenizerConfig => &["tokenizer_config.json"],
            SpecialTokensMap => &["special_tokens_map.json"],
            AddedTokens => &["added_tokens.json"],
            Vocabulary => &["vocab.json", "vocab.txt"],
            Merges => &["merges.txt"],
            SentencePiece => &[
                "tokenizer.model",
                "spiece.model",
                "sentencepiece.bpe.model",
            ],
            ChatTemplate => &["chat_template.jinja", "chat_template.json"],
        }
    }

    /// Classify a repository file.
    ///
    /// Only files at the repository root are bundle members;
    /// `onnx/tokenizer.json` and friends belong to other artifacts.
    pub fn classify(file_name: &str) -> Option<Self> {
        use strum::IntoEnumIterator;

        if file_name.contains('/') {
            return None;
        }
        Self::iter().find(|kind| kind.file_names().iter().any(|n| *n == file_name))
    }
}
