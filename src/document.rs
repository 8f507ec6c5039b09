//! Source documents.

use crate::error::Result;
use crate::strip::{extract_body, has_body};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// A named source text. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    name: String,
    text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Reads a UTF-8 file. The document is named after the file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, &bytes)
    }

    /// Decodes UTF-8 bytes, dropping a leading byte order mark.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        Ok(Self::new(name, text))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Raw body between the document delimiters, comments included.
    pub fn body(&self) -> Result<&str> {
        extract_body(&self.name, &self.text)
    }

    /// Returns true if the raw text has a complete delimiter pair.
    pub fn has_body(&self) -> bool {
        has_body(&self.text)
    }

    /// Length of the text in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
