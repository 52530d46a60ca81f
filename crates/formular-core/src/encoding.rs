//! Encoding-tolerant reading of metadata files
//!
//! GDT files come from practice software with no guaranteed encoding. The
//! chain tries each candidate in order and keeps the first one that decodes
//! the whole file without replacement characters.

use std::path::Path;

use encoding_rs::Encoding;

use crate::error::{Error, Result};

/// Default decoding order: UTF-8 first, then Latin-1
pub const DEFAULT_ENCODINGS: &[&str] = &["utf-8", "iso-8859-1"];

/// Ordered list of candidate encodings
#[derive(Debug, Clone)]
pub struct EncodingChain {
    encodings: Vec<&'static Encoding>,
}

/// Text decoded from a metadata file
#[derive(Debug, Clone)]
pub struct DecodedText {
    /// Decoded content
    pub text: String,
    /// Encoding that succeeded
    pub encoding: &'static Encoding,
}

impl EncodingChain {
    /// Build a chain from WHATWG encoding labels
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        let encodings = labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| Error::ConfigInvalid {
                    message: format!("unknown encoding '{}'", label),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if encodings.is_empty() {
            return Err(Error::ConfigInvalid {
                message: "at least one encoding must be configured".to_string(),
            });
        }

        Ok(Self { encodings })
    }

    /// Candidate encodings in the order tried
    pub fn encodings(&self) -> &[&'static Encoding] {
        &self.encodings
    }

    /// Decode `bytes` with the first encoding that accepts them
    pub fn decode(&self, bytes: &[u8]) -> Option<DecodedText> {
        self.encodings.iter().find_map(|&encoding| {
            encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| DecodedText {
                    text: text.into_owned(),
                    encoding,
                })
        })
    }

    /// Read and decode a file
    pub fn read_to_string(&self, path: &Path) -> Result<DecodedText> {
        let bytes = std::fs::read(path)?;
        let decoded = self.decode(&bytes).ok_or_else(|| Error::Encoding {
            path: path.to_path_buf(),
            tried: self.encodings.iter().map(|e| e.name().to_string()).collect(),
        })?;

        tracing::debug!(
            "Decoded {} as {}",
            path.display(),
            decoded.encoding.name()
        );
        Ok(decoded)
    }
}

impl Default for EncodingChain {
    fn default() -> Self {
        Self {
            encodings: vec![encoding_rs::UTF_8, encoding_rs::WINDOWS_1252],
        }
    }
}
