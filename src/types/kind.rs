use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::Error;

/// parser/serializer family a document is handled with
///
/// stored in every commit because reconstruction must use the same family
/// that produced the fragments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Html,
    Xml,
}

impl DocumentKind {
    /// name used in commit records
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Html => "html",
            DocumentKind::Xml => "xml",
        }
    }

    /// pick a kind from the file extension; anything not listed as html is xml
    pub fn from_path(path: &Path, html_extensions: &[String]) -> Self {
        let is_html = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| html_extensions.iter().any(|h| h.eq_ignore_ascii_case(ext)))
            .unwrap_or(false);

        if is_html {
            DocumentKind::Html
        } else {
            DocumentKind::Xml
        }
    }

    pub fn is_html(&self) -> bool {
        matches!(self, DocumentKind::Html)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(DocumentKind::Html),
            "xml" => Ok(DocumentKind::Xml),
            _ => Err(Error::InvalidDocumentKind(s.to_string())),
        }
    }
}
