use quick_xml::escape::unescape;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::types::DocumentKind;

/// rebuild a document from its root fragment and return its bytes
///
/// `lookup` supplies fragment bytes by hash and is expected to fail with
/// [`Error::FragmentNotFound`] for unknown hashes.
pub fn reconstruct<F>(root: &Hash, kind: DocumentKind, lookup: F) -> Result<Vec<u8>>
where
    F: FnMut(&Hash) -> Result<Vec<u8>>,
{
    Ok(reconstruct_document(root, kind, lookup)?.to_bytes())
}

/// rebuild a document tree from its root fragment
pub fn reconstruct_document<F>(root: &Hash, kind: DocumentKind, mut lookup: F) -> Result<Document>
where
    F: FnMut(&Hash) -> Result<Vec<u8>>,
{
    let skeleton = lookup(root)?;
    let mut document = Document::parse_stored(&skeleton, kind)?;

    // stack of unresolved references; popping yields document order
    let mut pending = document.fragment_refs(document.root());
    pending.reverse();

    while let Some((id, hash)) = pending.pop() {
        let raw = lookup(&hash)?;
        let (markup, tail) = split_tail(&raw)
            .ok_or_else(|| Error::parse(kind, format!("fragment {} has no element markup", hash)))?;

        let fragment = Document::parse_stored(markup, kind)?;
        let tail = decode_tail(tail, kind)?;

        let mut nested = document.graft(id, fragment, tail);
        nested.reverse();
        pending.extend(nested);
    }

    Ok(document)
}

/// split fragment bytes at the last `>` into element markup and tail text
fn split_tail(raw: &[u8]) -> Option<(&[u8], &[u8])> {
    let end = raw.iter().rposition(|b| *b == b'>')?;
    Some((&raw[..=end], &raw[end + 1..]))
}

fn decode_tail(tail: &[u8], kind: DocumentKind) -> Result<String> {
    let tail = std::str::from_utf8(tail).map_err(|e| Error::parse(kind, e))?;
    let tail = unescape(tail).map_err(|e| Error::parse(kind, e))?;
    Ok(tail.into_owned())
}
