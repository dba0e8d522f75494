//! Base64 invoice documents.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::{ErpError, InvoiceDocument};

pub const DEFAULT_CONTENT_TYPE: &str = "application/pdf";

/// Decodes a base64 document payload into an [`InvoiceDocument`].
///
/// Line breaks, surrounding whitespace and a `data:<mime>;base64,` prefix are
/// tolerated. `content_type` from the vendor wins; otherwise the data-URL
/// type, then `%PDF` magic bytes, then [`DEFAULT_CONTENT_TYPE`].
pub fn decode_document(
    invoice_number: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    content: Option<&str>,
) -> Result<InvoiceDocument, ErpError> {
    let content = content
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| ErpError::invalid_document("document content is missing"))?;

    let (data_url_type, encoded) = split_data_url(content);
    let compact: String = encoded
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect();

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|error| ErpError::invalid_document(format!("document is not valid base64: {error}")))?;
    if bytes.is_empty() {
        return Err(ErpError::invalid_document("document content is empty"));
    }

    let content_type = content_type
        .or(data_url_type)
        .or_else(|| sniff_content_type(&bytes).map(str::to_owned))
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned());

    Ok(InvoiceDocument::new(
        invoice_number,
        file_name,
        content_type,
        bytes,
    ))
}

fn split_data_url(content: &str) -> (Option<String>, &str) {
    let Some(rest) = content.strip_prefix("data:") else {
        return (None, content);
    };
    match rest.split_once(',') {
        Some((header, data)) => {
            let mime = header
                .strip_suffix(";base64")
                .unwrap_or(header)
                .trim();
            ((!mime.is_empty()).then(|| mime.to_owned()), data)
        }
        None => (None, content),
    }
}

fn sniff_content_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"%PDF") {
        Some("application/pdf")
    } else if bytes.starts_with(b"\x89PNG") {
        Some("image/png")
    } else if bytes.starts_with(b"\xFF\xD8\xFF") {
        Some("image/jpeg")
    } else if bytes.starts_with(b"<?xml") {
        Some("application/xml")
    } else {
        None
    }
}
