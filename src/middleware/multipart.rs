//! Minimal `multipart/form-data` decoding for the [`super::form_data`]
//! middleware. Covers the RFC 7578 shape produced by browsers and HTTP
//! clients: CRLF line endings, one `Content-Disposition: form-data` header
//! per part, optional per-part `Content-Type`.

use anyhow::{anyhow, Context as _, Result};

use crate::context::FormField;

/// Extract the boundary parameter from a `Content-Type` header value.
#[must_use]
pub fn boundary(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (k, v) = param.trim().split_once('=')?;
        if k.eq_ignore_ascii_case("boundary") {
            Some(v.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

/// Decode a multipart body into its field collection.
pub fn parse(body: &[u8], boundary: &str) -> Result<Vec<FormField>> {
    let opening = format!("--{boundary}").into_bytes();
    // Subsequent delimiters include the preceding CRLF, so field data
    // containing the bare boundary text cannot split a part early.
    let delim = format!("\r\n--{boundary}").into_bytes();
    let mut fields = Vec::new();

    let mut pos = find(body, &opening)
        .ok_or_else(|| anyhow!("multipart delimiter not found"))?
        + opening.len();
    loop {
        // "--" right after a delimiter is the closing marker
        if body[pos..].starts_with(b"--") {
            break;
        }
        if body[pos..].starts_with(b"\r\n") {
            pos += 2;
        }
        let rest = &body[pos..];
        let next = find(rest, &delim).ok_or_else(|| anyhow!("unterminated multipart part"))?;
        let part = &rest[..next];
        pos += next + delim.len();
        fields.push(parse_part(part)?);
    }

    Ok(fields)
}

fn parse_part(part: &[u8]) -> Result<FormField> {
    let header_end =
        find(part, b"\r\n\r\n").ok_or_else(|| anyhow!("multipart part without header block"))?;
    let data = &part[header_end + 4..];

    let mut name = None;
    let mut filename = None;
    let mut content_type = None;
    let headers =
        std::str::from_utf8(&part[..header_end]).context("non-UTF-8 multipart part headers")?;
    for line in headers.split("\r\n") {
        let Some((hname, hval)) = line.split_once(':') else {
            continue;
        };
        let hval = hval.trim();
        if hname.eq_ignore_ascii_case("content-disposition") {
            for param in hval.split(';').skip(1) {
                let Some((k, v)) = param.trim().split_once('=') else {
                    continue;
                };
                let v = v.trim().trim_matches('"').to_string();
                match k.trim() {
                    "name" => name = Some(v),
                    "filename" => filename = Some(v),
                    _ => {}
                }
            }
        } else if hname.eq_ignore_ascii_case("content-type") {
            content_type = Some(hval.to_string());
        }
    }

    Ok(FormField {
        name: name.ok_or_else(|| anyhow!("multipart part without a field name"))?,
        filename,
        content_type,
        data: data.to_vec(),
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
