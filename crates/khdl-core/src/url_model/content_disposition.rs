//! Content-Disposition header parsing (filename and filename*).

/// Extracts the filename from a raw Content-Disposition header value.
///
/// Supports:
/// - `filename="value"` (quoted; strips quotes and unescapes `\"`)
/// - `filename=value` (token)
/// - `filename*=UTF-8''percent-encoded` (RFC 5987; decoded)
///
/// If both `filename` and `filename*` exist, `filename*` takes precedence.
/// Semicolons inside a quoted value do not split parameters.
pub fn parse_content_disposition_filename(header_value: &str) -> Option<String> {
    let mut plain: Option<String> = None;

    for (name, value) in params(header_value) {
        if name.eq_ignore_ascii_case("filename*") {
            if let Some(decoded) = decode_ext_value(&value) {
                if !decoded.is_empty() {
                    return Some(decoded);
                }
            }
        } else if name.eq_ignore_ascii_case("filename") && plain.is_none() {
            let v = unquote(&value);
            if !v.is_empty() {
                plain = Some(v);
            }
        }
    }

    plain
}

/// Splits `attachment; a=1; b="x;y"` into `(name, raw value)` pairs, keeping
/// quoted values intact. The disposition type (no `=`) is dropped.
fn params(header_value: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in header_value.chars() {
        if escaped {
            escaped = false;
            current.push(c);
            continue;
        }
        match c {
            '\\' if in_quotes => {
                escaped = true;
                current.push(c);
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ';' if !in_quotes => {
                flush(&current, &mut out);
                current.clear();
            }
            _ => current.push(c),
        }
    }
    flush(&current, &mut out);
    out
}

fn flush(part: &str, out: &mut Vec<(String, String)>) {
    if let Some((name, value)) = part.split_once('=') {
        out.push((name.trim().to_string(), value.trim().to_string()));
    }
}

/// Strips surrounding double quotes and resolves backslash escapes.
fn unquote(v: &str) -> String {
    if !(v.len() >= 2 && v.starts_with('"') && v.ends_with('"')) {
        return v.trim_matches('"').to_string();
    }
    let inner = &v[1..v.len() - 1];

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Decodes an RFC 5987 ext-value (`charset'lang'pct-encoded`). Only UTF-8
/// and ISO-8859-1 charsets are accepted; the latter is read as UTF-8 lossily.
fn decode_ext_value(v: &str) -> Option<String> {
    let v = unquote(v);
    let mut parts = v.splitn(3, '\'');
    let charset = parts.next()?;
    let _lang = parts.next()?;
    let encoded = parts.next()?;
    if !(charset.eq_ignore_ascii_case("utf-8") || charset.eq_ignore_ascii_case("iso-8859-1")) {
        return None;
    }
    Some(percent_decode(encoded))
}

/// Percent-decodes `input`; malformed escapes are kept literally and invalid
/// UTF-8 is replaced lossily.
pub(crate) fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(h << 4 | l);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
