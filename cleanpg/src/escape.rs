//! Entity escaping for text content and attribute values.

use std::borrow::Cow;

/// Characters that get replaced by an entity.
const ESCAPED: [char; 6] = ['&', '\'', '<', '>', '"', '\r'];

fn entity(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        // "&#39;" is shorter than "&apos;", and apos wasn't in HTML until HTML5.
        '\'' => Some("&#39;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        // "&#34;" is shorter than "&quot;".
        '"' => Some("&#34;"),
        '\r' => Some("&#13;"),
        _ => None,
    }
}

/// Append `text` to `out`, escaping `& ' < > "` and carriage returns.
///
/// Everything else, newlines, tabs and non-ASCII included, is copied as is.
/// Already-escaped input is escaped again (`&amp;` becomes `&amp;amp;`).
pub fn escape_into(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(i) = rest.find(ESCAPED) {
        out.push_str(&rest[..i]);
        // Every ESCAPED char is a single byte.
        let c = rest.as_bytes()[i] as char;
        out.push_str(entity(c).unwrap_or_default());
        rest = &rest[i + 1..];
    }
    out.push_str(rest);
}

/// Escape `text`, borrowing it when nothing needs replacing.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(ESCAPED) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    escape_into(&mut out, text);
    Cow::Owned(out)
}
