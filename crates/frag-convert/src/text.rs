//! Text conversions: pure, deterministic string transforms.
//!
//! Payloads are decoded as UTF-8 lossily — a fragment declared as a text
//! type but holding invalid UTF-8 converts with replacement characters
//! rather than failing.

use pulldown_cmark::{html, Options, Parser};
use serde_json::Value;

use crate::error::{ConvertError, ConvertResult};

/// Render markdown to HTML: full block and inline rendering, raw HTML in the
/// source passed through.
pub fn markdown_to_html(data: &[u8], options: Options) -> Vec<u8> {
    let source = String::from_utf8_lossy(data);
    let parser = Parser::new_ext(&source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out.into_bytes()
}

/// Markdown to plain text is a direct stringification of the source, not a
/// render-then-strip.
pub fn markdown_to_plain(data: &[u8]) -> Vec<u8> {
    String::from_utf8_lossy(data).into_owned().into_bytes()
}

/// Strip every HTML tag span from the payload.
///
/// A tag is anything between `<` and the next `>` with at least one
/// character in between (non-greedy); a bare `<>` is kept as literal text.
/// Entity text and inline content are left as-is, with no entity decoding.
pub fn html_to_plain(data: &[u8]) -> Vec<u8> {
    let source = String::from_utf8_lossy(data);
    let mut out = String::with_capacity(source.len());
    let mut rest: &str = &source;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('>') {
            // Empty brackets are not a tag.
            Some(0) => {
                out.push('<');
                rest = after;
            }
            Some(close) => {
                rest = &after[close + 1..];
            }
            // Unclosed bracket: no tag, keep the remainder verbatim.
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out.into_bytes()
}

/// Flatten a JSON object's top-level pairs into `key: value` joined by
/// `", "`. String values print bare; every other value prints as its JSON
/// text. No nested flattening.
pub fn json_to_plain(data: &[u8]) -> ConvertResult<Vec<u8>> {
    let value: Value = serde_json::from_slice(data)?;
    let object = value.as_object().ok_or(ConvertError::NotJsonObject)?;
    let flattened = object
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("{key}: {s}"),
            other => format!("{key}: {other}"),
        })
        .collect::<Vec<_>>()
        .join(", ");
    Ok(flattened.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_renders_headings() {
        let html = markdown_to_html(b"# Hi", Options::empty());
        let html = String::from_utf8(html).unwrap();
        assert!(html.contains("<h1>Hi</h1>"), "got {html}");
    }

    #[test]
    fn markdown_raw_html_passes_through() {
        let html = markdown_to_html(b"before <em>kept</em> after", Options::empty());
        let html = String::from_utf8(html).unwrap();
        assert!(html.contains("<em>kept</em>"));
    }

    #[test]
    fn markdown_to_plain_is_verbatim() {
        assert_eq!(markdown_to_plain(b"# Hi"), b"# Hi");
    }

    #[test]
    fn html_tags_are_stripped() {
        let plain = html_to_plain(b"<p>Hello <b>world</b></p>");
        assert_eq!(plain, b"Hello world");
    }

    #[test]
    fn html_strip_is_non_greedy() {
        let plain = html_to_plain(b"<a><b>x</b></a>");
        assert_eq!(plain, b"x");
    }

    #[test]
    fn empty_brackets_survive_stripping() {
        assert_eq!(html_to_plain(b"a <> b"), b"a <> b");
    }

    #[test]
    fn unclosed_bracket_survives_stripping() {
        assert_eq!(html_to_plain(b"1 < 2"), b"1 < 2");
    }

    #[test]
    fn entities_are_not_decoded() {
        assert_eq!(html_to_plain(b"<p>a &amp; b</p>"), b"a &amp; b");
    }

    #[test]
    fn json_flattens_to_key_value_pairs() {
        let plain = json_to_plain(br#"{"a":"1","b":"2"}"#).unwrap();
        assert_eq!(plain, b"a: 1, b: 2");
    }

    #[test]
    fn json_non_string_values_print_as_json_text() {
        let plain = json_to_plain(br#"{"n":3,"flag":true,"nothing":null,"list":[1,2]}"#).unwrap();
        assert_eq!(plain, b"n: 3, flag: true, nothing: null, list: [1,2]");
    }

    #[test]
    fn json_key_order_is_preserved() {
        let plain = json_to_plain(br#"{"z":"last?","a":"first?"}"#).unwrap();
        assert_eq!(plain, b"z: last?, a: first?");
    }

    #[test]
    fn malformed_json_fails() {
        let err = json_to_plain(b"{not json").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidJson(_)));
    }

    #[test]
    fn non_object_json_fails() {
        let err = json_to_plain(b"[1,2,3]").unwrap_err();
        assert!(matches!(err, ConvertError::NotJsonObject));
    }
}
