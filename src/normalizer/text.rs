use std::borrow::Cow;

use html_escape::decode_html_entities;

/// Decode HTML entities. Text without entities comes back unchanged.
pub fn decode_entities(s: &str) -> String {
    match decode_html_entities(s) {
        Cow::Borrowed(unchanged) => unchanged.to_string(),
        Cow::Owned(decoded) => decoded,
    }
}

/// Drop markup and collapse runs of whitespace, leaving plain text.
pub fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    let mut last_was_space = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                if !last_was_space && !result.is_empty() {
                    result.push(' ');
                    last_was_space = true;
                }
            }
            _ if !in_tag => {
                if c.is_whitespace() {
                    if !last_was_space {
                        result.push(' ');
                        last_was_space = true;
                    }
                } else {
                    result.push(c);
                    last_was_space = false;
                }
            }
            _ => {}
        }
    }

    decode_entities(result.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_named_and_numeric() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("It&#8217;s here"), "It\u{2019}s here");
        assert_eq!(decode_entities("&quot;Q&quot;"), "\"Q\"");
    }

    #[test]
    fn test_decode_passthrough() {
        assert_eq!(decode_entities("Plain title"), "Plain title");
        assert_eq!(decode_entities(""), "");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello <b>board</b>\n\n games</p><p>Next</p>"),
            "Hello board games Next"
        );
        assert_eq!(strip_html("no markup"), "no markup");
        assert_eq!(strip_html("<p>Fish &amp; chips</p>"), "Fish & chips");
    }
}
