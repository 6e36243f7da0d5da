use crate::error::Error;

/// Replace the predefined XML entities in `content` with the characters
/// they stand for.
pub(crate) fn unescape(content: &str) -> Result<String, Error> {
    if !content.contains('&') {
        return Ok(content.to_string());
    }
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '&' {
            result.push(c);
            continue;
        }
        let mut entity = String::new();
        let mut is_complete = false;
        for c in chars.by_ref() {
            if c == ';' {
                is_complete = true;
                break;
            }
            entity.push(c);
        }
        if !is_complete {
            return Err(Error::UnclosedEntity(entity));
        }
        match entity.as_str() {
            "amp" => result.push('&'),
            "apos" => result.push('\''),
            "gt" => result.push('>'),
            "lt" => result.push('<'),
            "quot" => result.push('"'),
            _ => return Err(Error::InvalidEntity(entity)),
        }
    }
    Ok(result)
}

/// Escape text content for serialization.
pub(crate) fn escape_text(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape an attribute value for serialization between double quotes.
pub(crate) fn escape_attribute(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("A &amp; B").unwrap(), "A & B");
    }

    #[test]
    fn test_unescape_multiple() {
        assert_eq!(unescape("&amp;&apos;&gt;&lt;&quot;").unwrap(), "&'><\"");
    }

    #[test]
    fn test_unescape_unknown_entity() {
        let err = unescape("&unknown;");
        if let Err(Error::InvalidEntity(entity)) = err {
            assert_eq!(entity, "unknown");
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_unescape_unfinished_entity() {
        let err = unescape("&amp");
        if let Err(Error::UnclosedEntity(entity)) = err {
            assert_eq!(entity, "amp");
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_escape_text_leaves_quotes() {
        assert_eq!(escape_text(r#"a "b" & 'c'"#), r#"a "b" &amp; 'c'"#);
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(escape_attribute(r#"a "b" <c>"#), "a &quot;b&quot; &lt;c&gt;");
    }
}
