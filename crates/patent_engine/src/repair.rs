use log::debug;

/// Accumulated span for one open tag, from its `<` up to the point of
/// closure. `found_closing` is true only when a real `>` was consumed.
struct TagSpan {
    content: String,
    found_closing: bool,
}

/// Repair malformed patent markup into well-formed markup.
///
/// Total over all inputs: a single left-to-right scan closes tags that
/// are missing their `>`, completes a trailing attribute left without a
/// value, and a second pass strips `...` truncation placeholders. Text
/// that is already well-formed passes through unchanged.
pub fn repair(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len() + 16);
    let mut synthesized = 0usize;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '<' {
            let span = accumulate_tag(&chars, &mut i);
            if span.found_closing {
                out.push_str(&span.content);
            } else {
                out.push_str(&complete_bare_attribute(&span.content));
                out.push('>');
                synthesized += 1;
            }
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    let (cleaned, ellipses) = strip_placeholder_ellipses(&out);
    if synthesized > 0 || ellipses > 0 {
        debug!("repaired document: {synthesized} synthesized closures, {ellipses} placeholders removed");
    }
    cleaned
}

/// Consume one tag starting at `chars[*i] == '<'`.
///
/// Stops after a real `>`, or before a second `<` (which is left
/// unconsumed so the outer loop starts the next tag on it), or at end
/// of input.
fn accumulate_tag(chars: &[char], i: &mut usize) -> TagSpan {
    let mut content = String::from('<');
    *i += 1;

    while *i < chars.len() {
        let current = chars[*i];
        if current == '>' {
            content.push('>');
            *i += 1;
            return TagSpan {
                content,
                found_closing: true,
            };
        }
        if current == '<' {
            // The first tag never closed; this `<` belongs to the next one.
            return TagSpan {
                content,
                found_closing: false,
            };
        }
        content.push(current);
        *i += 1;
    }

    TagSpan {
        content,
        found_closing: false,
    }
}

/// Rewrite a trailing bare attribute (`... us-series-code`) of an
/// unclosed tag as `... us-series-code=""`.
///
/// Triggers only when the span ends in whitespace, an identifier, and
/// optional trailing whitespace; the whitespace run before the
/// identifier collapses to a single space. Anything else is returned
/// unchanged.
fn complete_bare_attribute(tag: &str) -> String {
    let trimmed = tag.trim_end();

    let mut ident_start = trimmed.len();
    for (idx, ch) in trimmed.char_indices().rev() {
        if is_identifier_char(ch) {
            ident_start = idx;
        } else {
            break;
        }
    }

    let ident = &trimmed[ident_start..];
    if !ident.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return tag.to_string();
    }

    let prefix = &trimmed[..ident_start];
    if !prefix.ends_with(char::is_whitespace) {
        return tag.to_string();
    }

    format!("{} {ident}=\"\"", prefix.trim_end())
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Remove every `...` placeholder together with its surrounding
/// whitespace. Whitespace on both sides collapses to a single joining
/// space; whitespace on one side only vanishes with the placeholder.
/// Leftmost-match: four consecutive dots leave one dot behind.
fn strip_placeholder_ellipses(text: &str) -> (String, usize) {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut removed = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let at_ellipsis = chars[i] == '.'
            && chars.get(i + 1) == Some(&'.')
            && chars.get(i + 2) == Some(&'.');
        if at_ellipsis {
            let mut left_ws = false;
            while out.ends_with(char::is_whitespace) {
                out.pop();
                left_ws = true;
            }
            i += 3;
            let mut right_ws = false;
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
                right_ws = true;
            }
            if left_ws && right_ws {
                out.push(' ');
            }
            removed += 1;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    (out, removed)
}

#[cfg(test)]
mod tests {
    use super::{complete_bare_attribute, strip_placeholder_ellipses};

    #[test]
    fn trailing_bare_attribute_gets_empty_value() {
        assert_eq!(complete_bare_attribute("<a b"), "<a b=\"\"");
        assert_eq!(complete_bare_attribute("<a  us-series-code  "), "<a us-series-code=\"\"");
    }

    #[test]
    fn valued_or_absent_attributes_are_left_alone() {
        assert_eq!(complete_bare_attribute("<a b=\"1\""), "<a b=\"1\"");
        assert_eq!(complete_bare_attribute("<abc"), "<abc");
        assert_eq!(complete_bare_attribute("<a 9lives"), "<a 9lives");
    }

    #[test]
    fn ellipsis_between_tokens_collapses_to_one_space() {
        assert_eq!(strip_placeholder_ellipses("1 ... 2"), ("1 2".to_string(), 1));
    }

    #[test]
    fn ellipsis_against_a_token_vanishes() {
        assert_eq!(strip_placeholder_ellipses("a...b"), ("ab".to_string(), 1));
        assert_eq!(strip_placeholder_ellipses("... x"), ("x".to_string(), 1));
    }

    #[test]
    fn four_dots_leave_one_dot() {
        assert_eq!(strip_placeholder_ellipses("a....b"), ("a.b".to_string(), 1));
    }

    #[test]
    fn consecutive_placeholders_leave_no_artifacts() {
        assert_eq!(strip_placeholder_ellipses("a ... ... b"), ("a b".to_string(), 2));
    }
}
