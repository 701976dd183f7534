/// Formatter for chat-service detail text.
///
/// The service replies in loose markdown: `**bold**` spans, `* ` bullets,
/// `1. ` numbered items, blank-line paragraph breaks — in any combination.
/// Output is HTML block markup.
///
/// Formatter approach: two modes chosen for the whole input. If any line opens
/// with a list marker, a line-by-line state machine walks the text, switching
/// between `<ul>`/`<ol>` runs (mutually exclusive, opening one closes the other)
/// and `<p>` blocks. Otherwise the text splits on blank lines into paragraphs,
/// with single newlines inside a paragraph collapsed to spaces.
use regex::Regex;

/// Convert detail text into HTML block markup. Empty input is returned unchanged.
pub fn format_details_text(text: &str) -> String {
    if text.is_empty() {
        return text.to_string();
    }

    let bold_re = Regex::new(r"(?s)\*\*(.+?)\*\*").expect("valid regex");
    let numbered_re = Regex::new(r"^\d+\.\s+(.+)$").expect("valid regex");
    let bullet_re = Regex::new(r"^\*\s+(.+)$").expect("valid regex");

    let text = bold_re.replace_all(text, "<strong>$1</strong>");

    let has_bullets = text.lines().any(|line| bullet_re.is_match(line.trim()));
    let has_numbered = text.lines().any(|line| numbered_re.is_match(line.trim()));

    if has_bullets || has_numbered {
        format_line_blocks(&text, &numbered_re, &bullet_re)
    } else {
        format_paragraphs(&text)
    }
}

/// List-mode state machine. Blank lines are dropped; a still-open list is
/// closed at end of input.
fn format_line_blocks(text: &str, numbered_re: &Regex, bullet_re: &Regex) -> String {
    let mut in_unordered = false;
    let mut in_ordered = false;
    let mut blocks: Vec<String> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some(caps) = numbered_re.captures(trimmed) {
            if in_unordered {
                blocks.push("</ul>".to_string());
                in_unordered = false;
            }
            if !in_ordered {
                blocks.push("<ol>".to_string());
                in_ordered = true;
            }
            blocks.push(format!("<li>{}</li>", caps[1].trim()));
        } else if let Some(caps) = bullet_re.captures(trimmed) {
            if in_ordered {
                blocks.push("</ol>".to_string());
                in_ordered = false;
            }
            if !in_unordered {
                blocks.push("<ul>".to_string());
                in_unordered = true;
            }
            blocks.push(format!("<li>{}</li>", caps[1].trim()));
        } else {
            if in_unordered {
                blocks.push("</ul>".to_string());
                in_unordered = false;
            }
            if in_ordered {
                blocks.push("</ol>".to_string());
                in_ordered = false;
            }
            if !trimmed.is_empty() {
                blocks.push(format!("<p>{trimmed}</p>"));
            }
        }
    }

    if in_unordered {
        blocks.push("</ul>".to_string());
    }
    if in_ordered {
        blocks.push("</ol>".to_string());
    }

    blocks.join("\n")
}

/// Paragraph mode: blank-line boundaries delimit paragraphs, inner newlines
/// collapse to single spaces.
fn format_paragraphs(text: &str) -> String {
    let paragraph_split_re = Regex::new(r"\n\s*\n").expect("valid regex");
    let inner_newline_re = Regex::new(r"\s*\n\s*").expect("valid regex");

    let mut paragraphs: Vec<String> = Vec::new();
    for paragraph in paragraph_split_re.split(text) {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        let paragraph = inner_newline_re.replace_all(paragraph, " ");
        paragraphs.push(format!("<p>{paragraph}</p>"));
    }
    paragraphs.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_unchanged() {
        assert_eq!(format_details_text(""), "");
    }

    #[test]
    fn test_single_paragraph_wraps() {
        assert_eq!(format_details_text("clear and neutral"), "<p>clear and neutral</p>");
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        let input = "first line\nsecond line\n\nnext paragraph";
        assert_eq!(
            format_details_text(input),
            "<p>first line second line</p>\n<p>next paragraph</p>"
        );
    }

    #[test]
    fn test_bold_spans_become_strong() {
        assert_eq!(
            format_details_text("the tone is **mostly neutral** overall"),
            "<p>the tone is <strong>mostly neutral</strong> overall</p>"
        );
    }

    #[test]
    fn test_bold_spans_may_cross_lines() {
        let input = "a **bold\nspan** here";
        assert_eq!(
            format_details_text(input),
            "<p>a <strong>bold span</strong> here</p>"
        );
    }

    #[test]
    fn test_bullet_list() {
        let input = "* one\n* two";
        assert_eq!(
            format_details_text(input),
            "<ul>\n<li>one</li>\n<li>two</li>\n</ul>"
        );
    }

    #[test]
    fn test_numbered_list() {
        let input = "1. one\n2. two";
        assert_eq!(
            format_details_text(input),
            "<ol>\n<li>one</li>\n<li>two</li>\n</ol>"
        );
    }

    #[test]
    fn test_switching_list_kind_closes_previous() {
        let input = "* a\n1. b";
        assert_eq!(
            format_details_text(input),
            "<ul>\n<li>a</li>\n</ul>\n<ol>\n<li>b</li>\n</ol>"
        );
    }

    #[test]
    fn test_mixed_lists_and_paragraph_in_line_order() {
        let input = "* a\n* b\nplain\n1. c";
        assert_eq!(
            format_details_text(input),
            "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n<p>plain</p>\n<ol>\n<li>c</li>\n</ol>"
        );
    }

    #[test]
    fn test_blank_lines_dropped_in_list_mode() {
        let input = "* a\n\n* b";
        assert_eq!(
            format_details_text(input),
            "<ul>\n<li>a</li>\n</ul>\n<ul>\n<li>b</li>\n</ul>"
        );
    }

    #[test]
    fn test_indented_markers_count_after_trim() {
        let input = "   * indented\n   2. also indented";
        assert_eq!(
            format_details_text(input),
            "<ul>\n<li>indented</li>\n</ul>\n<ol>\n<li>also indented</li>\n</ol>"
        );
    }

    #[test]
    fn test_lone_asterisk_is_not_a_bullet() {
        // "*text" without a following space stays a paragraph.
        assert_eq!(format_details_text("*text"), "<p>*text</p>");
    }
}
