/// Parser for chat-service scoring responses.
///
/// Factor queries ask the service to reply as `SCORE: <number> DETAILS: <text>`,
/// but replies routinely deviate: labels go missing, arrive out of order, or the
/// whole reply is free prose. The parser never fails — anything unrecognized
/// falls back to the factor's default score and whatever text was returned.
///
/// When a reply contains several `SCORE:`/`DETAILS:` pairs only the first match
/// of each wins; this is a deliberate first-match policy, not exhaustive parsing.
use regex::Regex;

use crate::format::format_details_text;
use crate::model::ScoreFactor;

const NO_RESPONSE_DETAILS: &str = "Unable to analyze this factor";
const NO_DETAILS: &str = "No additional details available";

/// Turn a raw chat response into a `(score, details)` pair.
///
/// `None` marks a failed or timed-out call and yields the default score with a
/// canned explanation. The score pattern only matches unsigned digit runs, so a
/// negative in the reply falls back to the default; captured values are clamped
/// to 100 (a run too large for `u64` also falls back).
pub fn parse_score_response(response: Option<&str>, default_score: u8) -> ScoreFactor {
    let Some(response) = response else {
        return ScoreFactor {
            score: default_score,
            details: NO_RESPONSE_DETAILS.to_string(),
        };
    };

    let score_re = Regex::new(r"(?i)SCORE:\s*(\d+)").expect("valid regex");
    let details_re = Regex::new(r"(?is)DETAILS:\s*(.+?)(?:SCORE:|$)").expect("valid regex");
    let after_score_re = Regex::new(r"(?is)SCORE:\s*\d+\s*(.+)$").expect("valid regex");
    let leading_label_re =
        Regex::new(r"(?i)^(SCORE:\s*\d+\s*|DETAILS:\s*)").expect("valid regex");

    let score = score_re
        .captures(response)
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .map(|n| n.min(100) as u8)
        .unwrap_or(default_score);

    // Details preference: labeled DETAILS block (up to the next SCORE marker),
    // then trailing text after the score, then the entire response.
    let details = if let Some(caps) = details_re.captures(response) {
        caps[1].trim().to_string()
    } else if let Some(caps) = after_score_re.captures(response) {
        caps[1].trim().to_string()
    } else {
        response.to_string()
    };

    let details = leading_label_re.replace(&details, "");
    let details = format_details_text(details.trim());

    let details = if details.is_empty() {
        NO_DETAILS.to_string()
    } else {
        details
    };

    ScoreFactor { score, details }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_response() {
        let factor = parse_score_response(Some("SCORE: 73 DETAILS: fine"), 50);
        assert_eq!(factor.score, 73);
        assert_eq!(factor.details, "<p>fine</p>");
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let factor = parse_score_response(Some("score: 42 details: lower case labels"), 50);
        assert_eq!(factor.score, 42);
        assert_eq!(factor.details, "<p>lower case labels</p>");
    }

    #[test]
    fn test_score_above_range_clamps_to_100() {
        let factor = parse_score_response(Some("SCORE: 150 DETAILS: generous"), 50);
        assert_eq!(factor.score, 100);
    }

    #[test]
    fn test_negative_score_is_unmatchable() {
        // The digit pattern cannot match "-5"; the default applies.
        let factor = parse_score_response(Some("SCORE: -5 DETAILS: odd"), 75);
        assert_eq!(factor.score, 75);
    }

    #[test]
    fn test_overflowing_score_falls_back_to_default() {
        let factor = parse_score_response(Some("SCORE: 99999999999999999999999 ok"), 60);
        assert_eq!(factor.score, 60);
    }

    #[test]
    fn test_absent_response_uses_default() {
        let factor = parse_score_response(None, 80);
        assert_eq!(factor.score, 80);
        assert_eq!(factor.details, "Unable to analyze this factor");
    }

    #[test]
    fn test_details_fall_back_to_text_after_score() {
        let factor = parse_score_response(Some("SCORE: 64 reads reasonably well"), 50);
        assert_eq!(factor.score, 64);
        assert_eq!(factor.details, "<p>reads reasonably well</p>");
    }

    #[test]
    fn test_no_labels_at_all_uses_whole_response() {
        let factor = parse_score_response(Some("the article is balanced"), 70);
        assert_eq!(factor.score, 70);
        assert_eq!(factor.details, "<p>the article is balanced</p>");
    }

    #[test]
    fn test_first_details_block_wins() {
        let factor =
            parse_score_response(Some("SCORE: 40 DETAILS: first SCORE: 90 DETAILS: second"), 50);
        assert_eq!(factor.score, 40);
        assert_eq!(factor.details, "<p>first</p>");
    }

    #[test]
    fn test_details_span_newlines_until_next_score() {
        let factor = parse_score_response(
            Some("DETAILS: line one\nline two\nSCORE: 88"),
            50,
        );
        assert_eq!(factor.score, 88);
        assert_eq!(factor.details, "<p>line one line two</p>");
    }

    #[test]
    fn test_empty_details_substituted() {
        let factor = parse_score_response(Some("DETAILS: SCORE: 50"), 70);
        assert_eq!(factor.score, 50);
        assert_eq!(factor.details, "No additional details available");
    }

    #[test]
    fn test_list_details_are_formatted() {
        let factor = parse_score_response(
            Some("SCORE: 55 DETAILS: issues found:\n* passive voice\n* run-on sentences"),
            50,
        );
        assert_eq!(factor.score, 55);
        assert_eq!(
            factor.details,
            "<p>issues found:</p>\n<ul>\n<li>passive voice</li>\n<li>run-on sentences</li>\n</ul>"
        );
    }
}
