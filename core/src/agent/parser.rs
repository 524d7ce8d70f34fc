//! Response-protocol parser
//!
//! Turns raw model output into a (thought, action, action input) triple.
//! The scan is line-oriented: a line that, after trimming, starts with one
//! of the four exact directive markers overwrites the corresponding field,
//! so the last occurrence of a repeated marker wins. Lines matching no
//! marker are ignored, which means only the first line after each marker is
//! captured - multi-line thoughts and inputs are a known limitation of the
//! wire format, not something to paper over here.
//!
//! The marker strings are a contract shared with the system prompt
//! (`ReactAgent::system_prompt`); keep the two in sync.

/// Directive marker for the reasoning line
pub const THOUGHT_MARKER: &str = "Thought:";
/// Directive marker for the action name line
pub const ACTION_MARKER: &str = "Action:";
/// Directive marker for the action input line
pub const ACTION_INPUT_MARKER: &str = "Action Input:";
/// Marker for observations fed back to the model; never expected in model
/// output but recognized so an echoed observation cannot corrupt a parse
pub const OBSERVATION_MARKER: &str = "Observation:";

/// Reserved action name that ends the run with a final answer
pub const FINISH_ACTION: &str = "finish";

/// Parsed form of one assistant response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedStep {
    pub thought: Option<String>,
    pub action: Option<String>,
    pub action_input: Option<String>,
}

/// Extract thought, action and action input from raw response text.
///
/// Never fails; a field the text does not provide stays `None`. An empty
/// remainder after a marker is captured as `Some("")` - the loop treats
/// that the same as absent.
pub fn parse_response(text: &str) -> ParsedStep {
    let mut step = ParsedStep::default();

    for line in text.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix(THOUGHT_MARKER) {
            step.thought = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix(ACTION_INPUT_MARKER) {
            step.action_input = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix(ACTION_MARKER) {
            step.action = Some(rest.trim().to_string());
        } else if line.starts_with(OBSERVATION_MARKER) {
            // Echoed observation; deliberately ignored.
        }
    }

    step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_triple() {
        let step = parse_response(
            "Thought: I should search\nAction: search\nAction Input: rust borrow checker",
        );
        assert_eq!(step.thought.as_deref(), Some("I should search"));
        assert_eq!(step.action.as_deref(), Some("search"));
        assert_eq!(step.action_input.as_deref(), Some("rust borrow checker"));
    }

    #[test]
    fn test_no_markers_all_absent() {
        let step = parse_response("I am just rambling\nwith no structure at all");
        assert_eq!(step, ParsedStep::default());
    }

    #[test]
    fn test_last_occurrence_wins() {
        let step = parse_response("Action: X\nsome filler\nAction: Y");
        assert_eq!(step.action.as_deref(), Some("Y"));

        let step = parse_response("Thought: a\nThought: b\nAction Input: 1\nAction Input: 2");
        assert_eq!(step.thought.as_deref(), Some("b"));
        assert_eq!(step.action_input.as_deref(), Some("2"));
    }

    #[test]
    fn test_leading_whitespace_is_trimmed() {
        let step = parse_response("   Action: calculate   \n\t Action Input:  2 + 2 ");
        assert_eq!(step.action.as_deref(), Some("calculate"));
        assert_eq!(step.action_input.as_deref(), Some("2 + 2"));
    }

    #[test]
    fn test_observation_line_is_ignored() {
        let step = parse_response("Action: search\nObservation: fabricated result\nAction Input: q");
        assert_eq!(step.action.as_deref(), Some("search"));
        assert_eq!(step.action_input.as_deref(), Some("q"));
        assert_eq!(step.thought, None);
    }

    #[test]
    fn test_only_first_line_after_marker_captured() {
        let step = parse_response("Thought: first line\ncontinuation of the thought\nAction: finish");
        assert_eq!(step.thought.as_deref(), Some("first line"));
    }

    #[test]
    fn test_marker_without_remainder_captures_empty() {
        let step = parse_response("Action:\nAction Input: x");
        assert_eq!(step.action.as_deref(), Some(""));
        assert_eq!(step.action_input.as_deref(), Some("x"));
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        let step = parse_response("action: search\nACTION INPUT: q");
        assert_eq!(step, ParsedStep::default());
    }

    #[test]
    fn test_mid_line_marker_does_not_match() {
        let step = parse_response("The next Action: search is not a directive");
        assert_eq!(step.action, None);
    }
}
