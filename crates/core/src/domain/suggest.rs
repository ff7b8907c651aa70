//! Rule-based debug suggestions.
//!
//! Two independent passes over the submitted text: an ordered,
//! first-match-wins table keyed on the error message, and a set of
//! non-exclusive heuristics keyed on the code itself. When neither pass
//! produces anything, a fixed block of general tips is returned instead.

/// Error rules, evaluated in order. A rule matches when every one of its
/// patterns occurs in the lower-cased error text; only the first matching
/// rule contributes a suggestion.
const ERROR_RULES: &[(&[&str], &str)] = &[
    (
        &["indentation"],
        "🔍 **Indentation Error**: Check your code indentation. Python requires consistent indentation (use 4 spaces or tabs consistently).",
    ),
    (
        &["syntax"],
        "🔍 **Syntax Error**: Check for missing colons (:), parentheses, or brackets. Make sure all opening brackets have closing ones.",
    ),
    (
        &["name", "not defined"],
        "🔍 **NameError**: Variable or function not defined. Make sure you've declared the variable before using it.",
    ),
    (
        &["index", "out of range"],
        "🔍 **IndexError**: You're trying to access an array/list element that doesn't exist. Check your array bounds.",
    ),
    (
        &["key"],
        "🔍 **KeyError**: Dictionary key not found. Use .get() method or check if key exists before accessing.",
    ),
    (
        &["import"],
        "🔍 **ImportError**: Module not found. Make sure the module is installed and spelled correctly.",
    ),
];

/// Code heuristics, each evaluated independently against the lower-cased
/// code. Unlike the error rules these are not mutually exclusive.
const CODE_HINTS: &[(fn(&str) -> bool, &str)] = &[
    (
        |code| !code.contains("print(") && !code.contains("printf"),
        "💡 **Tip**: Add print statements to debug your code and see intermediate values.",
    ),
    (
        |code| code.contains("for") || code.contains("while"),
        "💡 **Loop Tip**: Make sure your loops have proper exit conditions to avoid infinite loops.",
    ),
    (
        |code| code.contains("def"),
        "💡 **Function Tip**: Test your functions with different inputs to ensure they work correctly.",
    ),
];

/// Fallback block returned whole when no rule or heuristic fired.
const GENERAL_TIPS: &[&str] = &[
    "🔍 **General Debug Tips**:",
    "• Read error messages carefully - they usually tell you exactly what's wrong",
    "• Check line numbers mentioned in errors",
    "• Use print() statements to see what values your variables have",
    "• Make sure all imports are at the top of your file",
    "• Check for typos in variable and function names",
    "💡 **Best Practices**:",
    "• Use meaningful variable names",
    "• Add comments to explain complex logic",
    "• Test your code with different inputs",
    "• Break complex problems into smaller functions",
];

/// Produces ordered human-readable suggestions for a `(code, error)` pair.
/// Pure function over its inputs; empty inputs simply skip their pass.
pub fn suggest(code: &str, error: &str) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !error.is_empty() {
        let error_lower = error.to_lowercase();
        if let Some((_, suggestion)) = ERROR_RULES
            .iter()
            .find(|(patterns, _)| patterns.iter().all(|p| error_lower.contains(p)))
        {
            suggestions.push((*suggestion).to_string());
        }
    }

    if !code.is_empty() {
        let code_lower = code.to_lowercase();
        for (applies, suggestion) in CODE_HINTS {
            if applies(&code_lower) {
                suggestions.push((*suggestion).to_string());
            }
        }
    }

    if suggestions.is_empty() {
        suggestions = GENERAL_TIPS.iter().map(|tip| (*tip).to_string()).collect();
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indentation_error_matches_first_rule() {
        let suggestions = suggest("", "IndentationError: unexpected indent");

        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("Indentation Error"));
    }

    #[test]
    fn error_rules_are_first_match_wins() {
        // "syntax" and "key" both occur; the syntax rule is ordered earlier.
        let suggestions = suggest("", "SyntaxError near keyword");

        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("Syntax Error"));
    }

    #[test]
    fn name_error_needs_both_patterns() {
        let suggestions = suggest("", "NameError: name 'x' is not defined");
        assert!(suggestions[0].contains("NameError"));

        // "name" alone without "not defined" should not trip the rule.
        let suggestions = suggest("", "bad name somewhere");
        assert!(!suggestions.iter().any(|s| s.contains("NameError")));
    }

    #[test]
    fn loop_code_gets_loop_tip_only_from_heuristics() {
        let suggestions = suggest("for i in range(10): pass", "");

        assert!(suggestions.iter().any(|s| s.contains("Loop Tip")));
        // A print call is absent, so the print tip also applies.
        assert!(suggestions.iter().any(|s| s.contains("Add print statements")));
        assert!(!suggestions.iter().any(|s| s.contains("Function Tip")));
        assert!(!suggestions.iter().any(|s| s.starts_with("🔍")));
    }

    #[test]
    fn error_and_code_passes_combine() {
        let suggestions = suggest("def f(): print(1)", "NameError: x is not defined");

        let error_derived = suggestions.iter().filter(|s| s.starts_with("🔍")).count();
        assert_eq!(error_derived, 1);
        assert!(suggestions.iter().any(|s| s.contains("NameError")));
        assert!(suggestions.iter().any(|s| s.contains("Function Tip")));
        assert!(!suggestions.iter().any(|s| s.contains("Add print statements")));
    }

    #[test]
    fn empty_inputs_return_the_full_fallback_block() {
        let suggestions = suggest("", "");

        assert_eq!(suggestions.len(), GENERAL_TIPS.len());
        assert_eq!(suggestions[0], GENERAL_TIPS[0]);
        assert_eq!(suggestions.last().unwrap(), GENERAL_TIPS.last().unwrap());
    }

    #[test]
    fn unmatched_error_with_no_code_falls_back() {
        let suggestions = suggest("", "SegmentationFault");
        assert_eq!(suggestions.len(), GENERAL_TIPS.len());
    }
}
