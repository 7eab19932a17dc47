//! Text cleanup applied to model output before parsing

use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*}").expect("Invalid trailing comma regex"));

// Two string literals separated only by a line break
static MISSING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""(\s*\n\s*)""#).expect("Invalid missing comma regex"));

/// Remove a surrounding markdown code fence, with or without a `json` tag
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Escape raw line breaks that appear inside JSON string literals.
///
/// Line breaks between tokens are left alone. The scan toggles its in-string
/// state on every `"` not preceded by a backslash escape.
pub fn escape_newlines_in_strings(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(c);
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                _ => out.push(c),
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
        }
    }
    out
}

/// Fixups for mistakes the bill model makes often enough to patch:
/// trailing commas before `}`, missing commas between string literals on
/// adjacent lines and a made-up `\$` escape.
pub fn lenient_json_fixups(text: &str) -> String {
    let text = TRAILING_COMMA.replace_all(text, "}");
    let text = MISSING_COMMA.replace_all(&text, "\",$1\"");
    text.replace("\\$", "$")
}
