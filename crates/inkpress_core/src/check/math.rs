//! Formula delimiter balance check.
//!
//! # Responsibility
//! - Verify that every `$`/`$$` delimiter in a math-enabled post is paired.
//!
//! # Invariants
//! - Code fences and inline code spans never participate in counting.
//! - An escaped `\$` is literal text, not a delimiter.

use once_cell::sync::Lazy;
use regex::Regex;

static INLINE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`[^`]*`").expect("valid inline code regex"));

/// Returns a description of the imbalance, or `None` when balanced.
pub fn unbalanced_delimiters(body: &str) -> Option<String> {
    let prose = strip_code(body);
    let (display_count, inline_count) = delimiter_counts(&prose);

    if display_count % 2 != 0 {
        return Some(format!(
            "odd number of `$$` display-math delimiters ({display_count})"
        ));
    }
    if inline_count % 2 != 0 {
        return Some(format!(
            "odd number of `$` inline-math delimiters ({inline_count})"
        ));
    }

    None
}

/// Removes fenced code blocks and inline code spans from a markdown body.
fn strip_code(body: &str) -> String {
    let mut prose = String::with_capacity(body.len());
    let mut in_fence = false;
    for line in body.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        prose.push_str(&INLINE_CODE_RE.replace_all(line, " "));
        prose.push('\n');
    }
    prose
}

/// Counts `(display, inline)` delimiters over runs of unescaped dollars.
///
/// A run of consecutive unescaped `$` contributes `run / 2` display
/// delimiters and `run % 2` inline delimiters, so an escaped `\$` next to
/// inline math never pairs into a phantom `$$`.
fn delimiter_counts(text: &str) -> (usize, usize) {
    let mut display = 0;
    let mut inline = 0;
    let mut run = 0usize;
    let mut previous_was_backslash = false;
    for ch in text.chars() {
        if ch == '$' && !previous_was_backslash {
            run += 1;
        } else {
            display += run / 2;
            inline += run % 2;
            run = 0;
        }
        previous_was_backslash = ch == '\\' && !previous_was_backslash;
    }
    display += run / 2;
    inline += run % 2;
    (display, inline)
}
