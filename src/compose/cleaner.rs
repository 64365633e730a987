//! Normalizes raw generated text into display-ready lines.
//!
//! Generated content arrives with markdown residue, bullet glyphs, echoed
//! headings, and model preamble ("Here are five points about..."). The
//! cleaner strips all of that and, for slides, enforces hard line and
//! word caps so a text box can never overflow its region.

/// Rendering context the cleaned lines are destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanContext {
    /// Bounded: at most `max_lines` lines of at most `max_words_per_line`
    /// words each. Overlong lines are greedily re-wrapped at word
    /// boundaries; once the line cap is reached the rest is dropped.
    Slide {
        max_lines: usize,
        max_words_per_line: usize,
    },
    /// Unbounded: every surviving line is kept.
    Document,
}

impl CleanContext {
    /// Side-by-side slide layouts leave less room for text than stacked
    /// ones, so they get tighter caps.
    pub fn slide_side_by_side() -> Self {
        CleanContext::Slide { max_lines: 5, max_words_per_line: 16 }
    }

    pub fn slide_stacked() -> Self {
        CleanContext::Slide { max_lines: 6, max_words_per_line: 18 }
    }
}

/// Lines that are nothing but a markup or bullet marker.
const MARKER_LINES: &[&str] = &["**", "*", "•", "-", "---", "+", "·"];

/// Prefixes of meta-header lines the model emits despite being told not to.
const META_PREFIXES: &[&str] = &[
    "slide title:",
    "*slide title",
    "section title:",
    "title:",
    "here are",
    "here is",
    "introduction to",
];

/// Clean raw generated text into an ordered sequence of display lines.
///
/// An empty result is valid (callers supply a placeholder); this function
/// never fails.
pub fn clean(raw: &str, section_title: &str, context: CleanContext) -> Vec<String> {
    let (max_lines, max_words) = match context {
        CleanContext::Slide { max_lines, max_words_per_line } => (max_lines, max_words_per_line),
        CleanContext::Document => (usize::MAX, usize::MAX),
    };

    let title_lower = section_title.trim().to_lowercase();
    let mut cleaned: Vec<String> = Vec::new();

    for raw_line in raw.lines() {
        if cleaned.len() >= max_lines {
            break;
        }

        let line = raw_line.trim();
        if line.is_empty() || MARKER_LINES.contains(&line) {
            continue;
        }

        // Strip emphasis markup, then leading bullet glyphs.
        let line = line.replace("**", "").replace('*', "");
        let line = line
            .trim_start_matches(['•', '-', '·', '+', ' '])
            .trim()
            .to_string();

        // Never echo the section heading back into the body.
        if !title_lower.is_empty() {
            let line_lower = line.to_lowercase();
            if line_lower == title_lower
                || line_lower.starts_with(&title_lower)
                || line_lower.ends_with(&title_lower)
            {
                continue;
            }
        }

        let lower = line.to_lowercase();
        if META_PREFIXES.iter().any(|p| lower.starts_with(p))
            || (lower.starts_with("key ") && line.ends_with(':'))
            || line.chars().count() < 3
        {
            continue;
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() > max_words {
            // Greedy re-wrap at the word boundary; truncation, not an error.
            for chunk in words.chunks(max_words) {
                if cleaned.len() >= max_lines {
                    break;
                }
                cleaned.push(chunk.join(" "));
            }
        } else {
            cleaned.push(line);
        }
    }

    cleaned.truncate(max_lines);
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_bullets_and_title_echo() {
        let raw = "**Point one is here**\n- Point two\nTitle\n";
        let lines = clean(
            raw,
            "Title",
            CleanContext::Slide { max_lines: 5, max_words_per_line: 18 },
        );
        assert_eq!(lines, vec!["Point one is here", "Point two"]);
    }

    #[test]
    fn document_context_is_unbounded() {
        let raw = (0..40).map(|i| format!("Line number {i} of the body"))
            .collect::<Vec<_>>()
            .join("\n");
        let lines = clean(&raw, "Heading", CleanContext::Document);
        assert_eq!(lines.len(), 40);
    }

    #[test]
    fn slide_caps_rewrap_long_lines_and_truncate() {
        // Ten 40-word lines against the stacked caps (6 lines, 18 words).
        let long_line = (0..40).map(|i| format!("word{i:02}")).collect::<Vec<_>>().join(" ");
        let raw = vec![long_line; 10].join("\n");

        let lines = clean(&raw, "Heading", CleanContext::slide_stacked());

        // Each input line re-wraps 18/18/4; the line cap cuts after two.
        let counts: Vec<usize> =
            lines.iter().map(|l| l.split_whitespace().count()).collect();
        assert_eq!(counts, vec![18, 18, 4, 18, 18, 4]);
        assert_eq!(lines.len(), 6);
        assert!(counts.iter().all(|&c| c <= 18));
        // Wrapping keeps word order within a line.
        assert!(lines[0].starts_with("word00"));
        assert!(lines[0].ends_with("word17"));
        assert_eq!(lines[2], "word36 word37 word38 word39");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(clean("", "Anything", CleanContext::Document).is_empty());
        assert!(clean("\n\n* \n", "Anything", CleanContext::slide_stacked()).is_empty());
    }
}
