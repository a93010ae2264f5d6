use crate::blocks::Align;
use crate::units::Mm;
use log::warn;

const TABSIZE: usize = 4;

/// Slack allowed when comparing a line's width against the available width, so
/// that text measured at exactly the available width is not pushed down a line
const WIDTH_EPSILON: Mm = Mm(1e-4);

/// One line of a broken paragraph
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    /// The width of `text` as reported by the width function
    pub width: Mm,
    /// The last line of a paragraph is never justified
    pub ends_paragraph: bool,
}

/// Breaks text into lines no wider than `max_width`, keeping words intact.
///
/// This is the one line-breaking rule of the crate: canvases must use it both
/// when measuring text for a dry run and when drawing it, otherwise wrap
/// decisions made from measurements would diverge from what ends up on the page.
///
/// # Wrapping behaviour
///
/// - tabs become four spaces and `\r\n` / `\r` are normalized to `\n`
/// - `\n` always ends a paragraph; an empty paragraph still occupies a line
/// - words are separated by single spaces; runs of spaces collapse
/// - a word wider than `max_width` is placed on a line of its own and allowed
///   to overflow, there is no hyphenation
///
/// Text that is empty (or only whitespace) produces no lines at all.
pub fn break_lines<F>(text: &str, max_width: Mm, width_of: F) -> Vec<Line>
where
    F: Fn(&str) -> Mm,
{
    if text.trim().is_empty() {
        return Vec::new();
    }

    // replace tabs with spaces
    let text = text.replace('\t', &" ".repeat(TABSIZE));
    // normalize newlines
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let space = width_of(" ");
    let mut lines: Vec<Line> = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = Mm(0.0);

        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let word_width = width_of(word);

            if !current.is_empty() && current_width + space + word_width > max_width + WIDTH_EPSILON
            {
                lines.push(Line {
                    text: std::mem::take(&mut current),
                    width: current_width,
                    ends_paragraph: false,
                });
                current_width = Mm(0.0);
            }

            if current.is_empty() {
                if word_width > max_width + WIDTH_EPSILON {
                    warn!("word {word:?} ({word_width}) is wider than the line ({max_width})");
                }
                current.push_str(word);
                current_width = word_width;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            }
        }

        lines.push(Line {
            text: current,
            width: current_width,
            ends_paragraph: true,
        });
    }

    lines
}

/// The horizontal offset of a line within a box of `box_width`, for the
/// non-justified alignments
pub fn line_offset(alignment: Align, line: &Line, box_width: Mm) -> Mm {
    match alignment {
        Align::Left | Align::Justify => Mm(0.0),
        Align::Center => ((box_width - line.width) / 2.0).max(Mm(0.0)),
        Align::Right => (box_width - line.width).max(Mm(0.0)),
    }
}

/// Spreads the words of a line across `box_width` by stretching the spaces
/// between them, returning each word with its offset from the start of the line.
/// The last line of a paragraph and single-word lines are left unstretched
pub fn spread_words<'a, F>(line: &'a Line, box_width: Mm, width_of: F) -> Vec<(&'a str, Mm)>
where
    F: Fn(&str) -> Mm,
{
    let words: Vec<&str> = line.text.split(' ').collect();
    let space = width_of(" ");
    let gaps = words.len().saturating_sub(1);
    let stretch = if line.ends_paragraph || gaps == 0 || line.width > box_width {
        Mm(0.0)
    } else {
        (box_width - line.width) / gaps as f32
    };

    let mut x = Mm(0.0);
    let mut placed = Vec::with_capacity(words.len());
    for word in words {
        placed.push((word, x));
        x += width_of(word) + space + stretch;
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    /// every character is 1mm wide
    fn mono(s: &str) -> Mm {
        Mm(s.chars().count() as f32)
    }

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn breaks_at_word_boundaries() {
        let lines = break_lines("the quick brown fox jumps", Mm(10.0), mono);
        assert_eq!(texts(&lines), vec!["the quick", "brown fox", "jumps"]);
        assert_eq!(lines[0].width, Mm(9.0));
        assert!(!lines[0].ends_paragraph);
        assert!(lines[2].ends_paragraph);
    }

    #[test]
    fn exact_fit_stays_on_one_line() {
        let lines = break_lines("abcde fghi", Mm(10.0), mono);
        assert_eq!(texts(&lines), vec!["abcde fghi"]);
    }

    #[test]
    fn collapses_runs_of_spaces() {
        let lines = break_lines("a    b  c", Mm(100.0), mono);
        assert_eq!(texts(&lines), vec!["a b c"]);
    }

    #[test]
    fn newlines_end_paragraphs() {
        let lines = break_lines("one\r\n\rtwo", Mm(100.0), mono);
        assert_eq!(texts(&lines), vec!["one", "", "two"]);
        assert!(lines.iter().all(|l| l.ends_paragraph));
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let lines = break_lines("a extraordinarily b", Mm(5.0), mono);
        assert_eq!(texts(&lines), vec!["a", "extraordinarily", "b"]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(break_lines("", Mm(10.0), mono).is_empty());
        assert!(break_lines("   ", Mm(10.0), mono).is_empty());
    }

    #[test]
    fn alignment_offsets() {
        let line = Line {
            text: "abcd".into(),
            width: Mm(4.0),
            ends_paragraph: true,
        };
        assert_eq!(line_offset(Align::Left, &line, Mm(10.0)), Mm(0.0));
        assert_eq!(line_offset(Align::Center, &line, Mm(10.0)), Mm(3.0));
        assert_eq!(line_offset(Align::Right, &line, Mm(10.0)), Mm(6.0));
    }

    #[test]
    fn justified_lines_fill_the_box() {
        let line = Line {
            text: "ab cd ef".into(),
            width: Mm(8.0),
            ends_paragraph: false,
        };
        let placed = spread_words(&line, Mm(12.0), mono);
        assert_eq!(placed, vec![("ab", Mm(0.0)), ("cd", Mm(5.0)), ("ef", Mm(10.0))]);

        let last = Line {
            ends_paragraph: true,
            ..line
        };
        let placed = spread_words(&last, Mm(12.0), mono);
        assert_eq!(placed[2], ("ef", Mm(6.0)));
    }
}
