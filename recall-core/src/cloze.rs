//! Cloze (fill-in-the-blank) markup.
//!
//! A blank is written `{{c<N>::answer}}` or `{{c<N>::answer::hint}}`, where
//! the answer may list alternatives as `answer|alt|alt`. Ids are 1-based and
//! may appear in any order in the text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

pub const PLACEHOLDER_CHAR: char = '_';
pub const PLACEHOLDER_MAX_LEN: usize = 15;

static CLOZE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{c(\d+)::([^{}]+?)(?:::([^{}]*?))?\}\}").expect("valid cloze regex")
});

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClozeBlank {
    pub id: u32,
    pub correct_answer: String,
    pub alternatives: Vec<String>,
    pub hint: Option<String>,
    /// Byte offsets of the placeholder in the rendered text.
    pub start: usize,
    pub end: usize,
}

impl ClozeBlank {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn accepted_answers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.correct_answer.as_str()).chain(self.alternatives.iter().map(String::as_str))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderedCloze {
    pub text: String,
    /// Sorted by id.
    pub blanks: Vec<ClozeBlank>,
}

fn placeholder(answer: &str) -> String {
    let len = answer.chars().count().clamp(1, PLACEHOLDER_MAX_LEN);
    std::iter::repeat(PLACEHOLDER_CHAR).take(len).collect()
}

/// Renders `markup`, replacing each well-formed token with a placeholder.
///
/// Tokens with id 0, an unparsable or repeated id, or an empty answer are left
/// in the text verbatim and produce no blank. Unterminated tokens never match.
pub fn process(markup: &str) -> RenderedCloze {
    let mut text = String::with_capacity(markup.len());
    let mut blanks = Vec::new();
    let mut seen = HashSet::new();
    let mut last = 0usize;

    for caps in CLOZE_TOKEN.captures_iter(markup) {
        let Some(whole) = caps.get(0) else { continue };
        text.push_str(&markup[last..whole.start()]);
        last = whole.end();

        let id = caps[1].parse::<u32>().ok().filter(|id| *id > 0);
        let mut answers = caps[2]
            .split('|')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        let correct = answers.next();

        match (id, correct) {
            (Some(id), Some(correct_answer)) if seen.insert(id) => {
                let ph = placeholder(&correct_answer);
                let start = text.len();
                text.push_str(&ph);
                let hint = caps
                    .get(3)
                    .map(|m| m.as_str().trim())
                    .filter(|h| !h.is_empty())
                    .map(str::to_string);
                blanks.push(ClozeBlank {
                    id,
                    correct_answer,
                    alternatives: answers.collect(),
                    hint,
                    start,
                    end: text.len(),
                });
            }
            _ => {
                tracing::debug!(token = whole.as_str(), "leaving malformed cloze token verbatim");
                text.push_str(whole.as_str());
            }
        }
    }
    text.push_str(&markup[last..]);

    blanks.sort_by_key(|b| b.id);
    RenderedCloze { text, blanks }
}

/// Deterministic hints for an answer: first letter, length, last letter and
/// word count.
pub fn hints(expected: &str) -> Vec<String> {
    let answer = expected.trim();
    let (Some(first), Some(last)) = (answer.chars().next(), answer.chars().last()) else {
        return Vec::new();
    };

    let mut out = vec![
        format!("Starts with \"{first}\""),
        format!("{} characters", answer.chars().count()),
        format!("Ends with \"{last}\""),
    ];
    let words = answer.split_whitespace().count();
    out.push(match words {
        1 => "1 word".to_string(),
        n => format!("{n} words"),
    });
    out
}
