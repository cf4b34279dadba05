use crate::cloze::{self, ClozeBlank};
use crate::similarity::{is_equivalent, normalize};
use crate::{CoreError, ItemKind, Quality, ReviewItem};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Exact,
    /// Accepted with typos.
    Close,
    Incorrect,
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        !matches!(self, Verdict::Incorrect)
    }

    /// Default quality for the study UI to preselect.
    pub fn suggested_quality(self) -> Quality {
        match self {
            Verdict::Exact => Quality::PERFECT,
            Verdict::Close => Quality::HESITANT,
            Verdict::Incorrect => Quality::FAILED,
        }
    }
}

pub fn check_blank(blank: &ClozeBlank, actual: &str) -> Verdict {
    let got = normalize(actual);
    if blank.accepted_answers().any(|a| normalize(a) == got) {
        Verdict::Exact
    } else if blank.accepted_answers().any(|a| is_equivalent(a, actual)) {
        Verdict::Close
    } else {
        Verdict::Incorrect
    }
}

fn check_text(expected: &str, actual: &str) -> Verdict {
    if normalize(expected) == normalize(actual) {
        Verdict::Exact
    } else if is_equivalent(expected, actual) {
        Verdict::Close
    } else {
        Verdict::Incorrect
    }
}

/// Grades the user's answers for `item`. Choice and free-text items read the
/// first answer; cloze items expect one answer per blank, in id order.
pub fn grade_answer(item: &ReviewItem, answers: &[String]) -> Result<Verdict, CoreError> {
    match item.kind {
        ItemKind::Choice => {
            let expected = item.answer.as_deref().ok_or(CoreError::Invalid("item has no answer"))?;
            let actual = answers.first().map(String::as_str).unwrap_or_default();
            Ok(if normalize(expected) == normalize(actual) {
                Verdict::Exact
            } else {
                Verdict::Incorrect
            })
        }
        ItemKind::FreeText => {
            let expected = item.answer.as_deref().ok_or(CoreError::Invalid("item has no answer"))?;
            let actual = answers.first().map(String::as_str).unwrap_or_default();
            Ok(check_text(expected, actual))
        }
        ItemKind::Cloze => {
            let rendered = cloze::process(&item.prompt);
            if rendered.blanks.is_empty() {
                return Err(CoreError::Invalid("cloze item has no blanks"));
            }
            let mut verdict = Verdict::Exact;
            for (i, blank) in rendered.blanks.iter().enumerate() {
                let actual = answers.get(i).map(String::as_str).unwrap_or_default();
                match check_blank(blank, actual) {
                    Verdict::Incorrect => return Ok(Verdict::Incorrect),
                    Verdict::Close => verdict = Verdict::Close,
                    Verdict::Exact => {}
                }
            }
            Ok(verdict)
        }
    }
}
