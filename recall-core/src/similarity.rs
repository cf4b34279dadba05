//! Fuzzy answer equality.

/// Maximum edit distance tolerated for a whole answer.
pub const MAX_TYPO_DISTANCE: usize = 2;
/// Answers this short (in characters) or shorter must match exactly.
pub const MIN_FUZZY_LEN: usize = 3;
/// Maximum edit distance for one word in the word-by-word comparison.
pub const MAX_WORD_DISTANCE: usize = 1;
/// Share of word pairs that must match for a word-by-word accept.
pub const WORD_MATCH_RATIO: f64 = 0.8;

pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Levenshtein distance over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j + 1] + 1).min(cur[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Whether `actual` should be accepted for `expected`.
///
/// Exact after trim and case-fold; else within two edits when `expected` is
/// longer than three characters; else, with equal word counts, when at least
/// 80% of aligned words are within one edit. The word-by-word pass only
/// applies to multi-word answers, so a single short word still has to match
/// exactly.
pub fn is_equivalent(expected: &str, actual: &str) -> bool {
    let expected = normalize(expected);
    let actual = normalize(actual);

    if expected == actual {
        return true;
    }

    if expected.chars().count() > MIN_FUZZY_LEN
        && levenshtein(&expected, &actual) <= MAX_TYPO_DISTANCE
    {
        return true;
    }

    word_overlap_matches(&expected, &actual)
}

fn word_overlap_matches(expected: &str, actual: &str) -> bool {
    let ew: Vec<&str> = expected.split_whitespace().collect();
    let aw: Vec<&str> = actual.split_whitespace().collect();
    if ew.len() < 2 || ew.len() != aw.len() {
        return false;
    }
    let matched = ew
        .iter()
        .zip(&aw)
        .filter(|(e, a)| levenshtein(e, a) <= MAX_WORD_DISTANCE)
        .count();
    matched as f64 / ew.len() as f64 >= WORD_MATCH_RATIO
}
