const FALLOFF: f64 = 0.8;
const MATCH_BONUS: f64 = 1.0;
const AWARD_CAP: f64 = 1.0;

/// True when `candidate` starts with `input`, folding ASCII case only.
pub fn prefix_matches(candidate: &str, input: &str) -> bool {
    let candidate = candidate.as_bytes();
    let input = input.as_bytes();
    candidate.len() >= input.len() && candidate[..input.len()].eq_ignore_ascii_case(input)
}

/// Subsequence score of `needle` in `haystack`. Every match earns the current
/// award and raises it; every haystack byte scanned decays it, so matches that
/// are early and close together score highest. Returns 0 for an empty needle.
pub fn fuzzy_score(haystack: &[u8], needle: &[u8]) -> f64 {
    let mut score = 0.0;
    let mut next_award = 1.0;
    let mut i_needle = 0;
    let mut i_haystack = 0;

    while i_needle < needle.len() && i_haystack < haystack.len() {
        if needle[i_needle].eq_ignore_ascii_case(&haystack[i_haystack]) {
            score += next_award;
            next_award += MATCH_BONUS;
            i_needle += 1;
        }
        next_award = AWARD_CAP.min(next_award * FALLOFF);
        i_haystack += 1;
    }

    score
}

/// Scores a candidate against the input with the fuzzy root stripped from
/// both. A candidate outside the root is scored on its full text.
pub fn fuzzy_score_under_root(candidate: &str, input: &str, root: &str) -> f64 {
    let haystack = candidate.strip_prefix(root).unwrap_or(candidate);
    let needle = input.strip_prefix(root).unwrap_or(input);
    fuzzy_score(haystack.as_bytes(), needle.as_bytes())
}
