//! Fuzzy name matching and ranking.

/// Returns `true` if `pattern` matches `name`: either as a case-insensitive
/// substring, or as a case-insensitive ordered subsequence (so `"USvc"`
/// matches `"UserService"`).
pub fn matches(name: &str, pattern: &str) -> bool {
    let name = name.to_lowercase();
    let pattern = pattern.to_lowercase();
    if name.contains(&pattern) {
        return true;
    }

    let mut chars = name.chars();
    pattern.chars().all(|p| chars.any(|c| c == p))
}

/// Classic edit distance (insert, delete, substitute; each costs 1).
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
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Sort key for a candidate: exact (case-insensitive) name first, then by
/// case-insensitive edit distance.
pub fn rank_key(name: &str, pattern: &str) -> (u8, usize) {
    let name = name.to_lowercase();
    let pattern = pattern.to_lowercase();
    let exact = if name == pattern { 0 } else { 1 };
    (exact, levenshtein(&name, &pattern))
}

/// Stable-sorts `items` by [`rank_key`] of the name `name_of` extracts.
pub fn rank_by<T>(items: &mut [T], pattern: &str, name_of: impl Fn(&T) -> &str) {
    items.sort_by_cached_key(|item| rank_key(name_of(item), pattern));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_is_case_insensitive() {
        assert!(matches("UserService", "service"));
        assert!(matches("parse_config", "CONFIG"));
    }

    #[test]
    fn ordered_subsequence_matches() {
        assert!(matches("UserService", "USvc"));
        assert!(!matches("UserService", "XY"));
        assert!(!matches("UserService", "cvsu"));
    }

    #[test]
    fn empty_pattern_matches_everything() {
        assert!(matches("anything", ""));
    }

    #[test]
    fn levenshtein_known_values() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("flaw", "flaw"), 0);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
    }

    #[test]
    fn exact_match_ranks_first() {
        let mut names = vec!["Userx", "UserServiceImpl", "user", "Users"];
        rank_by(&mut names, "User", |n| n);
        assert_eq!(names[0], "user");
        assert_eq!(names[1], "Userx");
        assert_eq!(names[2], "Users");
    }
}
