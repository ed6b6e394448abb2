//! Human-readable record codes ("PRG-3", "A-17", "SE-2").
//!
//! Codes are allocated by filling the smallest unused positive integer for
//! a prefix. Callers scan the existing codes of the relevant table under a
//! lock (the creating transaction) and pass them here.

/// Allocates the next code for `prefix` given the codes already in use.
///
/// Only codes that start with the prefix and end in a well-formed integer
/// participate; manually assigned free-form codes are ignored.
pub fn next_code<I, S>(prefix: &str, existing: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut used: Vec<u64> = existing
        .into_iter()
        .filter_map(|code| parse_suffix(prefix, code.as_ref()))
        .collect();
    used.sort_unstable();
    used.dedup();

    let mut candidate: u64 = 1;
    for n in used {
        if n == candidate {
            candidate += 1;
        } else if n > candidate {
            break;
        }
    }

    format!("{prefix}{candidate}")
}

fn parse_suffix(prefix: &str, code: &str) -> Option<u64> {
    let suffix = code.strip_prefix(prefix)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_code() {
        assert_eq!(next_code("PRG-", Vec::<String>::new()), "PRG-1");
    }

    #[test]
    fn test_appends_after_contiguous_codes() {
        assert_eq!(next_code("SE-", ["SE-1", "SE-2"]), "SE-3");
    }

    #[test]
    fn test_fills_smallest_gap() {
        assert_eq!(next_code("A-", ["A-1", "A-3", "A-17"]), "A-2");
    }

    #[test]
    fn test_ignores_other_prefixes_and_freeform_codes() {
        assert_eq!(
            next_code("A-", ["PRG-1", "A-custom", "A-", "A-1x", "A-1"]),
            "A-2"
        );
    }

    #[test]
    fn test_duplicates_do_not_confuse_allocation() {
        assert_eq!(next_code("R-", ["R-1", "R-1", "R-2"]), "R-3");
    }
}
