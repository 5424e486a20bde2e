//! Page range expressions
//!
//! Parses expressions like `"1-3, 5, 8-10"` into the set of 1-indexed pages
//! to split. Parsing is permissive: tokens that are malformed or fall outside
//! the document are dropped without an error. [`validate_page_range`] offers
//! a separate, non-blocking check for UIs that want to hint at typos.

use std::collections::BTreeSet;

/// Parse a page range expression into sorted, deduplicated page numbers.
///
/// # Arguments
/// * `range_str` - Comma-separated tokens, each a page (`"5"`) or an
///   inclusive range (`"2-4"`)
/// * `total_pages` - Page count of the document; pages outside `1..=total_pages`
///   are dropped
///
/// # Examples
/// ```
/// use pdfsplit_core::page_range::parse_page_ranges;
///
/// assert_eq!(parse_page_ranges("1-3,5", 10), vec![1, 2, 3, 5]);
/// assert_eq!(parse_page_ranges("0,11,-2,abc", 10), Vec::<u32>::new());
/// ```
pub fn parse_page_ranges(range_str: &str, total_pages: u32) -> Vec<u32> {
    let mut pages = BTreeSet::new();

    for part in range_str.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if part.contains('-') {
            // Only the first two pieces count: "1-3-5" reads as "1-3".
            let mut bounds = part.splitn(3, '-').map(|n| n.trim().parse::<u32>());
            let (Some(Ok(start)), Some(Ok(end))) = (bounds.next(), bounds.next()) else {
                continue;
            };
            // Clamp the walk to the document so "1-4000000000" stays cheap.
            for page in start.max(1)..=end.min(total_pages) {
                pages.insert(page);
            }
        } else if let Ok(page) = part.parse::<u32>() {
            if page >= 1 && page <= total_pages {
                pages.insert(page);
            }
        }
    }

    pages.into_iter().collect()
}

/// Range expression selecting every page, used to pre-fill the input after load.
pub fn default_page_range(total_pages: u32) -> String {
    format!("1-{}", total_pages)
}

/// Report the first token [`parse_page_ranges`] would silently drop or only
/// partly read.
///
/// Returns `None` if every token contributes pages, `Some(message)` otherwise.
pub fn validate_page_range(range_str: &str, total_pages: u32) -> Option<String> {
    if range_str.trim().is_empty() {
        return Some("Page range cannot be empty".to_string());
    }

    for part in range_str.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if part.contains('-') {
            let pieces: Vec<&str> = part.splitn(3, '-').collect();
            match (pieces[0].trim().parse::<u32>(), pieces[1].trim().parse::<u32>()) {
                (Ok(s), Ok(e)) => {
                    if let Some(extra) = pieces.get(2) {
                        return Some(format!("Ignoring \"-{}\" after range {}-{}", extra, s, e));
                    }
                    if s > e {
                        return Some(format!("Invalid range: start {} > end {}", s, e));
                    }
                    if s < 1 {
                        return Some(format!("Page number must be >= 1, got {}", s));
                    }
                    if e > total_pages {
                        return Some(format!("Page {} exceeds total pages {}", e, total_pages));
                    }
                }
                _ => return Some(format!("Invalid numbers in range: {}", part)),
            }
        } else {
            match part.parse::<u32>() {
                Ok(0) => return Some("Page number must be >= 1, got 0".to_string()),
                Ok(n) if n > total_pages => {
                    return Some(format!("Page {} exceeds total pages {}", n, total_pages));
                }
                Ok(_) => {}
                Err(_) => return Some(format!("Invalid page number: {}", part)),
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pages_and_ranges() {
        assert_eq!(parse_page_ranges("1-3,5", 10), vec![1, 2, 3, 5]);
        assert_eq!(parse_page_ranges("7", 10), vec![7]);
    }

    #[test]
    fn test_out_of_range_and_malformed_are_dropped() {
        assert!(parse_page_ranges("0,11,-2,abc", 10).is_empty());
    }

    #[test]
    fn test_range_clipped_to_document() {
        assert_eq!(parse_page_ranges("8-12", 10), vec![8, 9, 10]);
        assert_eq!(parse_page_ranges("0-2", 10), vec![1, 2]);
    }

    #[test]
    fn test_reversed_range_selects_nothing() {
        assert!(parse_page_ranges("5-3", 10).is_empty());
    }

    #[test]
    fn test_duplicates_removed_and_sorted() {
        assert_eq!(parse_page_ranges("4, 1-3, 2-4, 1", 10), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_whitespace_and_empty_tokens() {
        assert_eq!(parse_page_ranges(" 1 , , 3 - 4 ,", 5), vec![1, 3, 4]);
        assert!(parse_page_ranges("", 5).is_empty());
    }

    #[test]
    fn test_malformed_token_does_not_poison_others() {
        assert_eq!(parse_page_ranges("x-4, 2, 3-y, 6", 10), vec![2, 6]);
    }

    #[test]
    fn test_extra_range_pieces_ignored() {
        assert_eq!(parse_page_ranges("1-3-5", 10), vec![1, 2, 3]);
        assert_eq!(parse_page_ranges("7-8-x, 10", 10), vec![7, 8, 10]);
        assert!(validate_page_range("1-3-5", 10).unwrap().contains("Ignoring"));
    }

    #[test]
    fn test_huge_range_is_bounded() {
        assert_eq!(parse_page_ranges("1-4000000000", 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_default_page_range() {
        assert_eq!(default_page_range(10), "1-10");
        assert_eq!(parse_page_ranges(&default_page_range(4), 4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_validate_accepts_good_input() {
        assert_eq!(validate_page_range("1-3, 5", 10), None);
    }

    #[test]
    fn test_validate_reports_problems() {
        assert!(validate_page_range("", 10).unwrap().contains("empty"));
        assert!(validate_page_range("0", 10).unwrap().contains(">= 1"));
        assert!(validate_page_range("11", 10).unwrap().contains("exceeds"));
        assert!(validate_page_range("5-3", 10).unwrap().contains("start"));
        assert!(validate_page_range("abc", 10).unwrap().contains("Invalid"));
        assert!(validate_page_range("-2", 10).unwrap().contains("Invalid"));
    }
}
