//! Nearest-offset pairing of extracted URLs with located dates.
//!
//! Used only on the heuristic path, when the response never yielded
//! structured records. Pairing by text proximity is an approximation: it
//! guarantees a deterministic choice, not topical correctness.

use crate::ingest::dates::DateMention;
use crate::ingest::structured::RawEntry;
use crate::ingest::urls::UrlCandidate;

/// Pair each URL candidate with its nearest date mention.
///
/// Candidates keep extraction order. Distance is measured from the
/// mention's offset to the candidate's span (zero inside the span,
/// otherwise the gap to its nearest edge), so a date trailing a long URL
/// counts as adjacent. The mention at the smallest distance wins; ties go
/// to the earliest-occurring mention. With no mentions at all, every
/// candidate pairs with `None`.
pub fn associate(candidates: Vec<UrlCandidate>, mentions: &[DateMention]) -> Vec<RawEntry> {
    candidates
        .into_iter()
        .map(|candidate| {
            let start = candidate.offset;
            let end = candidate.offset + candidate.url.len();
            let nearest = mentions
                .iter()
                .min_by_key(|mention| (span_distance(mention.offset, start, end), mention.offset));
            RawEntry {
                url: candidate.url,
                raw_date: nearest.map(|mention| mention.text.clone()),
            }
        })
        .collect()
}

fn span_distance(offset: usize, start: usize, end: usize) -> usize {
    if offset < start {
        start - offset
    } else if offset > end {
        offset - end
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::dates::FormatFamily;

    fn mention(text: &str, offset: usize) -> DateMention {
        DateMention {
            text: text.to_string(),
            offset,
            family: FormatFamily::NumericMdyDash,
        }
    }

    fn candidate(url: &str, offset: usize) -> UrlCandidate {
        UrlCandidate {
            url: url.to_string(),
            offset,
        }
    }

    #[test]
    fn test_nearest_mention_wins() {
        // Span is 100..115; distances 20 and 185.
        let candidates = vec![candidate("https://a.com/x", 100)];
        let mentions = vec![mention("01-02-2024", 80), mention("01-05-2024", 300)];
        let paired = associate(candidates, &mentions);
        assert_eq!(paired[0].raw_date.as_deref(), Some("01-02-2024"));
    }

    #[test]
    fn test_tie_breaks_to_earliest_mention() {
        // Offsets 90 and 125 are both 10 away from the 100..115 span.
        let candidates = vec![candidate("https://a.com/x", 100)];
        let mentions = vec![mention("01-02-2024", 90), mention("01-05-2024", 125)];
        let paired = associate(candidates, &mentions);
        assert_eq!(paired[0].raw_date.as_deref(), Some("01-02-2024"));
    }

    #[test]
    fn test_trailing_date_beats_closer_preceding_date() {
        // A date two bytes past the span's end wins over one sixteen
        // bytes before its start, even though the preceding date is
        // nearer to the match start itself.
        let url = "https://news.example/story2";
        let candidates = vec![candidate(url, 55)];
        let mentions = vec![mention("01-02-2024", 39), mention("01-05-2024", 84)];
        let paired = associate(candidates, &mentions);
        assert_eq!(paired[0].raw_date.as_deref(), Some("01-05-2024"));
    }

    #[test]
    fn test_no_mentions_pairs_null() {
        let candidates = vec![candidate("https://a.com/x", 10), candidate("https://b.com/y", 50)];
        let paired = associate(candidates, &[]);
        assert_eq!(paired.len(), 2);
        assert!(paired.iter().all(|entry| entry.raw_date.is_none()));
    }

    #[test]
    fn test_each_candidate_pairs_independently() {
        let candidates = vec![candidate("https://a.com/x", 10), candidate("https://b.com/y", 200)];
        let mentions = vec![mention("01-02-2024", 30), mention("01-05-2024", 190)];
        let paired = associate(candidates, &mentions);
        assert_eq!(paired[0].raw_date.as_deref(), Some("01-02-2024"));
        assert_eq!(paired[1].raw_date.as_deref(), Some("01-05-2024"));
    }

    #[test]
    fn test_extraction_order_preserved() {
        let candidates = vec![candidate("https://b.com/y", 50), candidate("https://a.com/x", 10)];
        let paired = associate(candidates, &[]);
        assert_eq!(paired[0].url, "https://b.com/y");
        assert_eq!(paired[1].url, "https://a.com/x");
    }
}
