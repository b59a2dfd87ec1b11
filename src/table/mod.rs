use crate::domain::PostRecord;

pub const PAGE_SIZE: usize = 10;

/// Records with `score >= min_score` and `num_comments >= min_comments`,
/// in their original order.
pub fn filter_records(records: &[PostRecord], min_score: i64, min_comments: u64) -> Vec<PostRecord> {
    records
        .iter()
        .filter(|r| r.score >= min_score && r.num_comments >= min_comments)
        .cloned()
        .collect()
}

/// One page of a record table.
#[derive(Debug)]
pub struct Page<'a> {
    /// 1-based page number actually shown.
    pub number: usize,
    pub total_pages: usize,
    pub records: &'a [PostRecord],
}

impl Page<'_> {
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.number, self.total_pages)
    }
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    if len == 0 {
        1
    } else {
        (len - 1) / page_size + 1
    }
}

/// Slice out page `page` (1-based). Out-of-range numbers clamp to the
/// first or last page.
pub fn paginate(records: &[PostRecord], page: usize, page_size: usize) -> Page<'_> {
    let page_size = page_size.max(1);
    let total = total_pages(records.len(), page_size);
    let number = page.clamp(1, total);

    let start = ((number - 1) * page_size).min(records.len());
    let end = (start + page_size).min(records.len());

    Page {
        number,
        total_pages: total,
        records: &records[start..end],
    }
}

/// Headline numbers for a fetched table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total_posts: usize,
    pub avg_score: f64,
    pub total_comments: u64,
    /// Mean upvote ratio as a percentage.
    pub avg_upvote_pct: f64,
}

impl Summary {
    pub fn of(records: &[PostRecord]) -> Self {
        let n = records.len();
        if n == 0 {
            return Self {
                total_posts: 0,
                avg_score: 0.0,
                total_comments: 0,
                avg_upvote_pct: 0.0,
            };
        }

        let score_sum: i64 = records.iter().map(|r| r.score).sum();
        let ratio_sum: f64 = records.iter().map(|r| r.upvote_ratio).sum();

        Self {
            total_posts: n,
            avg_score: score_sum as f64 / n as f64,
            total_comments: records.iter().map(|r| r.num_comments).sum(),
            avg_upvote_pct: ratio_sum / n as f64 * 100.0,
        }
    }
}
