//! Synthetic posts for running the display, filter and export path without
//! credentials or network access.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::domain::{sort_by_score, PostMode, PostRecord};

pub const DEMO_TITLES: [&str; 15] = [
    "How to get started with Python programming",
    "Best practices for web development in 2024",
    "Amazing sunset photo from my backyard",
    "Just finished my first machine learning project!",
    "Tips for debugging code efficiently",
    "New breakthrough in renewable energy technology",
    "Cozy reading nook setup - what do you think?",
    "Free online courses that changed my career",
    "My homemade pizza turned out better than expected",
    "Quick tutorial: Setting up a development environment",
    "Interesting documentary recommendation",
    "Local coffee shop with incredible atmosphere",
    "Weekend project: Building a simple web app",
    "Nature photography from my recent hiking trip",
    "Book recommendation for aspiring entrepreneurs",
];

pub const DEMO_AUTHORS: [&str; 10] = [
    "user123",
    "coder_pro",
    "nature_lover",
    "tech_enthusiast",
    "student_dev",
    "photo_guru",
    "learning_always",
    "code_newbie",
    "adventure_seeker",
    "book_worm",
];

const DEMO_SELFTEXT: &str = "This is demo content for testing the Reddit scraper interface.";

const ONE_HOUR: i64 = 3600;
const ONE_WEEK: i64 = 7 * 86400;

pub struct DemoGenerator {
    rng: StdRng,
}

impl DemoGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible generator for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn generate(&mut self, label: &str, mode: PostMode, limit: usize) -> Vec<PostRecord> {
        self.generate_at(label, mode, limit, Utc::now().timestamp())
    }

    /// Generate relative to a fixed clock, `now` in epoch seconds.
    pub fn generate_at(
        &mut self,
        label: &str,
        mode: PostMode,
        limit: usize,
        now: i64,
    ) -> Vec<PostRecord> {
        let count = limit.min(DEMO_TITLES.len());
        tracing::debug!("Generating {} demo posts for r/{} ({})", count, label, mode);

        let mut records: Vec<PostRecord> = DEMO_TITLES
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, title)| self.post(label, i, title, now))
            .collect();

        sort_by_score(&mut records);
        records
    }

    fn post(&mut self, label: &str, index: usize, title: &str, now: i64) -> PostRecord {
        let rng = &mut self.rng;

        let author = DEMO_AUTHORS
            .choose(&mut *rng)
            .copied()
            .unwrap_or(DEMO_AUTHORS[0]);
        let score = rng.gen_range(5..=500);
        let upvote_ratio = (rng.gen_range(0.70..=0.98_f64) * 100.0).round() / 100.0;
        let num_comments = rng.gen_range(0..=100);
        let created_utc = (now - rng.gen_range(ONE_HOUR..=ONE_WEEK)) as f64;
        let is_self = rng.gen_bool(0.5);

        let (selftext, domain) = if is_self {
            (DEMO_SELFTEXT.to_string(), format!("self.{}", label))
        } else {
            (String::new(), "example.com".to_string())
        };

        PostRecord {
            title: title.to_string(),
            author: author.to_string(),
            score,
            upvote_ratio,
            num_comments,
            created_utc,
            created_date: PostRecord::format_created(created_utc),
            url: format!("https://reddit.com/r/{}/post_{}", label, index),
            permalink: format!("https://reddit.com/r/{}/comments/demo_{}", label, index),
            selftext,
            is_self,
            subreddit: label.to_string(),
            post_id: format!("demo_{}", index),
            domain,
            over_18: false,
            spoiler: false,
            stickied: false,
            locked: false,
        }
    }
}

impl Default for DemoGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Demo posts shaped exactly like a live retrieval: at most 15, best first.
pub fn generate_demo_data(label: &str, mode: PostMode, limit: usize) -> Vec<PostRecord> {
    DemoGenerator::new().generate(label, mode, limit)
}
