//! Article record parsing from `Field: value` text blocks.
//!
//! Both the raw tool output and the summarized model output use the same
//! colon-delimited line format; this module turns those blocks into
//! display-ready records.

use chrono::DateTime;
use std::collections::HashMap;

/// Normalized four-field representation of one news item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub title: String,
    pub summary: Option<String>,
    pub url: String,
    pub published_at: String,
}

impl ArticleRecord {
    /// Parse one text block into a record.
    ///
    /// Lines without a colon and unrecognized field names are ignored;
    /// missing fields default to the empty string.
    pub fn parse(block: &str) -> Self {
        let fields: HashMap<&str, &str> = block
            .lines()
            .filter_map(|line| {
                line.split_once(':')
                    .map(|(field, value)| (field.trim(), value.trim()))
            })
            .collect();

        Self {
            title: fields.get("Title").copied().unwrap_or("").to_string(),
            summary: fields.get("Summary").map(|s| s.to_string()),
            url: fields.get("URL").copied().unwrap_or("").to_string(),
            published_at: fields
                .get("Published At")
                .copied()
                .unwrap_or("")
                .to_string(),
        }
    }

    /// Date portion of `published_at` as `YYYY/MM/DD`.
    ///
    /// Falls back to slicing off the time part for near-ISO inputs, and to
    /// the raw string when no date can be recognized.
    pub fn published_date(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.published_at) {
            Ok(date) => date.format("%Y/%m/%d").to_string(),
            Err(_) => self
                .published_at
                .split('T')
                .next()
                .unwrap_or(&self.published_at)
                .replace('-', "/"),
        }
    }
}

/// Split summarization output into candidate article blocks.
///
/// Blocks are separated by blank lines; only trimmed segments carrying both
/// a `Title:` and a `Summary:` marker survive.
pub fn split_article_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            push_block(&mut blocks, &mut current);
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    push_block(&mut blocks, &mut current);

    blocks
}

fn push_block(blocks: &mut Vec<String>, current: &mut String) {
    let segment = current.trim();
    if segment.contains("Title:") && segment.contains("Summary:") {
        blocks.push(segment.to_string());
    }
    current.clear();
}
