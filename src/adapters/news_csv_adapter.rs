//! CSV news adapter.
//!
//! Each provider is a directory of per-coin files, `<dir>/<COIN>.csv`, with a
//! header row `published_at,title[,body]`. Parsed files are kept in a
//! caller-owned [`ArticleCache`] keyed by provider and coin, so the cache can
//! be shared across providers and runs.

use crate::domain::sentiment::{Article, NewsFetch};
use crate::ports::news_port::{coin_of, NewsPort};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct ArticleCache {
    entries: Mutex<HashMap<(String, String), Vec<Article>>>,
}

impl ArticleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, provider: &str, coin: &str) -> Option<Vec<Article>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(&(provider.to_string(), coin.to_string()))
            .cloned()
    }

    pub fn insert(&self, provider: &str, coin: &str, articles: Vec<Article>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert((provider.to_string(), coin.to_string()), articles);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct NewsCsvAdapter {
    name: String,
    base_path: PathBuf,
    cache: Arc<ArticleCache>,
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and bare dates (midnight).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl NewsCsvAdapter {
    pub fn new(base_path: PathBuf, cache: Arc<ArticleCache>) -> Self {
        let name = base_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| base_path.display().to_string());
        Self {
            name,
            base_path,
            cache,
        }
    }

    fn csv_path(&self, coin: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", coin))
    }

    fn load(&self, coin: &str) -> Result<Vec<Article>, String> {
        let path = self.csv_path(coin);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut articles = Vec::new();

        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| format!("CSV parse error: {}", e))?;
            let published = record
                .get(0)
                .and_then(parse_timestamp)
                .ok_or_else(|| format!("invalid published_at on row {}", line + 1))?;
            let title = record.get(1).unwrap_or_default().trim().to_string();
            if title.is_empty() {
                continue;
            }
            let body = record
                .get(2)
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string);

            articles.push(Article {
                published,
                title,
                body,
                source: self.name.clone(),
            });
        }

        Ok(articles)
    }
}

impl NewsPort for NewsCsvAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_articles(&self, symbol: &str, start_date: NaiveDate, end_date: NaiveDate) -> NewsFetch {
        let coin = coin_of(symbol);
        let articles = match self.cache.get(&self.name, coin) {
            Some(cached) => cached,
            None => match self.load(coin) {
                Ok(loaded) => {
                    self.cache.insert(&self.name, coin, loaded.clone());
                    loaded
                }
                Err(reason) => return NewsFetch::Failed { reason },
            },
        };

        let in_range: Vec<Article> = articles
            .into_iter()
            .filter(|a| a.date() >= start_date && a.date() <= end_date)
            .collect();

        if in_range.is_empty() {
            NewsFetch::Empty
        } else {
            NewsFetch::Articles(in_range)
        }
    }
}
