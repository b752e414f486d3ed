//! Daily sentiment scores in [-1, 1].
//!
//! Two sources:
//! - simulated: 7-day momentum clipped to ±15%, rescaled to [-1, 1], plus
//!   Gaussian noise (σ = 0.2) drawn from a caller-supplied RNG; the first
//!   seven days have no momentum window and stay unscored
//! - news: mean headline polarity per calendar date, forward-filled across
//!   days without articles (0 before the first article)
//!
//! News retrieval reports its outcome as a [`NewsFetch`] value; falling back to
//! the simulated source is decided here, never by catching a provider error.

use crate::domain::daily::DailySeries;
use crate::domain::lexicon::PolarityLexicon;
use crate::ports::news_port::NewsPort;
use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use std::collections::{BTreeMap, HashSet};

pub const MOMENTUM_WINDOW: usize = 7;
pub const MOMENTUM_CLIP: f64 = 0.15;
pub const NOISE_STD_DEV: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub published: NaiveDateTime,
    pub title: String,
    pub body: Option<String>,
    pub source: String,
}

impl Article {
    pub fn date(&self) -> NaiveDate {
        self.published.date()
    }
}

/// Outcome of asking a news provider for articles.
#[derive(Debug, Clone, PartialEq)]
pub enum NewsFetch {
    Articles(Vec<Article>),
    Empty,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SentimentOrigin {
    Simulated,
    News { articles: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentSeries {
    pub scores: Vec<Option<f64>>,
    pub origin: SentimentOrigin,
}

/// One entry per price. Days without a full momentum window are `None`;
/// every day still draws its noise so the RNG stream stays aligned with the
/// dates.
pub fn simulate_sentiment<R: Rng + ?Sized>(closes: &[f64], rng: &mut R) -> Vec<Option<f64>> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let z: f64 = StandardNormal.sample(rng);
            if i < MOMENTUM_WINDOW || closes[i - MOMENTUM_WINDOW] <= 0.0 {
                return None;
            }
            let ret = close / closes[i - MOMENTUM_WINDOW] - 1.0;
            let momentum = ret.clamp(-MOMENTUM_CLIP, MOMENTUM_CLIP) / MOMENTUM_CLIP;
            Some((momentum + z * NOISE_STD_DEV).clamp(-1.0, 1.0))
        })
        .collect()
}

/// Concatenates provider results, keeps the first article per title and
/// orders by publication time.
pub fn merge_articles(batches: Vec<Vec<Article>>) -> Vec<Article> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged: Vec<Article> = batches
        .into_iter()
        .flatten()
        .filter(|a| seen.insert(a.title.clone()))
        .collect();
    merged.sort_by_key(|a| a.published);
    merged
}

pub fn article_polarity(article: &Article, lexicon: &PolarityLexicon, include_body: bool) -> f64 {
    match (&article.body, include_body) {
        (Some(body), true) => lexicon.polarity(&format!("{} {}", article.title, body)),
        _ => lexicon.polarity(&article.title),
    }
}

pub fn daily_news_sentiment(
    dates: &[NaiveDate],
    articles: &[Article],
    lexicon: &PolarityLexicon,
    include_body: bool,
) -> Vec<f64> {
    let mut by_date: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for article in articles {
        let entry = by_date.entry(article.date()).or_insert((0.0, 0));
        entry.0 += article_polarity(article, lexicon, include_body);
        entry.1 += 1;
    }

    let mut previous = 0.0;
    dates
        .iter()
        .map(|date| {
            if let Some(&(sum, count)) = by_date.get(date) {
                previous = sum / count as f64;
            }
            previous
        })
        .collect()
}

/// Picks the sentiment source for `series`. Real news is used only when
/// requested and at least one provider returned articles.
pub fn resolve_sentiment<R: Rng + ?Sized>(
    series: &DailySeries,
    providers: &[&dyn NewsPort],
    use_real_news: bool,
    include_body: bool,
    rng: &mut R,
) -> SentimentSeries {
    if use_real_news {
        match (series.first_date(), series.last_date()) {
            (Some(start), Some(end)) if !providers.is_empty() => {
                let articles = fetch_from_providers(providers, &series.symbol, start, end);
                if !articles.is_empty() {
                    tracing::info!(
                        articles = articles.len(),
                        "computing sentiment from news headlines"
                    );
                    let lexicon = PolarityLexicon::new();
                    let scores =
                        daily_news_sentiment(&series.dates(), &articles, &lexicon, include_body)
                            .into_iter()
                            .map(Some)
                            .collect();
                    return SentimentSeries {
                        scores,
                        origin: SentimentOrigin::News {
                            articles: articles.len(),
                        },
                    };
                }
                tracing::warn!("no news fetched, falling back to simulated sentiment");
            }
            _ if providers.is_empty() => {
                tracing::warn!(
                    "no news providers configured, falling back to simulated sentiment"
                );
            }
            _ => {}
        }
    }

    SentimentSeries {
        scores: simulate_sentiment(&series.closes(), rng),
        origin: SentimentOrigin::Simulated,
    }
}

fn fetch_from_providers(
    providers: &[&dyn NewsPort],
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Article> {
    let mut batches = Vec::new();
    for provider in providers {
        match provider.fetch_articles(symbol, start, end) {
            NewsFetch::Articles(articles) => {
                tracing::debug!(provider = provider.name(), count = articles.len(), "fetched articles");
                batches.push(articles);
            }
            NewsFetch::Empty => {
                tracing::debug!(provider = provider.name(), "provider returned no articles");
            }
            NewsFetch::Failed { reason } => {
                tracing::warn!(provider = provider.name(), %reason, "news provider failed");
            }
        }
    }
    merge_articles(batches)
        .into_iter()
        .filter(|a| a.date() >= start && a.date() <= end)
        .collect()
}
