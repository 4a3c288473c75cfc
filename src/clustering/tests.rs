use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::*;
use crate::article::Article;
use crate::cache::Cache;
use crate::error::{ConfigError, ProviderError};
use crate::llm::testing::ScriptedAdapter;
use crate::llm::LLMRequest;
use crate::settings::Settings;

fn article(title: &str) -> Article {
    let slug = title.to_lowercase().replace(' ', "-");
    Article::new(
        title,
        format!("Body of the story titled {}.", title),
        format!("https://news.example.com/{}", slug),
    )
}

fn titles(request: &LLMRequest) -> (String, String) {
    let found: Vec<String> = request
        .user
        .lines()
        .filter_map(|line| line.strip_prefix("Title: "))
        .map(str::to_string)
        .collect();
    let mut pair = (found[0].clone(), found[1].clone());
    if pair.0 > pair.1 {
        pair = (pair.1, pair.0);
    }
    pair
}

/// Answers with a fixed confidence per unordered title pair; unknown pairs get 0.05.
/// Pairs listed with a negative confidence fail instead.
fn judge_by_titles(judgments: &[(&str, &str, f64)]) -> ScriptedAdapter {
    let mut table = HashMap::new();
    for (a, b, confidence) in judgments {
        let key = if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        };
        table.insert(key, *confidence);
    }

    ScriptedAdapter::new(move |request| {
        let confidence = table.get(&titles(request)).copied().unwrap_or(0.05);
        if confidence < 0.0 {
            return Err(ProviderError::Request("upstream 503".to_string()));
        }
        Ok(format!(r#"{{"confidence": {}, "reasoning": "scripted"}}"#, confidence))
    })
}

fn settings(threshold: f32) -> Settings {
    Settings {
        similarity_threshold: threshold,
        ..Settings::default()
    }
}

fn member_urls(group: &ArticleGroup) -> Vec<String> {
    std::iter::once(&group.primary_article)
        .chain(&group.similar_articles)
        .map(|a| a.source_url.clone())
        .collect()
}

#[tokio::test]
async fn test_empty_batch_yields_no_groups() {
    let adapter = Arc::new(ScriptedAdapter::failing());
    let detector = SimilarityDetector::new(adapter.clone(), Cache::in_memory());

    let groups = detector.group(&[], &settings(0.8)).await.unwrap();

    assert!(groups.is_empty());
    assert_eq!(adapter.calls(), 0);
}

#[tokio::test]
async fn test_single_article_is_its_own_group() {
    let adapter = Arc::new(ScriptedAdapter::failing());
    let detector = SimilarityDetector::new(adapter.clone(), Cache::in_memory());
    let only = article("Lonely story");

    let groups = detector.group(&[only.clone()], &settings(0.8)).await.unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].primary_article, only);
    assert!(groups[0].similar_articles.is_empty());
    assert_eq!(groups[0].group_id, group_id([only.source_url.as_str()]));
    assert_eq!(adapter.calls(), 0);
}

#[tokio::test]
async fn test_threshold_decides_merge() {
    let batch = vec![article("Rocket launch delayed"), article("Launch of rocket pushed back")];
    let judgments = [("Rocket launch delayed", "Launch of rocket pushed back", 0.9)];

    let detector = SimilarityDetector::new(Arc::new(judge_by_titles(&judgments)), Cache::in_memory());
    let merged = detector.group(&batch, &settings(0.8)).await.unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].primary_article, batch[0]);
    assert_eq!(merged[0].similar_articles, vec![batch[1].clone()]);

    let detector = SimilarityDetector::new(Arc::new(judge_by_titles(&judgments)), Cache::in_memory());
    let split = detector.group(&batch, &settings(0.95)).await.unwrap();
    assert_eq!(split.len(), 2);
    assert!(split.iter().all(|g| g.similar_articles.is_empty()));
}

#[tokio::test]
async fn test_components_merge_transitively() {
    // A~B and B~C, but A and C judged different: still one group.
    let batch = vec![
        article("Alpha"),
        article("Unrelated"),
        article("Beta"),
        article("Gamma"),
    ];
    let adapter = judge_by_titles(&[("Alpha", "Beta", 0.9), ("Beta", "Gamma", 0.85), ("Alpha", "Gamma", 0.1)]);
    let detector = SimilarityDetector::new(Arc::new(adapter), Cache::in_memory());

    let groups = detector.group(&batch, &settings(0.8)).await.unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].primary_article.title, "Alpha");
    let similar: Vec<&str> = groups[0].similar_articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(similar, vec!["Beta", "Gamma"]);
    assert_eq!(groups[1].primary_article.title, "Unrelated");
}

#[tokio::test]
async fn test_every_article_in_exactly_one_group() {
    let batch: Vec<Article> = ["A", "B", "C", "D", "E", "F"].iter().map(|t| article(t)).collect();
    let adapter = judge_by_titles(&[("A", "C", 0.9), ("C", "F", 0.9), ("B", "E", 0.99), ("D", "E", 0.2)]);
    let detector = SimilarityDetector::new(Arc::new(adapter), Cache::in_memory());

    let groups = detector.group(&batch, &settings(0.8)).await.unwrap();

    let mut seen: Vec<String> = groups.iter().flat_map(member_urls).collect();
    seen.sort();
    let mut expected: Vec<String> = batch.iter().map(|a| a.source_url.clone()).collect();
    expected.sort();
    assert_eq!(seen, expected);
    assert_eq!(groups.len(), 3);
}

#[tokio::test]
async fn test_group_id_is_stable_under_reordering() {
    let judgments = [("Storm hits coast", "Coastal storm damage", 0.92)];
    let forward = vec![article("Storm hits coast"), article("Coastal storm damage"), article("Election results")];
    let mut reversed = forward.clone();
    reversed.reverse();

    let detector = SimilarityDetector::new(Arc::new(judge_by_titles(&judgments)), Cache::in_memory());
    let a = detector.group(&forward, &settings(0.8)).await.unwrap();
    let detector = SimilarityDetector::new(Arc::new(judge_by_titles(&judgments)), Cache::in_memory());
    let b = detector.group(&reversed, &settings(0.8)).await.unwrap();

    let ids = |groups: &[ArticleGroup]| -> BTreeSet<String> {
        groups.iter().map(|g| g.group_id.clone()).collect()
    };
    assert_eq!(ids(&a), ids(&b));

    // Primary follows input order.
    let storm_a = a.iter().find(|g| g.member_count() == 2).unwrap();
    let storm_b = b.iter().find(|g| g.member_count() == 2).unwrap();
    assert_eq!(storm_a.primary_article.title, "Storm hits coast");
    assert_eq!(storm_b.primary_article.title, "Coastal storm damage");
}

#[tokio::test]
async fn test_failed_pair_is_not_similar() {
    let batch = vec![article("One"), article("Two"), article("Three")];

    let healthy = judge_by_titles(&[("One", "Two", 0.9), ("Two", "Three", 0.9)]);
    let detector = SimilarityDetector::new(Arc::new(healthy), Cache::in_memory());
    let all_ok = detector.group(&batch, &settings(0.8)).await.unwrap();
    assert_eq!(all_ok.len(), 1);

    let flaky = judge_by_titles(&[("One", "Two", 0.9), ("Two", "Three", -1.0)]);
    let detector = SimilarityDetector::new(Arc::new(flaky), Cache::in_memory());
    let degraded = detector.group(&batch, &settings(0.8)).await.unwrap();

    assert_eq!(degraded.len(), 2);
    let largest = degraded.iter().map(ArticleGroup::member_count).max().unwrap();
    let largest_ok = all_ok.iter().map(ArticleGroup::member_count).max().unwrap();
    assert!(largest <= largest_ok);
}

#[tokio::test]
async fn test_total_provider_outage_leaves_singletons() {
    let batch = vec![article("One"), article("Two"), article("Three")];
    let adapter = Arc::new(ScriptedAdapter::failing());
    let detector = SimilarityDetector::new(adapter.clone(), Cache::in_memory());

    let groups = detector.group(&batch, &settings(0.0)).await.unwrap();

    assert_eq!(groups.len(), 3);
    assert_eq!(adapter.calls(), 3);
}

#[tokio::test]
async fn test_judgments_are_cached_across_batches() {
    let cache = Cache::in_memory();
    let adapter = Arc::new(judge_by_titles(&[("Day one", "Day two", 0.9)]));
    let detector = SimilarityDetector::new(adapter.clone(), cache);

    let monday = vec![article("Day one"), article("Day two")];
    detector.group(&monday, &settings(0.8)).await.unwrap();
    assert_eq!(adapter.calls(), 1);

    // Overlapping batch in a different order: only the new pairs are compared.
    let tuesday = vec![article("Day two"), article("Day three"), article("Day one")];
    let groups = detector.group(&tuesday, &settings(0.8)).await.unwrap();
    assert_eq!(adapter.calls(), 3);
    assert_eq!(groups.len(), 2);

    // The cached confidence is reused against a stricter threshold.
    let groups = detector.group(&monday, &settings(0.95)).await.unwrap();
    assert_eq!(adapter.calls(), 3);
    assert_eq!(groups.len(), 2);
}

#[tokio::test]
async fn test_failures_are_retried_next_batch() {
    let cache = Cache::in_memory();
    let adapter = Arc::new(ScriptedAdapter::failing());
    let detector = SimilarityDetector::new(adapter.clone(), cache);
    let batch = vec![article("X"), article("Y")];

    detector.group(&batch, &settings(0.8)).await.unwrap();
    detector.group(&batch, &settings(0.8)).await.unwrap();

    assert_eq!(adapter.calls(), 2);
}

#[tokio::test]
async fn test_duplicate_articles_share_judgments() {
    let story = article("Same story");
    let other = article("Other story");
    let batch = vec![story.clone(), other.clone(), story.clone()];
    let adapter = Arc::new(judge_by_titles(&[("Same story", "Other story", 0.1)]));
    let detector = SimilarityDetector::new(adapter.clone(), Cache::in_memory());

    let groups = detector.group(&batch, &settings(0.8)).await.unwrap();

    // (0,1) and (2,1) share a key; (0,2) is the same article twice.
    assert_eq!(adapter.calls(), 1);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].member_count(), 2);
    assert_eq!(groups[0].primary_article, story);
}

#[tokio::test]
async fn test_common_topics_are_the_union() {
    let batch = vec![article("Fed holds"), article("Rates unchanged")];
    let mut topics = TopicIndex::new();
    topics.insert(batch[0].fingerprint(), vec!["interest rates".to_string(), "Federal Reserve".to_string()]);
    topics.insert(batch[1].fingerprint(), vec!["interest rates".to_string(), "markets".to_string()]);
    let adapter = judge_by_titles(&[("Fed holds", "Rates unchanged", 0.97)]);
    let detector = SimilarityDetector::new(Arc::new(adapter), Cache::in_memory());

    let groups = detector
        .group_with_topics(&batch, &topics, &settings(0.8))
        .await
        .unwrap();

    assert_eq!(groups.len(), 1);
    let expected: BTreeSet<String> = ["federal reserve", "interest rates", "markets"]
        .iter()
        .map(|t| t.to_string())
        .collect();
    assert_eq!(groups[0].common_topics, expected);
}

#[tokio::test]
async fn test_invalid_threshold_is_rejected() {
    let adapter = Arc::new(ScriptedAdapter::failing());
    let detector = SimilarityDetector::new(adapter.clone(), Cache::in_memory());

    let result = detector.group(&[article("A"), article("B")], &settings(1.2)).await;

    assert_eq!(result, Err(ConfigError::InvalidSimilarityThreshold(1.2)));
    assert_eq!(adapter.calls(), 0);
}

#[tokio::test]
async fn test_prompts_are_bounded() {
    let long = Article::new("Long one", "x".repeat(10_000), "https://news.example.com/long");
    let other = Article::new("Long two", "y".repeat(10_000), "https://news.example.com/long2");
    let adapter = Arc::new(ScriptedAdapter::new(|_| Ok(r#"{"confidence": 0.1}"#.to_string())));
    let detector = SimilarityDetector::new(adapter.clone(), Cache::in_memory());

    detector.group(&[long, other], &settings(0.8)).await.unwrap();

    let request = &adapter.requests()[0];
    assert!(request.user.len() < 1_200);
}
