//! Aggregate statistics over a search result set
//!
//! Pure functions, recomputed after every successful search and never
//! persisted. They accept anything that exposes a [`Repository`], so raw API
//! items and decorated results both work.

use std::collections::HashMap;

use crate::models::{LanguageStats, Repository, SearchMetrics};

/// Shown as the most popular language when no result has one
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Per-language counts, sorted by count descending.
///
/// Repositories without a language are left out of the grouping but still
/// count towards the percentage denominator. Ties keep first-seen order.
pub fn calculate_language_stats<R: AsRef<Repository>>(repositories: &[R]) -> Vec<LanguageStats> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<LanguageStats> = Vec::new();

    for repo in repositories {
        let repo = repo.as_ref();
        let Some(language) = repo.language.as_deref().filter(|l| !l.is_empty()) else {
            continue;
        };

        match index.get(language) {
            Some(&i) => {
                stats[i].count += 1;
                stats[i].total_stars += repo.stargazers_count;
            }
            None => {
                index.insert(language, stats.len());
                stats.push(LanguageStats {
                    language: language.to_string(),
                    count: 1,
                    percentage: 0,
                    total_stars: repo.stargazers_count,
                });
            }
        }
    }

    let total = repositories.len();
    for entry in &mut stats {
        entry.percentage = ((entry.count as f64 / total as f64) * 100.0).round() as u32;
    }

    // Stable sort keeps first-seen order among equal counts
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// Summary metrics for a result set; `search_time_ms` is passed through verbatim
pub fn calculate_search_metrics<R: AsRef<Repository>>(
    repositories: &[R],
    search_time_ms: u64,
) -> SearchMetrics {
    let language_stats = calculate_language_stats(repositories);
    let total_stars: u64 = repositories.iter().map(|r| r.as_ref().stargazers_count).sum();
    let total_forks: u64 = repositories.iter().map(|r| r.as_ref().forks_count).sum();

    SearchMetrics {
        total_repositories: repositories.len(),
        unique_languages: language_stats.len(),
        most_popular_language: language_stats
            .first()
            .map(|s| s.language.clone())
            .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string()),
        average_stars: rounded_mean(total_stars, repositories.len()),
        average_forks: rounded_mean(total_forks, repositories.len()),
        search_time: search_time_ms,
    }
}

fn rounded_mean(total: u64, count: usize) -> u64 {
    if count == 0 {
        return 0;
    }
    (total as f64 / count as f64).round() as u64
}

/// "850ms" below one second, "1.23s" otherwise
pub fn format_search_time(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.2}s", ms as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(language: Option<&str>, stars: u64, forks: u64) -> Repository {
        Repository {
            id: stars,
            name: "r".to_string(),
            full_name: "o/r".to_string(),
            description: None,
            html_url: "https://github.com/o/r".to_string(),
            clone_url: String::new(),
            owner: Default::default(),
            stargazers_count: stars,
            forks_count: forks,
            watchers_count: 0,
            open_issues_count: 0,
            language: language.map(str::to_string),
            license: None,
            topics: Vec::new(),
            size: 0,
            default_branch: None,
            archived: false,
            disabled: false,
            private: false,
            created_at: None,
            updated_at: None,
            pushed_at: None,
        }
    }

    #[test]
    fn test_language_stats_sorted_with_rounded_percentages() {
        let repos = vec![
            repo(Some("TypeScript"), 10, 0),
            repo(Some("TypeScript"), 20, 0),
            repo(Some("Go"), 5, 0),
        ];

        let stats = calculate_language_stats(&repos);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].language, "TypeScript");
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].percentage, 67);
        assert_eq!(stats[0].total_stars, 30);
        assert_eq!(stats[1].language, "Go");
        assert_eq!(stats[1].count, 1);
        assert_eq!(stats[1].percentage, 33);
    }

    #[test]
    fn test_language_less_repos_count_in_denominator() {
        let repos = vec![repo(Some("Rust"), 1, 0), repo(None, 1, 0), repo(None, 1, 0), repo(None, 1, 0)];

        let stats = calculate_language_stats(&repos);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].percentage, 25);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let repos = vec![repo(Some("C"), 1, 0), repo(Some("Zig"), 1, 0), repo(Some("Ada"), 1, 0)];

        let languages: Vec<_> =
            calculate_language_stats(&repos).into_iter().map(|s| s.language).collect();
        assert_eq!(languages, vec!["C", "Zig", "Ada"]);
    }

    #[test]
    fn test_empty_set_metrics() {
        let repos: Vec<Repository> = Vec::new();

        let metrics = calculate_search_metrics(&repos, 123);

        assert_eq!(metrics.total_repositories, 0);
        assert_eq!(metrics.unique_languages, 0);
        assert_eq!(metrics.most_popular_language, "Unknown");
        assert_eq!(metrics.average_stars, 0);
        assert_eq!(metrics.average_forks, 0);
        assert_eq!(metrics.search_time, 123);
    }

    #[test]
    fn test_metrics_means_are_rounded() {
        let repos = vec![repo(Some("Go"), 1, 1), repo(Some("Go"), 2, 2)];

        let metrics = calculate_search_metrics(&repos, 0);

        // 1.5 rounds up
        assert_eq!(metrics.average_stars, 2);
        assert_eq!(metrics.average_forks, 2);
        assert_eq!(metrics.most_popular_language, "Go");
        assert_eq!(metrics.unique_languages, 1);
    }

    #[test]
    fn test_all_language_less_is_unknown() {
        let repos = vec![repo(None, 10, 4), repo(None, 20, 6)];

        let metrics = calculate_search_metrics(&repos, 5);

        assert_eq!(metrics.most_popular_language, "Unknown");
        assert_eq!(metrics.unique_languages, 0);
        assert_eq!(metrics.average_stars, 15);
        assert_eq!(metrics.average_forks, 5);
    }

    #[test]
    fn test_format_search_time() {
        assert_eq!(format_search_time(0), "0ms");
        assert_eq!(format_search_time(999), "999ms");
        assert_eq!(format_search_time(1000), "1.00s");
        assert_eq!(format_search_time(1234), "1.23s");
    }
}
