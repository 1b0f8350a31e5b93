//! Mock similarity scores
//!
//! Every score here is uniform random noise in `[80, 100]`. Nothing is compared
//! against any reference corpus; the numbers only exist so result lists and
//! exports have something to display.

use rand::Rng;

use crate::models::{EnhancedRepository, Repository, SimilarityMetrics};

const MIN_SCORE: u8 = 80;
const MAX_SCORE: u8 = 100;

pub fn generate_similarity_metrics<R: Rng + ?Sized>(rng: &mut R) -> SimilarityMetrics {
    let mut score = || rng.gen_range(MIN_SCORE..=MAX_SCORE);

    let content_similarity = score();
    let requirement_similarity = score();
    let working_similarity = score();
    let purpose_similarity = score();
    let semantic_similarity = score();

    let sum = u16::from(content_similarity)
        + u16::from(requirement_similarity)
        + u16::from(working_similarity)
        + u16::from(purpose_similarity)
        + u16::from(semantic_similarity);

    SimilarityMetrics {
        content_similarity,
        requirement_similarity,
        working_similarity,
        purpose_similarity,
        semantic_similarity,
        // Floor of the mean; at most 100 so the cast cannot truncate
        overall_similarity: (sum / 5) as u8,
    }
}

/// Decorate raw search items with mock similarity scores and download links
pub fn enhance_repositories<R: Rng + ?Sized>(
    repositories: Vec<Repository>,
    rng: &mut R,
) -> Vec<EnhancedRepository> {
    repositories
        .into_iter()
        .map(|repository| EnhancedRepository {
            similarity: generate_similarity_metrics(rng),
            download_urls: repository.download_urls(),
            repository,
        })
        .collect()
}
