//! Search Module Tests
//!
//! Validates ranked retrieval: ordering, tie-breaking, limit handling,
//! normalization, and argument validation.

#[cfg(test)]
mod tests {
    use crate::analysis::aggregator::aggregate;
    use crate::error::Error;
    use crate::search::engine::search;
    use crate::store::{occurrences, paragraphs, schema, submitters};
    use sqlx::{Pool, Sqlite};
    use uuid::Uuid;

    async fn test_pool() -> (Pool<Sqlite>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = schema::connect(&dir.path().join("test.db")).await.unwrap();
        schema::init_schema(&pool).await.unwrap();
        submitters::upsert(&pool, "user-1", "Alice").await.unwrap();
        (pool, dir)
    }

    /// Creates a paragraph and a stored occurrence of `word` with `count`.
    async fn seed_occurrence(pool: &Pool<Sqlite>, word: &str, count: i64) -> Uuid {
        let para = paragraphs::insert(pool, "user-1", &format!("seed for {}", word))
            .await
            .unwrap();
        occurrences::insert_if_absent(pool, para.id, word, count)
            .await
            .unwrap();
        para.id
    }

    // ============================================================
    // RANKING ORDER
    // ============================================================

    #[tokio::test]
    async fn test_orders_by_count_desc_with_id_tiebreak() {
        let (pool, _dir) = test_pool().await;

        let id_count5_a = seed_occurrence(&pool, "python", 5).await;
        let id_count3 = seed_occurrence(&pool, "python", 3).await;
        let id_count5_b = seed_occurrence(&pool, "python", 5).await;
        let _id_count1 = seed_occurrence(&pool, "python", 1).await;

        let results = search(&pool, "python", Some(3)).await.unwrap();
        assert_eq!(results.len(), 3);

        // Both count-5 rows first, tie broken by ascending paragraph id
        let mut tied = [id_count5_a, id_count5_b];
        tied.sort_by_key(|id| id.to_string());

        assert_eq!(results[0].paragraph_id, tied[0]);
        assert_eq!(results[0].word_count, 5);
        assert_eq!(results[1].paragraph_id, tied[1]);
        assert_eq!(results[1].word_count, 5);
        assert_eq!(results[2].paragraph_id, id_count3);
        assert_eq!(results[2].word_count, 3);
    }

    #[tokio::test]
    async fn test_results_are_reproducible() {
        let (pool, _dir) = test_pool().await;
        for _ in 0..5 {
            seed_occurrence(&pool, "tie", 7).await;
        }

        let first = search(&pool, "tie", None).await.unwrap();
        let second = search(&pool, "tie", None).await.unwrap();

        let first_ids: Vec<Uuid> = first.iter().map(|r| r.paragraph_id).collect();
        let second_ids: Vec<Uuid> = second.iter().map(|r| r.paragraph_id).collect();
        assert_eq!(first_ids, second_ids);
    }

    // ============================================================
    // LIMIT HANDLING
    // ============================================================

    #[tokio::test]
    async fn test_default_limit_is_ten() {
        let (pool, _dir) = test_pool().await;
        for count in 1..=12 {
            seed_occurrence(&pool, "common", count).await;
        }

        let results = search(&pool, "common", None).await.unwrap();
        assert_eq!(results.len(), 10);
        assert_eq!(results[0].word_count, 12, "highest counts survive the cut");
    }

    #[tokio::test]
    async fn test_zero_limit_is_invalid_argument() {
        let (pool, _dir) = test_pool().await;

        let result = search(&pool, "python", Some(0)).await;
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    // ============================================================
    // NORMALIZATION
    // ============================================================

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (pool, _dir) = test_pool().await;
        let para = paragraphs::insert(&pool, "user-1", "Python is Python")
            .await
            .unwrap();
        aggregate(&pool, para.id).await.unwrap();

        // Indexed as lowercase "python"; query arrives uppercase
        let results = search(&pool, "PYTHON", None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].paragraph_id, para.id);
        assert_eq!(results[0].word_count, 2);
        assert_eq!(results[0].submitter_name, "Alice");
    }

    #[tokio::test]
    async fn test_search_trims_whitespace() {
        let (pool, _dir) = test_pool().await;
        seed_occurrence(&pool, "rust", 1).await;

        let results = search(&pool, "  rust  ", None).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_short_word_is_invalid_argument() {
        let (pool, _dir) = test_pool().await;

        assert!(matches!(
            search(&pool, "x", None).await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            search(&pool, "  ", None).await,
            Err(Error::InvalidArgument(_))
        ));
    }

    // ============================================================
    // RESULT CONTENT
    // ============================================================

    #[tokio::test]
    async fn test_no_matches_yields_empty_results() {
        let (pool, _dir) = test_pool().await;
        seed_occurrence(&pool, "rust", 1).await;

        let results = search(&pool, "golang", None).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_raw_text_preview_is_capped() {
        let (pool, _dir) = test_pool().await;
        let long_text = format!("keyword {}", "filler ".repeat(200));
        let para = paragraphs::insert(&pool, "user-1", &long_text).await.unwrap();
        aggregate(&pool, para.id).await.unwrap();

        let results = search(&pool, "keyword", None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].raw_text.chars().count(), 500);
    }
}
