//! Assertions over aggregation results

use super::fixtures::Dataset;
use post_aggregator::PostWithComments;

/// Check that `results` is exactly `dataset`, fully annotated and in source order
pub fn assert_matches_dataset(results: &[PostWithComments], dataset: &Dataset) {
    assert_eq!(results.len(), dataset.posts.len(), "post count differs");

    for (assembled, source) in results.iter().zip(&dataset.posts) {
        let post = &assembled.post;
        assert_eq!(post.id.get(), source["id"].as_i64().unwrap_or_default());
        assert_eq!(post.content, source["content"].as_str().unwrap_or_default());
        assert_author(post.author_id.get(), &post.author.name, post.author.id.get(), dataset);

        let expected_comments = &dataset.comments[&post.id.get()];
        assert_eq!(
            assembled.comments.len(),
            expected_comments.len(),
            "comment count differs for post {}",
            post.id
        );
        for (comment, source) in assembled.comments.iter().zip(expected_comments) {
            assert_eq!(comment.id.get(), source["id"].as_i64().unwrap_or_default());
            assert_eq!(comment.post_id, post.id);
            assert_author(
                comment.author_id.get(),
                &comment.author.name,
                comment.author.id.get(),
                dataset,
            );
        }
    }
}

fn assert_author(expected_id: i64, name: &str, actual_id: i64, dataset: &Dataset) {
    assert_eq!(actual_id, expected_id, "author attached to the wrong record");
    assert_eq!(
        Some(name),
        dataset.authors[&expected_id]["name"].as_str(),
        "wrong name for author {expected_id}"
    );
}
