use crate::post::Post;

/// Pick the post with the highest likes + retweets.
///
/// Ties go to the earliest post in `posts`. Returns `None` for an empty slice.
pub fn select(posts: &[Post]) -> Option<&Post> {
    posts.iter().fold(None, |best: Option<&Post>, post| match best {
        Some(b) if b.engagement.score() >= post.engagement.score() => Some(b),
        _ => Some(post),
    })
}
