//! Symbol comments, votes, follows and the forum

use bullboard_domain::constants::paths;
use bullboard_domain::{
    ApiError, Comment, FollowStatus, ForumThread, NewComment, NewReply, NewThread, Reply,
    VoteDirection, VoteRequest, VoteSummary,
};
use tracing::{debug, instrument};
use urlencoding::encode;

use super::client::ApiClient;

/// Social endpoints
#[derive(Clone)]
pub struct SocialApi {
    client: ApiClient,
}

impl SocialApi {
    /// Social endpoints over `client`
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // === Comments ===

    /// Comments on a symbol, newest first
    ///
    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn comments(&self, symbol: &str) -> Result<Vec<Comment>, ApiError> {
        self.client.get(&symbol_comments_path(symbol)).await
    }

    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self, body))]
    pub async fn post_comment(&self, symbol: &str, body: &str) -> Result<Comment, ApiError> {
        let request = NewComment { body: body.to_string() };
        let comment: Comment = self.client.post(&symbol_comments_path(symbol), &request).await?;

        debug!(comment_id = %comment.id, "Comment posted");
        Ok(comment)
    }

    /// Up- or down-vote a comment; returns the updated tally.
    ///
    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn vote(
        &self,
        comment_id: &str,
        direction: VoteDirection,
    ) -> Result<VoteSummary, ApiError> {
        let path = format!("{}/{}/vote", paths::SOCIAL_COMMENTS, encode(comment_id));
        self.client.post(&path, &VoteRequest { direction }).await
    }

    // === Follows ===

    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn follow(&self, user_id: &str) -> Result<FollowStatus, ApiError> {
        self.client.post(&follow_path(user_id), &serde_json::json!({})).await
    }

    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn unfollow(&self, user_id: &str) -> Result<FollowStatus, ApiError> {
        self.client.delete(&follow_path(user_id)).await
    }

    // === Forum ===

    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn threads(&self) -> Result<Vec<ForumThread>, ApiError> {
        self.client.get(paths::FORUM_THREADS).await
    }

    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self, thread), fields(title = %thread.title))]
    pub async fn create_thread(&self, thread: &NewThread) -> Result<ForumThread, ApiError> {
        self.client.post(paths::FORUM_THREADS, thread).await
    }

    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn replies(&self, thread_id: &str) -> Result<Vec<Reply>, ApiError> {
        self.client.get(&replies_path(thread_id)).await
    }

    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self, body))]
    pub async fn post_reply(&self, thread_id: &str, body: &str) -> Result<Reply, ApiError> {
        let request = NewReply { body: body.to_string() };
        self.client.post(&replies_path(thread_id), &request).await
    }
}

fn symbol_comments_path(symbol: &str) -> String {
    format!("{}/{}/comments", paths::SOCIAL_SYMBOLS, encode(symbol))
}

fn follow_path(user_id: &str) -> String {
    format!("{}/{}/follow", paths::SOCIAL_USERS, encode(user_id))
}

fn replies_path(thread_id: &str) -> String {
    format!("{}/{}/replies", paths::FORUM_THREADS, encode(thread_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_percent_encoded() {
        assert_eq!(symbol_comments_path("BTC/USD"), "/api/v1/social/symbols/BTC%2FUSD/comments");
        assert_eq!(follow_path("u 1"), "/api/v1/social/users/u%201/follow");
        assert_eq!(replies_path("42"), "/api/v1/forum/threads/42/replies");
    }
}
