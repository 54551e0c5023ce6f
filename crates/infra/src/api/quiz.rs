//! Investor-profile quiz

use bullboard_domain::constants::paths;
use bullboard_domain::{ApiError, QuizQuestion, QuizResult, QuizStatus, QuizSubmission};
use tracing::instrument;

use super::client::ApiClient;

/// Quiz endpoints
#[derive(Clone)]
pub struct QuizApi {
    client: ApiClient,
}

impl QuizApi {
    /// Quiz endpoints over `client`
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn questions(&self) -> Result<Vec<QuizQuestion>, ApiError> {
        self.client.get(paths::QUIZ_QUESTIONS).await
    }

    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip_all, fields(answers = submission.answers.len()))]
    pub async fn submit(&self, submission: &QuizSubmission) -> Result<QuizResult, ApiError> {
        self.client.post(paths::QUIZ_SUBMIT, submission).await
    }

    /// Whether the signed-in user has completed the quiz
    ///
    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn status(&self) -> Result<QuizStatus, ApiError> {
        self.client.get(paths::QUIZ_STATUS).await
    }
}
