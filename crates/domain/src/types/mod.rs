//! Domain types and models
//!
//! - `request` / `credentials`: what the request pipeline consumes
//! - `envelope`: the `{success, data, message}` wrapper used by the API
//! - the remaining modules: payloads of the individual endpoint groups

pub mod auth;
pub mod credentials;
pub mod envelope;
pub mod market;
pub mod profile;
pub mod quiz;
pub mod request;
pub mod social;

pub use auth::{RegisterRequest, RegisterResponse, ResendCodeRequest, TokenPair, VerifyRequest};
pub use credentials::Credentials;
pub use envelope::{ApiEnvelope, ErrorBody, MessageResponse};
pub use market::{Bar, Candle, Quote, Snapshot, SymbolInfo, Timeframe};
pub use profile::{PhotoUpload, ProfileUpdate, UserProfile};
pub use quiz::{QuizAnswer, QuizOption, QuizQuestion, QuizResult, QuizStatus, QuizSubmission};
pub use request::{HttpMethod, RequestSpec};
pub use social::{
    Comment, FollowStatus, ForumThread, NewComment, NewReply, NewThread, Reply, VoteDirection,
    VoteRequest, VoteSummary,
};
