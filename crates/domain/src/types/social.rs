//! Symbol comments, votes, follows and forum threads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_wire_enum_conversions;

/// Direction of a comment vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl_wire_enum_conversions!(VoteDirection {
    Up => "up",
    Down => "down",
});

/// Body of a vote request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub direction: VoteDirection,
}

/// Vote counts on a comment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSummary {
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub downvotes: i64,
    /// The signed-in user's vote, if any
    #[serde(default, alias = "userVote")]
    pub user_vote: Option<VoteDirection>,
}

/// Comment posted on a symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub symbol: Option<String>,
    pub author: String,
    pub body: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub votes: VoteSummary,
}

/// Body of a new comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub body: String,
}

/// Follow state after a follow or unfollow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowStatus {
    #[serde(alias = "isFollowing")]
    pub following: bool,
    #[serde(default, alias = "followerCount")]
    pub follower_count: Option<u64>,
}

/// Forum thread summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumThread {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, alias = "replyCount")]
    pub reply_count: u64,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of a new forum thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewThread {
    pub title: String,
    pub body: String,
}

/// Reply in a forum thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,
    pub author: String,
    pub body: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of a new reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReply {
    pub body: String,
}
