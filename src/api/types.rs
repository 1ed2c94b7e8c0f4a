// src/api/types.rs

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatInput {
    /// A missing field is treated like a blank message.
    #[serde(default)]
    pub message: String,
}

/// Successful chat reply.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
