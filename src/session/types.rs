use serde::{Deserialize, Serialize};

/// Identity embedded in the session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenUser {
    pub id: String,
    pub role: String,
}
