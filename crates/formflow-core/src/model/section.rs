use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A titled group of questions, ordered globally by `order_index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub order_index: i64,
}
