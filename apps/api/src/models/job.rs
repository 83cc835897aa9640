use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobDescription {
    pub title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub raw_text: String,
}

/// One extracted duty/requirement. `index` is the 0-based position in document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Responsibility {
    pub index: usize,
    pub text: String,
}
