use serde::{Deserialize, Serialize};

/// A document as stored in a Haven OnDemand text index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub title: String,
    /// Unique reference of the document; the uploaded file name.
    pub reference: String,
    pub content: String,
}

/// Body of the `json` parameter of the add-to-index endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddToIndexPayload {
    pub document: Vec<IndexDocument>,
}

impl AddToIndexPayload {
    pub fn single(title: &str, reference: &str, content: &str) -> Self {
        Self {
            document: vec![IndexDocument {
                title: title.to_string(),
                reference: reference.to_string(),
                content: content.to_string(),
            }],
        }
    }
}

/// Response of the query text index endpoint. Only the fields rendered back
/// to users are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub documents: Vec<QueryHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Response of the list resources endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceList {
    #[serde(default)]
    pub private_resources: Vec<Resource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    pub resource: String,
}
