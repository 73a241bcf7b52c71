use crate::domain::content::PageContent;
use crate::editor::SectionOp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePageRequest {
    #[serde(default)]
    pub expected_version: i64,
    pub content: PageContent,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePageResponse {
    pub version: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationsRequest {
    #[serde(default)]
    pub expected_version: i64,
    pub operations: Vec<SectionOp>,
}
