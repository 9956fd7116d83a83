//! Backend collaborator contract: file listing, load, build and save.
//!
//! Transport is the implementor's business. The build response is decoded
//! into a `BuildResult` here, once, and never re-inspected downstream.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::ast::CompileSuccess;
use crate::error::{Result, TransportError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileEntry {
    #[serde(rename = "mroPath")]
    pub mro_path: String,
    pub fname: String,
}

impl FileEntry {
    pub fn new(mro_path: impl Into<String>, fname: impl Into<String>) -> Self {
        FileEntry {
            mro_path: mro_path.into(),
            fname: fname.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeFile {
    pub mro_path: String,
    pub name: String,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedFile {
    pub contents: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_file: Option<IncludeFile>,
}

/// Outcome of a build request that reached the compiler.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildResult {
    CompileError { message: String },
    CompileSuccess(CompileSuccess),
}

/// Wire shape: a bare string is a diagnostic, an object is the pipeline tree.
#[derive(Deserialize)]
#[serde(untagged)]
enum BuildResponse {
    Diagnostic(String),
    Tree(CompileSuccess),
}

impl From<BuildResponse> for BuildResult {
    fn from(response: BuildResponse) -> Self {
        match response {
            BuildResponse::Diagnostic(message) => BuildResult::CompileError { message },
            BuildResponse::Tree(success) => BuildResult::CompileSuccess(success),
        }
    }
}

impl BuildResult {
    /// Decode a build response body.
    pub fn from_json(body: &str) -> Result<Self> {
        let response: BuildResponse = serde_json::from_str(body)?;
        Ok(response.into())
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let response: BuildResponse = serde_json::from_value(value)?;
        Ok(response.into())
    }
}

/// Asynchronous backend. Every call may fail at the transport level.
pub trait Backend {
    fn list_files(
        &self,
    ) -> impl Future<Output = std::result::Result<Vec<FileEntry>, TransportError>>;

    fn load_file(
        &self,
        file: &FileEntry,
    ) -> impl Future<Output = std::result::Result<LoadedFile, TransportError>>;

    fn build(
        &self,
        file: &FileEntry,
    ) -> impl Future<Output = std::result::Result<BuildResult, TransportError>>;

    fn save(
        &self,
        file: &FileEntry,
        contents: &str,
    ) -> impl Future<Output = std::result::Result<(), TransportError>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_body_is_compile_error() {
        let result = BuildResult::from_json(r#""Parse error on line 5: bad token""#).unwrap();
        assert_eq!(
            result,
            BuildResult::CompileError {
                message: "Parse error on line 5: bad token".into()
            }
        );
    }

    #[test]
    fn object_body_is_compile_success() {
        let result = BuildResult::from_value(json!({
            "FiletypeTable": {"bam": {}},
            "Stages": [],
            "Pipelines": [{"Id": "P", "Calls": [{"Id": "A", "Bindings": {"List": []}}]}]
        }))
        .unwrap();
        let BuildResult::CompileSuccess(success) = result else {
            panic!("expected success, got {:?}", result);
        };
        assert_eq!(success.filetype_count(), 1);
        assert_eq!(success.pipelines[0].calls[0].id, "A");
    }

    #[test]
    fn other_shapes_are_decode_errors() {
        assert!(BuildResult::from_json("42").is_err());
        assert!(BuildResult::from_json("[1, 2]").is_err());
    }

    #[test]
    fn load_response_with_include() {
        let loaded: LoadedFile = serde_json::from_value(json!({
            "contents": "pipeline P() {}",
            "includeFile": {"mroPath": "/inc", "name": "_types.mro", "contents": "filetype bam;"}
        }))
        .unwrap();
        assert_eq!(loaded.include_file.unwrap().name, "_types.mro");
    }

    #[test]
    fn file_entry_uses_wire_names() {
        let entry = FileEntry::new("/mro", "a.mro");
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({"mroPath": "/mro", "fname": "a.mro"})
        );
    }
}
