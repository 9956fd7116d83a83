//! Rust types mirroring the compiler's JSON pipeline tree.
//!
//! Field names follow the compiler output (`Id`, `Calls`, `Bindings.List`,
//! `Tname`, `Exp`, `Kind`), so these types are the serde target for a build
//! response body.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// BUILD OUTPUT
// =============================================================================

/// Successful compile: the declarations found in the built file and its includes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileSuccess {
    #[serde(rename = "FiletypeTable", default)]
    pub filetype_table: Map<String, Value>,
    #[serde(rename = "Stages", default)]
    pub stages: Vec<Value>,
    #[serde(rename = "Pipelines", default)]
    pub pipelines: Vec<PipelineDeclaration>,
}

impl CompileSuccess {
    pub fn filetype_count(&self) -> usize {
        self.filetype_table.len()
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }
}

// =============================================================================
// DECLARATIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDeclaration {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Calls", default)]
    pub calls: Vec<CallStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallStatement {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Bindings", default)]
    pub bindings: Bindings,
}

/// The compiler wraps binding lists in an object (`{"List": [...]}`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bindings {
    #[serde(rename = "List", default)]
    pub list: Vec<BindingStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingStatement {
    /// Bound parameter id, when the compiler emits it.
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "Tname")]
    pub tname: String,
    #[serde(rename = "Exp")]
    pub exp: ValueExpression,
}

impl PipelineDeclaration {
    pub fn new(id: impl Into<String>, calls: Vec<CallStatement>) -> Self {
        PipelineDeclaration {
            id: id.into(),
            calls,
        }
    }
}

impl CallStatement {
    pub fn new(id: impl Into<String>, bindings: Vec<BindingStatement>) -> Self {
        CallStatement {
            id: id.into(),
            bindings: Bindings { list: bindings },
        }
    }
}

impl BindingStatement {
    /// Binding fed by the output of another call.
    pub fn call(tname: impl Into<String>, producer: impl Into<String>) -> Self {
        BindingStatement {
            id: None,
            tname: tname.into(),
            exp: ValueExpression::Call {
                id: producer.into(),
                output_id: None,
            },
        }
    }

    /// Binding to a literal of the given kind (`"string"`, `"int"`, ...).
    pub fn literal(tname: impl Into<String>, kind: impl Into<String>, value: Value) -> Self {
        let mut fields = Map::new();
        fields.insert("Value".to_string(), value);
        BindingStatement {
            id: None,
            tname: tname.into(),
            exp: ValueExpression::Literal {
                kind: kind.into(),
                id: None,
                fields,
            },
        }
    }
}

// =============================================================================
// VALUE EXPRESSION: tagged on `Kind`
// =============================================================================

pub const CALL_KIND: &str = "call";

/// Right-hand side of a binding.
///
/// Only `Kind == "call"` matters for graph construction; every other kind is
/// kept verbatim so the tree survives a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawValueExpression", into = "RawValueExpression")]
pub enum ValueExpression {
    Call {
        id: String,
        output_id: Option<String>,
    },
    Literal {
        kind: String,
        id: Option<String>,
        fields: Map<String, Value>,
    },
}

impl ValueExpression {
    pub fn kind(&self) -> &str {
        match self {
            ValueExpression::Call { .. } => CALL_KIND,
            ValueExpression::Literal { kind, .. } => kind,
        }
    }

    /// Id of the producing call, if this expression reads another call's output.
    pub fn producer(&self) -> Option<&str> {
        match self {
            ValueExpression::Call { id, .. } => Some(id),
            ValueExpression::Literal { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawValueExpression {
    #[serde(rename = "Kind")]
    kind: String,
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

const OUTPUT_ID_FIELD: &str = "OutputId";

impl TryFrom<RawValueExpression> for ValueExpression {
    type Error = String;

    fn try_from(mut raw: RawValueExpression) -> Result<Self, Self::Error> {
        if raw.kind != CALL_KIND {
            return Ok(ValueExpression::Literal {
                kind: raw.kind,
                id: raw.id,
                fields: raw.fields,
            });
        }

        let id = raw
            .id
            .ok_or_else(|| "value expression of kind 'call' is missing 'Id'".to_string())?;
        let output_id = match raw.fields.remove(OUTPUT_ID_FIELD) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        Ok(ValueExpression::Call { id, output_id })
    }
}

impl From<ValueExpression> for RawValueExpression {
    fn from(exp: ValueExpression) -> Self {
        match exp {
            ValueExpression::Call { id, output_id } => {
                let mut fields = Map::new();
                if let Some(output_id) = output_id {
                    fields.insert(OUTPUT_ID_FIELD.to_string(), Value::String(output_id));
                }
                RawValueExpression {
                    kind: CALL_KIND.to_string(),
                    id: Some(id),
                    fields,
                }
            }
            ValueExpression::Literal { kind, id, fields } => {
                RawValueExpression { kind, id, fields }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn call_expression_decodes_producer_and_output() {
        let exp: ValueExpression =
            serde_json::from_value(json!({"Kind": "call", "Id": "SORT", "OutputId": "bam"}))
                .unwrap();
        assert_eq!(exp.producer(), Some("SORT"));
        assert_eq!(
            exp,
            ValueExpression::Call {
                id: "SORT".into(),
                output_id: Some("bam".into())
            }
        );
    }

    #[test]
    fn literal_expression_keeps_its_fields() {
        let exp: ValueExpression =
            serde_json::from_value(json!({"Kind": "int", "Value": 7})).unwrap();
        assert_eq!(exp.kind(), "int");
        assert_eq!(exp.producer(), None);

        let back = serde_json::to_value(&exp).unwrap();
        assert_eq!(back, json!({"Kind": "int", "Value": 7}));
    }

    #[test]
    fn call_without_id_is_rejected() {
        let result = serde_json::from_value::<ValueExpression>(json!({"Kind": "call"}));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("missing 'Id'"), "unexpected error: {}", err);
    }

    #[test]
    fn missing_bindings_default_to_empty() {
        let call: CallStatement = serde_json::from_value(json!({"Id": "ALIGN"})).unwrap();
        assert!(call.bindings.list.is_empty());
    }
}
