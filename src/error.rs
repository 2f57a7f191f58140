//! Fatal error taxonomy. Construction failures (`DataError`) abort the
//! affected package; evaluation failures (`EvalError`) mean the data uses a
//! rule combination this engine does not cover. Constraint violations are
//! not errors in this sense; they accumulate on instances as diagnostics.

use thiserror::Error;

use crate::ident::Identifier;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("received a <{found}> element, expected <{expected}>")]
    UnexpectedNode {
        expected: &'static str,
        found: String,
    },

    #[error("missing attribute `{attribute}` on <{element}>")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("attribute `{attribute}` on <{element}>: `{value}` is not a valid {expected}")]
    InvalidValue {
        element: String,
        attribute: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("dangling reference: no shared {kind} with id {id}")]
    DanglingReference { kind: &'static str, id: Identifier },

    #[error("data index has no game system entry")]
    MissingGameSystem,

    #[error("malformed document: no root element")]
    MissingRoot,

    #[error("malformed document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("unhandled condition on field `{field}` with scope `{scope}` for child {child_id}")]
    UnhandledCondition {
        field: String,
        scope: String,
        child_id: Identifier,
    },

    #[error("unhandled comparator `{comparator}` on field `{field}` with scope `{scope}`")]
    UnhandledComparator {
        comparator: &'static str,
        field: String,
        scope: String,
    },

    #[error("modifier references {id} but the target has no constraint or cost with that id")]
    UnknownModifierTarget { id: Identifier },

    #[error("modifier operation `{operation}` on field `{field}` is not implemented")]
    UnimplementedModifier {
        operation: &'static str,
        field: String,
    },

    #[error("scope `{0}` not handled in constraint")]
    UnhandledScope(String),
}
