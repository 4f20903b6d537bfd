//! Scenario model and builder.
//!
//! Documents decode into these types directly:
//!
//! ```yaml
//! tests:
//!   - name: ...
//!     arrange: [{statement: ...}]
//!     act: {method: ..., arguments: [{type: ..., value: ...}]}
//!     assert: [{value: ...} | {error: ...} | {query: ..., rows: [...]}]
//! ```

use dbtest_construct::TypedValue;
use serde::{Deserialize, Serialize};

/// A batch of scenarios, the top level of a scenario document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TestSet {
    #[serde(default)]
    pub tests: Vec<Scenario>,
}

impl TestSet {
    pub fn new(tests: Vec<Scenario>) -> Self {
        Self { tests }
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

/// A complete test scenario.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name (for reporting).
    pub name: String,
    /// Statements run before the act step, in order.
    #[serde(default)]
    pub arrange: Vec<Statement>,
    pub act: Act,
    /// Checks against the act outcome, in order.
    #[serde(default)]
    pub assert: Vec<Assertion>,
}

impl Scenario {
    /// Create a new scenario with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an arrange statement.
    pub fn arrange(mut self, statement: impl Into<String>) -> Self {
        self.arrange.push(Statement::new(statement));
        self
    }

    /// Set the method to call and its arguments.
    pub fn act(mut self, method: impl Into<String>, arguments: Vec<TypedValue>) -> Self {
        self.act = Act {
            method: method.into(),
            arguments,
        };
        self
    }

    /// Add an assertion.
    pub fn assert(mut self, assertion: Assertion) -> Self {
        self.assert.push(assertion);
        self
    }
}

/// An arrange statement, executed verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Statement {
    pub statement: String,
}

impl Statement {
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
        }
    }
}

/// The method call under test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Act {
    pub method: String,
    /// Arguments, excluding the receiver.
    #[serde(default)]
    pub arguments: Vec<TypedValue>,
}

/// One check against the act outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AssertionDoc", into = "AssertionDoc")]
pub enum Assertion {
    /// The method fails with exactly this message.
    Error(String),
    /// The query yields exactly these rows, in order.
    Query {
        query: String,
        rows: Vec<ExpectedRow>,
    },
    /// The method returns this value.
    Value(TypedValue),
}

impl Assertion {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn query(query: impl Into<String>, rows: Vec<ExpectedRow>) -> Self {
        Self::Query {
            query: query.into(),
            rows,
        }
    }

    pub fn value(expected: TypedValue) -> Self {
        Self::Value(expected)
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Error(_) => "error",
            Self::Query { .. } => "query",
            Self::Value(_) => "value",
        }
    }
}

/// The document shape of an assertion: every key optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AssertionDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<TypedValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    rows: Vec<ExpectedRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// An empty `error` or `query` counts as absent; `error` wins over `query`,
// which wins over `value`.
impl From<AssertionDoc> for Assertion {
    fn from(doc: AssertionDoc) -> Self {
        if let Some(error) = doc.error.filter(|e| !e.is_empty()) {
            return Self::Error(error);
        }
        if let Some(query) = doc.query.filter(|q| !q.is_empty()) {
            return Self::Query {
                query,
                rows: doc.rows,
            };
        }
        Self::Value(doc.value.unwrap_or_default())
    }
}

impl From<Assertion> for AssertionDoc {
    fn from(assertion: Assertion) -> Self {
        match assertion {
            Assertion::Error(error) => Self {
                error: Some(error),
                ..Self::default()
            },
            Assertion::Query { query, rows } => Self {
                query: Some(query),
                rows,
                ..Self::default()
            },
            Assertion::Value(value) => Self {
                value: Some(value),
                ..Self::default()
            },
        }
    }
}

/// Expected columns of one result row, positionally.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpectedRow {
    #[serde(default)]
    pub columns: Vec<TypedValue>,
}

impl ExpectedRow {
    pub fn new(columns: Vec<TypedValue>) -> Self {
        Self { columns }
    }
}
