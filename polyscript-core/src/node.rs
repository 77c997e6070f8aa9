//! The language-neutral semantic node

use crate::action::{Action, NodeKind, Role};
use crate::value::SemanticValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Wire-stable intermediate form produced by the matcher and consumed by the
/// renderer and by downstream code generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticNode {
    pub action: Action,
    #[serde(default)]
    pub roles: IndexMap<Role, SemanticValue>,
    /// Handler steps for `on`, chained steps for `compound`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<SemanticNode>,
}

impl SemanticNode {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            roles: IndexMap::new(),
            body: Vec::new(),
        }
    }

    /// Compound node over the given steps.
    pub fn compound(steps: Vec<SemanticNode>) -> Self {
        Self {
            action: Action::Compound,
            roles: IndexMap::new(),
            body: steps,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.action.kind()
    }

    /// Builder-style role assignment. A repeated role replaces the earlier value.
    pub fn with_role(mut self, role: Role, value: SemanticValue) -> Self {
        self.roles.insert(role, value);
        self
    }

    pub fn with_body(mut self, body: Vec<SemanticNode>) -> Self {
        self.body = body;
        self
    }

    pub fn role(&self, role: Role) -> Option<&SemanticValue> {
        self.roles.get(&role)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains_key(&role)
    }

    /// Role names in insertion order.
    pub fn role_names(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.keys().copied()
    }

    /// Structured (JSON) form.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}
