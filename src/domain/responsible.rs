use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// A person or entity that spending can be attributed to, independent of
/// the paying account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Responsible {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub owner_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Responsible {
    pub fn new(owner_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            color: None,
            is_active: true,
        }
    }
}

impl Identifiable for Responsible {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Responsible {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Activatable for Responsible {
    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl Displayable for Responsible {
    fn display_label(&self) -> String {
        self.name.clone()
    }
}
