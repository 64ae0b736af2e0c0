//! List domain entity

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// A to-do list; owns its items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: u32,
}

impl Entity for List {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl List {
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    /// Canonical URL of the list's page
    pub fn url(&self) -> String {
        format!("/lists/{}/", self.id)
    }
}
