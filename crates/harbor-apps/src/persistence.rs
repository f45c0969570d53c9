//! Read-side persistence contract for installed apps.
//!
//! The ingestion pipeline never touches durable storage; installed apps
//! do, through accessors scoped to their own identity. The host
//! supplies a [`PersistenceBridge`], and [`PersistenceRead`] narrows it
//! to a single app.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An association key used to group persisted records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationRecord {
    /// What kind of thing the record is associated with.
    pub model: String,

    /// Identifier of the associated thing.
    pub id: String,
}

impl AssociationRecord {
    pub fn new(model: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            id: id.into(),
        }
    }
}

/// Host-side storage bridge; every call is scoped by the app's id.
pub trait PersistenceBridge {
    /// Read a single record by its id.
    fn read_by_id(&self, id: &str, app_id: &str) -> Option<Value>;

    /// Read all records matching every given association.
    fn read_by_associations(
        &self,
        associations: &[AssociationRecord],
        app_id: &str,
    ) -> Vec<Value>;
}

/// Read accessor handed to a single installed app.
pub struct PersistenceRead<'a> {
    bridge: &'a dyn PersistenceBridge,
    app_id: String,
}

impl<'a> PersistenceRead<'a> {
    pub fn new(bridge: &'a dyn PersistenceBridge, app_id: impl Into<String>) -> Self {
        Self {
            bridge,
            app_id: app_id.into(),
        }
    }

    /// Read a single record by its id.
    #[must_use]
    pub fn read(&self, id: &str) -> Option<Value> {
        self.bridge.read_by_id(id, &self.app_id)
    }

    /// Read all records for one association.
    #[must_use]
    pub fn read_by_association(&self, association: &AssociationRecord) -> Vec<Value> {
        self.bridge
            .read_by_associations(std::slice::from_ref(association), &self.app_id)
    }

    /// Read all records matching every given association.
    #[must_use]
    pub fn read_by_associations(&self, associations: &[AssociationRecord]) -> Vec<Value> {
        self.bridge.read_by_associations(associations, &self.app_id)
    }
}
