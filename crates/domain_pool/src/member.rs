//! Group members

use serde::{Deserialize, Serialize};

use core_kernel::{IdGenerator, MemberId};

/// A member of the risk pool; immutable once created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

impl Member {
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Creates a member with a freshly generated id
    pub fn enrol(ids: &dyn IdGenerator, name: impl Into<String>) -> Self {
        Self::new(MemberId::generate(ids), name)
    }
}
