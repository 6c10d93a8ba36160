//! Instance handles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable handle of a registered instance: its slot index in the registry.
///
/// Slots are never compacted or reused, so a handle stays valid for the
/// lifetime of the engine and can never alias a newer instance.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for InstanceId {
    fn from(index: usize) -> Self {
        InstanceId(index as u32)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
