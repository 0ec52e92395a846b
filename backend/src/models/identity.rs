//! Request-scoped identity established by the authentication gate.

use crate::types::UserId;

/// Who is making the current request.
///
/// Attached to request extensions before handlers run and never changed
/// afterwards. Absence is its own variant, so no subject id is reserved as a
/// "missing" marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    Subject(UserId),
}

impl Identity {
    pub fn subject(&self) -> Option<UserId> {
        match self {
            Identity::Anonymous => None,
            Identity::Subject(id) => Some(*id),
        }
    }
}
