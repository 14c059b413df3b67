//! Wire shape of command results.
//!
//! ```text
//! {"ok": true,  "assignment": {...}}
//! {"ok": true,  "released": "col,row"}
//! {"ok": false, "error": "human readable", "code": "OCCUPIED"}
//! ```

use guildhall_types::{AllocationCode, Tile};
use serde::{Deserialize, Serialize};

use crate::error::AllocationError;
use crate::occupancy::PlotAssignment;

/// Result of an assign or release command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Whether the command succeeded.
    pub ok: bool,
    /// The primary record written by a successful assign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment: Option<PlotAssignment>,
    /// The primary tile freed by a successful release.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<Tile>,
    /// Failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<AllocationCode>,
}

impl CommandResponse {
    /// A successful assignment.
    pub const fn assigned(assignment: PlotAssignment) -> Self {
        Self {
            ok: true,
            assignment: Some(assignment),
            released: None,
            error: None,
            code: None,
        }
    }

    /// A successful release.
    pub const fn released(plot: Tile) -> Self {
        Self {
            ok: true,
            assignment: None,
            released: Some(plot),
            error: None,
            code: None,
        }
    }

    /// A refused command.
    pub fn failed(error: &AllocationError) -> Self {
        Self {
            ok: false,
            assignment: None,
            released: None,
            error: Some(error.to_string()),
            code: Some(error.code()),
        }
    }
}

impl From<Result<PlotAssignment, AllocationError>> for CommandResponse {
    fn from(result: Result<PlotAssignment, AllocationError>) -> Self {
        match result {
            Ok(assignment) => Self::assigned(assignment),
            Err(e) => Self::failed(&e),
        }
    }
}

impl From<Result<Tile, AllocationError>> for CommandResponse {
    fn from(result: Result<Tile, AllocationError>) -> Self {
        match result {
            Ok(plot) => Self::released(plot),
            Err(e) => Self::failed(&e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn failure_shape() {
        let err = AllocationError::NotAssigned {
            plot: "3,3".to_owned(),
        };
        let json = serde_json::to_value(CommandResponse::failed(&err)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"ok": false, "error": "plot 3,3 is not assigned", "code": "NOT_ASSIGNED"})
        );
    }

    #[test]
    fn release_shape() {
        let json = serde_json::to_value(CommandResponse::released(Tile::new(4, 9))).unwrap();
        assert_eq!(json, serde_json::json!({"ok": true, "released": "4,9"}));
    }
}
