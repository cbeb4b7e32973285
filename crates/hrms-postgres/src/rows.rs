//! Row decoding helpers shared by the entity modules.

use serde::de::DeserializeOwned;

use crate::error::Result;

/// Decodes a TEXT column holding one of the wire-format enums (`Role`,
/// `EmploymentType`, `EmploymentStatus`, `LeaveStatus`) back into its Rust
/// type via the same serde representation used on the API.
pub(crate) fn decode_wire_enum<T: DeserializeOwned>(raw: String) -> Result<T> {
    Ok(serde_json::from_value(serde_json::Value::String(raw))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrms_core::{EmploymentStatus, LeaveStatus, Role};

    #[test]
    fn test_decode_known_values() {
        let role: Role = decode_wire_enum("company_admin".to_string()).unwrap();
        assert_eq!(role, Role::CompanyAdmin);

        let status: EmploymentStatus = decode_wire_enum("ON_LEAVE".to_string()).unwrap();
        assert_eq!(status, EmploymentStatus::OnLeave);

        let status: LeaveStatus = decode_wire_enum("approved".to_string()).unwrap();
        assert_eq!(status, LeaveStatus::Approved);
    }

    #[test]
    fn test_decode_rejects_unknown_values() {
        let result: Result<Role> = decode_wire_enum("galactic_overlord".to_string());
        assert!(result.is_err());
    }
}
