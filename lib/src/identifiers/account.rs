use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The account identifier (ACI). Stable for the lifetime of an account and
/// bound into every group credential the server issues to it.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct Aci(Uuid);

/// The phone-number identifier (PNI) paired with an [`Aci`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct Pni(Uuid);

impl Aci {
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Pni {
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for Aci {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<Uuid> for Pni {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Aci {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Aci({})", self.0)
    }
}

impl std::fmt::Display for Pni {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pni({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const TEST_UUID: &str = "8311e830-eeea-48ca-8fe3-5bcf09e11b57";

    #[test]
    fn pni_is_a_bare_uuid_in_json() {
        let pni = Pni::from(Uuid::from_str(TEST_UUID).expect("valid uuid"));
        let json = serde_json::to_string(&pni).expect("serializes");

        assert_eq!(json, format!("\"{TEST_UUID}\""));
        assert_eq!(
            serde_json::from_str::<Pni>(&json).expect("deserializes"),
            pni
        );
        assert_eq!(format!("{pni}"), format!("Pni({TEST_UUID})"));
    }
}
