use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(UserId);
id_newtype!(CategoryId);

/// Decentralized identifier a user logs in with. Opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Did(pub String);

impl Did {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub lab: bool,
    pub admin: bool,
}

impl Capabilities {
    pub fn satisfies(&self, requirement: Requirement) -> bool {
        (!requirement.lab || self.lab) && (!requirement.admin || self.admin)
    }
}

/// Capability flags a route demands from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub lab: bool,
    pub admin: bool,
}

impl Requirement {
    pub const LAB: Self = Self {
        lab: true,
        admin: false,
    };
    pub const ADMIN: Self = Self {
        lab: false,
        admin: true,
    };
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.lab, self.admin) {
            (false, false) => f.write_str("none"),
            (true, false) => f.write_str("lab"),
            (false, true) => f.write_str("admin"),
            (true, true) => f.write_str("lab+admin"),
        }
    }
}
