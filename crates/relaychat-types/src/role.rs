use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::TypesError;

/// Author of a chat turn.
///
/// Serialised lowercase on the wire and in the database. Any other string is
/// rejected during deserialisation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    IntoStaticStr,
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Parse a role column value.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        Role::from_str(raw).map_err(|_| TypesError::UnknownRole(raw.to_owned()))
    }
}
