//! Built-in comparators registered by production configurations.

use super::compare::AuthContextComparator;
use super::context::AuthContext;
use core::fmt;
use core::str::FromStr;

/// Equal iff both contexts have a designated peer identity and the
/// identity values, chain included, match in order.
#[must_use]
pub fn peer_identity(one: &AuthContext, two: &AuthContext) -> bool {
    if !one.is_peer_authenticated() || !two.is_peer_authenticated() {
        return false;
    }
    one.peer_identity().eq(two.peer_identity())
}

/// Equal iff the full property sequences, chain included, match in order.
#[must_use]
pub fn all_properties(one: &AuthContext, two: &AuthContext) -> bool {
    one.property_iterator().eq(two.property_iterator())
}

/// Names a built-in comparator, e.g. in a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config-file", derive(serde::Deserialize))]
#[cfg_attr(feature = "config-file", serde(try_from = "String"))]
pub enum BuiltinComparator {
    /// [`peer_identity`].
    PeerIdentity,
    /// [`all_properties`].
    AllProperties,
}

impl BuiltinComparator {
    /// The configuration name of this comparator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PeerIdentity => "peer-identity",
            Self::AllProperties => "all-properties",
        }
    }

    /// The comparator implementing this rule.
    #[must_use]
    pub fn comparator(self) -> AuthContextComparator {
        match self {
            Self::PeerIdentity => AuthContextComparator::new(peer_identity),
            Self::AllProperties => AuthContextComparator::new(all_properties),
        }
    }
}

impl fmt::Display for BuiltinComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuiltinComparator {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "peer-identity" => Ok(Self::PeerIdentity),
            "all-properties" => Ok(Self::AllProperties),
            other => Err(crate::error::ConfigError::UnknownComparator(other.to_string())),
        }
    }
}

impl TryFrom<String> for BuiltinComparator {
    type Error = crate::error::ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
