//! Static entity schema for the Forge DEX subgraph.
//!
//! The schema is the single source of truth for which entities can be
//! queried, which fields each entity exposes, and how an entity maps onto
//! the subgraph's collection keys. It is plain `'static` data: every
//! accessor is a pure lookup and the tables are shared freely between
//! threads.
//!
//! # Example
//!
//! ```rust
//! use forge_data::schema::{self, EntityName};
//!
//! let pool = schema::describe(EntityName::Pool);
//! assert_eq!(pool.description, "Information about liquidity pools");
//! assert_eq!(pool.fields[0].name, "id");
//! assert_eq!(EntityName::Pool.collection_keys(), ["pools"]);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::query::QueryError;

/// The closed set of entity kinds the engine understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityName {
    /// DEX-wide statistics.
    Factory,
    /// Individual tokens.
    Token,
    /// Liquidity pools.
    Pool,
    /// Daily aggregates for a pool.
    PoolDayData,
    /// Individual swap transactions.
    Swap,
    /// Liquidity positions.
    Position,
    /// Composite view of a wallet's swaps and positions.
    WalletOverview,
}

impl EntityName {
    /// Every entity, in the order offered to the operator.
    pub const ALL: [Self; 7] = [
        Self::Factory,
        Self::Token,
        Self::Pool,
        Self::PoolDayData,
        Self::WalletOverview,
        Self::Swap,
        Self::Position,
    ];

    /// Returns the entity name as it appears in the schema.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Factory => "Factory",
            Self::Token => "Token",
            Self::Pool => "Pool",
            Self::PoolDayData => "PoolDayData",
            Self::Swap => "Swap",
            Self::Position => "Position",
            Self::WalletOverview => "WalletOverview",
        }
    }

    /// Returns `true` for entities assembled from several sub-queries.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::WalletOverview)
    }

    /// Returns the payload keys this entity's results are stored under.
    ///
    /// Plain entities map to their lowercased name with an `s` appended
    /// (`Pool` → `pools`, `PoolDayData` → `pooldaydatas`). The composite
    /// `WalletOverview` maps to its two constituents in the order they are
    /// tabulated.
    #[must_use]
    pub const fn collection_keys(self) -> &'static [&'static str] {
        match self {
            Self::Factory => &["factorys"],
            Self::Token => &["tokens"],
            Self::Pool => &["pools"],
            Self::PoolDayData => &["pooldaydatas"],
            Self::Swap => &["swaps"],
            Self::Position => &["positions"],
            Self::WalletOverview => &["swaps", "positions"],
        }
    }

    /// Returns the field an address filter is applied to, if any.
    #[must_use]
    pub const fn filter_key(self) -> Option<&'static str> {
        match self {
            Self::Pool | Self::Token => Some("id"),
            Self::Swap => Some("origin"),
            Self::Position => Some("owner"),
            Self::PoolDayData => Some("pool"),
            Self::Factory | Self::WalletOverview => None,
        }
    }

    /// Returns the label shown next to the address input for this entity.
    #[must_use]
    pub const fn address_hint(self) -> &'static str {
        match self {
            Self::Pool => "Pool Address",
            Self::Token => "Token Address",
            Self::Swap | Self::Position | Self::WalletOverview => "Wallet Address",
            Self::Factory | Self::PoolDayData => "Address (optional)",
        }
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityName {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|entity| entity.as_str() == trimmed)
            .ok_or_else(|| QueryError::UnknownEntity {
                name: trimmed.to_string(),
            })
    }
}

impl Serialize for EntityName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// One selectable field of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Identifier in the remote schema.
    pub name: &'static str,
    /// Operator-facing description.
    pub description: &'static str,
}

/// A queryable entity and its ordered fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// The entity kind.
    pub name: EntityName,
    /// Operator-facing description.
    pub description: &'static str,
    /// Queryable fields in display order.
    pub fields: &'static [FieldDescriptor],
}

impl EntityDescriptor {
    /// Returns `true` if `field` is one of this entity's fields.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.name == field)
    }

    /// Returns the names of every field, in order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|f| f.name)
    }
}

const fn field(name: &'static str, description: &'static str) -> FieldDescriptor {
    FieldDescriptor { name, description }
}

static SCHEMA: [EntityDescriptor; 7] = [
    EntityDescriptor {
        name: EntityName::Factory,
        description: "Overall statistics for the entire DEX",
        fields: &[
            field("id", "Factory address"),
            field("poolCount", "Total number of pools"),
            field("txCount", "Total number of transactions"),
            field("totalVolumeUSD", "Total volume in USD"),
            field("totalFeesUSD", "Total fees collected in USD"),
            field("totalValueLockedUSD", "Total value locked in USD"),
        ],
    },
    EntityDescriptor {
        name: EntityName::Token,
        description: "Information about individual tokens",
        fields: &[
            field("id", "Token address"),
            field("symbol", "Token symbol"),
            field("name", "Token name"),
            field("decimals", "Token decimals"),
            field("totalSupply", "Total supply of the token"),
            field("volume", "Trading volume in token units"),
            field("volumeUSD", "Trading volume in USD"),
            field("feesUSD", "Fees generated in USD"),
            field("txCount", "Number of transactions involving this token"),
        ],
    },
    EntityDescriptor {
        name: EntityName::Pool,
        description: "Information about liquidity pools",
        fields: &[
            field("id", "Pool address"),
            field("token0", "Address of the first token in the pair"),
            field("token1", "Address of the second token in the pair"),
            field("feeTier", "Fee tier of the pool"),
            field("liquidity", "Current liquidity in the pool"),
            field("sqrtPrice", "Square root of the current price"),
            field("token0Price", "Price of token0 in terms of token1"),
            field("token1Price", "Price of token1 in terms of token0"),
            field("volumeUSD", "Total volume in USD"),
            field("feesUSD", "Total fees collected in USD"),
            field("txCount", "Total number of transactions"),
        ],
    },
    EntityDescriptor {
        name: EntityName::PoolDayData,
        description: "Daily data for a specific pool",
        fields: &[
            field("id", "Unique identifier for the day's data"),
            field("date", "Date of the data point"),
            field("pool", "Address of the pool"),
            field("liquidity", "Liquidity at the end of the day"),
            field("sqrtPrice", "Square root of the price at the end of the day"),
            field("token0Price", "Price of token0 at the end of the day"),
            field("token1Price", "Price of token1 at the end of the day"),
            field("volumeUSD", "Volume in USD for the day"),
            field("feesUSD", "Fees collected in USD for the day"),
            field("txCount", "Number of transactions for the day"),
            field("open", "Opening price of token0 for the day"),
            field("high", "Highest price of token0 for the day"),
            field("low", "Lowest price of token0 for the day"),
            field("close", "Closing price of token0 for the day"),
        ],
    },
    EntityDescriptor {
        name: EntityName::WalletOverview,
        description: "Comprehensive overview of a wallet's activities",
        fields: &[
            field("swaps", "Swap transactions made by the wallet"),
            field("positions", "Liquidity positions owned by the wallet"),
        ],
    },
    EntityDescriptor {
        name: EntityName::Swap,
        description: "Individual swap transactions",
        fields: &[
            field("id", "Unique identifier for the swap"),
            field("timestamp", "Timestamp of the swap"),
            field("pool", "Address of the pool where the swap occurred"),
            field("token0", "Address of the first token in the pair"),
            field("token1", "Address of the second token in the pair"),
            field("amount0", "Amount of token0 swapped"),
            field("amount1", "Amount of token1 swapped"),
            field("amountUSD", "USD value of the swap"),
        ],
    },
    EntityDescriptor {
        name: EntityName::Position,
        description: "Liquidity positions held in pools",
        fields: &[
            field("id", "Unique identifier for the position"),
            field("owner", "Wallet that owns the position"),
            field("pool", "Address of the pool the position is in"),
            field("token0", "Address of the first token in the pair"),
            field("token1", "Address of the second token in the pair"),
            field("liquidity", "Liquidity currently provided"),
            field("depositedToken0", "Total token0 deposited"),
            field("depositedToken1", "Total token1 deposited"),
            field("withdrawnToken0", "Total token0 withdrawn"),
            field("withdrawnToken1", "Total token1 withdrawn"),
            field("collectedFeesToken0", "Fees collected in token0"),
            field("collectedFeesToken1", "Fees collected in token1"),
        ],
    },
];

/// Returns every entity descriptor in display order.
#[must_use]
pub fn list_entities() -> &'static [EntityDescriptor] {
    &SCHEMA
}

/// Returns the descriptor for `entity`.
#[must_use]
pub fn describe(entity: EntityName) -> &'static EntityDescriptor {
    // SCHEMA is laid out in `EntityName::ALL` order.
    let index = match entity {
        EntityName::Factory => 0,
        EntityName::Token => 1,
        EntityName::Pool => 2,
        EntityName::PoolDayData => 3,
        EntityName::WalletOverview => 4,
        EntityName::Swap => 5,
        EntityName::Position => 6,
    };
    &SCHEMA[index]
}

/// Returns the ordered fields of `entity`.
#[must_use]
pub fn fields_of(entity: EntityName) -> &'static [FieldDescriptor] {
    describe(entity).fields
}

/// Looks up an entity descriptor by its schema name.
///
/// # Errors
///
/// Returns [`QueryError::UnknownEntity`] if `name` is not a known entity.
pub fn lookup(name: &str) -> Result<&'static EntityDescriptor, QueryError> {
    name.parse().map(describe)
}

/// Renders every entity with its description and field descriptions.
#[must_use]
pub fn help_text() -> String {
    let mut text = String::from("Forge Data Help\n\n");
    for entity in list_entities() {
        text.push_str(&format!("{}:\n{}\n\nFields:\n", entity.name, entity.description));
        for field in entity.fields {
            text.push_str(&format!("  - {}: {}\n", field.name, field.description));
        }
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entity_has_a_descriptor() {
        for entity in EntityName::ALL {
            let descriptor = describe(entity);
            assert_eq!(descriptor.name, entity);
            assert!(!descriptor.fields.is_empty());
        }
        assert_eq!(list_entities().len(), EntityName::ALL.len());
    }

    #[test]
    fn test_field_names_are_unique_per_entity() {
        for entity in list_entities() {
            let mut names: Vec<_> = entity.field_names().collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), entity.fields.len(), "{}", entity.name);
        }
    }

    #[test]
    fn test_collection_keys_pluralise_lowercase_name() {
        for entity in EntityName::ALL {
            if entity.is_composite() {
                continue;
            }
            let expected = format!("{}s", entity.as_str().to_lowercase());
            assert_eq!(entity.collection_keys(), [expected.as_str()]);
        }
    }

    #[test]
    fn test_composite_collection_keys() {
        assert_eq!(
            EntityName::WalletOverview.collection_keys(),
            ["swaps", "positions"]
        );
    }

    #[test]
    fn test_filter_keys() {
        assert_eq!(EntityName::Pool.filter_key(), Some("id"));
        assert_eq!(EntityName::Token.filter_key(), Some("id"));
        assert_eq!(EntityName::Swap.filter_key(), Some("origin"));
        assert_eq!(EntityName::Position.filter_key(), Some("owner"));
        assert_eq!(EntityName::PoolDayData.filter_key(), Some("pool"));
        assert_eq!(EntityName::Factory.filter_key(), None);
    }

    #[test]
    fn test_parse_known_and_unknown_names() {
        assert_eq!("PoolDayData".parse::<EntityName>().unwrap(), EntityName::PoolDayData);
        assert_eq!(" Swap ".parse::<EntityName>().unwrap(), EntityName::Swap);

        let error = "pools".parse::<EntityName>().unwrap_err();
        assert!(matches!(error, QueryError::UnknownEntity { name } if name == "pools"));
    }

    #[test]
    fn test_lookup_by_name() {
        let descriptor = lookup("Token").unwrap();
        assert!(descriptor.has_field("symbol"));
        assert!(!descriptor.has_field("owner"));
        assert!(lookup("Bogus").is_err());
    }

    #[test]
    fn test_entity_name_serde_uses_schema_name() {
        let json = serde_json::to_string(&EntityName::WalletOverview).unwrap();
        assert_eq!(json, r#""WalletOverview""#);
        let parsed: EntityName = serde_json::from_str(r#""Position""#).unwrap();
        assert_eq!(parsed, EntityName::Position);
        assert!(serde_json::from_str::<EntityName>(r#""Nope""#).is_err());
    }

    #[test]
    fn test_help_text_lists_entities_and_fields() {
        let text = help_text();
        assert!(text.contains("PoolDayData:\nDaily data for a specific pool"));
        assert!(text.contains("  - amountUSD: USD value of the swap"));
    }

    #[test]
    fn test_address_hint() {
        assert_eq!(EntityName::Pool.address_hint(), "Pool Address");
        assert_eq!(EntityName::WalletOverview.address_hint(), "Wallet Address");
        assert_eq!(EntityName::Factory.address_hint(), "Address (optional)");
    }
}
