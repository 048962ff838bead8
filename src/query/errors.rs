//! Precondition errors raised while building a query.

use thiserror::Error;

use crate::schema::EntityName;

/// Error type for query construction.
///
/// Every variant is a caller error detected before any network call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The entity name is not part of the schema.
    #[error("Unknown entity '{name}'. Expected one of: Factory, Token, Pool, PoolDayData, Swap, Position, WalletOverview.")]
    UnknownEntity {
        /// The name that was provided.
        name: String,
    },

    /// A selected field does not belong to the entity.
    #[error("Field '{field}' is not a queryable field of {entity}.")]
    UnknownField {
        /// The entity being queried.
        entity: EntityName,
        /// The offending field name.
        field: String,
    },

    /// No field (or, for the wallet overview, no sub-query) was selected.
    #[error("Please select at least one field to query.")]
    NoFieldsSelected,

    /// The row limit was zero.
    #[error("Limit must be a positive number of rows.")]
    InvalidLimit,

    /// The wallet overview was requested without a wallet address.
    #[error("Please enter a wallet address for the wallet overview.")]
    MissingWalletAddress,

    /// The address contains characters that would break the query text.
    #[error("Address '{address}' contains quotes, backslashes or control characters.")]
    MalformedAddress {
        /// The rejected address.
        address: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_field_error_message() {
        let error = QueryError::UnknownField {
            entity: EntityName::Pool,
            field: "owner".to_string(),
        };
        assert_eq!(error.to_string(), "Field 'owner' is not a queryable field of Pool.");
    }

    #[test]
    fn test_unknown_entity_error_lists_entities() {
        let error = QueryError::UnknownEntity {
            name: "Pair".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("'Pair'"));
        assert!(message.contains("WalletOverview"));
    }
}
