//! GraphQL document construction.

use std::fmt;

use crate::query::{FilterAddress, QueryError};
use crate::schema::{self, EntityName};

/// Row limit used when the operator does not provide one.
pub const DEFAULT_LIMIT: u32 = 100;

/// Fields fetched for the swap half of the wallet overview.
pub const SWAP_OVERVIEW_FIELDS: [&str; 8] = [
    "id",
    "timestamp",
    "pool",
    "token0",
    "token1",
    "amount0",
    "amount1",
    "amountUSD",
];

/// Fields fetched for the position half of the wallet overview.
pub const POSITION_OVERVIEW_FIELDS: [&str; 12] = [
    "id",
    "owner",
    "pool",
    "token0",
    "token1",
    "liquidity",
    "depositedToken0",
    "depositedToken1",
    "withdrawnToken0",
    "withdrawnToken1",
    "collectedFeesToken0",
    "collectedFeesToken1",
];

/// The operator's query selection.
///
/// For [`EntityName::WalletOverview`] the fields are the sub-query flags
/// `swaps` and `positions`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuerySpec {
    /// Entity to query.
    pub entity: EntityName,
    /// Selected field names, in request order.
    pub fields: Vec<String>,
    /// Optional address filter.
    pub address: Option<FilterAddress>,
    /// Maximum number of records to fetch.
    pub limit: u32,
}

impl QuerySpec {
    /// Creates a spec with no fields, no address and the default limit.
    #[must_use]
    pub const fn new(entity: EntityName) -> Self {
        Self {
            entity,
            fields: Vec::new(),
            address: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Creates a spec selecting every field of `entity`.
    #[must_use]
    pub fn all_fields(entity: EntityName) -> Self {
        Self::new(entity).fields(schema::describe(entity).field_names())
    }

    /// Appends a field to the selection.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    /// Appends several fields to the selection.
    #[must_use]
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets the address filter.
    #[must_use]
    pub fn address(mut self, address: FilterAddress) -> Self {
        self.address = Some(address);
        self
    }

    /// Sets the row limit.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// One collection selection, e.g. `pools(first: 10) { id }`.
///
/// Fragments are spliced into a [`QueryDocument`]; on their own they are not
/// a valid request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryFragment(String);

impl QueryFragment {
    /// Returns the fragment text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A complete GraphQL query document, ready to be posted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryDocument(String);

impl QueryDocument {
    /// Wraps one or more fragments in a single `query { ... }` operation.
    #[must_use]
    pub fn from_fragments<I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = QueryFragment>,
    {
        let body = fragments
            .into_iter()
            .map(|fragment| fragment.0)
            .collect::<Vec<_>>()
            .join(" ");
        Self(format!("query {{ {body} }}"))
    }

    /// Returns the document text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for QueryDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which halves of the wallet overview to fetch.
///
/// Both are selected by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalletOverviewSelection {
    /// Include the wallet's swaps.
    pub swaps: bool,
    /// Include the wallet's liquidity positions.
    pub positions: bool,
}

impl Default for WalletOverviewSelection {
    fn default() -> Self {
        Self {
            swaps: true,
            positions: true,
        }
    }
}

impl WalletOverviewSelection {
    /// Interprets selected `WalletOverview` field names as sub-query flags.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownField`] for names other than `swaps` and
    /// `positions`.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, QueryError> {
        let mut selection = Self {
            swaps: false,
            positions: false,
        };
        for field in fields {
            match field.as_ref() {
                "swaps" => selection.swaps = true,
                "positions" => selection.positions = true,
                other => {
                    return Err(QueryError::UnknownField {
                        entity: EntityName::WalletOverview,
                        field: other.to_string(),
                    })
                }
            }
        }
        Ok(selection)
    }
}

/// Builds the query document for `spec`.
///
/// Plain entities produce a single collection selection; the wallet overview
/// is delegated to [`build_wallet_overview`].
///
/// # Errors
///
/// Returns a [`QueryError`] if the selection is empty, names a field the
/// entity does not have, or has a zero limit.
///
/// For `WalletOverview` the checks run in this order: unknown sub-query
/// names, then the wallet address, then the selection. A spec with neither
/// an address nor a sub-query therefore fails with
/// [`QueryError::MissingWalletAddress`], not
/// [`QueryError::NoFieldsSelected`].
pub fn build(spec: &QuerySpec) -> Result<QueryDocument, QueryError> {
    if spec.entity.is_composite() {
        let selection = WalletOverviewSelection::from_fields(spec.fields.as_slice())?;
        return build_wallet_overview(spec.address.as_ref(), spec.limit, selection);
    }

    let fragment = build_fragment(
        spec.entity,
        spec.fields.as_slice(),
        spec.address.as_ref(),
        spec.limit,
    )?;
    Ok(QueryDocument::from_fragments([fragment]))
}

/// Builds the collection selection for one plain entity.
///
/// The address filter is keyed by [`EntityName::filter_key`]; entities without
/// a filter key ignore the address.
///
/// # Errors
///
/// - [`QueryError::NoFieldsSelected`] if `fields` is empty
/// - [`QueryError::UnknownField`] if a field is not in the entity's schema
///   (also raised for the composite entity, which has no collection)
/// - [`QueryError::InvalidLimit`] if `limit` is zero
pub fn build_fragment<S: AsRef<str>>(
    entity: EntityName,
    fields: &[S],
    address: Option<&FilterAddress>,
    limit: u32,
) -> Result<QueryFragment, QueryError> {
    if fields.is_empty() {
        return Err(QueryError::NoFieldsSelected);
    }
    if limit == 0 {
        return Err(QueryError::InvalidLimit);
    }

    let descriptor = schema::describe(entity);
    if let Some(unknown) = fields
        .iter()
        .map(|field| field.as_ref())
        .find(|field| entity.is_composite() || !descriptor.has_field(field))
    {
        return Err(QueryError::UnknownField {
            entity,
            field: unknown.to_string(),
        });
    }

    let collection = entity.collection_keys()[0];
    let filter = match (entity.filter_key(), address) {
        (Some(key), Some(address)) => format!(", where: {{ {key}: \"{address}\" }}"),
        _ => String::new(),
    };
    let selection = fields
        .iter()
        .map(|field| field.as_ref())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(QueryFragment(format!(
        "{collection}(first: {limit}{filter}) {{ {selection} }}"
    )))
}

/// Builds the combined swap and position query for a wallet.
///
/// # Errors
///
/// Checked in order:
///
/// - [`QueryError::MissingWalletAddress`] if no address is given
/// - [`QueryError::NoFieldsSelected`] if neither half is selected
/// - [`QueryError::InvalidLimit`] if `limit` is zero
pub fn build_wallet_overview(
    address: Option<&FilterAddress>,
    limit: u32,
    selection: WalletOverviewSelection,
) -> Result<QueryDocument, QueryError> {
    let address = address.ok_or(QueryError::MissingWalletAddress)?;

    let mut fragments = Vec::with_capacity(2);
    if selection.swaps {
        fragments.push(build_fragment(
            EntityName::Swap,
            &SWAP_OVERVIEW_FIELDS,
            Some(address),
            limit,
        )?);
    }
    if selection.positions {
        fragments.push(build_fragment(
            EntityName::Position,
            &POSITION_OVERVIEW_FIELDS,
            Some(address),
            limit,
        )?);
    }

    if fragments.is_empty() {
        return Err(QueryError::NoFieldsSelected);
    }
    Ok(QueryDocument::from_fragments(fragments))
}
