//! Integration tests for saving and reloading query configurations.

use forge_data::query::{build, FilterAddress, QueryError, QuerySpec, SavedQuery, SavedQueryError};
use forge_data::schema::EntityName;

#[test]
fn test_save_then_load_rebuilds_identical_query() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pool-query.json");

    let spec = QuerySpec::new(EntityName::Pool)
        .fields(["id", "volumeUSD", "feeTier"])
        .address(FilterAddress::new("0xpool").unwrap())
        .limit(25);
    let expected = build(&spec).unwrap();

    SavedQuery::from_spec(&spec).save(&path).unwrap();
    let reloaded = SavedQuery::load(&path).unwrap().to_spec().unwrap();

    assert_eq!(build(&reloaded).unwrap(), expected);
    assert_eq!(reloaded.limit, 25);
    assert_eq!(reloaded.address.unwrap().as_ref(), "0xpool");
}

#[test]
fn test_reloaded_selection_keeps_field_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("swap-order.json");

    let spec = QuerySpec::new(EntityName::Swap)
        .fields(["amountUSD", "id"])
        .limit(5);
    SavedQuery::from_spec(&spec).save(&path).unwrap();
    let reloaded = SavedQuery::load(&path).unwrap().to_spec().unwrap();

    assert_eq!(reloaded.fields, ["amountUSD", "id"]);
    assert_eq!(
        build(&reloaded).unwrap().as_str(),
        "query { swaps(first: 5) { amountUSD id } }"
    );
    assert_eq!(build(&reloaded).unwrap(), build(&spec).unwrap());
}

#[test]
fn test_saved_file_records_every_checkbox() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("swap-query.json");

    let spec = QuerySpec::new(EntityName::Swap).fields(["id"]);
    SavedQuery::from_spec(&spec).save(&path).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["entity"], "Swap");
    assert_eq!(written["address"], "");
    assert_eq!(written["limit"], 100);
    assert_eq!(written["fields"]["id"], true);
    assert_eq!(written["fields"]["amountUSD"], false);
}

#[test]
fn test_wallet_overview_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallet.json");

    let spec = QuerySpec::new(EntityName::WalletOverview)
        .fields(["positions"])
        .address(FilterAddress::new("0xwallet").unwrap())
        .limit(5);
    SavedQuery::from_spec(&spec).save(&path).unwrap();

    let reloaded = SavedQuery::load(&path).unwrap().to_spec().unwrap();
    assert_eq!(reloaded, spec);

    let document = build(&reloaded).unwrap();
    assert!(document.as_str().contains("positions("));
    assert!(!document.as_str().contains("swaps("));
}

#[test]
fn test_load_accepts_textual_limit_and_ignores_unknown_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    std::fs::write(
        &path,
        r#"{
            "entity": "Token",
            "address": "",
            "limit": "10",
            "fields": { "symbol": true, "id": true, "decimals": false, "logoURI": true }
        }"#,
    )
    .unwrap();

    let spec = SavedQuery::load(&path).unwrap().to_spec().unwrap();

    assert_eq!(spec.entity, EntityName::Token);
    assert_eq!(spec.fields, ["symbol", "id"]);
    assert_eq!(spec.limit, 10);
    assert!(spec.address.is_none());
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = SavedQuery::load(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(SavedQueryError::Io(_))));
}

#[test]
fn test_load_rejects_unknown_entity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"entity":"Vault","limit":1,"fields":{}}"#).unwrap();

    assert!(matches!(
        SavedQuery::load(&path),
        Err(SavedQueryError::Json(_))
    ));
}

#[test]
fn test_stored_address_with_quote_is_rejected_on_rebuild() {
    let saved: SavedQuery = serde_json::from_str(
        r#"{"entity":"Pool","address":"0x\"}","limit":1,"fields":{"id":true}}"#,
    )
    .unwrap();

    assert!(matches!(
        saved.to_spec(),
        Err(QueryError::MalformedAddress { .. })
    ));
}
