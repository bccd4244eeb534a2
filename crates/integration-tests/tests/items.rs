//! Item lifecycle scenarios: create, update, delete and expiry queries.

#![allow(clippy::unwrap_used)]

use serde_json::json;

use freshkeep_integration_tests::TestApp;

const ITEM_FIELDS: &str = "id name quantity expirationDate predictedExpirationDate storageLocation";

#[tokio::test]
async fn test_create_item_predicts_expiration() {
    let app = TestApp::new();
    let member = app.sign_up("cook@example.com", "Kitchen").await;

    let id = app
        .create_item(&member, "Milk", 2, "2025-01-01", Some("Fridge"))
        .await;

    let data = app
        .data(
            None,
            &format!("query($id: ID!) {{ item(id: $id) {{ {ITEM_FIELDS} addedBy {{ email }} }} }}"),
            json!({ "id": id }),
        )
        .await;
    let item = &data["item"];
    assert_eq!(item["name"], "Milk");
    assert_eq!(item["quantity"], 2);
    assert_eq!(item["expirationDate"], "2025-01-01");
    assert_eq!(item["predictedExpirationDate"], "2025-01-04");
    assert_eq!(item["storageLocation"], "Fridge");
    assert_eq!(item["addedBy"]["email"], "cook@example.com");
}

#[tokio::test]
async fn test_update_quantity_only_keeps_other_fields() {
    let app = TestApp::new();
    let member = app.sign_up("cook@example.com", "Kitchen").await;
    let id = app
        .create_item(&member, "Milk", 2, "2025-01-01", Some("Fridge"))
        .await;

    let data = app
        .data(
            None,
            &format!(
                "mutation($input: UpdateItemInput!) {{ updateItem(input: $input) {{ {ITEM_FIELDS} }} }}"
            ),
            json!({ "input": { "itemId": id, "quantity": 5 } }),
        )
        .await;
    let item = &data["updateItem"];
    assert_eq!(item["quantity"], 5);
    assert_eq!(item["name"], "Milk");
    assert_eq!(item["storageLocation"], "Fridge");
    assert_eq!(item["expirationDate"], "2025-01-01");
    assert_eq!(item["predictedExpirationDate"], "2025-01-04");
}

#[tokio::test]
async fn test_update_recomputes_prediction() {
    let app = TestApp::new();
    let member = app.sign_up("cook@example.com", "Kitchen").await;
    let id = app
        .create_item(&member, "Bread", 1, "2025-07-10", Some("Fridge"))
        .await;

    let data = app
        .data(
            None,
            "mutation($input: UpdateItemInput!) {
                updateItem(input: $input) { storageLocation predictedExpirationDate }
            }",
            json!({ "input": { "itemId": id, "storageLocation": "Pantry" } }),
        )
        .await;
    assert_eq!(data["updateItem"]["storageLocation"], "Pantry");
    assert_eq!(data["updateItem"]["predictedExpirationDate"], "2025-07-08");
}

#[tokio::test]
async fn test_create_item_rejects_bad_input() {
    let app = TestApp::new();
    let member = app.sign_up("cook@example.com", "Kitchen").await;
    let mutation = "mutation($input: CreateItemInput!) { createItem(input: $input) { id } }";

    let (code, message) = app
        .error(
            member.caller(),
            mutation,
            json!({ "input": {
                "name": "Milk", "quantity": 1, "expirationDate": "01/02/2025",
                "householdId": member.household_id,
            }}),
        )
        .await;
    assert_eq!(code, "INVALID_ARGUMENT");
    assert_eq!(message, "Invalid date format. Expected YYYY-MM-DD.");

    let (code, _) = app
        .error(
            member.caller(),
            mutation,
            json!({ "input": {
                "name": "Milk", "quantity": -1, "expirationDate": "2025-02-01",
                "householdId": member.household_id,
            }}),
        )
        .await;
    assert_eq!(code, "INVALID_ARGUMENT");

    let (code, message) = app
        .error(
            member.caller(),
            mutation,
            json!({ "input": {
                "name": "Milk", "quantity": 1, "expirationDate": "2025-02-01",
                "householdId": "999",
            }}),
        )
        .await;
    assert_eq!(code, "NOT_FOUND");
    assert_eq!(message, "Household with ID 999 not found.");
}

#[tokio::test]
async fn test_create_item_requires_caller() {
    let app = TestApp::new();
    let member = app.sign_up("cook@example.com", "Kitchen").await;
    let mutation = "mutation($input: CreateItemInput!) { createItem(input: $input) { id } }";
    let input = json!({ "input": {
        "name": "Milk", "quantity": 1, "expirationDate": "2025-02-01",
        "householdId": member.household_id,
    }});

    let (code, _) = app.error(None, mutation, input.clone()).await;
    assert_eq!(code, "UNAUTHENTICATED");

    let (code, message) = app.error(Some("404"), mutation, input).await;
    assert_eq!(code, "ILLEGAL_STATE");
    assert_eq!(message, "User with ID 404 not found.");
}

#[tokio::test]
async fn test_delete_item() {
    let app = TestApp::new();
    let member = app.sign_up("cook@example.com", "Kitchen").await;
    let id = app.create_item(&member, "Eggs", 12, "2025-06-30", None).await;
    let mutation = "mutation($id: ID!) { deleteItem(itemId: $id) }";

    let data = app.data(None, mutation, json!({ "id": id })).await;
    assert_eq!(data["deleteItem"], true);

    let data = app.data(None, mutation, json!({ "id": id })).await;
    assert_eq!(data["deleteItem"], false);

    let (code, _) = app.error(None, mutation, json!({ "id": "eggs" })).await;
    assert_eq!(code, "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_update_missing_item() {
    let app = TestApp::new();
    let (code, message) = app
        .error(
            None,
            "mutation($input: UpdateItemInput!) { updateItem(input: $input) { id } }",
            json!({ "input": { "itemId": "77", "name": "Ghost" } }),
        )
        .await;
    assert_eq!(code, "NOT_FOUND");
    assert_eq!(message, "Item with ID 77 not found.");
}

#[tokio::test]
async fn test_expiring_items_window() {
    let app = TestApp::new();
    let member = app.sign_up("cook@example.com", "Kitchen").await;
    // Today is 2025-06-15.
    app.create_item(&member, "Later", 1, "2025-06-20", None).await;
    app.create_item(&member, "Soon", 1, "2025-06-16", None).await;
    app.create_item(&member, "Edge", 1, "2025-06-22", None).await;
    app.create_item(&member, "Far", 1, "2025-08-01", None).await;

    let data = app
        .data(
            None,
            "query($h: ID!) { expiringItems(householdId: $h, daysAhead: 7) { name } }",
            json!({ "h": member.household_id }),
        )
        .await;
    let names: Vec<&str> = data["expiringItems"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Soon", "Later"]);

    let data = app
        .data(
            None,
            "query($h: ID!) { itemsByHousehold(householdId: $h) { name } }",
            json!({ "h": member.household_id }),
        )
        .await;
    assert_eq!(data["itemsByHousehold"].as_array().unwrap().len(), 4);
}
