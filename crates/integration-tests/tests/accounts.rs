//! Users, households and the OCR stub.

#![allow(clippy::unwrap_used)]

use serde_json::json;

use freshkeep_integration_tests::TestApp;

const CREATE_USER: &str = "mutation($input: CreateUserInput!) {
    createUser(input: $input) { id email totalCo2SavedKg household { name } }
}";

#[tokio::test]
async fn test_create_user_founds_household() {
    let app = TestApp::new();
    let data = app
        .data(
            None,
            CREATE_USER,
            json!({ "input": {
                "email": "Ada@Example.com",
                "password": "analytical",
                "name": "Ada",
                "householdName": "Engine Room",
            }}),
        )
        .await;
    let user = &data["createUser"];
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["totalCo2SavedKg"], 0.0);
    assert_eq!(user["household"]["name"], "Engine Room");

    let data = app
        .data(
            user["id"].as_str(),
            "{ me { name household { members { email } } } }",
            json!({}),
        )
        .await;
    assert_eq!(data["me"]["name"], "Ada");
    assert_eq!(
        data["me"]["household"]["members"],
        json!([{ "email": "ada@example.com" }])
    );

    let data = app
        .data(None, "{ allHouseholds { name } }", json!({}))
        .await;
    assert_eq!(data["allHouseholds"], json!([{ "name": "Engine Room" }]));
}

#[tokio::test]
async fn test_create_user_without_household() {
    let app = TestApp::new();
    let data = app
        .data(
            None,
            CREATE_USER,
            json!({ "input": {
                "email": "solo@example.com",
                "password": "longenough",
                "name": "Solo",
            }}),
        )
        .await;
    assert!(data["createUser"]["household"].is_null());
}

#[tokio::test]
async fn test_create_user_rejections() {
    let app = TestApp::new();
    app.sign_up("taken@example.com", "First").await;

    let input = |email: &str, password: &str| {
        json!({ "input": { "email": email, "password": password, "name": "X" } })
    };

    let (code, message) = app
        .error(None, CREATE_USER, input("TAKEN@example.com", "longenough"))
        .await;
    assert_eq!(code, "INVALID_ARGUMENT");
    assert_eq!(message, "User with email taken@example.com already exists.");

    let (code, _) = app
        .error(None, CREATE_USER, input("short@example.com", "seven77"))
        .await;
    assert_eq!(code, "INVALID_ARGUMENT");

    let (code, _) = app
        .error(None, CREATE_USER, input("no-at-sign", "longenough"))
        .await;
    assert_eq!(code, "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_lookups() {
    let app = TestApp::new();
    let member = app.sign_up("find@example.com", "Lookup Lane").await;

    let data = app
        .data(
            None,
            "query($id: ID!, $h: ID!) {
                user(id: $id) { email }
                userByEmail(email: \"FIND@example.com\") { id }
                household(id: $h) { name }
                missing: household(id: \"999\") { name }
            }",
            json!({ "id": member.user_id, "h": member.household_id }),
        )
        .await;
    assert_eq!(data["user"]["email"], "find@example.com");
    assert_eq!(data["userByEmail"]["id"], json!(member.user_id));
    assert_eq!(data["household"]["name"], "Lookup Lane");
    assert!(data["missing"].is_null());
}

#[tokio::test]
async fn test_me_errors() {
    let app = TestApp::new();
    let (code, message) = app.error(None, "{ me { id } }", json!({})).await;
    assert_eq!(code, "UNAUTHENTICATED");
    assert_eq!(message, "Caller identity required: set the X-User-Id header");

    let (code, _) = app.error(Some("8"), "{ me { id } }", json!({})).await;
    assert_eq!(code, "ILLEGAL_STATE");
}

#[tokio::test]
async fn test_process_image_for_ocr() {
    let app = TestApp::new();
    let query = "mutation($img: String!) {
        processImageForOCR(imageBase64: $img) { name quantity expirationDate }
    }";

    let data = app.data(None, query, json!({ "img": "...milk..." })).await;
    assert_eq!(
        data["processImageForOCR"],
        json!({ "name": "Milk (OCR)", "quantity": 1, "expirationDate": "2025-06-25" })
    );

    let data = app.data(None, query, json!({ "img": "bread" })).await;
    assert_eq!(data["processImageForOCR"]["expirationDate"], "2025-06-20");

    let data = app.data(None, query, json!({ "img": "MILK" })).await;
    assert_eq!(
        data["processImageForOCR"],
        json!({ "name": "Unknown Item (OCR)", "quantity": 1, "expirationDate": null })
    );
}
