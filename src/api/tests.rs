use std::time::Duration;

use super::*;
use crate::{
    net::{HttpMethod, HttpResponse, MockReply, Net},
    storage::{Storage, TOKEN_KEY},
};

const BASE: &str = "http://shop.test";

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

fn auth(net: &Net) -> AuthApi {
    AuthApi::new(
        net.clone(),
        BASE.into(),
        Storage::mock(),
        Duration::from_millis(100),
    )
}

#[test]
fn test_error_classification() {
    let validation = ApiError::from_response(&HttpResponse::new(
        400,
        r#"{"errors":{"cheeseIds":"required","name":["too short","taken"]}}"#,
    ));
    let ApiError::Validation(errors) = &validation else {
        panic!("expected a validation error, got {validation:?}");
    };
    assert_eq!(errors["cheeseIds"], "required");
    assert_eq!(errors["name"], "too short, taken");
    assert_eq!(validation.status(), 400);

    let plain = ApiError::from_response(&HttpResponse::new(400, "bad"));
    assert!(matches!(plain, ApiError::Status { status: 400, .. }));

    assert!(matches!(
        ApiError::from_response(&HttpResponse::new(403, "")),
        ApiError::Unauthorized { status: 403, .. }
    ));
    assert_eq!(
        ApiError::from_response(&HttpResponse::new(409, r#"{"error":"dup"}"#)),
        ApiError::Conflict(Some("dup".into()))
    );
    assert_eq!(
        ApiError::from_response(&HttpResponse::new(503, "")),
        ApiError::Unavailable
    );
    assert_eq!(
        ApiError::from_response(&HttpResponse::new(502, "gw")).status(),
        502
    );
    assert_eq!(ApiError::Network("refused".into()).status(), 0);
}

#[test]
fn test_option_kind_names() {
    assert_eq!(OptionKind::ALL.len(), 5);
    assert_eq!(OptionKind::Cheeses.to_string(), "cheeses");
    assert_eq!("Cheese".parse::<OptionKind>().unwrap(), OptionKind::Cheeses);
    assert_eq!(" MEATS ".parse::<OptionKind>().unwrap(), OptionKind::Meats);
    assert!("sauces".parse::<OptionKind>().is_err());
}

#[tokio::test]
async fn test_options_list_accepts_both_casings() {
    let net = Net::mock();
    net.on(
        HttpMethod::Get,
        url("/api/options/breads"),
        MockReply::json(200, r#"[{"id":1,"label":" White "},{"Id":2,"Label":"Rye"}]"#),
    );

    let options = OptionsApi::new(net, BASE.into())
        .list(OptionKind::Breads)
        .await
        .unwrap();
    assert_eq!(
        options,
        vec![SandwichOption::new(1, "White"), SandwichOption::new(2, "Rye")]
    );
}

#[tokio::test]
async fn test_options_list_null_body_is_empty() {
    let net = Net::mock();
    net.on(
        HttpMethod::Get,
        url("/api/options/meats"),
        MockReply::json(200, "null"),
    );
    let options = OptionsApi::new(net, BASE.into())
        .list(OptionKind::Meats)
        .await
        .unwrap();
    assert!(options.is_empty());
}

#[tokio::test]
async fn test_options_list_garbage_is_decode_error() {
    let net = Net::mock();
    net.on(
        HttpMethod::Get,
        url("/api/options/meats"),
        MockReply::json(200, "<html>"),
    );
    let err = OptionsApi::new(net, BASE.into())
        .list(OptionKind::Meats)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_sandwich_requests_carry_token() {
    let net = Net::mock();
    let storage = Storage::mock();
    storage.set(TOKEN_KEY, "tok").await.unwrap();
    net.on(
        HttpMethod::Get,
        url("/api/sandwiches/mine"),
        MockReply::json(200, r#"[{"id":3,"name":"Club","description":"Bread: Rye"}]"#),
    );

    let api = SandwichApi::new(net.clone(), BASE.into(), storage);
    let mine = api.mine().await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].description(), "Bread: Rye");
    assert!(!mine[0].has_composition());

    let requests = net.requests();
    assert_eq!(requests[0].header_value("Authorization"), Some("Bearer tok"));
    assert_eq!(requests[0].header_value("Pragma"), Some("no-cache"));
}

#[tokio::test]
async fn test_sandwich_get_with_composition() {
    let net = Net::mock();
    net.on(
        HttpMethod::Get,
        url("/api/sandwiches/8"),
        MockReply::json(
            200,
            r#"{"id":8,"name":"Veg","breadId":2,"cheeseIds":[],"noCheese":true,"price":4.5,"ownerUserId":"u1"}"#,
        ),
    );
    let api = SandwichApi::new(net, BASE.into(), Storage::mock());
    let sandwich = api.get(8).await.unwrap();
    assert!(sandwich.has_composition());
    assert_eq!(sandwich.bread_id, Some(2));
    assert_eq!(sandwich.no_cheese, Some(true));
    assert_eq!(sandwich.price, Some(4.5));
}

#[tokio::test]
async fn test_sandwich_create_and_update_ids() {
    let net = Net::mock();
    net.on(
        HttpMethod::Post,
        url("/api/builder"),
        MockReply::json(201, r#"{"id":42}"#),
    )
    .on(HttpMethod::Put, url("/api/sandwiches/7"), MockReply::json(204, ""));

    let api = SandwichApi::new(net.clone(), BASE.into(), Storage::mock());
    let payload = SandwichPayload {
        name: "Test".into(),
        bread_id: Some(1),
        ..Default::default()
    };
    assert_eq!(api.create(&payload).await.unwrap(), Some(42));
    assert_eq!(api.update(7, &payload).await.unwrap(), Some(7));

    let body: serde_json::Value =
        serde_json::from_str(net.requests()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["breadId"], 1);
    assert_eq!(body["noCheese"], false);
}

#[tokio::test]
async fn test_sandwich_delete_not_found() {
    let net = Net::mock();
    net.on(
        HttpMethod::Delete,
        url("/api/sandwiches/5"),
        MockReply::json(404, ""),
    );
    let api = SandwichApi::new(net, BASE.into(), Storage::mock());
    assert_eq!(api.delete(5).await.unwrap_err(), ApiError::NotFound);
}

#[tokio::test]
async fn test_deadline_times_out() {
    let net = Net::mock();
    net.on(HttpMethod::Get, url("/api/sandwiches"), MockReply::Stall);
    let api = SandwichApi::new(net, BASE.into(), Storage::mock());
    let limit = Duration::from_millis(20);
    assert_eq!(
        deadline(limit, api.list()).await.unwrap_err(),
        ApiError::Timeout(limit)
    );
}

#[tokio::test]
async fn test_register_validates_locally() {
    let net = Net::mock();
    let api = auth(&net);

    let res = api.register("  ", "longenough").await;
    assert_eq!(res.status, 400);
    assert_eq!(res.error(), Some("Email is required"));

    let res = api.register("a@b.c", "short").await;
    assert_eq!(res.status, 400);
    assert_eq!(res.error(), Some("Password must be at least 8 characters"));
    assert!(net.requests().is_empty());
}

#[tokio::test]
async fn test_register_normalizes_email_and_rewrites_duplicate() {
    let net = Net::mock();
    net.on(
        HttpMethod::Post,
        url("/api/auth/register"),
        MockReply::json(409, r#"{"error":"email already registered"}"#),
    );
    let res = auth(&net).register(" Me@Example.COM ", "password1").await;
    assert!(!res.ok);
    assert_eq!(res.status, 409);
    assert_eq!(res.error(), Some("This email is already registered"));

    let sent: serde_json::Value =
        serde_json::from_str(net.requests()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(sent["email"], "me@example.com");
}

#[tokio::test]
async fn test_register_connection_failure_is_503() {
    let net = Net::mock();
    let res = auth(&net).register("a@b.c", "password1").await;
    assert_eq!(res.status, 503);
    assert_eq!(
        res.error(),
        Some("Unable to connect to the server. Please try again.")
    );
}

#[tokio::test]
async fn test_login_network_failure_is_status_zero() {
    let net = Net::mock();
    net.on(
        HttpMethod::Post,
        url("/api/auth/login"),
        MockReply::Fail("connection refused".into()),
    );
    let res = auth(&net).login("a@b.c", "pw").await;
    assert!(!res.ok);
    assert_eq!(res.status, 0);
    assert_eq!(res.error(), Some("connection refused"));
}

#[tokio::test]
async fn test_login_timeout_is_status_zero() {
    let net = Net::mock();
    net.on(HttpMethod::Post, url("/api/auth/login"), MockReply::Stall);
    let res = auth(&net).login("a@b.c", "pw").await;
    assert_eq!(res.status, 0);
    assert_eq!(res.error(), Some("Request timed out"));
}

#[tokio::test]
async fn test_login_mfa_challenge_fields() {
    let net = Net::mock();
    net.on(
        HttpMethod::Post,
        url("/api/auth/login"),
        MockReply::json(200, r#"{"requiresMfa":true,"mfaToken":"m-1"}"#),
    );
    let res = auth(&net).login("a@b.c", "pw").await;
    assert!(res.ok);
    assert!(res.requires_mfa());
    assert_eq!(res.mfa_token(), Some("m-1"));
    assert_eq!(res.token(), None);
}

#[tokio::test]
async fn test_exists_encodes_email_and_swallows_failures() {
    let net = Net::mock();
    net.on(
        HttpMethod::Get,
        url("/api/auth/exists?email=a%2Bb%40c.d"),
        MockReply::json(200, r#"{"exists":true}"#),
    );
    let api = auth(&net);
    assert!(api.exists("a+b@c.d").await);
    assert!(!api.exists("other@c.d").await);
}

#[tokio::test]
async fn test_token_round_trip() {
    let net = Net::mock();
    let api = auth(&net);
    assert_eq!(api.token().await, None);
    api.set_token("t-9").await.unwrap();
    assert_eq!(api.token().await.as_deref(), Some("t-9"));
    api.logout().await.unwrap();
    assert_eq!(api.token().await, None);
}
