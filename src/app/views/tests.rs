use std::time::{Duration, Instant};

use super::*;
use crate::{
    api::{AuthApi, SandwichApi},
    log::Log,
    net::{HttpMethod, MockReply, Net},
    storage::{Storage, TOKEN_KEY},
};

const BASE: &str = "http://shop.test";

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

struct Apis {
    net: Net,
    storage: Storage,
    auth: AuthApi,
    sandwiches: SandwichApi,
}

fn apis() -> Apis {
    let net = Net::mock();
    let storage = Storage::mock();
    Apis {
        auth: AuthApi::new(
            net.clone(),
            BASE.into(),
            storage.clone(),
            Duration::from_millis(200),
        ),
        sandwiches: SandwichApi::new(net.clone(), BASE.into(), storage.clone()),
        net,
        storage,
    }
}

fn login_reply(apis: &Apis, status: u16, body: &str) -> Login {
    apis.net.on(
        HttpMethod::Post,
        url("/api/auth/login"),
        MockReply::json(status, body),
    );
    let mut login = Login::new(apis.auth.clone(), Log::mock());
    login.email = " me@example.com ".into();
    login.password = "secret123".into();
    login
}

#[tokio::test]
async fn test_toast_expires_and_restarts() {
    let start = Instant::now();
    let mut toast = Toast::default();
    toast.show("Saved", ToastKind::Success, start);
    assert!(!toast.tick(start + Duration::from_secs(3)));

    toast.show("Saved again", ToastKind::Success, start + Duration::from_secs(3));
    assert!(!toast.tick(start + Duration::from_secs(5)));
    assert_eq!(toast.message(), Some("Saved again"));

    assert!(toast.tick(start + Duration::from_secs(7)));
    assert_eq!(toast.message(), None);
}

#[tokio::test]
async fn test_list_load_and_owned_delete() {
    let apis = apis();
    apis.storage.remember_sandwich(2).await.unwrap();
    apis.net
        .on(
            HttpMethod::Get,
            url("/api/sandwiches"),
            MockReply::json(200, r#"[{"id":1,"name":"A"},{"id":2,"name":"B"}]"#),
        )
        .on(
            HttpMethod::Delete,
            url("/api/sandwiches/2"),
            MockReply::json(204, ""),
        );

    let mut list = SandwichList::new(apis.sandwiches.clone(), apis.storage.clone(), Log::mock());
    list.load().await;
    assert!(!list.loading);
    assert_eq!(list.sandwiches.len(), 2);
    assert!(list.owned(2));
    assert!(!list.owned(1));

    list.delete(2).await.unwrap();
    assert_eq!(list.sandwiches.len(), 1);
    assert!(!list.owned(2));
    assert!(!apis.storage.owns_sandwich(2).await);
}

#[tokio::test]
async fn test_list_failure_leaves_empty_list_with_error() {
    let apis = apis();
    let mut list = SandwichList::new(apis.sandwiches.clone(), apis.storage.clone(), Log::mock());
    list.load().await;
    assert!(list.sandwiches.is_empty());
    assert!(list.error.as_deref().unwrap().starts_with("Failed to load sandwiches"));
    assert!(!list.loading);
}

#[tokio::test]
async fn test_dashboard_requires_token() {
    let apis = apis();
    apis.net.on(
        HttpMethod::Get,
        url("/api/sandwiches/mine"),
        MockReply::json(200, r#"[{"id":3,"name":"Mine"}]"#),
    );
    let mut dashboard = Dashboard::new(apis.sandwiches.clone(), apis.auth.clone(), Log::mock());

    dashboard.refresh().await;
    assert!(!dashboard.logged_in());
    assert!(apis.net.requests().is_empty());

    apis.storage.set(TOKEN_KEY, "tok").await.unwrap();
    dashboard.refresh().await;
    assert!(dashboard.logged_in());
    assert_eq!(dashboard.sandwiches[0].name, "Mine");
}

#[tokio::test]
async fn test_dashboard_failure_is_empty() {
    let apis = apis();
    apis.storage.set(TOKEN_KEY, "tok").await.unwrap();
    apis.net.on(
        HttpMethod::Get,
        url("/api/sandwiches/mine"),
        MockReply::json(401, ""),
    );
    let mut dashboard = Dashboard::new(apis.sandwiches.clone(), apis.auth.clone(), Log::mock());
    dashboard.refresh().await;
    assert!(dashboard.sandwiches.is_empty());
    assert!(!dashboard.loading);
}

#[tokio::test]
async fn test_login_success_stores_token() {
    let apis = apis();
    let mut login = login_reply(&apis, 200, r#"{"token":"t-1"}"#);
    assert_eq!(login.submit().await, Some(Route::Sandwiches));
    assert_eq!(apis.storage.get(TOKEN_KEY).await.as_deref(), Some("t-1"));

    let sent: serde_json::Value =
        serde_json::from_str(apis.net.requests()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(sent["email"], "me@example.com");
}

#[tokio::test]
async fn test_login_error_messages() {
    let cases = [
        (
            401,
            "{}",
            "That email and password didn't match. Try again or register a new account.",
        ),
        (401, r#"{"error":"Locked"}"#, "Locked"),
        (429, "{}", "Too many attempts. Please wait a minute and try again."),
        (502, "{}", "Something went wrong on our side. Please try again."),
        (418, r#"{"error":"teapot"}"#, "teapot"),
        (418, "", "Login failed."),
    ];
    for (status, body, expected) in cases {
        let apis = apis();
        let mut login = login_reply(&apis, status, body);
        assert_eq!(login.submit().await, None);
        assert_eq!(login.error.as_deref(), Some(expected), "status {status}");
        assert_eq!(login.show_register_suggestion, status == 401);
        assert!(!login.submitting);
    }
}

#[tokio::test]
async fn test_login_network_error() {
    let apis = apis();
    let mut login = Login::new(apis.auth.clone(), Log::mock());
    assert_eq!(login.submit().await, None);
    assert_eq!(
        login.error.as_deref(),
        Some("Network error — please check your connection.")
    );
}

#[tokio::test]
async fn test_login_mfa_flow() {
    let apis = apis();
    let mut login = login_reply(&apis, 200, r#"{"requiresMfa":true,"mfaToken":"m-7"}"#);
    assert_eq!(login.submit().await, None);
    assert!(login.requires_mfa);
    assert_eq!(login.mfa_token.as_deref(), Some("m-7"));
    assert_eq!(login.focus, LoginField::MfaCode);

    apis.net.on(
        HttpMethod::Post,
        url("/api/auth/mfa/verify"),
        MockReply::json(200, r#"{"token":"t-2"}"#),
    );
    login.push_char('4');
    login.push_char('2');
    assert_eq!(login.verify_mfa().await, Some(Route::Sandwiches));
    assert_eq!(apis.storage.get(TOKEN_KEY).await.as_deref(), Some("t-2"));

    let sent: serde_json::Value =
        serde_json::from_str(apis.net.requests()[1].body.as_deref().unwrap()).unwrap();
    assert_eq!(sent["mfaToken"], "m-7");
    assert_eq!(sent["code"], "42");
}

#[tokio::test]
async fn test_register_validation() {
    let apis = apis();
    let mut register = Register::new(apis.auth.clone(), Log::mock());
    let cases = [
        ("", "", "", "Email is required"),
        ("a@b.c", "", "", "Password is required"),
        ("a@b.c", "short", "short", "Password must be at least 8 characters"),
        ("a@b.c", "longenough", "different", "Passwords do not match"),
    ];
    for (email, password, confirm, expected) in cases {
        register.email = email.into();
        register.password = password.into();
        register.confirm = confirm.into();
        assert_eq!(register.submit().await, None);
        assert_eq!(register.error.as_deref(), Some(expected));
    }
    assert!(apis.net.requests().is_empty());
}

#[tokio::test]
async fn test_register_outcomes() {
    let apis = apis();
    apis.net
        .on(
            HttpMethod::Post,
            url("/api/auth/register"),
            MockReply::json(400, "{}"),
        )
        .on(
            HttpMethod::Post,
            url("/api/auth/register"),
            MockReply::json(500, r#"{"error":"db down"}"#),
        )
        .on(
            HttpMethod::Post,
            url("/api/auth/register"),
            MockReply::json(201, "{}"),
        );
    let mut register = Register::new(apis.auth.clone(), Log::mock());
    register.email = "a@b.c".into();
    register.password = "password1".into();
    register.confirm = "password1".into();

    assert_eq!(register.submit().await, None);
    assert_eq!(register.error.as_deref(), Some("Invalid registration details"));
    assert_eq!(register.submit().await, None);
    assert_eq!(register.error.as_deref(), Some("db down"));

    let redirect = register.submit().await.unwrap();
    assert_eq!(redirect.to, Route::Login);
    assert_eq!(redirect.after, REGISTER_REDIRECT_DELAY);
    assert!(register.success.is_some());
    assert_eq!(register.error, None);
}

#[tokio::test]
async fn test_register_unavailable_server() {
    let apis = apis();
    let mut register = Register::new(apis.auth.clone(), Log::mock());
    register.email = "a@b.c".into();
    register.password = "password1".into();
    register.confirm = "password1".into();

    assert_eq!(register.submit().await, None);
    assert_eq!(
        register.error.as_deref(),
        Some("Server is currently unavailable. Please try again later.")
    );
}

#[tokio::test]
async fn test_password_strength() {
    let apis = apis();
    let mut register = Register::new(apis.auth.clone(), Log::mock());
    let cases = [
        ("abc", Strength::Weak),
        ("abcdefgh", Strength::Weak),
        ("abcdefgH", Strength::Fair),
        ("abcdefH1", Strength::Good),
        ("abcdeH1!", Strength::Strong),
    ];
    for (password, expected) in cases {
        register.password = password.into();
        assert_eq!(register.password_strength(), expected, "{password}");
    }
    assert_eq!(Strength::Good.to_string(), "good");
}

#[tokio::test]
async fn test_forgot_password_flow() {
    let apis = apis();
    apis.net
        .on(
            HttpMethod::Post,
            url("/api/auth/forgot-password"),
            MockReply::json(404, ""),
        )
        .on(
            HttpMethod::Post,
            url("/api/auth/forgot-password"),
            MockReply::json(500, "{}"),
        )
        .on(
            HttpMethod::Post,
            url("/api/auth/forgot-password"),
            MockReply::json(200, "{}"),
        );
    let mut forgot = ForgotPassword::new(apis.auth.clone(), Log::mock());
    let now = Instant::now();

    forgot.submit(now).await;
    assert_eq!(forgot.error.as_deref(), Some("Email is required"));

    forgot.email = "a@b.c".into();
    forgot.submit(now).await;
    assert_eq!(
        forgot.error.as_deref(),
        Some("Password reset is not available right now.")
    );
    forgot.submit(now).await;
    assert_eq!(
        forgot.error.as_deref(),
        Some("Unable to send password reset instructions. Please try again later.")
    );

    forgot.submit(now).await;
    assert!(forgot.success.is_some());
    assert_eq!(forgot.toast.kind(), ToastKind::Success);
    assert!(forgot.toast.message().is_some());

    forgot.tick(now + Duration::from_secs(1));
    assert_eq!(forgot.email, "a@b.c");

    forgot.tick(now + RESET_DELAY);
    assert!(forgot.email.is_empty());
    assert_eq!(forgot.success, None);
    assert_eq!(forgot.toast.message(), None);
}
