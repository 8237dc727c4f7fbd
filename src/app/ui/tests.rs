use std::time::Duration;

use super::*;
use crate::{
    api::OptionKind,
    app::{Timeouts, builder::REDIRECT_DELAY},
    log::Log,
    net::{HttpMethod, MockReply, Net},
    storage::{Storage, TOKEN_KEY},
    terminal::Screen,
};

const BASE: &str = "http://shop.test";

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

struct Fixture {
    net: Net,
    storage: Storage,
    terminal: Terminal,
}

impl Fixture {
    fn new(sandwiches: &str) -> Self {
        let net = Net::mock();
        net.on(
            HttpMethod::Get,
            url("/api/sandwiches"),
            MockReply::json(200, sandwiches.to_string()),
        );
        Self {
            net,
            storage: Storage::mock(),
            terminal: Terminal::mock(),
        }
    }

    fn spawn(&self) -> Ui {
        let services = Services::new(
            self.net.clone(),
            Log::mock(),
            self.storage.clone(),
            BASE.into(),
            Timeouts::default(),
        );
        Ui::spawn(services, self.terminal.clone()).0
    }

    /// Waits for a drawn screen matching `pred`.
    async fn screen_where(&self, pred: impl Fn(&Screen) -> bool) -> Screen {
        for _ in 0..100 {
            if let Some(screen) = self.terminal.last_screen() {
                if pred(&screen) {
                    return screen;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("no matching screen, last was {:?}", self.terminal.last_screen());
    }
}

async fn type_text(ui: &Ui, text: &str) {
    for c in text.chars() {
        assert!(ui.handle(UiEvent::Char(c)).await);
    }
}

fn serve_options(net: &Net) {
    for kind in OptionKind::ALL {
        net.on(
            HttpMethod::Get,
            url(&format!("/api/options/{kind}")),
            MockReply::json(200, format!(r#"[{{"id":1,"label":"{} one"}}]"#, kind.title())),
        );
    }
}

#[tokio::test]
async fn test_starts_on_sandwich_list() {
    let fx = Fixture::new(r#"[{"id":1,"name":"Club","price":6.5}]"#);
    let ui = fx.spawn();

    assert_eq!(ui.route().await, Route::Sandwiches);
    let screen = fx.screen_where(|s| s.contains("Club")).await;
    assert_eq!(&*screen.title, "Sandwiches");
}

#[tokio::test]
async fn test_quit_keys() {
    let fx = Fixture::new("[]");
    let ui = fx.spawn();
    assert!(ui.handle(UiEvent::Down).await);
    assert!(!ui.handle(UiEvent::Char('q')).await);
    assert!(!ui.handle(UiEvent::Quit).await);
}

#[tokio::test]
async fn test_edit_requires_ownership() {
    let fx = Fixture::new(r#"[{"id":1,"name":"Club"}]"#);
    let ui = fx.spawn();

    assert!(ui.handle(UiEvent::Enter).await);
    assert_eq!(ui.route().await, Route::Sandwiches);
    let screen = fx.terminal.last_screen().unwrap();
    assert!(screen.contains("Only sandwiches built here can be edited"));
}

#[tokio::test]
async fn test_login_with_keys() {
    let fx = Fixture::new("[]");
    fx.net.on(
        HttpMethod::Post,
        url("/api/auth/login"),
        MockReply::json(200, r#"{"token":"abc"}"#),
    );
    let ui = fx.spawn();

    ui.navigate(Route::Login).await;
    type_text(&ui, "me@example.com").await;
    ui.handle(UiEvent::Tab).await;
    type_text(&ui, "secret123").await;
    assert!(!fx.terminal.last_screen().unwrap().contains("secret123"));
    ui.handle(UiEvent::Enter).await;

    assert_eq!(ui.route().await, Route::Sandwiches);
    assert_eq!(fx.storage.get(TOKEN_KEY).await.as_deref(), Some("abc"));
    assert!(fx.terminal.last_screen().unwrap().contains("Logged in"));
}

#[tokio::test]
async fn test_build_and_redirect() {
    let fx = Fixture::new("[]");
    serve_options(&fx.net);
    fx.net.on(
        HttpMethod::Post,
        url("/api/builder"),
        MockReply::json(201, r#"{"id":9}"#),
    );
    let ui = fx.spawn();

    ui.handle(UiEvent::Char('n')).await;
    assert_eq!(ui.route().await, Route::Builder);
    fx.screen_where(|s| s.contains("Bread one")).await;

    ui.handle(UiEvent::Char(' ')).await;
    for _ in 0..4 {
        ui.handle(UiEvent::Right).await;
        ui.handle(UiEvent::Char('n')).await;
    }
    ui.handle(UiEvent::Right).await;
    type_text(&ui, "Lunch").await;
    ui.handle(UiEvent::Enter).await;

    fx.screen_where(|s| s.contains("Sandwich saved!")).await;
    assert!(fx.storage.owns_sandwich(9).await);

    let sent: serde_json::Value = serde_json::from_str(
        fx.net
            .requests()
            .iter()
            .find(|r| r.method == HttpMethod::Post)
            .and_then(|r| r.body.as_deref())
            .unwrap(),
    )
    .unwrap();
    assert_eq!(sent["name"], "Lunch");
    assert_eq!(sent["breadId"], 1);
    assert_eq!(sent["noCheese"], true);

    for _ in 0..100 {
        if ui.route().await == Route::Sandwiches {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("no redirect after saving");
}

#[tokio::test]
async fn test_late_save_leaves_a_new_builder_alone() {
    let fx = Fixture::new("[]");
    serve_options(&fx.net);
    fx.net.on(
        HttpMethod::Post,
        url("/api/builder"),
        MockReply::delayed(Duration::from_millis(300), 201, r#"{"id":42}"#),
    );
    let ui = fx.spawn();

    ui.handle(UiEvent::Char('n')).await;
    fx.screen_where(|s| s.contains("Bread one")).await;
    ui.handle(UiEvent::Char(' ')).await;
    for _ in 0..4 {
        ui.handle(UiEvent::Right).await;
        ui.handle(UiEvent::Char('n')).await;
    }
    ui.handle(UiEvent::Right).await;
    type_text(&ui, "Lunch").await;
    ui.handle(UiEvent::Enter).await;

    // Leave while the save is in flight and start over
    ui.handle(UiEvent::Esc).await;
    ui.handle(UiEvent::Char('n')).await;
    for _ in 0..5 {
        ui.handle(UiEvent::Right).await;
    }
    type_text(&ui, "half done").await;

    for _ in 0..100 {
        if fx.storage.owns_sandwich(42).await {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(fx.storage.owns_sandwich(42).await);

    tokio::time::sleep(REDIRECT_DELAY + Duration::from_millis(200)).await;
    assert_eq!(ui.route().await, Route::Builder);
    let screen = fx.terminal.last_screen().unwrap();
    assert!(screen.contains("half done"));
    assert!(!screen.contains("Sandwich saved!"));
}

#[tokio::test]
async fn test_mock_records_events() {
    let ui = Ui::mock();
    assert!(ui.handle(UiEvent::Enter).await);
    assert!(!ui.handle(UiEvent::Quit).await);
    ui.navigate(Route::Dashboard).await;
    assert_eq!(ui.route().await, Route::Dashboard);

    let Ui::Mock(data) = &ui else {
        unreachable!();
    };
    assert_eq!(data.lock().unwrap().events, vec![UiEvent::Enter, UiEvent::Quit]);
}
