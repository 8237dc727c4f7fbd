use super::*;
use crate::{
    api::OptionKind,
    log::Log,
    net::{HttpMethod, MockReply, Net},
    storage::{Storage, TOKEN_KEY},
};

const BASE: &str = "http://shop.test";

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

fn app(net: &Net, storage: &Storage) -> App {
    App::with_services(Services::new(
        net.clone(),
        Log::mock(),
        storage.clone(),
        BASE.into(),
        Timeouts::default(),
    ))
}

fn serve_options(net: &Net) {
    let lists = [
        (OptionKind::Breads, r#"[{"id":1,"label":"White"},{"id":2,"label":"Rye"}]"#),
        (OptionKind::Cheeses, r#"[{"id":1,"label":"Swiss"},{"id":2,"label":"Cheddar"}]"#),
        (OptionKind::Dressings, r#"[{"id":1,"label":"Mayo"}]"#),
        (OptionKind::Meats, r#"[{"id":1,"label":"Ham"}]"#),
        (OptionKind::Toppings, r#"[{"id":1,"label":"Lettuce"}]"#),
    ];
    for (kind, body) in lists {
        net.on(
            HttpMethod::Get,
            url(&format!("/api/options/{kind}")),
            MockReply::json(200, body),
        );
    }
}

fn posted_body(net: &Net, method: HttpMethod) -> serde_json::Value {
    let request = net
        .requests()
        .into_iter()
        .find(|r| r.method == method)
        .unwrap();
    serde_json::from_str(request.body.as_deref().unwrap()).unwrap()
}

#[tokio::test]
async fn test_list_marks_owned() {
    let net = Net::mock();
    let storage = Storage::mock();
    storage.remember_sandwich(2).await.unwrap();
    net.on(
        HttpMethod::Get,
        url("/api/sandwiches"),
        MockReply::json(
            200,
            r#"[{"id":1,"name":"Club","price":6.5},{"id":2,"name":"Veg","description":"Bread: Rye"}]"#,
        ),
    );

    let out = app(&net, &storage).resolve(Command::List).await.unwrap();
    assert_eq!(out, "#1 Club  $6.50\n#2 Veg  (yours)\n    Bread: Rye");
}

#[tokio::test]
async fn test_mine_needs_login() {
    let net = Net::mock();
    let err = app(&net, &Storage::mock())
        .resolve(Command::Mine)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Not logged in"));
    assert!(net.requests().is_empty());
}

#[tokio::test]
async fn test_options_of_one_kind() {
    let net = Net::mock();
    serve_options(&net);
    let out = app(&net, &Storage::mock())
        .resolve(Command::Options {
            kind: Some(OptionKind::Cheeses),
        })
        .await
        .unwrap();
    assert_eq!(out, "Cheese:\n    1  Swiss\n    2  Cheddar");
    assert_eq!(net.requests().len(), 1);
}

#[tokio::test]
async fn test_options_failure_is_an_error() {
    let net = Net::mock();
    net.on(
        HttpMethod::Get,
        url("/api/options/meats"),
        MockReply::json(500, ""),
    );
    let err = app(&net, &Storage::mock())
        .resolve(Command::Options {
            kind: Some(OptionKind::Meats),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to load meats");
}

#[tokio::test]
async fn test_build_from_labels() {
    let net = Net::mock();
    let storage = Storage::mock();
    serve_options(&net);
    net.on(
        HttpMethod::Post,
        url("/api/builder"),
        MockReply::json(201, r#"{"id":12}"#),
    );

    let recipe = Recipe {
        name: Some("Lunch".into()),
        bread: Some("rye".into()),
        cheeses: vec!["Swiss".into(), "cheddar".into()],
        dressings: vec!["none".into()],
        meats: vec!["Ham".into()],
        toppings: vec!["none".into()],
        toasted: Some(true),
        price: Some(5.5),
    };
    let out = app(&net, &storage)
        .resolve(Command::Build(recipe))
        .await
        .unwrap();
    assert_eq!(out, "Sandwich saved! (#12)");
    assert!(storage.owns_sandwich(12).await);

    let sent = posted_body(&net, HttpMethod::Post);
    assert_eq!(sent["breadId"], 2);
    assert_eq!(sent["cheeseIds"], serde_json::json!([1, 2]));
    assert_eq!(sent["noDressing"], true);
    assert_eq!(sent["toasted"], true);
    assert_eq!(sent["price"], 5.5);
}

#[tokio::test]
async fn test_build_rejects_unknown_label() {
    let net = Net::mock();
    serve_options(&net);
    let recipe = Recipe {
        bread: Some("Sourdough".into()),
        ..Default::default()
    };
    let err = app(&net, &Storage::mock())
        .resolve(Command::Build(recipe))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown bread option: Sourdough");
}

#[tokio::test]
async fn test_build_incomplete_is_refused() {
    let net = Net::mock();
    serve_options(&net);
    let recipe = Recipe {
        name: Some("Half".into()),
        bread: Some("White".into()),
        ..Default::default()
    };
    let err = app(&net, &Storage::mock())
        .resolve(Command::Build(recipe))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Please complete every step before saving.");
    assert!(net.requests().iter().all(|r| r.method == HttpMethod::Get));
}

#[tokio::test]
async fn test_edit_keeps_unmentioned_parts() {
    let net = Net::mock();
    serve_options(&net);
    net.on(
        HttpMethod::Get,
        url("/api/sandwiches/8"),
        MockReply::json(
            200,
            r#"{"id":8,"name":"Veg","breadId":1,"cheeseIds":[1],"dressingIds":[],"noDressing":true,"meatIds":[1],"toppingIds":[1],"toasted":false}"#,
        ),
    )
    .on(
        HttpMethod::Put,
        url("/api/sandwiches/8"),
        MockReply::json(200, "{}"),
    );

    let recipe = Recipe {
        cheeses: vec!["none".into()],
        ..Default::default()
    };
    let out = app(&net, &Storage::mock())
        .resolve(Command::Edit { id: 8, recipe })
        .await
        .unwrap();
    assert_eq!(out, "Sandwich saved! (#8)");

    let sent = posted_body(&net, HttpMethod::Put);
    assert_eq!(sent["name"], "Veg");
    assert_eq!(sent["breadId"], 1);
    assert_eq!(sent["noCheese"], true);
    assert_eq!(sent["cheeseIds"], serde_json::json!([]));
    assert_eq!(sent["meatIds"], serde_json::json!([1]));
}

#[tokio::test]
async fn test_login_with_mfa_code() {
    let net = Net::mock();
    let storage = Storage::mock();
    net.on(
        HttpMethod::Post,
        url("/api/auth/login"),
        MockReply::json(200, r#"{"requiresMfa":true,"mfaToken":"m"}"#),
    )
    .on(
        HttpMethod::Post,
        url("/api/auth/mfa/verify"),
        MockReply::json(200, r#"{"token":"t"}"#),
    );
    let app = app(&net, &storage);

    let err = app
        .resolve(Command::Login {
            email: "a@b.c".into(),
            password: "password1".into(),
            code: None,
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("--code"));

    let out = app
        .resolve(Command::Login {
            email: "a@b.c".into(),
            password: "password1".into(),
            code: Some("123456".into()),
        })
        .await
        .unwrap();
    assert_eq!(out, "Logged in");
    assert_eq!(storage.get(TOKEN_KEY).await.as_deref(), Some("t"));

    app.resolve(Command::Logout).await.unwrap();
    assert_eq!(storage.get(TOKEN_KEY).await, None);
}

#[tokio::test]
async fn test_delete_forgets_ownership() {
    let net = Net::mock();
    let storage = Storage::mock();
    storage.remember_sandwich(4).await.unwrap();
    net.on(
        HttpMethod::Delete,
        url("/api/sandwiches/4"),
        MockReply::json(204, ""),
    );

    let out = app(&net, &storage)
        .resolve(Command::Delete { id: 4 })
        .await
        .unwrap();
    assert_eq!(out, "Deleted sandwich #4");
    assert!(!storage.owns_sandwich(4).await);
}

#[tokio::test]
async fn test_exists() {
    let net = Net::mock();
    net.on(
        HttpMethod::Get,
        url("/api/auth/exists?email=a%40b.c"),
        MockReply::json(200, r#"{"exists":true}"#),
    );
    let out = app(&net, &Storage::mock())
        .resolve(Command::Exists {
            email: "a@b.c".into(),
        })
        .await
        .unwrap();
    assert_eq!(out, "a@b.c is registered");
}

#[tokio::test]
async fn test_tui_is_not_one_shot() {
    let app = app(&Net::mock(), &Storage::mock());
    assert!(app.resolve(Command::Tui).await.is_err());
}
