use super::*;
use crate::net::{HttpMethod, MockReply, Net};

const BASE: &str = "http://shop.test";

fn url(kind: OptionKind) -> String {
    format!("{BASE}/api/options/{kind}")
}

fn facade(net: &Net, timeout: Duration) -> OptionsFacade {
    OptionsFacade::new(OptionsApi::new(net.clone(), BASE.into()), Log::mock(), timeout)
}

fn serve_all(net: &Net) {
    for kind in OptionKind::ALL {
        net.on(
            HttpMethod::Get,
            url(kind),
            MockReply::json(200, format!(r#"[{{"id":1,"label":"{} one"}}]"#, kind.title())),
        );
    }
}

async fn join(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test]
async fn test_starts_empty_without_errors() {
    let facade = facade(&Net::mock(), Duration::from_secs(1));
    for kind in OptionKind::ALL {
        let (list, error) = facade.snapshot(kind);
        assert!(list.is_empty());
        assert_eq!(error, None);
    }
}

#[tokio::test]
async fn test_load_all_requests_each_kind_once() {
    let net = Net::mock();
    serve_all(&net);
    let facade = facade(&net, Duration::from_secs(1));

    join(facade.load_all()).await;

    let requests = net.requests();
    assert_eq!(requests.len(), 5);
    for kind in OptionKind::ALL {
        let hits = requests.iter().filter(|r| *r.url == url(kind)).count();
        assert_eq!(hits, 1, "{kind} requested {hits} times");
        let (list, error) = facade.snapshot(kind);
        assert_eq!(list.len(), 1);
        assert_eq!(error, None);
    }
}

#[tokio::test]
async fn test_failed_load_publishes_error_and_empty_list() {
    let net = Net::mock();
    net.on(
        HttpMethod::Get,
        url(OptionKind::Cheeses),
        MockReply::json(500, "boom"),
    );
    let facade = facade(&net, Duration::from_secs(1));
    let mut list = facade.list(OptionKind::Cheeses);

    facade.load(OptionKind::Cheeses).await.unwrap();

    assert!(list.has_changed().unwrap());
    assert!(list.borrow_and_update().is_empty());
    let (_, error) = facade.snapshot(OptionKind::Cheeses);
    assert_eq!(error.as_deref(), Some("Failed to load cheeses"));
}

#[tokio::test]
async fn test_retry_clears_error_and_republishes() {
    let net = Net::mock();
    net.on(
        HttpMethod::Get,
        url(OptionKind::Meats),
        MockReply::Fail("refused".into()),
    )
    .on(
        HttpMethod::Get,
        url(OptionKind::Meats),
        MockReply::json(200, r#"[{"id":4,"label":"Ham"}]"#),
    );
    let facade = facade(&net, Duration::from_secs(1));

    facade.load(OptionKind::Meats).await.unwrap();
    assert_eq!(
        facade.snapshot(OptionKind::Meats).1.as_deref(),
        Some("Failed to load meats")
    );

    let handle = facade.retry(OptionKind::Meats);
    // The error is cleared as soon as the retry starts
    assert_eq!(facade.snapshot(OptionKind::Meats).1, None);
    handle.await.unwrap();

    let (list, error) = facade.snapshot(OptionKind::Meats);
    assert_eq!(&*list, &[SandwichOption::new(4, "Ham")]);
    assert_eq!(error, None);
}

#[tokio::test]
async fn test_stalled_load_times_out() {
    let net = Net::mock();
    net.on(HttpMethod::Get, url(OptionKind::Breads), MockReply::Stall);
    let facade = facade(&net, Duration::from_millis(30));
    let error = facade.error(OptionKind::Breads);

    facade.load(OptionKind::Breads).await.unwrap();

    assert_eq!(error.borrow().as_deref(), Some("Failed to load breads"));
    assert!(facade.snapshot(OptionKind::Breads).0.is_empty());
}

#[tokio::test]
async fn test_late_subscriber_sees_latest_value() {
    let net = Net::mock();
    serve_all(&net);
    let facade = facade(&net, Duration::from_secs(1));
    join(facade.load_all()).await;

    let toppings = facade.list(OptionKind::Toppings);
    assert_eq!(toppings.borrow()[0].label, "Toppings one");
}

#[tokio::test]
async fn test_failure_is_logged() {
    let net = Net::mock();
    let log = Log::mock();
    let facade = OptionsFacade::new(
        OptionsApi::new(net.clone(), BASE.into()),
        log.clone(),
        Duration::from_secs(1),
    );
    facade.load(OptionKind::Dressings).await.unwrap();

    let messages = log.messages().unwrap();
    assert!(messages
        .iter()
        .any(|m| m.scope == SCOPE && m.message.starts_with("Loading dressings failed")));
}

#[tokio::test]
async fn test_concurrent_loads_last_to_finish_wins() {
    let net = Net::mock();
    net.on(
        HttpMethod::Get,
        url(OptionKind::Meats),
        MockReply::delayed(Duration::from_millis(100), 200, r#"[{"id":4,"label":"Ham"}]"#),
    )
    .on(
        HttpMethod::Get,
        url(OptionKind::Meats),
        MockReply::Fail("refused".into()),
    );
    let facade = facade(&net, Duration::from_secs(1));

    let slow = facade.load(OptionKind::Meats);
    while net.requests().is_empty() {
        tokio::task::yield_now().await;
    }
    let fast = facade.load(OptionKind::Meats);

    fast.await.unwrap();
    let (list, error) = facade.snapshot(OptionKind::Meats);
    assert!(list.is_empty());
    assert_eq!(error.as_deref(), Some("Failed to load meats"));

    slow.await.unwrap();
    assert_eq!(net.requests().len(), 2);
    let (list, error) = facade.snapshot(OptionKind::Meats);
    assert_eq!(&*list, &[SandwichOption::new(4, "Ham")]);
    assert_eq!(error, None);
}
