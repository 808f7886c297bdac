use axum::http::StatusCode;
use futures::{StreamExt, TryStreamExt};

use crate::{ApiError, ClientConfig, Cursor, LinksClient, Phase, Route};


use mock_service::{ListRequest, MockService};

fn names(routes: &[Route]) -> Vec<&str> {
    routes.iter().map(|route| route.name.as_str()).collect()
}

async fn setup() -> (MockService, LinksClient) {
    let service = MockService::new();
    let endpoint = service.start().await;
    let client = LinksClient::new(ClientConfig::new(endpoint)).unwrap();
    (service, client)
}

#[tokio::test]
async fn test_fetch_page_decodes_routes_and_cursor() {
    let (service, client) = setup().await;
    service.set_page("", &["docs", "wiki"], "d2lraQ==");

    let page = client.fetch_page(&Cursor::start(), 2).await.unwrap();

    assert_eq!(names(&page.items), vec!["docs", "wiki"]);
    assert_eq!(page.items[0].url, "https://docs.example.com");
    assert_eq!(page.next, Cursor::from("d2lraQ=="));
    assert!(!page.is_last());

    assert_eq!(
        service.requests(),
        vec![ListRequest {
            cursor: String::new(),
            limit: Some(2),
            include_generated_names: None,
        }]
    );
}

#[tokio::test]
async fn test_fetch_page_forwards_generated_names_flag() {
    let service = MockService::new();
    let endpoint = service.start().await;
    let client =
        LinksClient::new(ClientConfig::new(endpoint).with_generated_names(true)).unwrap();
    service.set_page("abc", &[], "");

    let page = client.fetch_page(&Cursor::from("abc"), 50).await.unwrap();
    assert!(page.items.is_empty());
    assert!(page.is_last());

    let request = &service.requests()[0];
    assert_eq!(request.cursor, "abc");
    assert_eq!(request.limit, Some(50));
    assert_eq!(request.include_generated_names.as_deref(), Some("true"));
}

#[tokio::test]
async fn test_fetch_page_reads_optional_fields() {
    let (service, client) = setup().await;
    service.set_raw_page(
        "",
        StatusCode::OK,
        r#"{"ok":true,"routes":[
            {"name":"a","url":"https://a.example.com","source_host":"go","time":"2024-01-02T03:04:05Z"},
            {"name":"b","url":"https://b.example.com"}
        ]}"#,
    );

    let page = client.fetch_page(&Cursor::start(), 10).await.unwrap();

    assert_eq!(page.items[0].source_host.as_deref(), Some("go"));
    assert!(page.items[0].time.is_some());
    assert_eq!(page.items[1].source_host, None);
    assert_eq!(page.items[1].time, None);
    assert!(page.is_last());
}

#[tokio::test]
async fn test_fetch_page_service_error() {
    let (service, client) = setup().await;
    service.set_failing_page("", "invalid limit value");

    let error = client.fetch_page(&Cursor::start(), 0).await.unwrap_err();
    assert!(error.is_service());
    assert_eq!(error.to_string(), "invalid limit value");
}

#[tokio::test]
async fn test_fetch_page_service_error_without_message() {
    let (service, client) = setup().await;
    service.set_raw_page("", StatusCode::INTERNAL_SERVER_ERROR, r#"{"ok":false}"#);

    let error = client.fetch_page(&Cursor::start(), 10).await.unwrap_err();
    assert_eq!(error.to_string(), golinks_types::DEFAULT_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_fetch_page_malformed_body() {
    let (service, client) = setup().await;
    service.set_raw_page("", StatusCode::BAD_GATEWAY, "<html>upstream gone</html>");

    let error = client.fetch_page(&Cursor::start(), 10).await.unwrap_err();
    assert!(matches!(error, ApiError::Protocol(_)), "{error:?}");
}

#[tokio::test]
async fn test_fetch_page_transport_error() {
    // Bind then drop to find a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = LinksClient::new(ClientConfig::new(format!("http://{}", addr))).unwrap();
    let error = client.fetch_page(&Cursor::start(), 10).await.unwrap_err();
    assert!(matches!(error, ApiError::Transport(_)), "{error:?}");
}

#[tokio::test]
async fn test_all_routes_walks_every_page() {
    let (service, client) = setup().await;
    service.set_page("", &["a", "b"], "c1");
    service.set_page("c1", &[], "c2");
    service.set_page("c2", &["c"], "");

    let routes = client.all_routes();
    let all: Vec<Route> = routes.attach().try_collect().await.unwrap();

    assert_eq!(names(&all), vec!["a", "b", "c"]);
    assert_eq!(routes.phase(), Phase::Done);
    assert_eq!(routes.pages(), 3);

    let cursors: Vec<String> = service.requests().into_iter().map(|r| r.cursor).collect();
    assert_eq!(cursors, vec!["", "c1", "c2"]);
}

#[tokio::test]
async fn test_all_routes_uses_configured_page_size() {
    let service = MockService::new();
    let endpoint = service.start().await;
    let client = LinksClient::new(ClientConfig::new(endpoint).with_page_size(2)).unwrap();
    service.set_page("", &["a"], "");

    let all: Vec<Route> = client.all_routes().attach().try_collect().await.unwrap();
    assert_eq!(names(&all), vec!["a"]);
    assert_eq!(service.requests()[0].limit, Some(2));
}

#[tokio::test]
async fn test_attachments_share_requests() {
    let (service, client) = setup().await;
    service.set_page("", &["a", "b"], "c1");
    service.set_page("c1", &["c"], "c2");
    service.set_page("c2", &["d"], "");

    let routes = client.all_routes();
    let (first, second) = tokio::join!(
        routes.attach().try_collect::<Vec<_>>(),
        routes.attach().try_collect::<Vec<_>>(),
    );
    let first = first.unwrap();
    let second = second.unwrap();

    assert_eq!(names(&first), vec!["a", "b", "c", "d"]);
    assert_eq!(first, second);
    assert_eq!(service.requests().len(), 3);

    // A late attachment replays without touching the service
    let late: Vec<Route> = routes.attach().try_collect().await.unwrap();
    assert_eq!(late, first);
    assert_eq!(service.requests().len(), 3);
}

#[tokio::test]
async fn test_failed_page_can_be_retried() {
    let (service, client) = setup().await;
    service.set_page("", &["a"], "c1");
    service.set_failing_page("c1", "backend unavailable");

    let routes = client.all_routes();
    let mut attachment = routes.attach();

    assert_eq!(attachment.next().await.unwrap().unwrap().name, "a");

    let failed = attachment.next().await.unwrap().unwrap_err();
    assert_eq!(failed.page, 1);
    assert_eq!(failed.attempt, 1);
    assert!(matches!(&*failed.error, ApiError::Service(m) if m == "backend unavailable"));
    assert_eq!(routes.phase(), Phase::Failed { attempt: 1 });
    assert_eq!(routes.buffered(), 1);

    service.set_page("c1", &["b"], "");
    assert_eq!(attachment.next().await.unwrap().unwrap().name, "b");
    assert!(attachment.next().await.is_none());

    let cursors: Vec<String> = service.requests().into_iter().map(|r| r.cursor).collect();
    assert_eq!(cursors, vec!["", "c1", "c1"]);
}

#[tokio::test]
async fn test_get_route() {
    let (service, client) = setup().await;
    service.set_route("docs", "https://docs.example.com");

    let route = client.get_route("docs").await.unwrap();
    assert_eq!(route, Route::new("docs", "https://docs.example.com"));
}

#[tokio::test]
async fn test_get_missing_route_is_unassigned() {
    let (_service, client) = setup().await;

    let route = client.get_route("nope").await.unwrap();
    assert_eq!(route.name, "nope");
    assert!(!route.is_assigned());
}

#[tokio::test]
async fn test_post_route() {
    let (service, client) = setup().await;

    let route = client
        .post_route("blog", "https://blog.example.com")
        .await
        .unwrap();
    assert_eq!(route, Route::new("blog", "https://blog.example.com"));
    assert_eq!(service.route("blog").unwrap().url, "https://blog.example.com");

    let route = client.get_route("blog").await.unwrap();
    assert_eq!(route.url, "https://blog.example.com");
}

#[tokio::test]
async fn test_post_route_rejected() {
    let (_service, client) = setup().await;

    let error = client.post_route("blog", "").await.unwrap_err();
    assert!(matches!(error, ApiError::Service(m) if m == "url required"));
}

#[tokio::test]
async fn test_post_route_name_is_encoded() {
    let (service, client) = setup().await;

    client
        .post_route("team docs", "https://docs.example.com/team")
        .await
        .unwrap();
    assert!(service.route("team docs").is_some());
}

#[tokio::test]
async fn test_delete_route() {
    let (service, client) = setup().await;
    service.set_route("docs", "https://docs.example.com");

    let route = client.delete_route("docs").await.unwrap();
    assert_eq!(route, Route::unassigned("docs"));
    assert!(service.route("docs").is_none());

    let error = client.delete_route("docs").await.unwrap_err();
    assert!(matches!(error, ApiError::Service(m) if m == "Failed to delete route"));
}

#[tokio::test]
async fn test_get_config() {
    let (service, client) = setup().await;
    service.set_host("go");

    let config = client.get_config().await.unwrap();
    assert_eq!(config.host, "go");
}
