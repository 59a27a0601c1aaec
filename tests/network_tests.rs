use ghostscan::model::NetworkSnapshot;
use ghostscan::sections::network_items;
use ghostscan::{GeoLookupProvider, LookupError, NetworkSource};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve one canned HTTP response on a loopback port and return its URL
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 1024];
        while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
        }
        let request = String::from_utf8_lossy(&raw).to_string();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        request
    });
    (format!("http://{}/json/", addr), handle)
}

#[tokio::test]
async fn successful_lookup_parses_optional_fields() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"ip":"198.51.100.23","city":"Osaka","country_name":"Japan","country_code":"JP","asn":"AS2516","latitude":34.69,"longitude":135.5,"unexpected":[1,2]}"#,
    )
    .await;
    let provider = GeoLookupProvider::new(url, "ghostscan-test/1.0").unwrap();

    let snapshot = provider.lookup().await.unwrap();
    assert_eq!(snapshot.ip.as_deref(), Some("198.51.100.23"));
    assert_eq!(snapshot.city.as_deref(), Some("Osaka"));
    assert_eq!(snapshot.latitude, Some(34.69));
    assert_eq!(snapshot.org, None);
    assert!(!snapshot.is_error());

    let request = server.await.unwrap().to_ascii_lowercase();
    assert!(request.starts_with("get /json/ "));
    assert!(request.contains("cache-control: no-store"));
    assert!(request.contains("user-agent: ghostscan-test/1.0"));
}

#[tokio::test]
async fn non_success_status_is_a_provider_error() {
    let (url, _server) = serve_once("503 Service Unavailable", r#"{"error":"busy"}"#).await;
    let provider = GeoLookupProvider::new(url, "ghostscan-test/1.0").unwrap();

    let err = provider.lookup().await.unwrap_err();
    assert_eq!(err, LookupError::Provider { status: 503 });
    assert_eq!(err.to_string(), "Provider error: 503");
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let (url, _server) = serve_once("200 OK", "<html>rate limited</html>").await;
    let provider = GeoLookupProvider::new(url, "ghostscan-test/1.0").unwrap();

    let err = provider.lookup().await.unwrap_err();
    assert!(matches!(err, LookupError::Decode(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    // bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let provider = GeoLookupProvider::new(format!("http://{}/", addr), "ghostscan-test/1.0").unwrap();
    let err = provider.lookup().await.unwrap_err();
    match err {
        LookupError::Transport(message) => assert!(!message.is_empty()),
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn string_coordinates_are_accepted() {
    let (url, _server) = serve_once(
        "200 OK",
        r#"{"ip":"198.51.100.7","latitude":"38.7223","longitude":"-9.1393","organization_name":"Example","country":"Portugal","asn":64500}"#,
    )
    .await;
    let provider = GeoLookupProvider::new(url, "ghostscan-test/1.0").unwrap();

    let snapshot = provider.lookup().await.unwrap();
    assert!(!snapshot.is_error());
    assert_eq!(snapshot.latitude, Some(38.7223));
    assert_eq!(snapshot.longitude, Some(-9.1393));
    assert_eq!(snapshot.asn.as_ref().map(|a| a.to_string()).as_deref(), Some("64500"));

    let coords = network_items(&snapshot)
        .into_iter()
        .find(|item| item.label() == Some("Coords"))
        .and_then(|item| item.value().map(str::to_string));
    assert_eq!(coords.as_deref(), Some("38.7223, -9.1393"));
}

#[tokio::test]
async fn reserved_address_flag_uses_the_reason() {
    let (url, _server) = serve_once(
        "200 OK",
        r#"{"ip":"127.0.0.1","error":true,"reason":"Reserved IP Address","reserved":true,"version":"IPv4"}"#,
    )
    .await;
    let provider = GeoLookupProvider::new(url, "ghostscan-test/1.0").unwrap();

    let snapshot = provider.lookup().await.unwrap();
    assert_eq!(snapshot.error.as_deref(), Some("Reserved IP Address"));

    let items = network_items(&snapshot);
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].value(), Some("Error: Reserved IP Address"));
}

#[test]
fn empty_or_false_error_is_no_error() {
    let blank: NetworkSnapshot = serde_json::from_str(r#"{"ip":"192.0.2.4","error":""}"#).unwrap();
    assert!(!blank.is_error());
    let flag: NetworkSnapshot = serde_json::from_str(r#"{"ip":"192.0.2.4","error":false}"#).unwrap();
    assert!(!flag.is_error());
    let bare: NetworkSnapshot = serde_json::from_str(r#"{"error":true}"#).unwrap();
    assert_eq!(bare.error.as_deref(), Some("Failed to fetch IP"));
    let garbage: NetworkSnapshot = serde_json::from_str(r#"{"latitude":"north","longitude":null}"#).unwrap();
    assert_eq!(garbage.latitude, None);
}
