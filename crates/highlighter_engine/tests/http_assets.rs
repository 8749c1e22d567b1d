use highlighter_engine::{AssetError, AssetFetchSettings, AssetLoader, HttpAssetLoader};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn loader(server: &MockServer, settings: AssetFetchSettings) -> HttpAssetLoader {
    let base = Url::parse(&format!("{}/ext/", server.uri())).expect("base url");
    HttpAssetLoader::new(base, settings).expect("client")
}

#[tokio::test]
async fn loads_text_relative_to_base() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ext/instructions.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("Be brief.\n", "text/plain; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let loader = loader(&server, AssetFetchSettings::default()).await;
    let text = loader.load_text("/instructions.txt").await.expect("load ok");
    assert_eq!(text, "Be brief.\n");
}

#[tokio::test]
async fn missing_asset_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ext/missing.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let loader = loader(&server, AssetFetchSettings::default()).await;
    let err = loader.load_text("missing.txt").await.unwrap_err();
    assert_eq!(err, AssetError::NotFound("missing.txt".to_string()));
}

#[tokio::test]
async fn server_errors_carry_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ext/instructions.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let loader = loader(&server, AssetFetchSettings::default()).await;
    let err = loader.load_text("instructions.txt").await.unwrap_err();
    assert!(matches!(err, AssetError::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn oversized_asset_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ext/instructions.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("0123456789", "text/plain"))
        .mount(&server)
        .await;

    let settings = AssetFetchSettings {
        max_bytes: 4,
        ..AssetFetchSettings::default()
    };
    let loader = loader(&server, settings).await;
    let err = loader.load_text("instructions.txt").await.unwrap_err();
    assert!(matches!(err, AssetError::TooLarge { max_bytes: 4, .. }));
}
