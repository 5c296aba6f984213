//! End-to-end resolution through the Fetcher against the memory backend.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};

use ssb_fetch::backend::{Backend, BackendError, Capabilities};
use ssb_fetch::core::{blob_id, convert_legacy, Identifier, JSON_MIME, OCTET_STREAM};
use ssb_fetch::{FetchConfig, FetchRequest, Fetcher};
use ssb_fetch_testkit::fixtures::{TestFixture, GIF_1X1, TEXT_BLOB};
use ssb_fetch_testkit::vectors::range_vectors;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_message() -> Result<()> {
    init_tracing();
    let fixture = TestFixture::new();
    let id = fixture.post("hello world")?;

    let response = fixture.fetcher().get(id.canonical_id()).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type(), Some(JSON_MIME));
    let record = response.json().expect("json body");
    assert_eq!(record["key"], json!(id.sigil()));
    assert_eq!(record["value"]["content"]["text"], "hello world");
    assert_eq!(record["value"]["author"], json!(fixture.feed_id().sigil()));
    Ok(())
}

#[tokio::test]
async fn test_get_message_by_uri_forms_only() -> Result<()> {
    let fixture = TestFixture::new();
    let id = fixture.post("hello")?;
    let fetcher = fixture.fetcher();

    let by_uri = fetcher.get(id.canonical_id()).await;
    let by_sigil = fetcher.get(&id.sigil()).await;
    let by_legacy = fetcher.get(&id.to_legacy_url()).await;
    let by_converted = fetcher.get(&convert_legacy(&id.sigil())?).await;

    assert_eq!(by_uri.status, 200);
    assert_eq!(by_legacy, by_uri);
    assert_eq!(by_converted, by_uri);

    assert_eq!(by_sigil.status, 400);
    assert_eq!(
        by_sigil.text(),
        Some(format!("BadRequestError:Only ssb: URLs can be fetched [{}]", id.sigil()).as_str())
    );
    Ok(())
}

#[tokio::test]
async fn test_head_message_matches_get() -> Result<()> {
    let fixture = TestFixture::new();
    let id = fixture.post("headers only")?;
    let fetcher = fixture.fetcher();

    let get = fetcher.get(id.canonical_id()).await;
    let head = fetcher.head(id.canonical_id()).await;

    assert_eq!(head.status, 200);
    assert!(head.body.is_none());
    assert_eq!(head.headers, get.headers);
    assert_eq!(head.content_length(), Some(get.body.as_ref().map_or(0, |b| b.len() as u64)));
    Ok(())
}

#[tokio::test]
async fn test_unknown_message_is_404() {
    let fixture = TestFixture::new();
    let missing = "%Aul3TnNcufZ/ttuwyuTjzQ0XiuBBEIqGdll+yujx54I=.sha256";
    let url = "ssb:message/sha256/Aul3TnNcufZ_ttuwyuTjzQ0XiuBBEIqGdll-yujx54I=";

    let response = fixture.fetcher().get(url).await;

    assert_eq!(response.status, 404);
    assert_eq!(
        response.text(),
        Some(format!("NotFoundError:Key not found in database [{missing}]").as_str())
    );
}

#[tokio::test]
async fn test_repeat_fetches_are_identical() -> Result<()> {
    let fixture = TestFixture::new();
    let id = fixture.post("same every time")?;
    let fetcher = fixture.fetcher();

    let first = fetcher.get(id.canonical_id()).await;
    let second = fetcher.get(id.canonical_id()).await;
    assert_eq!(first, second);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Blobs
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_text_blob() -> Result<()> {
    init_tracing();
    let fixture = TestFixture::new();
    let id = fixture.add_blob(TEXT_BLOB)?;

    let response = fixture.fetcher().get(id.canonical_id()).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type(), Some(OCTET_STREAM));
    assert_eq!(response.text(), Some("a test blob"));
    assert_eq!(response.header("ETag"), Some(id.canonical_id()));
    assert_eq!(response.header("Accept-Ranges"), Some("bytes"));
    assert_eq!(response.content_length(), Some(11));
    Ok(())
}

#[tokio::test]
async fn test_get_gif_blob() -> Result<()> {
    let fixture = TestFixture::new();
    let id = fixture.add_blob(GIF_1X1)?;

    let response = fixture.fetcher().get(id.canonical_id()).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type(), Some("image/gif"));
    assert_eq!(response.body.as_deref(), Some(GIF_1X1));
    Ok(())
}

#[tokio::test]
async fn test_get_json_blob() -> Result<()> {
    let fixture = TestFixture::new();
    let id = fixture.add_blob(br#"{"hello": ["world", 1]}"#)?;

    let response = fixture.fetcher().get(id.canonical_id()).await;

    assert_eq!(response.content_type(), Some(JSON_MIME));
    Ok(())
}

#[tokio::test]
async fn test_range_vectors() -> Result<()> {
    init_tracing();
    let fixture = TestFixture::new();
    let fetcher = fixture.fetcher();

    for vector in range_vectors() {
        let id = fixture.add_blob(vector.blob)?;
        let request = FetchRequest::get(id.canonical_id()).with_range(vector.header);

        let response = fetcher.fetch(&request).await;

        assert_eq!(response.status, 206, "{}", vector.name);
        assert_eq!(response.body.as_deref(), Some(vector.expected), "{}", vector.name);
        assert_eq!(
            response.content_length(),
            Some(vector.expected.len() as u64),
            "{}",
            vector.name
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_single_range_content_range() -> Result<()> {
    let fixture = TestFixture::new();
    let id = fixture.add_blob(TEXT_BLOB)?;
    let request = FetchRequest::get(id.canonical_id()).with_range("bytes=0-6");

    let response = fixture.fetcher().fetch(&request).await;

    assert_eq!(response.text(), Some("a test"));
    assert_eq!(response.header("Content-Range"), Some("bytes 0-5/11"));
    Ok(())
}

#[tokio::test]
async fn test_head_range_matches_get() -> Result<()> {
    let fixture = TestFixture::new();
    let id = fixture.add_blob(TEXT_BLOB)?;
    let fetcher = fixture.fetcher();

    let get = fetcher
        .fetch(&FetchRequest::get(id.canonical_id()).with_range("bytes=0-1,2-3,1-2,7-11"))
        .await;
    let head = fetcher
        .fetch(&FetchRequest::head(id.canonical_id()).with_range("bytes=0-1,2-3,1-2,7-11"))
        .await;

    assert_eq!(head.status, 206);
    assert!(head.body.is_none());
    assert_eq!(head.headers, get.headers);
    assert_eq!(head.content_length(), Some(7));
    Ok(())
}

#[tokio::test]
async fn test_malformed_range_serves_whole_blob() -> Result<()> {
    let fixture = TestFixture::new();
    let id = fixture.add_blob(TEXT_BLOB)?;

    for header in ["bytes=abc", "items=0-1", "bytes=5-2", "bytes=0-1,,2-3"] {
        let request = FetchRequest::get(id.canonical_id()).with_range(header);
        let response = fixture.fetcher().fetch(&request).await;
        assert_eq!(response.status, 200, "{header}");
        assert_eq!(response.text(), Some("a test blob"), "{header}");
    }
    Ok(())
}

#[tokio::test]
async fn test_remote_blob_is_wanted() -> Result<()> {
    init_tracing();
    let fixture = TestFixture::new();
    let id = fixture.add_remote_blob(TEXT_BLOB)?;

    let response = fixture.fetcher().get(id.canonical_id()).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.text(), Some("a test blob"));
    assert_eq!(fixture.backend.want_count(&id), 1);

    // Now local: no second want.
    fixture.fetcher().get(id.canonical_id()).await;
    assert_eq!(fixture.backend.want_count(&id), 1);
    Ok(())
}

#[tokio::test]
async fn test_unknown_blob_wants_once_then_404() {
    let fixture = TestFixture::new();
    let id = blob_id(b"nobody has this");

    let response = fixture.fetcher().get(id.canonical_id()).await;

    assert_eq!(response.status, 404);
    assert_eq!(
        response.text(),
        Some(format!("NotFoundError:Key blob not found in database [{}]", id.sigil()).as_str())
    );
    assert_eq!(fixture.backend.want_count(&id), 1);
}

#[tokio::test]
async fn test_want_can_be_disabled() -> Result<()> {
    let fixture = TestFixture::new();
    let id = fixture.add_remote_blob(TEXT_BLOB)?;
    let fetcher = fixture.fetcher_with(FetchConfig {
        want_missing_blobs: false,
        ..FetchConfig::default()
    });

    let response = fetcher.get(id.canonical_id()).await;

    assert_eq!(response.status, 404);
    assert_eq!(fixture.backend.want_count(&id), 0);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Profiles
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_profile_last_writer_wins() -> Result<()> {
    init_tracing();
    let fixture = TestFixture::new();
    fixture.about_self(json!({ "name": "bob", "description": "builder of tools" }))?;
    fixture.about_self(json!({ "location": "earth" }))?;
    fixture.about_self(json!({ "name": "robert" }))?;

    let feed = fixture.feed_id();
    let response = fixture.fetcher().get(feed.canonical_id()).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type(), Some(JSON_MIME));
    assert_eq!(
        response.json(),
        Some(json!({
            "name": "robert",
            "description": "builder of tools",
            "location": "earth",
            "id": feed.canonical_id(),
        }))
    );
    Ok(())
}

#[tokio::test]
async fn test_profile_image_forms() -> Result<()> {
    let alice = TestFixture::new();
    let carol = alice.peer();
    let image = alice.add_blob(GIF_1X1)?;

    alice.about_self(json!({ "image": image.sigil() }))?;
    carol.about_self(json!({ "image": { "link": image.sigil(), "size": GIF_1X1.len() } }))?;

    let fetcher = alice.fetcher();
    let alice_profile = fetcher.get(alice.feed_id().canonical_id()).await.json().expect("json");
    let carol_profile = fetcher.get(carol.feed_id().canonical_id()).await.json().expect("json");

    assert_eq!(alice_profile["image"], json!({ "link": image.sigil() }));
    assert_eq!(carol_profile["image"]["link"], json!(image.sigil()));
    assert_eq!(carol_profile["image"]["size"], json!(GIF_1X1.len()));
    Ok(())
}

#[tokio::test]
async fn test_profile_counts_assertions_by_others() -> Result<()> {
    let bob = TestFixture::new();
    let alice = bob.peer();
    bob.about_self(json!({ "name": "bob" }))?;
    alice.about(&bob.feed_id(), json!({ "name": "bobby" }))?;

    let profile = bob.fetcher().get(bob.feed_id().canonical_id()).await.json().expect("json");
    assert_eq!(profile["name"], "bobby");
    Ok(())
}

#[tokio::test]
async fn test_profile_of_unknown_feed_has_only_id() {
    let fixture = TestFixture::new();
    let feed = fixture.feed_id();

    let response = fixture.fetcher().get(feed.canonical_id()).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.json(), Some(json!({ "id": feed.canonical_id() })));
}

#[tokio::test]
async fn test_head_profile_matches_get() -> Result<()> {
    let fixture = TestFixture::new();
    let image = fixture.add_blob(GIF_1X1)?;
    fixture.about_self(json!({ "name": "bob", "image": image.sigil() }))?;
    let feed = fixture.feed_id();
    let fetcher = fixture.fetcher();

    let get = fetcher.get(feed.canonical_id()).await;
    let head = fetcher.head(feed.canonical_id()).await;

    assert_eq!(head.status, 200);
    assert!(head.body.is_none());
    assert_eq!(head.headers, get.headers);
    assert_eq!(head.content_type(), Some(JSON_MIME));
    assert_eq!(head.content_length(), Some(get.body.as_ref().map_or(0, |b| b.len() as u64)));
    Ok(())
}

#[tokio::test]
async fn test_profile_via_about_self_index() -> Result<()> {
    let bob = TestFixture::with_capabilities(Capabilities::about_self_only());
    let alice = bob.peer();
    bob.about_self(json!({ "name": "bob", "location": "here" }))?;
    bob.about_self(json!({ "name": "robert" }))?;
    alice.about(&bob.feed_id(), json!({ "name": "bobby" }))?;

    let feed = bob.feed_id();
    let response = bob.fetcher().get(feed.canonical_id()).await;

    assert_eq!(response.status, 200);
    assert_eq!(
        response.json(),
        Some(json!({
            "name": "robert",
            "location": "here",
            "id": feed.canonical_id(),
        }))
    );
    Ok(())
}

#[tokio::test]
async fn test_profile_without_capabilities() {
    init_tracing();
    let fixture = TestFixture::with_capabilities(Capabilities::none());

    let response = fixture.fetcher().get(fixture.feed_id().canonical_id()).await;

    assert_eq!(response.status, 404);
    assert_eq!(response.content_type(), Some(JSON_MIME));
    let body = response.json().expect("json body");
    assert_eq!(body["plugins"], json!(["ssb-about", "ssb-backlinks"]));
    assert!(body["error"].as_str().unwrap_or_default().contains("ssb-about"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Bad requests and shared behavior
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_invalid_protocol() {
    let fixture = TestFixture::new();

    let response = fixture.fetcher().get("https://example.com/%abc.sha256").await;

    assert_eq!(response.status, 400);
    assert!(response.text().unwrap_or_default().starts_with("BadRequestError:"));
}

#[tokio::test]
async fn test_invalid_identifier() {
    let fixture = TestFixture::new();

    for url in ["ssb:message/sha256", "ssb:thing/sha256/AAAA", "ssb:blob/sha256/!!!!"] {
        let response = fixture.fetcher().get(url).await;
        assert_eq!(response.status, 400, "{url}");
    }
}

#[tokio::test]
async fn test_cors_headers_on_every_response() -> Result<()> {
    let fixture = TestFixture::new();
    let blob = fixture.add_blob(TEXT_BLOB)?;
    let fetcher = fixture.fetcher();

    for url in [blob.canonical_id(), "ssb:nope", "http://x"] {
        let response = fetcher.get(url).await;
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"), "{url}");
        assert_eq!(response.header("Access-Control-Allow-Methods"), Some("GET, HEAD"), "{url}");
        assert!(response
            .header("Access-Control-Expose-Headers")
            .is_some_and(|h| h.contains("Content-Length")));
    }
    Ok(())
}

#[tokio::test]
async fn test_concurrent_fetches_share_backend() -> Result<()> {
    let fixture = TestFixture::new();
    let blob = fixture.add_blob(TEXT_BLOB)?;
    let post = fixture.post("concurrent")?;
    let fetcher = fixture.fetcher();

    let mut handles = Vec::new();
    for i in 0..8 {
        let fetcher = fetcher.clone();
        let url = if i % 2 == 0 {
            blob.canonical_id().to_string()
        } else {
            post.canonical_id().to_string()
        };
        handles.push(tokio::spawn(async move { fetcher.get(&url).await.status }));
    }
    for handle in handles {
        assert_eq!(handle.await?, 200);
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend failures
// ─────────────────────────────────────────────────────────────────────────────

/// A backend whose every call fails the same way.
struct FailingBackend {
    error: fn() -> BackendError,
}

#[async_trait]
impl Backend for FailingBackend {
    async fn get_record(&self, _id: &Identifier) -> ssb_fetch::backend::Result<Option<Value>> {
        Err((self.error)())
    }

    async fn has_blob(&self, _id: &Identifier) -> ssb_fetch::backend::Result<bool> {
        Ok(false)
    }

    async fn want_blob(&self, _id: &Identifier) -> ssb_fetch::backend::Result<bool> {
        Err((self.error)())
    }

    async fn get_blob(&self, _id: &Identifier) -> ssb_fetch::backend::Result<Option<Bytes>> {
        Err((self.error)())
    }

    async fn get_blob_slice(
        &self,
        _id: &Identifier,
        _start: u64,
        _end: Option<u64>,
    ) -> ssb_fetch::backend::Result<Option<Bytes>> {
        Err((self.error)())
    }

    async fn blob_size(&self, _id: &Identifier) -> ssb_fetch::backend::Result<Option<u64>> {
        Err((self.error)())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::about_and_backlinks()
    }

    async fn latest_about_value(
        &self,
        _feed: &Identifier,
        _field: &str,
    ) -> ssb_fetch::backend::Result<Option<Value>> {
        Err((self.error)())
    }
}

fn failing_fetcher(error: fn() -> BackendError) -> Fetcher<FailingBackend> {
    Fetcher::new(
        FailingBackend { error },
        FetchConfig {
            bug_report_hint: "File a bug.".to_string(),
            ..FetchConfig::default()
        },
    )
}

#[tokio::test]
async fn test_want_timeout_is_blob_not_found() {
    init_tracing();
    let fetcher = failing_fetcher(|| BackendError::Timeout("no peer answered".into()));
    let id = blob_id(TEXT_BLOB);

    let response = fetcher.get(id.canonical_id()).await;

    assert_eq!(response.status, 404);
    assert_eq!(
        response.text(),
        Some(format!("NotFoundError:Key blob not found in database [{}]", id.sigil()).as_str())
    );
}

#[tokio::test]
async fn test_unclassified_backend_error_is_500() {
    init_tracing();
    let fetcher = failing_fetcher(|| BackendError::Other("disk on fire".into()));
    let message = "%Aul3TnNcufZ/ttuwyuTjzQ0XiuBBEIqGdll+yujx54I=.sha256";

    for url in [
        convert_legacy(message).unwrap_or_default(),
        blob_id(TEXT_BLOB).canonical_id().to_string(),
    ] {
        let response = fetcher.get(&url).await;

        assert_eq!(response.status, 500, "{url}");
        assert_eq!(response.text(), Some("Server error. Sorry about that! File a bug."), "{url}");
        assert!(!response.text().unwrap_or_default().contains("disk on fire"));
    }
}

#[tokio::test]
async fn test_backend_error_during_profile_is_500() {
    let fetcher = failing_fetcher(|| BackendError::Other("index corrupt".into()));
    let feed = "ssb:feed/ed25519/AeqHNwjCn9Spob2u-kfYTHmNQDE__6g6tAwkXgJNm2E=";

    let response = fetcher.get(feed).await;

    assert_eq!(response.status, 500);
    assert_eq!(response.content_type(), Some("text/plain; charset=utf-8"));
}
