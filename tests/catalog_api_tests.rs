use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use comic_press::auth::AuthService;
use comic_press::catalog::CatalogRepository;
use comic_press::db::sqlite::{AuthStorage, CatalogStorage};
use comic_press::media::MediaStore;
use comic_press::router::{AppState, comic_router};
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

async fn test_app(tag: &str) -> (Router, PathBuf, tempfile::TempDir) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "comic-press-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", temp_path.display());
    let pool = comic_press::db::connect(&database_url)
        .await
        .expect("failed to open test database");
    let catalog_storage = CatalogStorage::new(pool.clone());
    catalog_storage
        .init_schema()
        .await
        .expect("failed to init schema");

    let auth = AuthService::new(AuthStorage::new(pool));
    auth.seed_admin("admin@example.com", Some("admin123"))
        .await
        .expect("failed to seed admin");

    let media_dir = tempfile::tempdir().expect("failed to create media dir");
    let media = MediaStore::new(media_dir.path().to_path_buf(), "/media".to_string(), None);

    let state = AppState::new(CatalogRepository::new(catalog_storage), auth, media, true);
    (comic_router(state), temp_path, media_dir)
}

async fn login(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"email":"admin@example.com","password":"admin123"}"#,
                ))
                .unwrap(),
        )
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.headers()
        .get(header::SET_COOKIE)
        .expect("missing Set-Cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn issue_payload(title: &str, desc: &str, tags: &[&str], date: &str, rating: f64) -> String {
    json!({
        "title": title,
        "description": desc,
        "thumbnail": format!("/media/issues/{title}.jpg"),
        "pages": ["p1.jpg", "p2.jpg", "p3.jpg"],
        "tags": tags,
        "release_date": date,
        "rating": rating,
    })
    .to_string()
}

async fn create_issue(app: &Router, cookie: &str, payload: String) -> i64 {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/issues")
                .header("content-type", "application/json")
                .header("cookie", cookie)
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .expect("create request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let outcome: Value = serde_json::from_slice(&body).unwrap();
    outcome["id"].as_i64().expect("missing id in outcome")
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("request failed");
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

/// Three issues released Jan/Feb/Mar, with "mystery" only on the second.
async fn seed_three(app: &Router, cookie: &str) -> Vec<i64> {
    let mut ids = Vec::new();
    ids.push(
        create_issue(
            app,
            cookie,
            issue_payload("Origins", "where it began", &["drama"], "2024-01-01", 4.8),
        )
        .await,
    );
    ids.push(
        create_issue(
            app,
            cookie,
            issue_payload(
                "The First Smoke",
                "a chance encounter",
                &["mystery", "drama"],
                "2024-02-01",
                4.9,
            ),
        )
        .await,
    );
    ids.push(
        create_issue(
            app,
            cookie,
            issue_payload(
                "Smoke and Mirrors",
                "nothing is as it seems",
                &["thriller"],
                "2024-03-01",
                4.7,
            ),
        )
        .await,
    );
    ids
}

#[tokio::test]
async fn list_honors_the_requested_sort() {
    let (app, temp_path, _media) = test_app("list-sort").await;
    let cookie = login(&app).await;
    seed_three(&app, &cookie).await;

    let (status, list) = get_json(&app, "/api/issues?sort=newest").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Smoke and Mirrors", "The First Smoke", "Origins"]);

    let (_, list) = get_json(&app, "/api/issues?sort=oldest").await;
    assert_eq!(list[0]["title"], "Origins");

    let (_, list) = get_json(&app, "/api/issues?sort=rating").await;
    assert_eq!(list[0]["title"], "The First Smoke");

    // The featured issue is the latest by release date.
    let (status, featured) = get_json(&app, "/api/issues/featured").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(featured["title"], "Smoke and Mirrors");

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn search_filters_by_term_and_tag_conjunction() {
    let (app, temp_path, _media) = test_app("search").await;
    let cookie = login(&app).await;
    seed_three(&app, &cookie).await;

    // Empty term and no tags: everything matches.
    let (status, body) = get_json(&app, "/api/search?q=&tags=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);

    // Tag present only on the second issue.
    let (_, body) = get_json(&app, "/api/search?tags=mystery").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["title"], "The First Smoke");

    // Case-insensitive term over title or description.
    let (_, body) = get_json(&app, "/api/search?q=SEEMS").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["title"], "Smoke and Mirrors");

    // AND across tags: no issue carries both.
    let (_, body) = get_json(&app, "/api/search?tags=mystery,thriller").await;
    assert_eq!(body["count"], 0);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn detail_carries_number_navigation_and_viewer_bootstrap() {
    let (app, temp_path, _media) = test_app("detail").await;
    let cookie = login(&app).await;
    let ids = seed_three(&app, &cookie).await;

    let (status, detail) = get_json(&app, &format!("/api/issues/{}", ids[1])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["issue"]["id"].as_i64(), Some(ids[1]));
    // Second-oldest release date: issue #2.
    assert_eq!(detail["number"], 2);
    assert_eq!(detail["prev"]["id"].as_i64(), Some(ids[0]));
    assert_eq!(detail["next"]["id"].as_i64(), Some(ids[2]));
    assert_eq!(detail["viewer"]["page_count"], 3);
    assert_eq!(detail["viewer"]["start_page"], 0);
    assert_eq!(detail["viewer"]["prefetch"], json!([1]));

    // Edges render no link on the missing side.
    let (_, first) = get_json(&app, &format!("/api/issues/{}", ids[0])).await;
    assert_eq!(first["prev"], Value::Null);
    assert_eq!(first["number"], 1);

    let (status, body) = get_json(&app, "/api/issues/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn deleting_the_middle_issue_relinks_neighbors() {
    let (app, temp_path, _media) = test_app("delete-middle").await;
    let cookie = login(&app).await;
    let ids = seed_three(&app, &cookie).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/issues/{}", ids[1]))
                .header("cookie", &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Ids are no longer contiguous; prev of the last issue skips the gap.
    let (_, detail) = get_json(&app, &format!("/api/issues/{}", ids[2])).await;
    assert_eq!(detail["prev"]["id"].as_i64(), Some(ids[0]));
    assert_eq!(detail["next"], Value::Null);

    let (status, _) = get_json(&app, &format!("/api/issues/{}", ids[1])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn update_is_a_full_replace_and_refetches() {
    let (app, temp_path, _media) = test_app("update").await;
    let cookie = login(&app).await;
    let ids = seed_three(&app, &cookie).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/issues/{}", ids[0]))
                .header("content-type", "application/json")
                .header("cookie", &cookie)
                .body(Body::from(issue_payload(
                    "Origins Redux",
                    "rewritten",
                    &["drama", "drama", "comedy"],
                    "2024-01-01",
                    9.0,
                )))
                .unwrap(),
        )
        .await
        .expect("update request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let outcome: Value = serde_json::from_slice(&body).unwrap();
    // The re-fetched catalog reflects the write.
    assert_eq!(outcome["catalog"].as_array().unwrap().len(), 3);

    let (_, detail) = get_json(&app, &format!("/api/issues/{}", ids[0])).await;
    assert_eq!(detail["issue"]["title"], "Origins Redux");
    // Duplicate tags collapsed, rating clamped on the way in.
    assert_eq!(detail["issue"]["tags"], json!(["drama", "comedy"]));
    assert_eq!(detail["issue"]["rating"], 5.0);

    // Updating a missing id is a 404.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/issues/999")
                .header("content-type", "application/json")
                .header("cookie", &cookie)
                .body(Body::from(issue_payload(
                    "Ghost",
                    "missing",
                    &[],
                    "2024-01-01",
                    1.0,
                )))
                .unwrap(),
        )
        .await
        .expect("update request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn invalid_draft_is_rejected_with_422() {
    let (app, temp_path, _media) = test_app("invalid-draft").await;
    let cookie = login(&app).await;

    let payload = json!({
        "title": "   ",
        "description": "",
        "thumbnail": "",
        "pages": ["p1.jpg"],
        "tags": [],
        "release_date": "2024-01-01",
        "rating": 3.0,
    })
    .to_string();
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/issues")
                .header("content-type", "application/json")
                .header("cookie", &cookie)
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .expect("create request failed");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn tag_vocabulary_is_distinct_and_sorted() {
    let (app, temp_path, _media) = test_app("tags").await;
    let cookie = login(&app).await;
    seed_three(&app, &cookie).await;

    let (status, tags) = get_json(&app, "/api/tags").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tags, json!(["drama", "mystery", "thriller"]));

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn stats_reflect_the_catalog() {
    let (app, temp_path, _media) = test_app("stats").await;
    let cookie = login(&app).await;
    let ids = seed_three(&app, &cookie).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/stats")
                .header("cookie", &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("stats request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let stats: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["latest_id"].as_i64(), ids.iter().max().copied());

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn upload_stores_files_and_serves_them_back() {
    let (app, temp_path, _media) = test_app("uploads").await;
    let cookie = login(&app).await;

    let boundary = "comic-press-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"files\"; filename=\"page1.jpg\"\r\n\
         Content-Type: image/jpeg\r\n\r\n\
         fake-jpeg-bytes\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"files\"; filename=\"page2.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         fake-png-bytes\r\n\
         --{boundary}--\r\n"
    );

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/uploads")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .header("cookie", &cookie)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .expect("upload request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let outcomes: Value = serde_json::from_slice(&body).unwrap();
    let outcomes = outcomes.as_array().unwrap();
    assert_eq!(outcomes.len(), 2);
    for outcome in outcomes {
        assert!(outcome["url"].as_str().unwrap().starts_with("/media/issues/"));
        assert_eq!(outcome["error"], Value::Null);
    }

    // The first file serves back with its content type.
    let url = outcomes[0]["url"].as_str().unwrap();
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(url).body(Body::empty()).unwrap())
        .await
        .expect("media request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/jpeg"
    );
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"fake-jpeg-bytes");

    let _ = fs::remove_file(&temp_path);
}
