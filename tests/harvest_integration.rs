//! End-to-end harvest tests against a wiremock GitHub API.

use camino::Utf8PathBuf;
use gh_census::config::Config;
use gh_census::progress::ProgressReporter;
use gh_census::report::csv::{COLUMNS, write_dataset};
use gh_census::{harvest, report};
use serde_json::json;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer, queries: Vec<&str>, max_page: u32) -> Config {
    Config {
        queries: queries.into_iter().map(str::to_string).collect(),
        max_page,
        workers: 4,
        page_pause_secs: 0,
        api_base: server.uri(),
        seed: Some(42),
        ..Config::default()
    }
}

fn search_item(login: &str) -> serde_json::Value {
    json!({ "login": login, "html_url": format!("https://github.com/{login}") })
}

fn profile_body(followers: u64) -> serde_json::Value {
    json!({
        "followers": followers,
        "following": 3,
        "public_gists": 1,
        "created_at": "2014-02-01T00:00:00Z",
        "bio": "writes code",
        "email": "user@example.com",
        "hireable": true,
        "location": "Iceland",
    })
}

fn repos_body() -> serde_json::Value {
    json!([
        {
            "language": "Rust",
            "stargazers_count": 10,
            "forks_count": 2,
            "fork": false,
            "updated_at": "2024-01-01T00:00:00Z",
            "topics": ["cli"],
            "size": 120,
        },
        {
            "language": "Rust",
            "stargazers_count": 1,
            "forks_count": 0,
            "fork": true,
            "updated_at": "2023-06-15T00:00:00Z",
            "topics": ["cli", "tools"],
            "size": 30,
        },
    ])
}

async fn mount_search_page(server: &MockServer, query: &str, page: u32, items: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("q", query))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(server)
        .await;
}

async fn mount_user(server: &MockServer, login: &str, profile: ResponseTemplate, repos: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/users/{login}")))
        .respond_with(profile)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/users/{login}/repos")))
        .respond_with(repos)
        .mount(server)
        .await;
}

#[tokio::test]
async fn two_shards_yield_two_fully_populated_rows() {
    let server = MockServer::start().await;

    let query_a = "type:user created:<2015-01-01";
    let query_b = "type:user created:>2021-01-01";
    mount_search_page(&server, query_a, 1, vec![search_item("alice")]).await;
    mount_search_page(&server, query_b, 1, vec![search_item("bob")]).await;

    for login in ["alice", "bob"] {
        mount_user(
            &server,
            login,
            ResponseTemplate::new(200).set_body_json(profile_body(7)),
            ResponseTemplate::new(200).set_body_json(repos_body()),
        )
        .await;
    }

    let config = test_config(&server, vec![query_a, query_b], 1);
    let records = harvest::run(&config, &ProgressReporter::hidden()).await.unwrap();

    assert_eq!(records.len(), 2);

    let mut logins: Vec<&str> = records.iter().map(|r| r.username.as_str()).collect();
    logins.sort_unstable();
    assert_eq!(logins, ["alice", "bob"]);

    for record in &records {
        assert_eq!(record.profile_url, format!("https://github.com/{}", record.username));
        assert_eq!(record.country, "Iceland");
        assert_eq!(record.repo_count, 2);
        assert_eq!(record.followers, 7);
        assert_eq!(record.top_languages, "Rust");
        assert_eq!(record.most_used_language, "Rust");
        assert_eq!(record.total_stars, 11);
        assert_eq!(record.total_forks, 2);
        assert_eq!(record.forked_count, 1);
        assert_eq!(record.last_activity, "2024-01-01T00:00:00Z");
        assert_eq!(record.topics, "cli, tools");
        assert_eq!(record.total_size_kb, 150);
        assert!(record.hireable);
    }

    // And the dataset round-trips through the writer.
    let dir = tempfile::tempdir().unwrap();
    let out = Utf8PathBuf::from_path_buf(dir.path().join("dataset.csv")).unwrap();
    write_dataset(&records, &out).unwrap();

    let contents = std::fs::read_to_string(&out).unwrap();
    assert_eq!(contents.lines().next().unwrap(), COLUMNS.join(","));
    assert_eq!(contents.lines().count(), 3);
}

#[tokio::test]
async fn an_empty_page_stops_paging_the_query() {
    let server = MockServer::start().await;

    let query = "type:user created:<2015-01-01";

    // Whatever page the shuffled order tries first comes back empty, so
    // exactly one search request is ever issued.
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server, vec![query], 5);
    let records = harvest::run(&config, &ProgressReporter::hidden()).await.unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn a_permanently_failing_search_page_reads_as_empty() {
    let server = MockServer::start().await;

    let query = "type:user created:<2015-01-01";

    Mock::given(method("GET"))
        .and(path("/search/users"))
        .respond_with(ResponseTemplate::new(422))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server, vec![query], 5);
    let records = harvest::run(&config, &ProgressReporter::hidden()).await.unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn profile_404_drops_the_identity_entirely() {
    let server = MockServer::start().await;

    let query = "type:user created:<2015-01-01";
    mount_search_page(&server, query, 1, vec![search_item("ghost"), search_item("real")]).await;

    Mock::given(method("GET"))
        .and(path("/users/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    mount_user(
        &server,
        "real",
        ResponseTemplate::new(200).set_body_json(profile_body(1)),
        ResponseTemplate::new(200).set_body_json(repos_body()),
    )
    .await;

    let config = test_config(&server, vec![query], 1);
    let records = harvest::run(&config, &ProgressReporter::hidden()).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].username, "real");
}

#[tokio::test]
async fn repo_500_still_yields_a_record_with_defaults() {
    let server = MockServer::start().await;

    let query = "type:user created:<2015-01-01";
    mount_search_page(&server, query, 1, vec![search_item("carol")]).await;

    mount_user(
        &server,
        "carol",
        ResponseTemplate::new(200).set_body_json(profile_body(5)),
        ResponseTemplate::new(500),
    )
    .await;

    let config = test_config(&server, vec![query], 1);
    let records = harvest::run(&config, &ProgressReporter::hidden()).await.unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.username, "carol");
    assert_eq!(record.followers, 5);
    assert_eq!(record.repo_count, 0);
    assert_eq!(record.total_stars, 0);
    assert_eq!(record.most_used_language, "None");
    assert_eq!(record.top_languages, "");
    assert_eq!(record.last_activity, "N/A");
    assert_eq!(record.topics, "");
}

#[tokio::test]
async fn a_throttled_search_request_is_retried_after_the_indicated_delay() {
    let server = MockServer::start().await;

    let query = "type:user created:<2015-01-01";

    // First response throttles with a one-second Retry-After; the retry of
    // the identical request then succeeds.
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .respond_with(ResponseTemplate::new(403).insert_header("Retry-After", "1"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    mount_search_page(&server, query, 1, vec![search_item("dave")]).await;

    mount_user(
        &server,
        "dave",
        ResponseTemplate::new(200).set_body_json(profile_body(2)),
        ResponseTemplate::new(200).set_body_json(json!([])),
    )
    .await;

    let config = test_config(&server, vec![query], 1);
    let records = harvest::run(&config, &ProgressReporter::hidden()).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].username, "dave");
}

#[tokio::test]
async fn a_pool_smaller_than_the_identity_count_still_produces_every_record() {
    let server = MockServer::start().await;

    let query = "type:user created:>2021-01-01";
    let items: Vec<serde_json::Value> = (0..8).map(|i| search_item(&format!("user{i}"))).collect();
    mount_search_page(&server, query, 1, items).await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/users/user\d+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body(1)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/users/user\d+/repos$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut config = test_config(&server, vec![query], 1);
    config.workers = 3;

    let records = harvest::run(&config, &ProgressReporter::hidden()).await.unwrap();
    assert_eq!(records.len(), 8);
}

#[tokio::test]
async fn duplicate_identities_across_shards_are_preserved() {
    let server = MockServer::start().await;

    // The same user surfaces in two overlapping query windows; the run keeps
    // both occurrences (documented source behavior, no deduplication layer).
    let query_a = "type:user created:<2015-01-01";
    let query_b = "type:user created:<2018-01-01";
    mount_search_page(&server, query_a, 1, vec![search_item("twin")]).await;
    mount_search_page(&server, query_b, 1, vec![search_item("twin")]).await;

    mount_user(
        &server,
        "twin",
        ResponseTemplate::new(200).set_body_json(profile_body(1)),
        ResponseTemplate::new(200).set_body_json(json!([])),
    )
    .await;

    let config = test_config(&server, vec![query_a, query_b], 1);
    let records = harvest::run(&config, &ProgressReporter::hidden()).await.unwrap();

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.username == "twin"));
}

#[tokio::test]
async fn dataset_write_reports_through_the_report_module() {
    let server = MockServer::start().await;

    let query = "type:user created:<2015-01-01";
    mount_search_page(&server, query, 1, vec![search_item("erin")]).await;
    mount_user(
        &server,
        "erin",
        ResponseTemplate::new(200).set_body_json(json!({})),
        ResponseTemplate::new(200).set_body_json(json!([])),
    )
    .await;

    let config = test_config(&server, vec![query], 1);
    let records = harvest::run(&config, &ProgressReporter::hidden()).await.unwrap();

    // An empty profile payload still fills every column with its sentinel.
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.country, "Unknown");
    assert_eq!(record.created_at, "N/A");
    assert_eq!(record.bio, "N/A");
    assert_eq!(record.email, "N/A");
    assert!(!record.hireable);

    let dir = tempfile::tempdir().unwrap();
    let out = Utf8PathBuf::from_path_buf(dir.path().join("out.csv")).unwrap();
    report::csv::write_dataset(&records, &out).unwrap();
    assert!(out.exists());
}
