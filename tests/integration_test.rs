use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Server};
use tempfile::tempdir;

const SEARCH_BODY: &str = r#"{
    "count": 314,
    "results": [
        {
            "title": "Software Engineering Intern",
            "company": { "display_name": "Anteater Labs" },
            "location": { "display_name": "Irvine, CA" },
            "description": "Work on distributed systems.",
            "salary_min": 40000,
            "salary_max": 55000,
            "redirect_url": "https://example.com/job/1",
            "created": "2025-10-18T00:00:00Z"
        },
        {
            "title": "Backend Intern",
            "company": { "display_name": "Zot Inc" },
            "location": { "display_name": "Los Angeles, CA" },
            "description": "APIs all day."
        }
    ]
}"#;

/// Command with credentials set and retry delays disabled.
fn jobfetch(api_url: &str) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("jobfetch"));
    cmd.env_remove("JOBFETCH_API_URL")
        .env_remove("JOBFETCH_COUNTRY")
        .env("ADZUNA_APP_ID", "test-id")
        .env("ADZUNA_API_KEY", "test-key")
        .arg("--api-url")
        .arg(api_url)
        .arg("--retry-delay")
        .arg("0")
        .arg("--rate-limit-delay")
        .arg("0");
    cmd
}

fn search_args(cmd: &mut Command) -> &mut Command {
    cmd.arg("search")
        .arg("--role")
        .arg("Software Engineering Intern")
        .arg("--location")
        .arg("Los Angeles")
        .arg("-n")
        .arg("2")
}

#[test]
fn test_end_to_end_search() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server
        .mock("GET", "/us/search/1")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("app_id".into(), "test-id".into()),
            Matcher::UrlEncoded("app_key".into(), "test-key".into()),
            Matcher::UrlEncoded("results_per_page".into(), "2".into()),
            Matcher::UrlEncoded("what".into(), "Software Engineering Intern".into()),
            Matcher::UrlEncoded("where".into(), "Los Angeles".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SEARCH_BODY)
        .expect(1)
        .create();

    let mut cmd = jobfetch(&url);
    search_args(&mut cmd)
        .assert()
        .success()
        .stdout(predicates::str::contains("out of 314 total matches"))
        .stdout(predicates::str::contains("<company>Anteater Labs</company>"))
        .stdout(predicates::str::contains("$40,000 - $55,000"))
        .stdout(predicates::str::contains("[Job 2/2]"));

    mock.assert();
}

#[test]
fn test_search_recovers_from_server_errors() {
    let mut server = Server::new();
    let url = server.url();

    let failing = server
        .mock("GET", "/us/search/1")
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(2)
        .create();
    let ok = server
        .mock("GET", "/us/search/1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(SEARCH_BODY)
        .expect(1)
        .create();

    let mut cmd = jobfetch(&url);
    search_args(&mut cmd)
        .assert()
        .success()
        .stdout(predicates::str::contains("Backend Intern"));

    failing.assert();
    ok.assert();
}

#[test]
fn test_search_rate_limited_gives_up() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server
        .mock("GET", "/us/search/1")
        .match_query(Matcher::Any)
        .with_status(429)
        .expect(3)
        .create();

    let mut cmd = jobfetch(&url);
    search_args(&mut cmd)
        .assert()
        .failure()
        .stderr(predicates::str::contains("rate limit exceeded"));

    mock.assert();
}

#[test]
fn test_search_unauthorized_fails_without_retry() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server
        .mock("GET", "/us/search/1")
        .match_query(Matcher::Any)
        .with_status(401)
        .expect(1)
        .create();

    let mut cmd = jobfetch(&url);
    search_args(&mut cmd)
        .assert()
        .failure()
        .stderr(predicates::str::contains("authentication failed"));

    mock.assert();
}

#[test]
fn test_search_no_results() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/us/search/1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"count": 0, "results": []}"#)
        .create();

    let mut cmd = jobfetch(&url);
    search_args(&mut cmd)
        .assert()
        .success()
        .stdout(predicates::str::contains("No job listings found"));
}

#[test]
fn test_search_writes_report_file() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/us/search/1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(SEARCH_BODY)
        .create();

    let dir = tempdir().unwrap();
    let report_path = dir.path().join("report.txt");

    let mut cmd = jobfetch(&url);
    search_args(&mut cmd)
        .arg("--output")
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicates::str::contains("Report saved to"));

    let report = std::fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("Software Engineering Intern"));
}

#[test]
fn test_search_missing_credentials() {
    let mut cmd = Command::new(cargo::cargo_bin!("jobfetch"));
    cmd.env_remove("ADZUNA_APP_ID")
        .env_remove("ADZUNA_API_KEY")
        .arg("search")
        .arg("--role")
        .arg("x")
        .arg("--location")
        .arg("y")
        .assert()
        .failure()
        .stderr(predicates::str::contains("ADZUNA_APP_ID"))
        .stderr(predicates::str::contains("ADZUNA_API_KEY"));
}

#[test]
fn test_search_rejects_out_of_range_count() {
    let server = Server::new();
    let url = server.url();

    let mut cmd = jobfetch(&url);
    cmd.arg("search")
        .arg("--role")
        .arg("x")
        .arg("--location")
        .arg("y")
        .arg("-n")
        .arg("51")
        .assert()
        .failure()
        .stderr(predicates::str::contains("num_results"));
}
