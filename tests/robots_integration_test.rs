// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use robots_sitemap::{ResolverSettings, Robots, RobotsError, TransportSettings};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROBOTS: &str = "User-agent: *
Disallow: /cgi-bin/
Disallow: /search/
Crawl-delay: 1
Sitemap: http://example.com/index.xml.gz

User-agent: Yandexbot
Disallow: /
";

fn http_robots() -> Robots {
    let transport = TransportSettings {
        user_agent: "robots-sitemap-test/1.0".to_string(),
        ..TransportSettings::default()
    };
    Robots::http(&transport, ResolverSettings::default()).unwrap()
}

#[tokio::test]
async fn test_load_from_url_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .and(header("user-agent", "robots-sitemap-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ROBOTS))
        .expect(1)
        .mount(&server)
        .await;

    let mut robots = http_robots();
    robots
        .load_from_url(&format!("{}/robots.txt", server.uri()))
        .await
        .unwrap();

    assert!(robots.is_path_disallowed("/cgi-bin/x", "*").unwrap());
    assert!(!robots.is_path_disallowed("/", "*").unwrap());
    assert!(robots.is_path_disallowed("/anything", "Yandexbot").unwrap());
    assert_eq!(robots.crawl_delay("*").unwrap(), 1);
    assert_eq!(
        robots.sitemaps().unwrap(),
        &["http://example.com/index.xml.gz".to_string()]
    );
}

#[tokio::test]
async fn test_load_for_site_uses_root_robots() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /admin\n"))
        .expect(1)
        .mount(&server)
        .await;

    let mut robots = http_robots();
    robots
        .load_for_site(&format!("{}/blog/post?id=3", server.uri()))
        .await
        .unwrap();

    assert!(robots.is_path_disallowed("/admin/users", "SomeBot").unwrap());
}

#[tokio::test]
async fn test_html_error_page_is_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<!DOCTYPE html>\r\nUser-agent: *\r\nDisallow: /tmp\r\n"),
        )
        .mount(&server)
        .await;

    let mut robots = http_robots();
    robots
        .load_from_url(&format!("{}/robots.txt", server.uri()))
        .await
        .unwrap();

    assert!(robots.is_path_disallowed("/tmp/file", "*").unwrap());
}

#[tokio::test]
async fn test_missing_robots_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut robots = http_robots();
    let err = robots
        .load_from_url(&format!("{}/robots.txt", server.uri()))
        .await
        .unwrap_err();

    match err {
        RobotsError::Transport(e) => assert_eq!(e.status_code, Some(404)),
        other => panic!("expected transport error, got {:?}", other),
    }
    assert!(matches!(robots.crawl_delay("*"), Err(RobotsError::NotLoaded)));
}

#[tokio::test]
async fn test_unparsable_robots_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nCrawl-delay: soon\n"))
        .mount(&server)
        .await;

    let mut robots = http_robots();
    let err = robots
        .load_from_url(&format!("{}/robots.txt", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, RobotsError::Parse(ref e) if e.line_number() == 2));
    assert!(!robots.is_loaded());
}

#[tokio::test]
async fn test_oversized_robots_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ROBOTS))
        .mount(&server)
        .await;

    let transport = TransportSettings {
        max_content_size: 16,
        ..TransportSettings::default()
    };
    let mut robots = Robots::http(&transport, ResolverSettings::default()).unwrap();
    let err = robots
        .load_from_url(&format!("{}/robots.txt", server.uri()))
        .await
        .unwrap_err();

    match err {
        RobotsError::Transport(e) => {
            assert_eq!(e.status_code, None);
            assert!(e.message.contains("content too large"), "{}", e.message);
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}
