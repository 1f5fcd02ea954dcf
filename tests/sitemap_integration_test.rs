// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use flate2::write::GzEncoder;
use flate2::Compression;
use robots_sitemap::{
    ResolverSettings, Robots, SitemapError, SitemapResolver, TransportSettings,
};
use robots_sitemap::services::transport::HttpTransport;
use std::io::Write;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gzip(data: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

fn urlset(base: &str, pages: &[&str]) -> String {
    let urls: String = pages
        .iter()
        .map(|page| format!("<url><loc>{base}{page}</loc><priority>0.5</priority></url>"))
        .collect();
    format!("\u{feff}<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">{urls}</urlset>")
}

fn sitemap_index(children: &[String]) -> String {
    let entries: String = children
        .iter()
        .map(|child| format!("<sitemap><loc>{child}</loc></sitemap>"))
        .collect();
    format!("<sitemapindex xmlns=\"https://www.sitemaps.org/schemas/sitemap/0.9\">{entries}</sitemapindex>")
}

async fn mount(server: &MockServer, at: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

fn resolver(settings: ResolverSettings) -> SitemapResolver {
    let transport = HttpTransport::new(&TransportSettings::default()).unwrap();
    SitemapResolver::new(Arc::new(transport), settings)
}

#[tokio::test]
async fn test_gzip_index_resolves_in_document_order() {
    let server = MockServer::start().await;
    let base = server.uri();
    let index = sitemap_index(&[
        format!("{base}/sitemap-posts.xml"),
        format!("{base}/sitemap-pages.xml.gz"),
    ]);

    mount(&server, "/index.xml.gz", gzip(&index)).await;
    mount(&server, "/sitemap-posts.xml", urlset(&base, &["/p1", "/p2", "/p3"]).into_bytes()).await;
    mount(&server, "/sitemap-pages.xml.gz", gzip(&urlset(&base, &["/about", "/contact"]))).await;

    let resolution = resolver(ResolverSettings::default())
        .resolve(&format!("{base}/index.xml.gz"))
        .await
        .unwrap();

    let locs: Vec<String> = resolution.entries.iter().map(|e| e.loc.replace(&base, "")).collect();
    assert_eq!(locs, vec!["/p1", "/p2", "/p3", "/about", "/contact"]);
    assert_eq!(resolution.entries[0].priority.as_deref(), Some("0.5"));
    assert!(resolution.is_complete());
}

#[tokio::test]
async fn test_suppress_mode_skips_missing_child() {
    let server = MockServer::start().await;
    let base = server.uri();
    let index = sitemap_index(&[format!("{base}/gone.xml"), format!("{base}/ok.xml")]);

    mount(&server, "/index.xml", index.into_bytes()).await;
    mount(&server, "/ok.xml", urlset(&base, &["/kept"]).into_bytes()).await;

    let settings = ResolverSettings {
        suppress_errors: true,
        ..ResolverSettings::default()
    };
    let resolution = resolver(settings)
        .resolve(&format!("{base}/index.xml"))
        .await
        .unwrap();

    assert_eq!(resolution.len(), 1);
    assert_eq!(resolution.failures.len(), 1);
    assert!(matches!(
        &resolution.failures[0].error,
        SitemapError::Transport(e) if e.status_code == Some(404)
    ));
}

#[tokio::test]
async fn test_missing_child_fails_without_suppression() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(&server, "/index.xml", sitemap_index(&[format!("{base}/gone.xml")]).into_bytes()).await;

    let err = resolver(ResolverSettings::default())
        .resolve(&format!("{base}/index.xml"))
        .await
        .unwrap_err();

    assert!(matches!(err, SitemapError::Transport(ref e) if e.url.ends_with("/gone.xml")));
}

#[tokio::test]
async fn test_robots_sitemaps_resolve_end_to_end() {
    let server = MockServer::start().await;
    let base = server.uri();
    let robots_txt = format!("User-agent: *\nDisallow: /private\nSitemap: {base}/sitemap.xml\n");

    mount(&server, "/robots.txt", robots_txt.into_bytes()).await;
    mount(&server, "/sitemap.xml", urlset(&base, &["/", "/docs"]).into_bytes()).await;

    let mut robots = Robots::http(&TransportSettings::default(), ResolverSettings::default()).unwrap();
    robots.load_for_site(&base).await.unwrap();
    let resolution = robots.resolve_sitemaps(None).await.unwrap();

    assert_eq!(resolution.len(), 2);
    assert!(robots.is_path_disallowed("/private/x", "*").unwrap());
}
