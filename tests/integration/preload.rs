//! Preload hints: `Link` headers, one push per session, cookie round trip.

use anyhow::Result;
use tera::Context;
use tera_encore::preload::hash_url;
use tera_encore::response::ResponseHeaders;

use crate::common::fixture_project;

/// `Cookie` header a browser would send back after receiving `headers`.
fn cookie_header(headers: &ResponseHeaders) -> String {
    headers
        .cookies()
        .filter_map(|cookie| cookie.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

#[test]
fn test_preload_emits_link_and_cookie() -> Result<()> {
    let project = fixture_project()?;
    let engine = project.engine()?;
    let scope = engine.request(None);

    let html = scope.render("preload.html", &Context::new())?;
    assert!(html.contains(r#"<link rel="preload" href="&#x2F;fonts&#x2F;text.woff2">"#));
    assert!(html.contains(r#"<link rel="stylesheet" href="&#x2F;assets&#x2F;css&#x2F;website.css">"#));

    let headers = scope.take_headers();
    assert_eq!(
        headers.links().collect::<Vec<_>>(),
        vec![
            "</fonts/text.woff2>; rel=preload; as=font; type=font/woff2; crossorigin",
            "</assets/css/website.css>; rel=preload; as=style",
        ]
    );
    assert_eq!(
        headers.cookies().next(),
        Some(
            format!(
                "h2pushes_{}=1; Path=/; Secure; HttpOnly; SameSite=Strict",
                hash_url("/fonts/text.woff2")
            )
            .as_str()
        )
    );
    Ok(())
}

#[test]
fn test_url_pushed_once_per_scope() -> Result<()> {
    let project = fixture_project()?;
    let engine = project.engine()?;
    let scope = engine.request(None);

    scope.render("preload.html", &Context::new())?;
    scope.render("preload.html", &Context::new())?;

    let headers = scope.take_headers();
    assert_eq!(headers.links().count(), 2);
    assert_eq!(headers.cookies().count(), 2);
    assert_eq!(scope.preload_cache().len(), 2);
    Ok(())
}

#[test]
fn test_cookie_round_trip_suppresses_push() -> Result<()> {
    let project = fixture_project()?;
    let engine = project.engine()?;

    let first = engine.request(None);
    first.render("preload.html", &Context::new())?;
    let cookies = cookie_header(&first.take_headers());

    let second = engine.request(Some(&cookies));
    let html = second.render("preload.html", &Context::new())?;
    assert!(html.contains("text.woff2"));
    assert!(second.take_headers().is_empty());
    Ok(())
}

#[test]
fn test_nopush_is_always_emitted() -> Result<()> {
    let project = fixture_project()?;
    let mut engine = project.engine()?;
    engine.add_template("nopush.txt", r#"{{ preload(url="/app.js", as_type="script", nopush=true) }}"#)?;
    let scope = engine.request(None);

    scope.render("preload.html", &Context::new())?;
    for _ in 0..3 {
        assert_eq!(scope.render("nopush.txt", &Context::new())?, "/app.js");
    }

    let headers = scope.take_headers();
    let nopush: Vec<_> = headers.links().filter(|link| link.ends_with("; nopush")).collect();
    assert_eq!(nopush, vec!["</app.js>; rel=preload; as=script; nopush"; 3]);
    assert_eq!(headers.cookies().count(), 2);
    assert!(!scope.preload_cache().contains_url("/app.js"));
    Ok(())
}

#[test]
fn test_nopush_emitted_for_cached_url() -> Result<()> {
    let project = fixture_project()?;
    let mut engine = project.engine()?;
    engine.add_templates([
        ("push.txt", r#"{{ preload(url="/x") }}"#),
        ("nopush.txt", r#"{{ preload(url="/x", nopush=true) }}"#),
    ])?;
    let scope = engine.request(None);

    assert_eq!(scope.render("push.txt", &Context::new())?, "/x");
    assert_eq!(scope.render("push.txt", &Context::new())?, "/x");
    assert_eq!(scope.render("nopush.txt", &Context::new())?, "/x");

    let headers = scope.take_headers();
    assert_eq!(
        headers.links().collect::<Vec<_>>(),
        vec!["</x>; rel=preload", "</x>; rel=preload; nopush"]
    );
    assert_eq!(headers.cookies().count(), 1);
    assert!(scope.preload_cache().contains_url("/x"));
    Ok(())
}

#[test]
fn test_entrypoints_preload() -> Result<()> {
    let project = fixture_project()?;
    let mut engine = project.engine()?;
    engine.add_template(
        "preloaded.txt",
        r#"{% set cors = '{"crossorigin": true}' | json_decode %}{{ entrypoints(entry="website", type="css", preload=true) }}{{ entrypoints(entry="website", type="js", preload=cors) }}"#,
    )?;
    let scope = engine.request(None);
    scope.render("preloaded.txt", &Context::new())?;

    let headers = scope.take_headers();
    assert_eq!(
        headers.links().collect::<Vec<_>>(),
        vec![
            "</assets/css/website.css>; rel=preload; as=style",
            "</assets/js/website.js>; rel=preload; as=script; crossorigin",
            "</assets/js/vendor.js>; rel=preload; as=script; crossorigin",
        ]
    );
    Ok(())
}

#[test]
fn test_headers_apply_to_http_response() -> Result<()> {
    let project = fixture_project()?;
    let engine = project.engine()?;
    let scope = engine.request(Some("theme=dark"));
    scope.render("preload.html", &Context::new())?;

    let mut map = http::HeaderMap::new();
    map.append(http::header::LINK, http::HeaderValue::from_static("</existing.css>; rel=preload"));
    scope.take_headers().apply_to(&mut map)?;

    assert_eq!(map.get_all(http::header::LINK).iter().count(), 3);
    assert_eq!(map.get_all(http::header::SET_COOKIE).iter().count(), 2);
    Ok(())
}

#[test]
fn test_render_outside_scope_drops_headers() -> Result<()> {
    let project = fixture_project()?;
    let engine = project.engine()?;

    let first = engine.render("preload.html", &Context::new())?;
    let second = engine.render("preload.html", &Context::new())?;
    assert_eq!(first, second);

    let scope = engine.request(None);
    scope.render("preload.html", &Context::new())?;
    assert_eq!(scope.take_headers().links().count(), 2);
    Ok(())
}
