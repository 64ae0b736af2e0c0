use functional_tests::{check, Browser, CheckResult, LiveServer};

#[tokio::test]
async fn stylesheet_is_linked_and_served() -> CheckResult {
    let server = LiveServer::start().await?;
    let mut browser = Browser::new(server.url())?;

    browser.get("/").await?;
    check(
        browser.page().contains(r#"<link href="/static/base.css" rel="stylesheet""#),
        "stylesheet not linked",
    )?;
    check(browser.page().contains("jumbotron"), "layout container missing")?;

    let (status, content_type, body) = browser.fetch("/static/base.css").await?;
    check(status.is_success(), format!("stylesheet returned {status}"))?;
    check(
        content_type.as_deref().is_some_and(|t| t.starts_with("text/css")),
        format!("stylesheet served as {content_type:?}"),
    )?;
    check(body.contains(".jumbotron"), "stylesheet content")
}

#[tokio::test]
async fn list_page_keeps_the_input_box() -> CheckResult {
    let server = LiveServer::start().await?;
    let mut browser = Browser::new(server.url())?;

    browser.get("/").await?;
    check(browser.has_item_input(), "no input on home page")?;
    browser.submit_item("testing").await?;
    check(browser.has_item_input(), "no input on list page")?;
    check(browser.page().contains("Your To-Do list"), "list header")
}
