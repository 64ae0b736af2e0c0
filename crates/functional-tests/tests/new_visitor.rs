use functional_tests::{
    check, wait_for_row_in_list_table, Browser, CheckResult, LiveServer, StatusCode,
};

#[tokio::test]
async fn can_start_a_list_and_retrieve_it_later() -> CheckResult {
    let server = LiveServer::start().await?;
    let mut edith = Browser::new(server.url())?;

    // the home page invites her to start a list
    edith.get("/").await?;
    edith.expect_status(StatusCode::OK)?;
    check(edith.page().contains("<title>To-Do lists</title>"), "page title")?;
    check(edith.page().contains("Start a new To-Do list"), "home header")?;
    check(
        edith.page().contains(r#"placeholder="Enter a to-do item""#),
        "input placeholder",
    )?;

    edith.submit_item("Buy peacock feathers").await?;
    wait_for_row_in_list_table(&mut edith, "1: Buy peacock feathers").await?;

    edith.submit_item("Use peacock feathers to make a fly").await?;
    wait_for_row_in_list_table(&mut edith, "1: Buy peacock feathers").await?;
    wait_for_row_in_list_table(&mut edith, "2: Use peacock feathers to make a fly").await?;
    check(edith.list_table_rows().len() == 2, "exactly two rows")?;

    // the list survives a fresh visit to its URL
    let list_url = edith.current_path().to_string();
    let mut later = Browser::new(server.url())?;
    later.get(&list_url).await?;
    later.expect_status(StatusCode::OK)?;
    wait_for_row_in_list_table(&mut later, "2: Use peacock feathers to make a fly").await
}

#[tokio::test]
async fn multiple_users_can_start_lists_at_different_urls() -> CheckResult {
    let server = LiveServer::start().await?;

    let mut edith = Browser::new(server.url())?;
    edith.get("/").await?;
    edith.submit_item("Buy peacock feathers").await?;
    wait_for_row_in_list_table(&mut edith, "1: Buy peacock feathers").await?;
    let edith_url = edith.current_path().to_string();
    check(
        edith_url.starts_with("/lists/") && edith_url.ends_with('/'),
        format!("unexpected list url {edith_url}"),
    )?;

    // a new visitor sees none of her items
    let mut francis = Browser::new(server.url())?;
    francis.get("/").await?;
    check(!francis.page().contains("Buy peacock feathers"), "edith's item leaked")?;

    francis.submit_item("Buy milk").await?;
    wait_for_row_in_list_table(&mut francis, "1: Buy milk").await?;
    let francis_url = francis.current_path().to_string();
    check(francis_url.starts_with("/lists/"), "francis has a list url")?;
    check(francis_url != edith_url, "lists share a url")?;
    check(!francis.page().contains("Buy peacock feathers"), "edith's item on francis' list")
}
