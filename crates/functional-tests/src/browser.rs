//! A minimal scripted browser
//!
//! Follows redirects itself so the final URL of a submission is known,
//! and reads the to-do page structure (item form, list table, error text)
//! out of the returned HTML.

use regex::Regex;
use reqwest::redirect::Policy;
use reqwest::{header, Client, Response, StatusCode};

use crate::wait::{check, CheckError, CheckResult};

const MAX_REDIRECTS: usize = 10;

/// Patterns locating the to-do page structure
struct PagePatterns {
    form_action: Regex,
    table: Regex,
    row: Regex,
    error: Regex,
}

impl PagePatterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            form_action: Regex::new(r#"<form method="POST" action="([^"]*)""#)?,
            table: Regex::new(r#"(?s)<table id="id_list_table"[^>]*>(.*?)</table>"#)?,
            row: Regex::new(r"<tr><td>(.*?)</td></tr>")?,
            error: Regex::new(r#"<span class="help-block">(.*?)</span>"#)?,
        })
    }
}

/// Undo the entity escaping applied when pages are rendered
pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

pub struct Browser {
    client: Client,
    patterns: PagePatterns,
    base_url: String,
    current_url: String,
    status: StatusCode,
    page: String,
}

impl Browser {
    pub fn new(base_url: &str) -> CheckResult<Self> {
        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .map_err(|e| CheckError::Setup(e.to_string()))?;
        let patterns = PagePatterns::compile().map_err(|e| CheckError::Setup(e.to_string()))?;
        Ok(Self {
            client,
            patterns,
            base_url: base_url.trim_end_matches('/').to_string(),
            current_url: String::new(),
            status: StatusCode::OK,
            page: String::new(),
        })
    }

    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// Path of the current URL, relative to the server
    pub fn current_path(&self) -> &str {
        self.current_url
            .strip_prefix(&self.base_url)
            .unwrap_or(&self.current_url)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    fn absolute(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Load `path` and follow any redirects
    pub async fn get(&mut self, path: &str) -> CheckResult {
        let url = self.absolute(path);
        let response = self.client.get(&url).send().await?;
        self.settle(url, response).await
    }

    /// Type `text` into the item input and press enter
    pub async fn submit_item(&mut self, text: &str) -> CheckResult {
        let action = self
            .patterns
            .form_action
            .captures(&self.page)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| CheckError::Assertion("no item form on the page".into()))?;
        let url = self.absolute(&unescape_html(&action));
        let response = self
            .client
            .post(&url)
            .form(&[("text", text)])
            .send()
            .await?;
        self.settle(url, response).await
    }

    /// Fetch a resource without navigating, returning status, content type and body
    pub async fn fetch(&self, path: &str) -> CheckResult<(StatusCode, Option<String>, String)> {
        let response = self.client.get(self.absolute(path)).send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok((status, content_type, response.text().await?))
    }

    async fn settle(&mut self, mut url: String, mut response: Response) -> CheckResult {
        for _ in 0..MAX_REDIRECTS {
            if !response.status().is_redirection() {
                self.current_url = url;
                self.status = response.status();
                self.page = response.text().await?;
                return Ok(());
            }
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| CheckError::Driver(format!("redirect from {url} without location")))?
                .to_string();
            url = self.absolute(&location);
            response = self.client.get(&url).send().await?;
        }
        Err(CheckError::Driver(format!("too many redirects ending at {url}")))
    }

    /// Text of each row in the list table, e.g. `1: Buy milk`
    pub fn list_table_rows(&self) -> Vec<String> {
        self.patterns
            .table
            .captures(&self.page)
            .and_then(|c| c.get(1))
            .map(|table| {
                self.patterns
                    .row
                    .captures_iter(table.as_str())
                    .filter_map(|c| c.get(1))
                    .map(|m| unescape_html(m.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Validation message shown next to the item input
    pub fn error_message(&self) -> Option<String> {
        self.patterns
            .error
            .captures(&self.page)
            .and_then(|c| c.get(1))
            .map(|m| unescape_html(m.as_str()))
    }

    /// Value currently filled into the item input
    pub fn input_value(&self) -> Option<String> {
        let input = self.page.find(r#"id="id_text""#)?;
        let tag_end = self.page[input..].find('>')? + input;
        let tag = &self.page[input..tag_end];
        let start = tag.find(r#"value=""#)? + r#"value=""#.len();
        let end = tag[start..].find('"')? + start;
        Some(unescape_html(&tag[start..end]))
    }

    pub fn has_item_input(&self) -> bool {
        self.page.contains(r#"id="id_text""#)
    }

    pub fn expect_status(&self, status: StatusCode) -> CheckResult {
        check(
            self.status == status,
            format!("{} returned {}, expected {status}", self.current_url, self.status),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn browser_with(page: &str) -> Browser {
        let mut browser = Browser::new("http://127.0.0.1:1/").unwrap();
        browser.page = page.to_string();
        browser
    }

    #[test]
    fn test_reads_rows_and_error() {
        let form = superlists_ui::FormState::with_error(
            "/lists/1/",
            "Tom & Jerry",
            "You can't have an empty list item",
        );
        let items = vec!["Buy milk".to_string(), "<b>bold</b>".to_string()];
        let page = superlists_ui::list_page(form, items);
        let browser = browser_with(&page);

        assert_eq!(browser.list_table_rows(), vec!["1: Buy milk", "2: <b>bold</b>"]);
        assert_eq!(
            browser.error_message().as_deref(),
            Some("You can't have an empty list item")
        );
        assert_eq!(browser.input_value().as_deref(), Some("Tom & Jerry"));
    }

    #[test]
    fn test_empty_page_has_no_rows() {
        let browser = browser_with("<html></html>");
        assert!(browser.list_table_rows().is_empty());
        assert!(browser.error_message().is_none());
        assert!(!browser.has_item_input());
    }

    #[test]
    fn test_expect_status() {
        let mut browser = browser_with("");
        assert!(browser.expect_status(StatusCode::OK).is_ok());
        browser.status = StatusCode::NOT_FOUND;
        let err = browser.expect_status(StatusCode::OK).unwrap_err();
        assert!(matches!(err, CheckError::Assertion(ref msg) if msg.contains("404")));
    }

    #[test]
    fn test_current_path_strips_base() {
        let mut browser = browser_with("");
        browser.current_url = "http://127.0.0.1:1/lists/3/".to_string();
        assert_eq!(browser.current_path(), "/lists/3/");
    }
}
