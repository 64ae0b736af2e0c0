//! Functional test harness for superlists
//!
//! Drives the application over HTTP the way a visitor would. Set
//! `STAGING_SERVER=<host>` to run the same checks against a deployed site.

pub mod browser;
pub mod live_server;
pub mod wait;

pub use browser::Browser;
pub use live_server::LiveServer;
pub use reqwest::StatusCode;
pub use wait::{check, wait_for, wait_for_async, CheckError, CheckResult, Retryable};

use std::time::Instant;

use wait::{MAX_WAIT, POLL_INTERVAL};

/// Reload the current page until the list table contains `row_text`
///
/// Polls on the same 500 ms / 5 s schedule as [`wait_for`].
pub async fn wait_for_row_in_list_table(browser: &mut Browser, row_text: &str) -> CheckResult {
    let start = Instant::now();
    let url = browser.current_url().to_string();
    loop {
        let rows = browser.list_table_rows();
        let error = match check(
            rows.iter().any(|row| row == row_text),
            format!("{row_text:?} not in list table {rows:?}"),
        ) {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        if start.elapsed() >= MAX_WAIT {
            return Err(error);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
        if let Err(e) = browser.get(&url).await {
            if !e.is_retryable() || start.elapsed() >= MAX_WAIT {
                return Err(e);
            }
        }
    }
}
