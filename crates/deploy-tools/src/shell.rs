//! Shell quoting for commands sent to the remote host.
//!
//! Remote hosts are always Unix, so quoting uses the POSIX rules from
//! `shell-escape` regardless of where the tool runs.

use std::borrow::Cow;

use shell_escape::unix::escape;

/// Quote a single word for a POSIX shell
pub fn quote(word: &str) -> String {
    escape(Cow::Borrowed(word)).into_owned()
}

/// Escape a value for the replacement side of a `sed s|…|…|` expression
fn sed_replacement(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('&', "\\&")
}

/// Command that sets `KEY=value` in an env file, appending the line if the
/// key is not present yet
pub fn set_env_line(path: &str, key: &str, value: &str) -> String {
    let line = format!("{key}={value}");
    let expression = format!("s|^{key}=.*|{key}={}|", sed_replacement(value));
    let path = quote(path);
    format!(
        "if grep -q {pattern} {path}; \
         then sed -i {expression} {path}; \
         else echo {line} >> {path}; fi",
        pattern = quote(&format!("^{key}=")),
        expression = quote(&expression),
        line = quote(&line),
        path = path,
    )
}
