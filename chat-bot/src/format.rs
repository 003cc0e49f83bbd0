//! Reply formatting: model markdown to Telegram HTML.
//!
//! The assistant answers with `**bold**` / `*italic*` markdown; Telegram
//! gets HTML tags instead. Raw `&`, `<`, `>` are escaped first so model
//! output cannot break the HTML parse mode.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());

pub fn markdown_to_html(text: &str) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");

    let bolded = BOLD.replace_all(&escaped, "<b>$1</b>");
    ITALIC.replace_all(&bolded, "<i>$1</i>").into_owned()
}
