//! Read-only web view over the dialog history.
//!
//! A single page listing every stored dialog row, oldest first. No auth and
//! no mutation routes; this is an operator's window into the database, not
//! an API.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use storage::{DialogRecord, DialogRepository};
use tracing::error;

/// Builds the app: `GET /` renders the dialog table.
pub fn router(dialogs: DialogRepository) -> Router {
    Router::new().route("/", get(dialog_page)).with_state(dialogs)
}

pub async fn dialog_page(
    State(dialogs): State<DialogRepository>,
) -> Result<Html<String>, StatusCode> {
    let records = dialogs.list_all().await.map_err(|e| {
        error!(error = %e, "failed to load dialog history");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Html(render_page(&records)))
}

/// Renders the dialog listing. All user-supplied text is escaped; message
/// text arrives straight from Telegram users.
fn render_page(records: &[DialogRecord]) -> String {
    let mut rows = String::new();
    for record in records {
        let author = if record.is_from_user { "user" } else { "assistant" };
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&record.id),
            record.user_id,
            author,
            escape(&record.text),
            record.created_at.format("%Y-%m-%d %H:%M:%S"),
        ));
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Dialogs</title></head>\n\
         <body>\n<h1>Dialogs</h1>\n<table border=\"1\">\n\
         <tr><th>id</th><th>user</th><th>author</th><th>text</th><th>created</th></tr>\n\
         {rows}</table>\n</body>\n</html>\n"
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(text: &str, is_from_user: bool) -> DialogRecord {
        DialogRecord {
            id: "row-1".to_string(),
            user_id: 42,
            text: text.to_string(),
            is_from_user,
            created_at: Utc::now(),
        }
    }

    /// **Test: message text is escaped before it reaches the page.**
    ///
    /// **Setup:** A record whose text contains markup.
    /// **Action:** `render_page`.
    /// **Expected:** The raw tag never appears; the escaped form does.
    #[test]
    fn test_render_escapes_user_text() {
        let page = render_page(&[record("<script>alert(1)</script>", true)]);

        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    /// **Test: the author column reflects the message direction.**
    ///
    /// **Setup:** One inbound and one outbound record.
    /// **Action:** `render_page`.
    /// **Expected:** Both "user" and "assistant" rows present.
    #[test]
    fn test_render_labels_author() {
        let page = render_page(&[record("hi", true), record("hello", false)]);

        assert!(page.contains("<td>user</td>"));
        assert!(page.contains("<td>assistant</td>"));
    }

    #[test]
    fn test_render_empty_history() {
        let page = render_page(&[]);

        assert!(page.contains("<table"));
        assert!(page.contains("<th>text</th>"));
    }
}
