//! Server-rendered chat page: question form, latest answer and recent history.

use support_core::HistoryEntry;
use uuid::Uuid;

/// What to show above the history after a submit.
pub(crate) enum Notice {
    None,
    Answer(String),
    Error(String),
}

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 760px; margin: 2rem auto; }
.main { background-color: #f5f5f5; padding: 20px; border-radius: 10px; }
input[type=text] { width: 75%; border: 2px solid #0066cc; border-radius: 5px; padding: 6px; }
button { background-color: #0066cc; color: white; border: none; border-radius: 5px; padding: 7px 14px; }
.answer { border-left: 4px solid #2e7d32; padding-left: 10px; }
.error { color: #b00020; }
"#;

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full page. `history` is expected most-recent-first; entries are labelled Q1/A1 onwards.
pub(crate) fn render(app_name: &str, session_id: Uuid, notice: &Notice, history: &[HistoryEntry]) -> String {
    let title = escape_html(app_name);
    let style = STYLE;
    let notice_html = match notice {
        Notice::None => String::new(),
        Notice::Answer(answer) => format!(
            "<div class=\"answer\"><strong>Answer:</strong><p>{}</p></div>",
            escape_html(answer)
        ),
        Notice::Error(message) => format!("<p class=\"error\">{}</p>", escape_html(message)),
    };

    let mut history_html = String::new();
    if !history.is_empty() {
        history_html.push_str("<hr><h2>Conversation History</h2>");
        for (i, entry) in history.iter().enumerate() {
            let n = i + 1;
            history_html.push_str(&format!(
                "<p><strong>Q{n}:</strong> {}</p><p><strong>A{n}:</strong> {}</p><hr>",
                escape_html(&entry.question),
                escape_html(&entry.answer)
            ));
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title}</title><style>{style}</style></head>
<body>
<div class="main">
<h1>{title} Agent</h1>
<p>Ask me anything about Thoughtful AI's agents!</p>
<form method="post" action="/ask">
<label for="question">Your Question:</label>
<input type="text" id="question" name="question" placeholder="e.g., What does EVA do?" autofocus>
<input type="hidden" name="session_id" value="{session_id}">
<button type="submit">Ask</button>
</form>
{notice_html}
{history_html}
</div>
</body>
</html>
"#
    )
}
