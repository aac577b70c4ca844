//! Server-rendered HTML for the search and summarize pages.

use common::BackendKind;
use common::render::{escape_html, render_html};
use fetcher::SearchOutcome;

const STYLE: &str = r#"
    body { font-family: system-ui, sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; color: #222; }
    form { display: grid; gap: .6rem; margin-bottom: 1.5rem; }
    input[type=text], textarea, select { padding: .45rem; font-size: 1rem; }
    button { padding: .5rem 1rem; font-size: 1rem; cursor: pointer; }
    .error { background: #fde8e8; border: 1px solid #f5b5b5; padding: .6rem; border-radius: 4px; }
    .job-list { list-style: none; padding: 0; }
    .job { border-bottom: 1px solid #eee; padding: .6rem 0; display: grid; gap: .2rem; }
    .company, .location, .no-link { color: #555; }
    .raw { background: #f6f6f6; padding: .5rem; overflow-x: auto; font-size: .8rem; }
"#;

/// Wraps `content` in the shared page chrome.
pub fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    <h1>Job Search Scraper</h1>
    <p>Find job postings for a role from Google or the Google Jobs API, and summarize job descriptions with an open-source model.</p>
    {content}
</body>
</html>"#
    )
}

/// Values echoed back into the search form.
#[derive(Debug, Default, Clone)]
pub struct SearchFormState<'a> {
    pub role: &'a str,
    pub location: &'a str,
    pub backend: Option<BackendKind>,
    pub raw: bool,
}

pub fn search_form(
    state: &SearchFormState<'_>,
    backends: &[BackendKind],
    default: BackendKind,
) -> String {
    let selected = state.backend.unwrap_or(default);
    let options: String = backends
        .iter()
        .map(|kind| {
            let sel = if *kind == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{sel}>{}</option>"#,
                kind.as_str(),
                kind.label()
            )
        })
        .collect();
    let raw_checked = if state.raw { " checked" } else { "" };

    format!(
        r#"<form method="get" action="/search">
        <label>Enter the job role (e.g., TPM, Data Scientist):
            <input type="text" name="role" value="{}" placeholder="Type a job role here...">
        </label>
        <label>Location (optional):
            <input type="text" name="location" value="{}" placeholder="Worldwide">
        </label>
        <label>Source: <select name="backend">{options}</select></label>
        <label><input type="checkbox" name="raw"{raw_checked}> Show raw API records</label>
        <button type="submit">Find Jobs</button>
    </form>
    <p><a href="/?nlp=on">Enable NLP Analysis</a></p>"#,
        escape_html(state.role),
        escape_html(state.location),
    )
}

pub fn summarize_form(text: &str) -> String {
    format!(
        r#"<h3>NLP Analysis (e.g., Summarization):</h3>
    <form method="post" action="/summarize">
        <label>Paste a job description or content here:
            <textarea name="text" rows="8">{}</textarea>
        </label>
        <button type="submit">Summarize</button>
    </form>"#,
        escape_html(text)
    )
}

fn error_box(message: &str) -> String {
    format!(r#"<div class="error">{}</div>"#, escape_html(message))
}

/// Landing page: the search form, plus the summarize form when enabled.
pub fn index_page(backends: &[BackendKind], default: BackendKind, nlp: bool) -> String {
    let mut content = search_form(&SearchFormState::default(), backends, default);
    if nlp {
        content.push_str(&summarize_form(""));
    }
    layout("Job Search", &content)
}

/// Results page for one search action.
pub fn results_page(
    form: &SearchFormState<'_>,
    backends: &[BackendKind],
    default: BackendKind,
    outcome: &SearchOutcome,
) -> String {
    let mut content = search_form(form, backends, default);

    if let Some(query) = &outcome.query {
        content.push_str(&format!(
            "<p>Searching for jobs related to: <strong>{}</strong> in {}</p>",
            escape_html(query.role()),
            escape_html(query.location())
        ));
    }

    match &outcome.error {
        Some(message) => content.push_str(&error_box(message)),
        None => content.push_str(&render_html(&outcome.jobs, form.raw)),
    }

    layout("Job Search Results", &content)
}

/// Summary page for one summarize action.
pub fn summary_page(text: &str, result: Result<&str, &str>) -> String {
    let body = match result {
        Ok(summary) => format!(
            r#"<h4>Summary:</h4><p class="summary">{}</p>"#,
            escape_html(summary)
        ),
        Err(message) => error_box(message),
    };

    let content = format!("{}{body}", summarize_form(text));
    layout("Summary", &content)
}
