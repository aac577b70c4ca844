//! Turns postings into display text: markdown for the terminal, HTML for the web UI.

use crate::{JobPosting, JobQuery, LINK_PLACEHOLDER};

pub const RESULTS_HEADING: &str = "Found Job Postings:";
pub const NO_RESULTS_MESSAGE: &str = "No job postings found. Please try a different query.";

/// One-line description of what is being searched.
pub fn search_header_markdown(query: &JobQuery) -> String {
    format!(
        "Searching for jobs related to: **{}** in {}",
        query.role(),
        query.location()
    )
}

/// Markdown list, one `- ` line per posting, in response order.
pub fn render_markdown(jobs: &[JobPosting], show_raw: bool) -> String {
    if jobs.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    let mut out = format!("### {RESULTS_HEADING}\n");
    for job in jobs {
        let link = match &job.link {
            Some(url) => format!("[Link]({url})"),
            None => LINK_PLACEHOLDER.to_string(),
        };
        out.push_str(&format!(
            "- **{}** | {} | {} | {}\n",
            job.title,
            job.company_or_placeholder(),
            job.location_or_placeholder(),
            link
        ));

        if let (true, Some(raw)) = (show_raw, &job.raw) {
            let pretty = serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string());
            for line in pretty.lines() {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    out
}

/// HTML fragment for the results, one `<li class="job">` per posting.
pub fn render_html(jobs: &[JobPosting], show_raw: bool) -> String {
    if jobs.is_empty() {
        return format!(r#"<p class="empty">{NO_RESULTS_MESSAGE}</p>"#);
    }

    let items: Vec<String> = jobs
        .iter()
        .map(|job| {
            let link_html = match &job.link {
                Some(url) => format!(
                    r#"<a href="{}" target="_blank" rel="noopener">Link</a>"#,
                    escape_html(url)
                ),
                None => format!(r#"<span class="no-link">{LINK_PLACEHOLDER}</span>"#),
            };

            let raw_html = match (&job.raw, show_raw) {
                (Some(raw), true) => {
                    let pretty =
                        serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string());
                    format!(r#"<pre class="raw">{}</pre>"#, escape_html(&pretty))
                }
                _ => String::new(),
            };

            format!(
                r#"<li class="job">
                <strong class="title">{}</strong>
                <span class="company">{}</span>
                <span class="location">{}</span>
                {link_html}
                {raw_html}
            </li>"#,
                escape_html(&job.title),
                escape_html(job.company_or_placeholder()),
                escape_html(job.location_or_placeholder()),
            )
        })
        .collect();

    format!(
        r#"<h3>{RESULTS_HEADING}</h3>
        <ul class="job-list">{}</ul>"#,
        items.join("")
    )
}

/// Escapes text for use in HTML bodies and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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
