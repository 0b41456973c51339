//! HTML rendering of the assignment page.
//!
//! Rendering is a pure function of [`UiState`]; the page's forms post back to
//! the `/ui` routes, which drive the state and render again. Forms that leave
//! the page carry the id being edited so edit mode survives them.

use crate::client::state::{FormMode, PageNav, UiState};
use crate::store::Assignment;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
table{border-collapse:collapse;margin:1rem 0}\
th,td{border:1px solid #ccc;padding:.4rem .8rem;text-align:left}\
.notice{padding:.5rem 1rem;background:#fff3cd;border:1px solid #e0c36c}\
.actions form{display:inline}";

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn hidden_input(name: &str, value: impl std::fmt::Display) -> String {
    format!("<input type=\"hidden\" name=\"{}\" value=\"{}\">", name, value)
}

/// Hidden `edit` field, empty outside edit mode.
fn edit_field(editing: Option<u64>) -> String {
    editing
        .map(|id| hidden_input("edit", id))
        .unwrap_or_default()
}

/// Render the whole page.
pub fn render_page(state: &UiState) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n<title>Assignments</title>\n");
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n<h1>Assignments</h1>\n");

    if let Some(notice) = &state.notice {
        html.push_str(&format!(
            "<div class=\"notice\" role=\"alert\">{}</div>\n",
            escape_html(notice)
        ));
    }

    html.push_str(&render_form(state));
    html.push_str("<div id=\"results\">\n");
    html.push_str(&render_table(
        &state.rows,
        state.current_page,
        state.editing_id(),
    ));
    html.push_str("</div>\n");
    html.push_str(&render_pagination(state));
    html.push_str("</body>\n</html>\n");
    html
}

/// Render the add/edit form. In edit mode it carries the id being edited and
/// a link that cancels the edit.
pub fn render_form(state: &UiState) -> String {
    let editing_id = state
        .editing_id()
        .map(|id| id.to_string())
        .unwrap_or_default();

    let mut html = format!(
        "<h2 id=\"actionForm\">{}</h2>\n",
        escape_html(&state.form_title())
    );
    html.push_str("<form id=\"assignmentForm\" method=\"post\" action=\"/ui/submit\">\n");
    html.push_str(&hidden_input("id", editing_id));
    html.push('\n');
    html.push_str(&hidden_input("page", state.current_page));
    html.push('\n');
    html.push_str(&format!(
        "<label>Name <input type=\"text\" id=\"name\" name=\"name\" value=\"{}\" required></label>\n",
        escape_html(&state.form.name)
    ));
    html.push_str(&format!(
        "<label>Due Date <input type=\"date\" id=\"dueDate\" name=\"dueDate\" value=\"{}\" required></label>\n",
        escape_html(&state.form.due_date)
    ));
    html.push_str(&format!(
        "<label>Submitted <input type=\"checkbox\" id=\"submitted\" name=\"submitted\"{}></label>\n",
        if state.form.submitted { " checked" } else { "" }
    ));

    match state.mode {
        FormMode::Adding => html.push_str("<button type=\"submit\">Add</button>\n"),
        FormMode::Editing(_) => {
            html.push_str("<button type=\"submit\">Update</button>\n");
            html.push_str(&format!(
                "<a id=\"cancelEdit\" href=\"/ui?page={}\">Cancel</a>\n",
                state.current_page
            ));
        }
    }
    html.push_str("</form>\n");
    html
}

/// Render one page of assignments with edit and delete controls per row.
pub fn render_table(rows: &[Assignment], current_page: u32, editing: Option<u64>) -> String {
    let mut html = String::from("<table>\n<thead><tr>");
    for header in ["ID", "Name", "Due Date", "Submitted", "Actions"] {
        html.push_str(&format!("<th>{}</th>", header));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    let page_field = hidden_input("page", current_page);
    let edit_field = edit_field(editing);
    for assignment in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
            assignment.id,
            escape_html(assignment.name.as_deref().unwrap_or("")),
            escape_html(assignment.due_date.as_deref().unwrap_or("")),
            if assignment.is_submitted() { "Yes" } else { "No" },
        ));
        html.push_str(&format!(
            "<td class=\"actions\">\
<form method=\"get\" action=\"/ui\">{page_field}\
<button type=\"submit\" name=\"edit\" value=\"{id}\">Edit</button></form> \
<form method=\"post\" action=\"/ui/assignments/{id}/delete\">{page_field}{edit_field}\
<button type=\"submit\">Delete</button></form>\
</td></tr>\n",
            id = assignment.id,
        ));
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

/// Render first/prev/next/last buttons, disabled at either end.
pub fn render_pagination(state: &UiState) -> String {
    let mut html = String::from("<form id=\"pagination\" method=\"get\" action=\"/ui\">\n");
    html.push_str(&edit_field(state.editing_id()));

    let buttons = [
        (PageNav::First, "firstPage", "First"),
        (PageNav::Prev, "prevPage", "Prev"),
        (PageNav::Next, "nextPage", "Next"),
        (PageNav::Last, "lastPage", "Last"),
    ];
    for (nav, id, label) in buttons {
        let (value, disabled) = match state.target_page(nav) {
            Some(page) => (page, ""),
            None => (state.current_page, " disabled"),
        };
        html.push_str(&format!(
            "<button type=\"submit\" id=\"{}\" name=\"page\" value=\"{}\"{}>{}</button>\n",
            id, value, disabled, label
        ));
    }

    html.push_str(&format!(
        "<span>Page {} of {}</span>\n",
        state.current_page,
        state.total_pages()
    ));
    html.push_str("</form>\n");
    html
}
