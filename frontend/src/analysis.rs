use crate::error::ApiError;

pub const UNAVAILABLE_MESSAGE: &str =
    "Our AI analysis service is temporarily unavailable. Please try again later.";
pub const BUSY_MESSAGE: &str =
    "Our AI service is currently busy. Please try again in a few minutes.";
pub const EXPIRED_MESSAGE: &str =
    "Your session has expired. Please sign in again to view the analysis.";
pub const SIGN_IN_MESSAGE: &str = "Please sign in to view AI analysis of your utility data.";

#[derive(Clone, Debug, PartialEq)]
pub enum AnalysisOutcome {
    Ready(String),
    Empty,
    Unavailable,
}

/// Turns the raw analysis body into renderable HTML.
///
/// The generator sometimes wraps its answer in a markdown fence and reports
/// failures inline in the body instead of through the status code.
pub fn interpret(raw: &str) -> AnalysisOutcome {
    if raw.contains("ServiceUnavailable") || raw.contains("Error") || raw.contains("error") {
        log::warn!("analysis body reports an error");
        return AnalysisOutcome::Unavailable;
    }

    let html = strip_fence(raw);
    if html.contains("ServiceUnavailable") || html.contains("Error:") || html.contains("\"error\"")
    {
        return AnalysisOutcome::Unavailable;
    }

    if html.trim().is_empty() {
        AnalysisOutcome::Empty
    } else {
        AnalysisOutcome::Ready(html)
    }
}

fn strip_fence(raw: &str) -> String {
    let mut lines: Vec<&str> = raw.split('\n').collect();
    if lines.len() <= 2 {
        return raw.to_string();
    }
    if lines.first().map(|l| l.trim() == "```html").unwrap_or(false) {
        lines.remove(0);
    }
    if lines.last().map(|l| l.trim() == "```").unwrap_or(false) {
        lines.pop();
    }
    lines.join("\n")
}

pub fn error_message(err: &ApiError) -> &'static str {
    match err {
        ApiError::MissingSession => SIGN_IN_MESSAGE,
        _ => match err.status() {
            Some(503) => BUSY_MESSAGE,
            Some(401) => EXPIRED_MESSAGE,
            _ => UNAVAILABLE_MESSAGE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_fence() {
        let raw = "```html\n<h2>Usage</h2>\n<p>Stable</p>\n```";
        assert_eq!(
            interpret(raw),
            AnalysisOutcome::Ready("<h2>Usage</h2>\n<p>Stable</p>".to_string())
        );
    }

    #[test]
    fn short_bodies_are_kept_verbatim() {
        assert_eq!(
            interpret("```html\n<p>x</p>"),
            AnalysisOutcome::Ready("```html\n<p>x</p>".to_string())
        );
    }

    #[test]
    fn error_words_mark_unavailable() {
        assert_eq!(interpret("ServiceUnavailable"), AnalysisOutcome::Unavailable);
        assert_eq!(interpret("<p>Error: quota</p>"), AnalysisOutcome::Unavailable);
        assert_eq!(interpret("{\"error\": 1}"), AnalysisOutcome::Unavailable);
    }

    #[test]
    fn blank_body_is_empty() {
        assert_eq!(interpret(""), AnalysisOutcome::Empty);
        assert_eq!(interpret("```html\n \n```"), AnalysisOutcome::Empty);
    }

    #[test]
    fn messages_follow_status() {
        let busy = ApiError::Status {
            status: 503,
            message: None,
        };
        let expired = ApiError::Status {
            status: 401,
            message: None,
        };
        assert_eq!(error_message(&busy), BUSY_MESSAGE);
        assert_eq!(error_message(&expired), EXPIRED_MESSAGE);
        assert_eq!(error_message(&ApiError::Network("x".into())), UNAVAILABLE_MESSAGE);
        assert_eq!(error_message(&ApiError::MissingSession), SIGN_IN_MESSAGE);
    }
}
