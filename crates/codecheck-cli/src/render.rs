// Plain-text rendering for the terminal front end
use codecheck_core::{MessageReason, RepositorySummary, UserMessage};

pub const EMPTY_INPUT: &str = "Please enter a keyword to search for";

/// English text for a user message
pub fn message(msg: &UserMessage) -> String {
    match msg {
        UserMessage::WithCode { status, reason } => {
            format!("Error {}: {}", status, reason_text(reason))
        }
        UserMessage::Unknown => "Something went wrong. Please try again later".to_string(),
    }
}

fn reason_text(reason: &MessageReason) -> String {
    match reason {
        MessageReason::BadRequest => "the search request was invalid".to_string(),
        MessageReason::Unauthorized => "authentication is required".to_string(),
        MessageReason::NotFound => "nothing was found".to_string(),
        MessageReason::RateLimited { wait_seconds } => format!(
            "too many searches, try again in {} second{}",
            wait_seconds,
            if *wait_seconds == 1 { "" } else { "s" }
        ),
        MessageReason::ClientError => "the request could not be processed".to_string(),
        MessageReason::ServerError => "GitHub is having trouble right now".to_string(),
    }
}

/// Numbered result list, one repository per line
pub fn result_list(items: &[RepositorySummary]) -> String {
    if items.is_empty() {
        return "No repositories found".to_string();
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let language = if item.language.is_empty() {
                "-"
            } else {
                item.language.as_str()
            };
            format!(
                "{:>3}. {}  [{}]  ★ {}",
                i + 1,
                item.name,
                language,
                item.stargazers_count
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Detail view for one repository
pub fn detail(item: &RepositorySummary) -> String {
    let mut lines = vec![item.name.clone()];
    if !item.owner_icon_url.is_empty() {
        lines.push(format!("Owner icon: {}", item.owner_icon_url));
    }
    if !item.language.is_empty() {
        lines.push(format!("Written in {}", item.language));
    }
    lines.push(format!("{} stars", item.stargazers_count));
    lines.push(format!("{} watchers", item.watchers_count));
    lines.push(format!("{} forks", item.forks_count));
    lines.push(format!("{} open issues", item.open_issues_count));
    lines.push(format!(
        "Searched at {}",
        item.searched_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    lines.join("\n")
}
