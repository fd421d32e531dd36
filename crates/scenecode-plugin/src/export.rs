//! Naming and linking for exports sent to the web app.

use chrono::{DateTime, Utc};

use scenecode_assets::MultipartFile;

use crate::error::{ConversionError, Result};

/// Most nodes one export may contain.
pub const MAX_EXPORT_NODES: usize = 3;

/// Conversation created for every generated project.
pub const CONVERSATION_NAME: &str = "Import from Figma";

/// Instructions sent with the first inference of a generated project.
pub const INFERENCE_CONTEXT: &str = "This is a project exported directly from the user's Figma as HTML. \
This is a new project generation, which means you will have an starter composition in the compositions \
directory that you should use as a starting point. You should: 1. Decide on an appropriate dimensions for \
the project; 2. Update the manifest (dimensions, title, description); 3. Replace starter composition with \
the desired content; 4. Optionally, update the style-guide.yml file with an appropriate style guide for \
the project. Remember you can write multiple files at once so do this all in a single batch of tool calls.";

/// Reject selections export cannot handle.
pub fn check_selection(count: usize) -> Result<()> {
    match count {
        0 => Err(ConversionError::NothingToExport),
        n if n > MAX_EXPORT_NODES => Err(ConversionError::SelectionLimit {
            max: MAX_EXPORT_NODES,
        }),
        _ => Ok(()),
    }
}

/// Filename-safe UTC timestamp, e.g. `2024-05-01T09-30-00`.
pub fn export_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// The upload for the `index`-th selected node.
pub fn export_file(index: usize, node_name: &str, html: String, timestamp: &str) -> MultipartFile {
    MultipartFile::html(
        format!("figma-export-{}-{}.html", timestamp, index + 1),
        html,
        format!("{} - {}", node_name, timestamp),
    )
}

pub fn attachment_link(web_app_url: &str, attachment_id: &str) -> String {
    format!("{}?attachmentPreloadIds=[{}]", web_app_url, attachment_id)
}

pub fn project_link(web_app_url: &str, project_id: &str) -> String {
    format!("{}/project/{}", web_app_url.trim_end_matches('/'), project_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_selection_limits() {
        assert_eq!(
            check_selection(0).unwrap_err().to_string(),
            "No selection to export"
        );
        assert!(check_selection(3).is_ok());
        assert_eq!(
            check_selection(4).unwrap_err().to_string(),
            "Please select a maximum of 3 elements to export"
        );
    }

    #[test]
    fn test_timestamp_and_file_names() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 7).unwrap();
        let timestamp = export_timestamp(now);
        assert_eq!(timestamp, "2024-05-01T09-30-07");

        let file = export_file(0, "Hero", "<div></div>".into(), &timestamp);
        assert_eq!(file.filename, "figma-export-2024-05-01T09-30-07-1.html");
        assert_eq!(file.description, "Hero - 2024-05-01T09-30-07");
        assert_eq!(file.content_type, "text/html");
    }

    #[test]
    fn test_links() {
        assert_eq!(
            attachment_link("https://app.test", "f1"),
            "https://app.test?attachmentPreloadIds=[f1]"
        );
        assert_eq!(project_link("https://app.test/", "p1"), "https://app.test/project/p1");
    }
}
