//! Fetch README.md from GitHub repositories
//!
//! READMEs are best effort: every failure degrades to "no README".

use tracing::debug;

/// Branches tried, in order.
pub const README_BRANCHES: [&str; 2] = ["main", "master"];

/// Construct the raw content URL for a README on `branch`.
///
/// # Example
/// ```ignore
/// let url = readme_url("https://raw.githubusercontent.com", "anthropics", "skills", "main");
/// // Returns: "https://raw.githubusercontent.com/anthropics/skills/main/README.md"
/// ```
pub fn readme_url(raw_content_url: &str, owner: &str, repo: &str, branch: &str) -> String {
    format!(
        "{}/{}/{}/{}/README.md",
        raw_content_url.trim_end_matches('/'),
        owner,
        repo,
        branch
    )
}

/// Fetch the README for `owner/repo`, trying each of [`README_BRANCHES`].
///
/// Returns the body of the first 2xx response, or `None` if every branch
/// fails. Transport errors are logged and treated like a missing file.
pub async fn fetch_readme(
    http: &reqwest::Client,
    raw_content_url: &str,
    owner: &str,
    repo: &str,
) -> Option<String> {
    for branch in README_BRANCHES {
        let url = readme_url(raw_content_url, owner, repo, branch);

        let response = match http.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                debug!(%url, error = %err, "README request failed");
                continue;
            }
        };

        if !response.status().is_success() {
            debug!(%url, status = response.status().as_u16(), "README not found");
            continue;
        }

        match response.text().await {
            Ok(body) => return Some(body),
            Err(err) => debug!(%url, error = %err, "failed to read README body"),
        }
    }

    None
}
