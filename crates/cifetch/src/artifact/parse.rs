//! Parsing helpers for artifact endpoint responses.

/// Extracts the artifact filename from a `content-disposition` header value.
///
/// The header must declare an attachment (case-insensitive). The value after
/// `filename=` is cut at the first `;`, surrounding quotes are stripped, and
/// any directory components are dropped so the result is a plain basename.
pub fn attachment_filename(header: &str) -> Option<String> {
    let lower = header.to_ascii_lowercase();
    if !lower.trim_start().starts_with("attachment") {
        return None;
    }

    let idx = lower.find("filename=")?;
    let raw = &header[idx + "filename=".len()..];
    let value = raw.split(';').next().unwrap_or(raw).trim().trim_matches('"');

    let name = value.rsplit(['/', '\\']).next().unwrap_or(value);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Extracts the numeric job id from a resolved artifact URL.
///
/// GitLab redirects the `artifacts/<branch>/download` endpoint to a URL of
/// the form `.../-/jobs/<id>/artifacts/download`; the id sits between the
/// last `/jobs/` and the last `/artifacts/` segment.
pub fn job_id(url: &str) -> Option<String> {
    let start = url.rfind("/jobs/")? + "/jobs/".len();
    let end = url.rfind("/artifacts/")?;
    if end <= start {
        return None;
    }

    let id = &url[start..end];
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(id.to_string())
}
