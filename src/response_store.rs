/// Saves raw classifier response bytes to `responses/{endpoint}/{timestamp}_{suffix}.json`
/// for offline analysis.
///
/// Errors are logged and swallowed — saving is best-effort and must never
/// interrupt normal application flow.
use tokio::fs;
use tracing::warn;

/// Write `bytes` to `responses/{endpoint}/{timestamp}_{suffix}.json`.
///
/// - `endpoint`: used as the sub-directory name, e.g. `"identify"`.
/// - `suffix`: appended after the timestamp, e.g. the classifier model name.
///   Pass `""` to omit.
/// - `bytes`: the raw HTTP response body as received from the classifier.
pub async fn save(endpoint: &str, suffix: &str, bytes: &[u8]) {
    let ts = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
    let filename = if suffix.is_empty() {
        format!("{ts}.json")
    } else {
        format!("{ts}_{suffix}.json")
    };

    let dir = format!("responses/{endpoint}");
    let path = format!("{dir}/{filename}");

    if let Err(e) = fs::create_dir_all(&dir).await {
        warn!(path = %path, error = %e, "response_store: failed to create directory");
        return;
    }

    // Pretty-print the JSON if valid; fall back to raw bytes otherwise.
    let content = match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(v) => match serde_json::to_vec_pretty(&v) {
            Ok(pretty) => pretty,
            Err(_) => bytes.to_vec(),
        },
        Err(_) => bytes.to_vec(),
    };

    if let Err(e) = fs::write(&path, &content).await {
        warn!(path = %path, error = %e, "response_store: failed to write response file");
    } else {
        tracing::debug!(path = %path, bytes = content.len(), "response_store: saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn filenames_in(dir: &str) -> Vec<String> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(dir).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names
    }

    #[tokio::test]
    async fn save_appends_suffix_to_filename() {
        let endpoint = "test_save_with_suffix";
        save(endpoint, "gemini-1.5-flash", b"{\"ok\":true}").await;

        let dir = format!("responses/{endpoint}");
        let names = filenames_in(&dir).await;
        assert!(
            names.iter().any(|n| n.ends_with("_gemini-1.5-flash.json")),
            "no suffixed file in {names:?}"
        );

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn save_without_suffix_still_writes() {
        let endpoint = "test_save_without_suffix";
        save(endpoint, "", b"not json at all").await;

        let dir = format!("responses/{endpoint}");
        let names = filenames_in(&dir).await;
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with(".json"));
        assert!(!names[0].contains('_'));

        fs::remove_dir_all(&dir).await.unwrap();
    }
}
