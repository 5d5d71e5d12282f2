use crate::core::config::data::{path_display, Config};

impl Config {
    /// Lines describing the stored configuration, one `key: value` each.
    pub fn summary_lines(&self) -> Vec<String> {
        let or_unset = |value: Option<String>| value.unwrap_or_else(|| "(unset)".to_string());
        vec![
            format!("base-url: {}", or_unset(self.base_url.clone())),
            format!("theme: {}", or_unset(self.theme.map(|t| t.to_string()))),
            format!(
                "download-dir: {}",
                or_unset(self.download_dir.as_ref().map(path_display))
            ),
            format!(
                "request-timeout: {}",
                or_unset(self.request_timeout_secs.map(|secs| format!("{secs}s")))
            ),
        ]
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        for line in self.summary_lines() {
            println!("  {line}");
        }
    }
}
