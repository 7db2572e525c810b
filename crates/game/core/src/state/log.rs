/// Marker wrapped around emphasized fragments of a log line.
pub const EMPHASIS: &str = "**";

/// Wraps `text` in emphasis markers.
pub fn emphasize(text: impl AsRef<str>) -> String {
    format!("{EMPHASIS}{}{EMPHASIS}", text.as_ref())
}

/// Removes every emphasis marker from a line.
pub fn strip_emphasis(line: &str) -> String {
    line.replace(EMPHASIS, "")
}

/// Append-only narrative of the game.
///
/// The log is the audit trail shown to the moderator and the payload undo
/// works on: restoring a snapshot truncates it back to the recorded length.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct NarrativeLog {
    entries: Vec<String>,
}

impl NarrativeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.entries.extend(entries.into_iter().map(Into::into));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    /// Drops every entry past `len`. Only snapshot restore calls this.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Plain-text export: one entry per line, emphasis stripped.
    pub fn plain_text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| strip_emphasis(entry))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_strips_emphasis_and_joins_lines() {
        let mut log = NarrativeLog::new();
        log.push(format!("{} was eliminated.", emphasize("3. Reza")));
        log.push("Night 2 begins.");

        assert_eq!(log.plain_text(), "3. Reza was eliminated.\nNight 2 begins.");
    }

    #[test]
    fn truncate_keeps_prefix() {
        let mut log = NarrativeLog::new();
        log.extend(["a", "b", "c"]);
        log.truncate(1);
        assert_eq!(log.entries(), ["a".to_string()]);
    }
}
