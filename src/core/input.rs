/// Text staged in the capture bar before submission.
///
/// Dictated and pasted text land here too, so a submission cannot tell a
/// typed word from a spoken one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedInput {
    text: String,
}

impl StagedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Append a dictation transcript, space-joined to any existing text.
    pub fn append_transcript(&mut self, transcript: &str) {
        if self.text.is_empty() {
            self.text = transcript.to_string();
        } else {
            self.text.push(' ');
            self.text.push_str(transcript);
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Hand the text to the capture pipeline, leaving the bar empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}
