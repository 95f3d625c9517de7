use anyhow::Result;
use rustyline::DefaultEditor;

/// Line-oriented terminal prompts.
pub struct Prompt {
    editor: DefaultEditor,
}

impl Prompt {
    pub fn new() -> Result<Self> {
        Ok(Prompt {
            editor: DefaultEditor::new()?,
        })
    }

    /// Ask for a value; the answer comes back trimmed.
    pub fn ask(&mut self, label: &str) -> Result<String> {
        let line = self.editor.readline(label)?;
        Ok(line.trim().to_string())
    }
}
