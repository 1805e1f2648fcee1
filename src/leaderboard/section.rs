/// Header plus body lines of one rendered board.
#[derive(Debug, Clone)]
pub struct BoardSection {
    pub title: String,
    pub lines: Vec<String>,
}

impl BoardSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn add_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn to_display_text(&self) -> String {
        let mut content = self.title.clone();
        for line in &self.lines {
            content.push('\n');
            content.push_str(line);
        }
        content
    }
}
