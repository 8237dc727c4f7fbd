use crate::ArcStr;

/// Key presses, as the views understand them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Tab,
    Backspace,
    Char(char),
    /// Ctrl-C
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Info,
    Success,
    Error,
}

/// A one line message with a colour.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub tone: Tone,
    pub text: ArcStr,
}

impl Banner {
    /// Creates a banner.
    pub fn new(tone: Tone, text: impl Into<ArcStr>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// A row of a [`Section::List`].
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub label: ArcStr,
    /// `Some` renders a checkbox
    pub checked: Option<bool>,
    pub note: Option<ArcStr>,
}

impl Item {
    pub fn new(label: impl Into<ArcStr>) -> Self {
        Self {
            label: label.into(),
            checked: None,
            note: None,
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    pub fn note(mut self, note: impl Into<ArcStr>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// A piece of a screen, stacked vertically by [`super::draw`].
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Text(ArcStr),
    Notice(Banner),
    Field {
        label: ArcStr,
        value: ArcStr,
        focused: bool,
        masked: bool,
    },
    List {
        title: ArcStr,
        items: Vec<Item>,
        cursor: Option<usize>,
    },
    Rows {
        title: ArcStr,
        rows: Vec<(ArcStr, ArcStr)>,
    },
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Screen {
    pub title: ArcStr,
    pub sections: Vec<Section>,
    pub toast: Option<Banner>,
    pub hints: ArcStr,
}

impl Screen {
    /// Creates an empty screen.
    pub fn new(title: impl Into<ArcStr>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Appends a section below the others.
    pub fn push(&mut self, section: Section) -> &mut Self {
        self.sections.push(section);
        self
    }

    /// All the text on the screen, one piece per line. Masked fields are
    /// left out.
    pub fn text(&self) -> String {
        let mut lines = vec![self.title.to_string()];
        for section in &self.sections {
            match section {
                Section::Text(text) => lines.push(text.to_string()),
                Section::Notice(banner) => lines.push(banner.text.to_string()),
                Section::Field {
                    label,
                    value,
                    masked,
                    ..
                } => {
                    if *masked {
                        lines.push(label.to_string());
                    } else {
                        lines.push(format!("{label}: {value}"));
                    }
                }
                Section::List { title, items, .. } => {
                    lines.push(title.to_string());
                    lines.extend(items.iter().map(|item| item.label.to_string()));
                }
                Section::Rows { title, rows } => {
                    lines.push(title.to_string());
                    lines.extend(rows.iter().map(|(k, v)| format!("{k}: {v}")));
                }
            }
        }
        if let Some(toast) = &self.toast {
            lines.push(toast.text.to_string());
        }
        lines.join("\n")
    }

    /// Whether the plain text of the screen contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.text().contains(needle)
    }
}
