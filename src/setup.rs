/// Raw text collected before a run starts, handed to the parser untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupInput {
    pub work: String,
    pub brk: String,
    pub sessions: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Work,
    Break,
    Sessions,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Work, Field::Break, Field::Sessions];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Work => "Work Duration:",
            Field::Break => "Break Duration:",
            Field::Sessions => "Sessions:",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::Work => "Work (e.g. 25, 30s)",
            Field::Break => "Break (e.g. 5m)",
            Field::Sessions => "Sessions (e.g. 4)",
        }
    }
}

/// Three labelled text fields with a wrapping focus
#[derive(Debug, Clone, Default)]
pub struct SetupForm {
    values: [String; 3],
    focus: usize,
}

impl SetupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Field {
        Field::ALL[self.focus]
    }

    pub fn value(&self, field: Field) -> &str {
        &self.values[Self::index(field)]
    }

    pub fn is_last_focused(&self) -> bool {
        self.focus == Field::ALL.len() - 1
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % Field::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + Field::ALL.len() - 1) % Field::ALL.len();
    }

    pub fn push_char(&mut self, c: char) {
        if !c.is_control() {
            self.values[self.focus].push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.values[self.focus].pop();
    }

    /// `Some` once enter is pressed on the last field, otherwise focus moves on.
    pub fn enter(&mut self) -> Option<SetupInput> {
        if self.is_last_focused() {
            return Some(self.input());
        }
        self.focus_next();
        None
    }

    pub fn input(&self) -> SetupInput {
        SetupInput {
            work: self.values[0].clone(),
            brk: self.values[1].clone(),
            sessions: self.values[2].clone(),
        }
    }

    fn index(field: Field) -> usize {
        match field {
            Field::Work => 0,
            Field::Break => 1,
            Field::Sessions => 2,
        }
    }
}
