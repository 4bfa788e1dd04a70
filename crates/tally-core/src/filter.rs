use crate::task::Task;

/// Which tasks of the selected group are rendered. Held as explicit
/// controller state; the view only reflects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "completed" | "done" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

/// Pure view derivation. `All` keeps every task but renders incomplete
/// ones first, each half in insertion order; `Active` and `Completed`
/// keep insertion order as-is.
pub fn apply<'a>(tasks: &[&'a Task], mode: FilterMode) -> Vec<&'a Task> {
    match mode {
        FilterMode::All => {
            let mut out: Vec<&Task> = tasks.iter().copied().filter(|t| !t.completed).collect();
            out.extend(tasks.iter().copied().filter(|t| t.completed));
            out
        }
        FilterMode::Active => tasks.iter().copied().filter(|t| !t.completed).collect(),
        FilterMode::Completed => tasks.iter().copied().filter(|t| t.completed).collect(),
    }
}
