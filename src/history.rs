/// Browser-style record of selected node ids.
///
/// `selected` equals `stack[cursor]` whenever a cursor exists, except after
/// `Clear`, which drops the selection but keeps the stack so `Forward` still
/// works.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryState {
    stack: Vec<String>,
    cursor: Option<usize>,
    selected: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryAction {
    Select(String),
    Back,
    Forward,
    Clear,
    Reset,
}

impl HistoryState {
    pub fn stack(&self) -> &[String] {
        &self.stack
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor.is_some_and(|cursor| cursor > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor
            .is_some_and(|cursor| cursor + 1 < self.stack.len())
    }

    fn at(&self, cursor: usize) -> Self {
        Self {
            stack: self.stack.clone(),
            cursor: Some(cursor),
            selected: self.stack.get(cursor).cloned(),
        }
    }
}

pub fn reduce(state: &HistoryState, action: HistoryAction) -> HistoryState {
    match action {
        HistoryAction::Select(id) => {
            let keep = state.cursor.map_or(0, |cursor| cursor + 1);
            let mut stack = state.stack[..keep.min(state.stack.len())].to_vec();
            stack.push(id.clone());
            HistoryState {
                cursor: Some(stack.len() - 1),
                stack,
                selected: Some(id),
            }
        }
        HistoryAction::Back => match state.cursor {
            Some(cursor) if cursor > 0 => state.at(cursor - 1),
            _ => state.clone(),
        },
        HistoryAction::Forward => match state.cursor {
            Some(cursor) if cursor + 1 < state.stack.len() => state.at(cursor + 1),
            _ => state.clone(),
        },
        HistoryAction::Clear => HistoryState {
            selected: None,
            ..state.clone()
        },
        HistoryAction::Reset => HistoryState::default(),
    }
}
