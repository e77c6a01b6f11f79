use crate::state::Reducer;

/// Suggestions offered for the current input and the highlighted one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuggestionPicker {
    pub items: Vec<String>,
    pub selected: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerIntent {
    Load(Vec<String>),
    MoveDown,
    MoveUp,
    Select(usize),
    Dismiss,
}

pub struct PickerReducer;

impl Reducer for PickerReducer {
    type State = SuggestionPicker;
    type Intent = PickerIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            PickerIntent::Load(items) => SuggestionPicker {
                items,
                selected: None,
            },
            PickerIntent::MoveDown if !state.items.is_empty() => {
                let selected = match state.selected {
                    Some(index) => (index + 1) % state.items.len(),
                    None => 0,
                };
                SuggestionPicker {
                    selected: Some(selected),
                    ..state
                }
            }
            PickerIntent::MoveUp if !state.items.is_empty() => {
                let selected = match state.selected {
                    Some(0) | None => state.items.len() - 1,
                    Some(index) => index - 1,
                };
                SuggestionPicker {
                    selected: Some(selected),
                    ..state
                }
            }
            PickerIntent::Select(index) if index < state.items.len() => SuggestionPicker {
                selected: Some(index),
                ..state
            },
            PickerIntent::Dismiss => SuggestionPicker::default(),
            _ => state,
        }
    }
}

impl SuggestionPicker {
    pub fn selected_item(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.items.get(index))
            .map(String::as_str)
    }

    /// The word to look up: the highlighted suggestion if there is one,
    /// otherwise the trimmed input.
    pub fn commit<'a>(&'a self, input: &'a str) -> Option<&'a str> {
        self.selected_item()
            .or_else(|| Some(input.trim()).filter(|term| !term.is_empty()))
    }
}
