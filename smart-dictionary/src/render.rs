use crossterm::style::Stylize;
use dictionary::{Dialect, DictionaryEntry, LookupState, SuggestionPicker};

use crate::theme::Theme;

pub fn print_state(state: &LookupState, theme: Theme, dialect: Dialect) {
    let palette = theme.palette();
    if state.loading {
        print_searching(theme);
        return;
    }
    if let Some(error) = &state.error {
        println!("{}", error.as_str().with(palette.error));
        return;
    }
    if !state.data.is_empty() {
        print_entries(&state.data, theme, dialect);
    }
}

pub fn print_searching(theme: Theme) {
    println!("{}", "Searching definition...".with(theme.palette().muted));
}

fn print_entries(entries: &[DictionaryEntry], theme: Theme, dialect: Dialect) {
    let palette = theme.palette();
    let first = &entries[0];
    print!("{}", first.word.as_str().with(palette.headword).bold());
    if let Some(transcription) = first.transcription() {
        print!("  {}", transcription.with(palette.muted));
    }
    println!();

    let pronunciations = first.pronunciations(dialect);
    if !pronunciations.is_empty() {
        let labels = pronunciations
            .iter()
            .enumerate()
            .map(|(index, phonetic)| match phonetic.text.as_deref() {
                Some(text) if !text.trim().is_empty() => text.to_owned(),
                _ => format!("Audio {}", index + 1),
            })
            .collect::<Vec<String>>();
        println!("    pronunciation: {} (play)", labels.join(", "));
    }

    for entry in entries {
        for meaning in &entry.meanings {
            println!(
                "    {}:",
                meaning.part_of_speech.to_string().with(palette.accent).italic()
            );
            for (index, definition) in meaning.definitions.iter().enumerate() {
                println!("        {}. {}", index + 1, definition.definition);
                if let Some(example) = &definition.example {
                    println!(
                        "           {}",
                        format!("example: {example}").with(palette.muted)
                    );
                }
                if !definition.synonyms.is_empty() {
                    println!("           synonyms: {}", definition.synonyms.join(", "));
                }
                if !definition.antonyms.is_empty() {
                    println!("           antonyms: {}", definition.antonyms.join(", "));
                }
            }
            if !meaning.synonyms.is_empty() {
                println!("      synonyms: {}", meaning.synonyms.join(", "));
            }
            if !meaning.antonyms.is_empty() {
                println!("      antonyms: {}", meaning.antonyms.join(", "));
            }
        }
    }
}

pub fn print_suggestions(picker: &SuggestionPicker, theme: Theme) {
    let palette = theme.palette();
    if picker.items.is_empty() {
        println!("{}", "No suggestions".with(palette.muted));
        return;
    }
    for (index, item) in picker.items.iter().enumerate() {
        if picker.selected == Some(index) {
            println!("> [{}]: {}", index + 1, item.as_str().with(palette.accent).bold());
        } else {
            println!("  [{}]: {}", index + 1, item);
        }
    }
}
