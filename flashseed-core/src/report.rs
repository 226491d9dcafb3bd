//! Rendering of flashcards to an output sink.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::models::{CollectionName, Flashcard};

/// Output representation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One line per card, for people
    #[default]
    Text,
    /// Pretty-printed JSON array, for scripts
    Json,
}

/// Write `cards` to `out` in the requested format.
pub fn render<W: Write>(
    collection: &CollectionName,
    cards: &[Flashcard],
    format: ReportFormat,
    out: &mut W,
) -> io::Result<()> {
    match format {
        ReportFormat::Text => render_text(collection, cards, out),
        ReportFormat::Json => render_json(cards, out),
    }
}

fn render_text<W: Write>(
    collection: &CollectionName,
    cards: &[Flashcard],
    out: &mut W,
) -> io::Result<()> {
    let noun = if cards.len() == 1 { "record" } else { "records" };
    writeln!(out, "{}: {} {}", collection, cards.len(), noun)?;

    if cards.is_empty() {
        writeln!(out, "(no flashcards)")?;
    }

    for card in cards {
        match &card.answer {
            Some(answer) => writeln!(out, "#{}  {}  ->  {}", card.id, card.prompt, answer)?,
            None => writeln!(out, "#{}  {}", card.id, card.prompt)?,
        }
    }

    out.flush()
}

fn render_json<W: Write>(cards: &[Flashcard], out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, cards)?;
    out.write_all(b"\n")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Flashcard> {
        vec![
            Flashcard {
                id: 1,
                prompt: "how big is a football stadium".into(),
                answer: None,
            },
            Flashcard {
                id: 2,
                prompt: "capital of peru".into(),
                answer: Some("lima".into()),
            },
        ]
    }

    fn render_to_string(cards: &[Flashcard], format: ReportFormat) -> String {
        let mut buf = Vec::new();
        render(&CollectionName::default(), cards, format, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_lists_each_card() {
        let text = render_to_string(&sample(), ReportFormat::Text);
        assert_eq!(
            text,
            "flashcards: 2 records\n\
             #1  how big is a football stadium\n\
             #2  capital of peru  ->  lima\n"
        );
    }

    #[test]
    fn text_for_empty_collection() {
        let text = render_to_string(&[], ReportFormat::Text);
        assert_eq!(text, "flashcards: 0 records\n(no flashcards)\n");
    }

    #[test]
    fn json_is_an_array_of_records() {
        let json = render_to_string(&sample(), ReportFormat::Json);
        let parsed: Vec<Flashcard> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
        assert!(json.ends_with("]\n"));
    }
}
