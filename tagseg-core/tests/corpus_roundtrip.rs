//! Reader/writer round trips across the corpus formats

use std::io::Cursor;
use tagseg_core::corpus::{FullReader, FullWriter, TokenizedReader, TokenizedWriter};
use tagseg_core::{
    CorpusReader, CorpusWriter, LexiconModel, Model, Sentence, Surface, WordIterator,
    WriterConfig,
};

const MODEL: &str = r#"
unknown_tag = "UNK"

[[slots]]
name = "pos"
[slots.lexicon]
"a/b" = "SYM"

[[slots]]
name = "upper"
fallback = "upper"
"#;

fn config(do_tags: Vec<bool>) -> WriterConfig {
    WriterConfig {
        unknown_tag: "UNK".to_string(),
        slot_count: do_tags.len(),
        do_tags,
    }
}

fn write_full(sentences: &[Sentence], do_tags: Vec<bool>) -> String {
    let mut out = Vec::new();
    let mut writer = FullWriter::new(&mut out, '\t');
    writer.configure(config(do_tags)).unwrap();
    for sentence in sentences {
        writer.write_sentence(sentence).unwrap();
    }
    writer.flush().unwrap();
    drop(writer);
    String::from_utf8(out).unwrap()
}

#[test]
fn test_tagged_output_reads_back() {
    let mut model = LexiconModel::from_toml_str(MODEL).unwrap();
    let mut sentence = Sentence::from_raw("a/b x\\y");
    model.segment(&mut sentence).unwrap();
    for slot in 0..model.tag_slot_count() {
        model.tag(&mut sentence, slot).unwrap();
    }

    let text = write_full(std::slice::from_ref(&sentence), vec![true, true]);
    assert_eq!(text, "a\\/b/SYM/A\\/B\tx\\\\y/UNK/X\\\\Y\n");

    let mut reader = FullReader::new(Cursor::new(text.as_str()), '\t');
    let back = reader.read_sentence().unwrap().unwrap();
    assert_eq!(back.surfaces().collect::<Vec<_>>(), vec!["a/b", "x\\y"]);
    assert_eq!(back.words[0].tag(0), Some("SYM"));
    assert_eq!(back.words[1].tag(1), Some("X\\Y"));
    // The unknown marker is read back as a literal tag
    assert_eq!(back.words[1].tag(0), Some("UNK"));
    assert!(reader.read_sentence().unwrap().is_none());
}

#[test]
fn test_typed_decoding_of_tagged_output() {
    let mut model = LexiconModel::from_toml_str(MODEL).unwrap();
    let mut sentences = Vec::new();
    for line in ["one two", "three"] {
        let mut sentence = Sentence::from_raw(line);
        model.segment(&mut sentence).unwrap();
        model.tag(&mut sentence, 1).unwrap();
        sentences.push(sentence);
    }
    let text = write_full(&sentences, vec![false, true]);

    let words: Vec<(Surface, &str)> = WordIterator::from_lines(&text).collect();
    assert_eq!(
        words,
        vec![
            (Surface("one"), "ONE"),
            (Surface("two"), "TWO"),
            (Surface("three"), "THREE"),
        ]
    );

    let surfaces: Vec<String> = WordIterator::<Surface>::from_lines(&text)
        .map(String::from)
        .collect();
    assert_eq!(surfaces, vec!["one", "two", "three"]);
}

#[test]
fn test_tokenized_round_trip_with_custom_delimiter() {
    let words = vec!["a b".to_string(), "c|d".to_string(), "e".to_string()];
    let sentence = Sentence::from_words(words.iter().map(tagseg_core::Word::new).collect());

    let mut out = Vec::new();
    let mut writer = TokenizedWriter::new(&mut out, '|');
    writer.configure(config(Vec::new())).unwrap();
    writer.write_sentence(&sentence).unwrap();
    drop(writer);
    assert_eq!(out, b"a b|c\\|d|e\n");

    let mut reader = TokenizedReader::new(Cursor::new(out), '|');
    let back = reader.read_sentence().unwrap().unwrap();
    assert_eq!(back.surfaces().collect::<Vec<_>>(), words);
    assert!(back.is_segmented());
}
