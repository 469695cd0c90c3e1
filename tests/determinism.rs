use chrono::{TimeZone, Utc};
use docprep::{
    ChunkSpan, DocumentMeta, PrepareConfig, Preparer, RawDocument, Source, hash_text, normalize,
};
use proptest::prelude::*;

fn preparer() -> Preparer {
    Preparer::new(PrepareConfig::default()).expect("default config is valid")
}

fn meta() -> DocumentMeta {
    DocumentMeta::new(Source::Web, "html").with_title("Page")
}

#[test]
fn equivalent_inputs_produce_identical_documents() {
    let preparer = preparer();
    let modified = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();

    let a = preparer
        .prepare(
            RawDocument::from_text("https://example.com/p", meta(), " Hello   world!\r\n\r\n\r\nBye ")
                .with_modified(modified),
        )
        .expect("first");
    let b = preparer
        .prepare(
            RawDocument::from_bytes(
                "https://example.com/p",
                meta(),
                b"Hello world!   \n\n\n\n\nBye".to_vec(),
            )
            .with_modified(modified),
        )
        .expect("second");

    assert_eq!(a.document, b.document);
    assert_eq!(hash_text(a.document.text()), hash_text(b.document.text()));
}

#[test]
fn modification_time_changes_only_the_id() {
    let preparer = preparer();
    let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    let a = preparer
        .prepare(RawDocument::from_text("doc.md", meta(), "same").with_modified(early))
        .expect("early");
    let b = preparer
        .prepare(RawDocument::from_text("doc.md", meta(), "same").with_modified(late))
        .expect("late");

    assert_ne!(a.document.id(), b.document.id());
    assert_eq!(a.document.text(), b.document.text());
}

#[test]
fn chunk_ids_are_stable_across_preparers() {
    let spans = [ChunkSpan::new(0, 5), ChunkSpan::new(6, 11)];
    let run = || {
        let preparer = preparer();
        let prepared = preparer
            .prepare(RawDocument::from_text("k.txt", meta(), "hello world"))
            .expect("prepare");
        preparer.chunk(&prepared.document, &spans).expect("chunk")
    };
    assert_eq!(run(), run());
}

#[cfg(feature = "repair")]
#[test]
fn prepared_text_is_a_fixed_point_with_edge_spaces() {
    let preparer = preparer();
    for raw in ["Ã©\u{a0}", "\u{2003}rÃ©sumÃ©  \r\n", "ÃƒÂ©â€ƒ"] {
        let prepared = preparer
            .prepare(RawDocument::from_text("edge.txt", meta(), raw))
            .expect("prepare");
        let text = prepared.document.text();
        assert_eq!(normalize(text), text, "input {raw:?}");
    }
}

proptest! {
    #[test]
    fn prepared_text_is_normalized_text(text in "\\PC{0,200}") {
        let prepared = preparer()
            .prepare(RawDocument::from_text("p.txt", meta(), text.clone()))
            .expect("text payloads always prepare");
        prop_assert_eq!(prepared.document.text(), normalize(&text));
        prop_assert_eq!(normalize(prepared.document.text()), prepared.document.text());
    }
}
