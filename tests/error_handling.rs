use docprep::{
    ChunkSpan, ConfigError, ConfigLoadError, DocumentConfig, DocumentMeta, PipelineError,
    PrepareConfig, Preparer, RawDocument, Source, ValidationError, prepare_document,
};

fn meta() -> DocumentMeta {
    DocumentMeta::new(Source::Local, "txt")
}

fn config_with(document: DocumentConfig) -> PrepareConfig {
    PrepareConfig {
        document,
        ..Default::default()
    }
}

#[test]
fn oversized_payload_rejected_before_decoding() {
    let config = config_with(DocumentConfig {
        max_raw_bytes: Some(4),
        ..Default::default()
    });
    // Invalid UTF-8 too, but size is checked first.
    let raw = RawDocument::from_bytes("big.bin", meta(), vec![0xFF; 5]);
    assert_eq!(
        prepare_document(raw, &config),
        Err(PipelineError::PayloadTooLarge { size: 5, limit: 4 })
    );

    let fits = RawDocument::from_text("ok.txt", meta(), "four");
    assert!(prepare_document(fits, &config).is_ok());
}

#[test]
fn strict_decoding_rejects_invalid_utf8() {
    let raw = RawDocument::from_bytes("bad.txt", meta(), vec![b'a', 0xC3, 0x28]);
    let err = prepare_document(raw, &PrepareConfig::default()).unwrap_err();
    match err {
        PipelineError::InvalidUtf8(msg) => assert!(msg.contains("invalid utf-8")),
        other => panic!("expected InvalidUtf8, got {other:?}"),
    }
}

#[test]
fn empty_text_rejected_only_when_configured() {
    let blank = || RawDocument::from_text("blank.txt", meta(), " \r\n\t \n");

    let lenient = prepare_document(blank(), &PrepareConfig::default()).expect("empty allowed");
    assert_eq!(lenient.document.text(), "");
    assert_eq!(lenient.document.char_len(), 0);

    let strict = config_with(DocumentConfig {
        reject_empty_text: true,
        ..Default::default()
    });
    assert_eq!(prepare_document(blank(), &strict), Err(PipelineError::EmptyText));
}

#[test]
fn invalid_config_surfaces_as_config_error() {
    let config = config_with(DocumentConfig {
        max_raw_bytes: Some(0),
        ..Default::default()
    });
    let err = Preparer::new(config).unwrap_err();
    assert!(matches!(err, PipelineError::Config(ConfigError::Validation(_))));
}

#[test]
fn yaml_errors_are_typed() {
    assert!(matches!(
        PrepareConfig::from_yaml_str("version: \"3\""),
        Err(ConfigLoadError::UnsupportedVersion(_))
    ));
    assert!(matches!(
        PrepareConfig::from_yaml_str("document:\n  lossy_utf8: maybe\n"),
        Err(ConfigLoadError::YamlParse(_))
    ));
}

#[test]
fn bad_spans_are_validation_errors() {
    let preparer = Preparer::new(PrepareConfig::default()).expect("config");
    let doc = preparer
        .prepare(RawDocument::from_text("s.txt", meta(), "abc def"))
        .expect("prepare")
        .document;

    assert_eq!(
        preparer.chunk(&doc, &[ChunkSpan::new(3, 3)]),
        Err(PipelineError::Validation(ValidationError::EmptyRange {
            start_char: 3,
            end_char: 3
        }))
    );
    assert_eq!(
        preparer.chunk(&doc, &[ChunkSpan::new(0, 99)]),
        Err(PipelineError::Validation(ValidationError::OutOfBounds {
            order: 0,
            end_char: 99,
            doc_chars: 7
        }))
    );
    assert!(matches!(
        preparer.chunk(&doc, &[ChunkSpan::new(0, 4), ChunkSpan::new(2, 7)]),
        Err(PipelineError::Validation(ValidationError::Overlap { .. }))
    ));
}

#[test]
fn errors_render_useful_messages() {
    let err = PipelineError::PayloadTooLarge { size: 10, limit: 5 };
    assert_eq!(err.to_string(), "raw payload size 10 exceeds limit of 5 bytes");

    let err = PipelineError::from(ValidationError::NotCanonical);
    assert!(err.to_string().starts_with("invalid record: "));
    assert!(std::error::Error::source(&err).is_some());
}
