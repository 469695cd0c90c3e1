use normalize::{is_canonical, normalize, Normalizer};

struct Case {
    name: &'static str,
    input: &'static str,
    expected: &'static str,
}

#[test]
fn golden_corpus_regression() {
    let cases = [
        Case {
            name: "windows_line_endings",
            input: "first line\r\nsecond line\r\n",
            expected: "first line\nsecond line",
        },
        Case {
            name: "classic_mac_line_endings",
            input: "one\rtwo\rthree",
            expected: "one\ntwo\nthree",
        },
        Case {
            name: "markdown_with_ragged_spacing",
            input: "# Title   \n\n\n\nSome   text\twith\t\ttabs.  \n\n\n- item one \n- item two\n",
            expected: "# Title\n\nSome text\twith tabs.\n\n- item one\n- item two",
        },
        Case {
            name: "whitespace_only_lines_between_paragraphs",
            input: "para one\n   \n\t\n \t \npara two",
            expected: "para one\n\npara two",
        },
        Case {
            name: "leading_and_trailing_noise",
            input: "\n\n   \t body \t  \n\n\n",
            expected: "body",
        },
        Case {
            name: "non_ascii_space_inside_line",
            input: "a\u{00A0}\u{00A0}b",
            expected: "a\u{00A0}\u{00A0}b",
        },
        Case {
            name: "non_bmp_codepoints",
            input: " a\u{10348}b   \u{1f600} ",
            expected: "a\u{10348}b \u{1f600}",
        },
    ];

    let normalizer = Normalizer::without_repair();
    for case in cases {
        let out = normalizer.normalize(case.input);
        assert_eq!(out, case.expected, "text mismatch for {}", case.name);
        assert!(is_canonical(&out), "not canonical for {}", case.name);
        assert_eq!(
            normalizer.normalize(&out),
            out,
            "not idempotent for {}",
            case.name
        );
    }
}

#[cfg(feature = "repair")]
#[test]
fn golden_corpus_with_repair() {
    let cases = [
        ("utf8_read_as_cp1252", "rÃ©sumÃ©  \r\n", "résumé"),
        ("smart_quote_mojibake", "donâ€™t   panic", "don\u{2019}t panic"),
        ("byte_order_mark", "\u{FEFF}title\n\n\n\nbody", "title\n\nbody"),
        ("decomposed_accents", "Cafe\u{0301} au lait", "Caf\u{00E9} au lait"),
        ("mojibake_with_trailing_nbsp", "Ã©\u{a0}", "é"),
        ("mojibake_with_leading_nbsp", "\u{a0}Ã©", "é"),
        ("mojibake_with_em_space_edge", "\u{2003}naÃ¯ve\u{2003}", "naïve"),
    ];

    for (name, input, expected) in cases {
        let out = normalize(input);
        assert_eq!(out, expected, "text mismatch for {name}");
        assert_eq!(normalize(&out), out, "not idempotent for {name}");
    }
}
