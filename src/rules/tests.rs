use crate::api::{Normalizer, normalizer_for};
use crate::config::{InputCase, NormalizerConfig};
use crate::error::Error;
use crate::token::Token;
use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;
use std::sync::Arc;

static NORMALIZER: Lazy<Arc<Normalizer>> =
    Lazy::new(|| normalizer_for(&NormalizerConfig::default()).expect("default grammars build"));

fn spoken(text: &str) -> String {
    NORMALIZER.normalize(text).unwrap_or_else(|err| panic!("normalizing {text:?}: {err}"))
}

fn categories(text: &str) -> Vec<String> {
    NORMALIZER
        .tokenize(text)
        .unwrap_or_else(|err| panic!("tokenizing {text:?}: {err}"))
        .into_iter()
        .map(|token| token.category)
        .collect()
}

fn check_cases(cases: &[(&str, &str)]) {
    for (expected, input) in cases {
        assert_eq!(&spoken(input), expected, "input {input:?}");
    }
}

#[test]
fn cardinal_examples() {
    check_cases(&[
        ("zero", "0"),
        ("seven", "7"),
        ("twelve", "12"),
        ("forty", "40"),
        ("ninety nine", "99"),
        ("one hundred", "100"),
        ("one hundred twenty three", "123"),
        ("one hundred five", "105"),
        ("one thousand", "1000"),
        ("two thousand five hundred", "2,500"),
        ("one million", "1,000,000"),
        ("minus twenty three", "-23"),
        ("zero zero seven", "007"),
        ("I have twenty one apples", "I have 21 apples"),
    ]);
}

#[test]
fn grouped_numbers_past_the_largest_scale_are_spelled() {
    let zeros = vec!["zero"; 12].join(" ");
    assert_eq!(spoken("1,000,000,000,000"), format!("one {zeros}"));
    assert_eq!(categories("1,000,000,000,000"), vec!["cardinal"]);
    assert_eq!(spoken("12,345,678,901,234"), "one two three four five six seven eight nine zero one two three four");
    // Twelve digits still take the named reading.
    assert_eq!(spoken("999,000,000,000"), "nine hundred ninety nine billion");
}

#[test]
fn digit_length_boundary() {
    // 9 digits: always a telephone number.
    assert_eq!(categories("123456789"), vec!["telephone"]);
    assert_eq!(categories("100000000"), vec!["telephone"]);
    assert_eq!(spoken("123456789"), "one two three four five six seven eight nine");

    // 10 digits: a number only when the last six are zeros.
    assert_eq!(categories("1234567890"), vec!["telephone"]);
    assert_eq!(categories("1234000001"), vec!["telephone"]);
    assert_eq!(categories("1234000000"), vec!["cardinal"]);
    assert_eq!(spoken("1234000000"), "one billion two hundred thirty four million");

    // 11 digits: always a number.
    assert_eq!(categories("12345678901"), vec!["cardinal"]);
    assert_eq!(categories("12000000000"), vec!["cardinal"]);
    assert_eq!(spoken("12000000000"), "twelve billion");
}

#[test]
fn telephone_examples() {
    check_cases(&[
        ("call five five five, one two three four", "call 555-1234"),
        ("five five five, one two three, four five six seven", "555.123.4567"),
        ("five five five, one two three, four five six seven", "555-123-4567"),
        ("four four, two zero seven nine four six zero zero zero zero", "+44 2079460000"),
        ("one two three four, five six seven eight, nine zero one two, three four five six", "1234 5678 9012 3456"),
        ("one two three four, five six seven eight, nine zero one two, three four five six", "1234-5678-9012-3456"),
        ("pin code five six zero zero zero one", "pincode 560001"),
        ("my zip nine zero two one zero", "my ZIP 90210"),
    ]);
    assert_eq!(categories("PIN 560001"), vec!["telephone"]);
    // Without a context word six digits are an ordinary number.
    assert_eq!(categories("560001"), vec!["cardinal"]);
}

#[test]
fn decimal_and_fraction_examples() {
    check_cases(&[
        ("three point one four", "3.14"),
        ("point five", ".5"),
        ("minus zero point two five", "-0.25"),
        ("three over four", "3/4"),
        ("one over two", "1/2"),
    ]);
    assert_eq!(categories("1/2"), vec!["fraction"]);
}

#[test]
fn ordinal_examples() {
    check_cases(&[
        ("first", "1st"),
        ("second", "2nd"),
        ("third", "3rd"),
        ("eleventh", "11th"),
        ("twelfth", "12th"),
        ("twenty first", "21st"),
        ("one hundredth", "100th"),
    ]);
    // A suffix that does not fit the number is read as a code.
    assert_eq!(categories("21th"), vec!["serial"]);
    assert_eq!(spoken("21th"), "twenty one th");
}

#[test]
fn time_examples() {
    check_cases(&[
        ("three o'clock", "3:00"),
        ("seven oh five p m", "7:05 pm"),
        ("seven oh five p m", "7:05pm"),
        ("fourteen thirty", "14:30"),
        ("nine a m", "9:00 a.m."),
        ("zero forty five", "00:45"),
        ("zero o'clock", "00:00"),
        ("zero oh five", "00:05"),
        ("zero thirty", "0:30"),
        ("zero fifteen a m", "00:15 am"),
    ]);
    assert_eq!(categories("00:00"), vec!["time"]);
}

#[test]
fn date_examples() {
    check_cases(&[
        ("january fifteenth twenty twenty four", "2024-01-15"),
        ("january fifteenth twenty twenty four", "15/01/2024"),
        ("january fifteenth twenty twenty four", "15.01.2024"),
        ("march seventh two thousand five", "2005-03-07"),
        ("december first nineteen ninety nine", "1/12/1999"),
        ("may second nineteen oh five", "02-05-1905"),
        ("july fourth two thousand", "04/07/2000"),
    ]);
}

#[test]
fn money_examples() {
    check_cases(&[
        ("I have five dollars.", "I have $5."),
        ("five dollars and fifty cents", "$5.50"),
        ("five dollars and five cents", "$5.05"),
        ("five dollars", "$5.00"),
        ("three pounds", "£3"),
        ("one hundred yen", "¥100"),
        ("twenty euros and ninety nine cents", "€20.99"),
    ]);
}

#[test]
fn math_examples() {
    check_cases(&[
        ("one plus two", "1+2"),
        ("one plus two", "1 + 2"),
        ("x equals five", "x = 5"),
        ("x equals five", "x=5"),
        ("ten from two equals eight", "10-2=8"),
        ("alpha plus beta", "α+β"),
        ("square root of four", "√4"),
        ("two times three", "2×3"),
    ]);
}

#[test]
fn measure_examples() {
    check_cases(&[
        ("five kilometers", "5 km"),
        ("five kilometers", "5km"),
        ("one kilogram", "1 kg"),
        ("two point five kilograms", "2.5 kg"),
        ("minus three degrees Celsius", "-3 °C"),
        ("fifty percent", "50%"),
        ("sixty kilometers per hour", "60 km/h"),
        ("it is twelve feet tall", "it is 12 ft tall"),
    ]);
    assert_eq!(categories("5 km"), vec!["measure"]);
}

#[test]
fn scientific_examples() {
    check_cases(&[
        ("one point five times ten to the power of three", "1.5e3"),
        ("one point five times ten to the power of minus three", "1.5e-3"),
        ("two times ten to the power of plus six", "2E+6"),
        ("minus six point zero two times ten to the power of twenty three", "-6.02e23"),
    ]);
    assert_eq!(categories("1e5"), vec!["scientific"]);
}

#[test]
fn power_examples() {
    check_cases(&[
        ("x to the power of two", "x²"),
        ("ten to the power of minus seven", "10⁻⁷"),
        ("two to the power of ten", "2¹⁰"),
        ("alpha to the power of three", "α³"),
    ]);
    assert_eq!(categories("x²"), vec!["power"]);
}

#[test]
fn serial_examples() {
    check_cases(&[("B two B", "B2B"), ("MP three", "MP3"), ("A three hundred eighty", "A380")]);
    // Ordinals and measures are declared first and keep their readings.
    assert_eq!(categories("21st"), vec!["ordinal"]);
    assert_eq!(categories("5km"), vec!["measure"]);
    assert_eq!(categories("A380"), vec!["serial"]);
}

#[test]
fn indic_scripts_are_read() {
    check_cases(&[
        ("one hundred twenty three", "१२३"),
        ("नमस्ते five", "नमस्ते 5"),
        ("নমস্কার forty five", "নমস্কার ৪৫"),
        ("తెలుగు ninety one", "తెలుగు ౯౧"),
        ("नमस्ते। five", "नमस्ते। ५"),
        ("forty five kilometers", "৪৫ km"),
    ]);
    assert_eq!(categories("नमस्ते।"), vec!["word", "punctuation"]);
}

#[test]
fn whitelist_and_words() {
    check_cases(&[
        ("doctor Smith", "Dr. Smith"),
        ("see for example this", "see e.g. this"),
        ("don't stop", "don't stop"),
        ("a well-known fact", "a well-known fact"),
        ("three apples", "3-apples"),
        ("five kilometers", "5_km"),
    ]);
}

#[test]
fn lower_cased_input_folds_whitelist_keys() {
    let config = NormalizerConfig { input_case: InputCase::LowerCased, ..NormalizerConfig::default() };
    let normalizer = normalizer_for(&config).expect("builds");
    assert_eq!(normalizer.normalize("dr. smith").expect("normalizes"), "doctor smith");
    assert_eq!(spoken("dr. smith"), "dr. smith");
}

#[test]
fn punctuation_keeps_written_spacing() {
    check_cases(&[
        ("Hello, world!", "Hello, world!"),
        ("(one) two", "(1) 2"),
        ("wait... what?", "wait... what?"),
        ("she said \"hi\".", "she said \"hi\"."),
        ("!", "!"),
        ("yes/no", "yes/no"),
        ("yes / no", "yes / no"),
        ("x— five", "x—5"),
        ("( one )", "( 1 )"),
        ("wait , what", "wait , what"),
    ]);
}

#[test]
fn whitespace_is_collapsed_and_trimmed() {
    assert_eq!(spoken(""), "");
    assert_eq!(spoken("   \t "), "");
    assert_eq!(spoken("  I   have\t$5.  "), "I have five dollars.");
    let once = spoken("call   555-1234 ,  ok");
    assert_eq!(once, "call five five five, one two three four , ok");
    assert_eq!(spoken(&once), once);
}

#[test]
fn normalization_is_deterministic() {
    let text = "On 2024-01-15 at 7:05 pm, Dr. Smith paid $5.50 for 3/4 of 21st-century x=5.";
    let first = NORMALIZER.normalize_verbose(text).expect("normalizes");
    for _ in 0..3 {
        let again = NORMALIZER.normalize_verbose(text).expect("normalizes");
        assert_eq!(again.tokens, first.tokens);
        assert_eq!(again.spoken, first.spoken);
    }
}

#[test]
fn shared_across_threads() {
    let inputs = ["1+2", "$5.50", "555-1234", "2024-01-15", "21st", "Dr. Smith"];
    let expected: Vec<String> = inputs.iter().map(|text| spoken(text)).collect();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let normalizer = Arc::clone(&NORMALIZER);
            std::thread::spawn(move || {
                inputs.iter().map(|text| normalizer.normalize(text).expect("normalizes")).collect::<Vec<_>>()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().expect("thread finished"), expected);
    }
}

#[test]
fn token_stream_round_trips_through_verbalize() {
    let tokens = NORMALIZER.tokenize("I have $5.").expect("tokenizes");
    assert_eq!(
        tokens,
        vec![
            Token::new("word").with_field("name", "I"),
            Token::new("word").with_field("name", "have"),
            Token::new("money").with_field("integer_part", "five").with_field("currency_maj", "dollars"),
            Token::new("punctuation").with_field("name", "."),
        ]
    );
    assert_eq!(NORMALIZER.verbalize(&tokens).expect("verbalizes"), "I have five dollars.");
}

#[test]
fn verbalizer_reorders_fields() {
    let tokens = vec![
        Token::new("date").with_field("year", "twenty twenty four").with_field("day", "one").with_field("month", "may"),
    ];
    assert_eq!(NORMALIZER.verbalize(&tokens).expect("verbalizes"), "may first twenty twenty four");
}

#[test]
fn errors_are_reported() {
    assert!(matches!(
        NORMALIZER.normalize("hi 😀"),
        Err(Error::OutOfAlphabet { ch: '😀', offset: 3 })
    ));
    assert!(matches!(NORMALIZER.verbalize(&[Token::new("nope")]), Err(Error::UnknownCategory(c)) if c == "nope"));
    assert!(matches!(
        NORMALIZER.verbalize(&[Token::new("cardinal").with_field("bogus", "x")]),
        Err(Error::NoPath { .. })
    ));
}

#[test]
fn fallback_must_dominate() {
    let config = NormalizerConfig { fallback_weight: 1.0, ..NormalizerConfig::default() };
    assert!(matches!(Normalizer::new(config), Err(Error::FallbackNotDominant { .. })));
}

#[test]
fn custom_lexicon_drives_math_priority() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("digit.tsv"),
        "1\tONE\n2\tTWO\n3\tTHREE\n4\tFOUR\n5\tFIVE\n6\tSIX\n7\tSEVEN\n8\tEIGHT\n9\tNINE\n",
    )
    .expect("write digit table");
    std::fs::write(dir.path().join("math_operations.tsv"), "+\tPLUS\n-\tMINUS\n=\tEQUALS\n")
        .expect("write operations");
    std::fs::write(dir.path().join("math_idioms.tsv"), "-\tFROM\n").expect("write idioms");

    let config = NormalizerConfig { lexicon_dir: Some(dir.path().to_path_buf()), ..NormalizerConfig::default() };
    let normalizer = Normalizer::new(config).expect("builds");

    assert_eq!(
        normalizer.tokenize("1+2").expect("tokenizes"),
        vec![Token::new("math").with_field("left", "ONE").with_field("operator", "PLUS").with_field("right", "TWO")]
    );
    assert_eq!(
        normalizer.tokenize("10-2=8").expect("tokenizes"),
        vec![
            Token::new("math")
                .with_field("left", "ten")
                .with_field("operator", "FROM")
                .with_field("middle", "TWO")
                .with_field("operator_two", "EQUALS")
                .with_field("right", "EIGHT")
        ]
    );
    assert_eq!(normalizer.normalize("10 - 2").expect("normalizes"), "ten MINUS TWO");
}

#[test]
fn archive_restores_the_same_engine() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = NormalizerConfig { cache_dir: Some(dir.path().to_path_buf()), ..NormalizerConfig::default() };

    let built = Normalizer::new(config.clone()).expect("builds");
    assert!(!built.build_metrics().restored);
    let restored = Normalizer::new(config.clone()).expect("restores");
    assert!(restored.build_metrics().restored);

    let text = "Dr. Smith paid $5.50 on 2024-01-15, call 555-1234!";
    assert_eq!(restored.normalize(text).expect("normalizes"), built.normalize(text).expect("normalizes"));

    let rebuilt = Normalizer::new(NormalizerConfig { overwrite_cache: true, ..config }).expect("rebuilds");
    assert!(!rebuilt.build_metrics().restored);
}

#[test]
fn corrupt_archive_is_rebuilt() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = NormalizerConfig { cache_dir: Some(dir.path().to_path_buf()), ..NormalizerConfig::default() };
    let built = Normalizer::new(config.clone()).expect("builds");
    drop(built);

    for entry in std::fs::read_dir(dir.path()).expect("cache dir") {
        std::fs::write(entry.expect("entry").path(), "{ not json").expect("corrupt archive");
    }
    let normalizer = Normalizer::new(config).expect("rebuilds");
    assert!(!normalizer.build_metrics().restored);
    assert_eq!(normalizer.normalize("1+2").expect("normalizes"), "one plus two");
}
