//! Test harness for running fixture cases with stochastic variations

use std::ops::ControlFlow;

use esis_core::{writer, ElementEvent, Env, Format, Options, Reader, Writer};

use crate::common::{Gen, TestCase};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub input: Vec<u8>,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
    pub errors: Vec<String>,
}

/// Format an event for comparison: `(name a=v b`, `-data`, `)name`
///
/// Implied attributes print without `=`.
pub fn format_event(event: &ElementEvent<'_>) -> String {
    match event {
        ElementEvent::Start { element, .. } => {
            let mut out = format!("({}", String::from_utf8_lossy(element.name));
            for attr in element.attrs {
                out.push(' ');
                out.push_str(&String::from_utf8_lossy(attr.name));
                if !attr.is_implied() {
                    out.push('=');
                    out.push_str(&String::from_utf8_lossy(attr.value));
                }
            }
            out
        }
        ElementEvent::CharacterData { data, .. } => {
            format!("-{}", String::from_utf8_lossy(data))
        }
        ElementEvent::End { element, .. } => {
            format!("){}", String::from_utf8_lossy(element.name))
        }
    }
}

/// Events a wildcard handler sees for `input`
pub fn collect_events(input: &[u8]) -> Vec<String> {
    let mut events = Vec::new();
    let mut reader: Reader<'_, Vec<String>> = Reader::new();
    reader
        .register_fn(
            "",
            0,
            |events: &mut Vec<String>, event: ElementEvent<'_>, _env: Env<'_>| {
                events.push(format_event(&event));
                ControlFlow::Continue(())
            },
        )
        .unwrap();
    reader.parse_bytes(input, &mut events).unwrap();
    events
}

/// Re-encode `input` by forwarding every element into a writer
pub fn convert(input: &[u8], format: Format, options: Options) -> String {
    let mut out = Writer::new(Vec::new(), format, options);
    let mut reader: Reader<'_, Writer<Vec<u8>>> = Reader::new();
    reader.register_wildcard(0, writer::forward).unwrap();
    reader.parse_bytes(input, &mut out).unwrap();
    String::from_utf8_lossy(&out.into_inner()).into_owned()
}

/// Echo of a filter pass with no handlers registered
pub fn filter_echo(input: &[u8]) -> String {
    let mut echo = Vec::new();
    let mut reader: Reader<'_, ()> = Reader::new();
    // Malformed cases record a syntax error; the echo is still compared.
    let _ = reader.filter_bytes(input, &mut echo, &mut ());
    String::from_utf8_lossy(&echo).into_owned()
}

fn check_output(
    errors: &mut Vec<String>,
    label: &str,
    expected: Option<&str>,
    actual: impl FnOnce() -> String,
) {
    if let Some(expected) = expected {
        let actual = actual();
        if actual != expected {
            errors.push(format!("{label}: expected {expected:?}, got {actual:?}"));
        }
    }
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    let input = case.esis.as_bytes();
    let actual = collect_events(input);
    let expected = case.events.clone();

    let mut errors = Vec::new();

    if !expected.is_empty() {
        if actual.len() != expected.len() {
            errors.push(format!(
                "Event count mismatch: expected {}, got {}",
                expected.len(),
                actual.len()
            ));
        }
        for (i, (act, exp)) in actual.iter().zip(expected.iter()).enumerate() {
            if act != exp {
                errors.push(format!("Event {}: expected '{}', got '{}'", i, exp, act));
            }
        }
    }

    check_output(&mut errors, "xml", case.xml.as_deref(), || {
        convert(input, Format::Xml, Options::empty())
    });
    check_output(&mut errors, "canonical", case.canonical.as_deref(), || {
        convert(input, Format::Xml, Options::CANONICAL)
    });
    check_output(&mut errors, "sgml", case.sgml.as_deref(), || {
        convert(input, Format::Sgml, Options::empty())
    });
    check_output(&mut errors, "esis", case.expected_esis(), || {
        convert(input, Format::Esis, Options::empty())
    });
    check_output(&mut errors, "echo", case.expected_echo(), || filter_echo(input));

    TestResult {
        passed: errors.is_empty(),
        input: input.to_vec(),
        expected,
        actual,
        seed: 0,
        errors,
    }
}

/// Run test with stochastic variations
///
/// Applies independent variations:
/// - 40% chance of a sibling element before
/// - 50% chance of an enclosing element (with random attributes)
/// - Unsupported lines injected between input lines
/// - 40% chance of a sibling element after
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    if !case.variations {
        return run_test(case);
    }
    let mut input = Vec::new();
    let wrapper = gen.chance(0.5).then(|| gen.name());

    if gen.chance(0.4) {
        input.extend(gen.fragment());
    }
    if let Some(name) = &wrapper {
        if gen.chance(0.5) {
            input.extend(b"Awrapped CDATA yes\n");
        }
        input.push(b'(');
        input.extend(name);
        input.push(b'\n');
    }

    for line in case.esis.lines() {
        if gen.chance(0.2) {
            input.extend(gen.unsupported_line());
        }
        input.extend(line.as_bytes());
        input.push(b'\n');
    }

    if let Some(name) = &wrapper {
        input.push(b')');
        input.extend(name);
        input.push(b'\n');
    }
    if gen.chance(0.4) {
        input.extend(gen.fragment());
    }

    let actual = collect_events(&input);
    let expected = case.events.clone();

    // Wrapping adds events around the case; expected events must still
    // appear in order.
    let mut errors = Vec::new();
    let mut exp_idx = 0;
    for act in &actual {
        if exp_idx < expected.len() && act == &expected[exp_idx] {
            exp_idx += 1;
        }
    }
    if exp_idx < expected.len() {
        errors.push(format!(
            "Missing expected events starting at index {}: {:?}",
            exp_idx,
            &expected[exp_idx..]
        ));
    }

    if let Some(xml) = &case.xml {
        let out = convert(&input, Format::Xml, Options::empty());
        if !out.contains(xml.as_str()) {
            errors.push(format!("xml {out:?} does not contain {xml:?}"));
        }
    }

    TestResult {
        passed: errors.is_empty(),
        input,
        expected,
        actual,
        seed: gen.seed,
        errors,
    }
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set ESIS_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("\nInput:");
        eprintln!("{}", String::from_utf8_lossy(&self.input));
        eprintln!("\nExpected events:");
        for (i, e) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nActual events:");
        for (i, e) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
