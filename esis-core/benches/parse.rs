//! Benchmarks for ESIS decoding, dispatch and re-encoding.
//!
//! Run with: cargo bench

use std::ops::ControlFlow;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use esis_core::{escape, writer, ElementEvent, Env, Format, Options, Reader, Writer};

/// Sections of paragraphs with attributes and escaped data.
fn generate_document(sections: usize) -> Vec<u8> {
    let mut doc = Vec::new();
    doc.extend_from_slice(b"Aversion CDATA 1.0\n(doc\n");
    for s in 0..sections {
        doc.extend_from_slice(format!("Aid CDATA s{s}\nAclass CDATA section\n(sect\n").as_bytes());
        doc.extend_from_slice(format!("(title\n-Section {s}\n)title\n").as_bytes());
        for p in 0..5 {
            doc.extend_from_slice(format!("Aid CDATA p{s}-{p}\n(para\n").as_bytes());
            doc.push(b'-');
            doc.extend_from_slice(&escape::encode(
                b"Some text with a\nnewline, a \\ backslash and <markup> & more.",
            ));
            doc.extend_from_slice(b"\n(em\n-emphasis\n)em\n-tail\n)para\n");
        }
        doc.extend_from_slice(b")sect\n");
    }
    doc.extend_from_slice(b")doc\n");
    doc
}

fn count(n: &mut usize, _event: ElementEvent<'_>, _env: Env<'_>) -> ControlFlow<()> {
    *n += 1;
    ControlFlow::Continue(())
}

/// Decode with a wildcard handler that only counts.
fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    for sections in [1, 20, 200] {
        let doc = generate_document(sections);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::new("wildcard", sections), &doc, |b, doc| {
            b.iter(|| {
                let mut reader: Reader<'_, usize> = Reader::new();
                reader.register_wildcard(0, count).unwrap();
                let mut n = 0;
                reader.parse_bytes(black_box(doc), &mut n).unwrap();
                n
            })
        });
        group.bench_with_input(BenchmarkId::new("exact", sections), &doc, |b, doc| {
            b.iter(|| {
                let mut reader: Reader<'_, usize> = Reader::new();
                for name in ["doc", "sect", "title", "para", "em"] {
                    reader.register(name, 0, count).unwrap();
                }
                let mut n = 0;
                reader.parse_bytes(black_box(doc), &mut n).unwrap();
                n
            })
        });
    }
    group.finish();
}

/// Filter mode with one handled element; everything else is echoed.
fn bench_filter(c: &mut Criterion) {
    let doc = generate_document(200);
    let mut group = c.benchmark_group("filter");
    group.throughput(Throughput::Bytes(doc.len() as u64));
    group.bench_function("echo_all_but_em", |b| {
        let mut echo = Vec::with_capacity(doc.len());
        b.iter(|| {
            echo.clear();
            let mut reader: Reader<'_, usize> = Reader::new();
            reader.register("em", 0, count).unwrap();
            let mut n = 0;
            reader.filter_bytes(black_box(&doc), &mut echo, &mut n).unwrap();
            n
        })
    });
    group.finish();
}

/// Decode and re-encode through each back end.
fn bench_convert(c: &mut Criterion) {
    let doc = generate_document(200);
    let mut group = c.benchmark_group("convert");
    group.throughput(Throughput::Bytes(doc.len() as u64));
    for (format, options) in [
        (Format::Esis, Options::empty()),
        (Format::Xml, Options::empty()),
        (Format::Xml, Options::CANONICAL),
        (Format::Sgml, Options::empty()),
    ] {
        let label = if options.is_canonical() {
            format!("{format}-canonical")
        } else {
            format.to_string()
        };
        group.bench_function(label, |b| {
            b.iter(|| {
                let mut out = Writer::new(Vec::with_capacity(doc.len()), format, options);
                let mut reader: Reader<'_, Writer<Vec<u8>>> = Reader::new();
                reader.register_wildcard(0, writer::forward::<Vec<u8>>).unwrap();
                reader.parse_bytes(black_box(&doc), &mut out).unwrap();
                out.into_inner().len()
            })
        });
    }
    group.finish();
}

/// Escape decoding alone, the innermost loop of data lines.
fn bench_escape(c: &mut Criterion) {
    let plain = b"Plain text without any escapes at all, just words and spaces.".repeat(16);
    let escaped =
        escape::encode(&b"Tab\tnewline\nbackslash\\ and more text here ".repeat(16)).into_owned();

    let mut group = c.benchmark_group("escape");
    group.throughput(Throughput::Bytes(plain.len() as u64));
    group.bench_function("decode_plain", |b| b.iter(|| escape::decode(black_box(&plain)).len()));
    group.throughput(Throughput::Bytes(escaped.len() as u64));
    group.bench_function("decode_escaped", |b| {
        b.iter(|| escape::decode(black_box(&escaped)).len())
    });
    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_filter, bench_convert, bench_escape);
criterion_main!(benches);
