//! Convert ESIS on stdin to another format on stdout.
//!
//!     cargo run --example esis2xml -- xml < doc.esis
//!     cargo run --example esis2xml -- xml canonical < doc.esis
//!     cargo run --example esis2xml -- sgml < doc.esis

use std::io::{self, BufWriter, StdoutLock};

use esis_core::{writer, Format, Options, Reader, Writer};

fn main() {
    let mut args = std::env::args().skip(1);
    let format: Format = args.next().as_deref().unwrap_or("xml").parse().unwrap();
    let options = match args.next().as_deref() {
        Some("canonical") => Options::CANONICAL,
        _ => Options::empty(),
    };

    let mut out = Writer::new(BufWriter::new(io::stdout().lock()), format, options);

    let mut reader: Reader<'_, Writer<BufWriter<StdoutLock<'static>>>> = Reader::new();
    reader.register_wildcard(0, writer::forward::<BufWriter<StdoutLock<'static>>>).unwrap();
    let stats = reader.parse(io::stdin().lock(), &mut out);
    out.finish().unwrap();

    match stats {
        Ok(stats) => eprintln!("{:?}", stats),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
