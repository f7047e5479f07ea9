//! Rename one element and pass everything else through untouched.
//!
//!     cargo run --example filter -- para p < doc.esis

use std::io::{self, Write};
use std::ops::ControlFlow;

use esis_core::{ElementEvent, Env, Reader, Writer};

fn main() {
    let mut args = std::env::args().skip(1);
    let from = args.next().unwrap_or_else(|| "para".to_string());
    let to = args.next().unwrap_or_else(|| "p".to_string());

    let mut out = Writer::esis(io::stdout().lock());
    let mut reader: Reader<'_, Writer<_>> = Reader::new();
    reader
        .register_fn(&from, 1, move |w: &mut Writer<_>, event: ElementEvent<'_>, env: Env<'_>| {
            match event {
                ElementEvent::Start { element, .. } => {
                    eprintln!("{} inside {:?}", to, env);
                    w.start(&to, element.attrs);
                }
                ElementEvent::CharacterData { data, .. } => {
                    w.pcdata(data);
                }
                ElementEvent::End { .. } => {
                    w.end(&to);
                }
            }
            ControlFlow::Continue(())
        })
        .unwrap();

    // Echo goes to a second handle so the writer keeps its own.
    let mut echo = io::stdout();
    let stats = reader.filter(io::stdin().lock(), &mut echo, &mut out).unwrap();
    out.finish().unwrap().flush().unwrap();
    eprintln!("{:?}", stats);
}
