//! Stochastic ESIS generators for test variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use esis_core::escape;

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

/// Pieces data and attribute values are made of. Covers every escape
/// the ESIS writer produces and every markup character.
const PIECES: &[&[u8]] = &[
    b"a", b"b", b"text", b"Hello", b" ", b" ", b"\\", b"\n", b"\t", b"<", b">", b"&", b"\"",
    "\u{e9}".as_bytes(), "\u{20ac}".as_bytes(),
];

/// Lines the reader does not interpret.
const UNSUPPORTED: &[&[u8]] =
    &[b"&ent", b"sdoc.sgm", b"L12", b"C", b"#comment", b"iincluded", b"Nnotation"];

/// Declared-value markers other than CDATA; `IMPLIED` takes no value.
const MARKERS: &[&[u8]] = &[
    b"TOKEN", b"NAME", b"NAMES", b"NMTOKEN", b"NMTOKENS", b"NUMBER", b"NUMBERS", b"NUTOKEN",
    b"NUTOKENS", b"ID", b"IDREF", b"IDREFS", b"ENTITY", b"ENTITIES", b"NOTATION", b"IMPLIED",
];

impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("ESIS_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        Self::new(seed)
    }

    /// Geometric distribution: count until rand > alpha
    /// Returns 0, 1, 2, ... with decreasing probability
    pub fn geometric(&mut self, alpha: f64) -> usize {
        let mut n = 0;
        while self.rng.gen::<f64>() < alpha {
            n += 1;
        }
        n
    }

    /// Poisson-like count (simplified)
    pub fn poisson(&mut self, lambda: f64) -> usize {
        let l = (-lambda).exp();
        let mut k = 0;
        let mut p = 1.0;
        loop {
            k += 1;
            p *= self.rng.gen::<f64>();
            if p <= l {
                break;
            }
        }
        k - 1
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Random element or attribute name
    pub fn name(&mut self) -> Vec<u8> {
        let len = 1 + self.geometric(0.7);
        let mut name = Vec::with_capacity(len);
        name.push(self.rng.gen_range(b'a'..=b'z'));
        let chars = b"abcdefghijklmnopqrstuvwxyz0123456789-_.";
        for _ in 1..len {
            name.push(chars[self.rng.gen_range(0..chars.len())]);
        }
        name
    }

    /// Random decoded value, possibly empty
    pub fn value(&mut self) -> Vec<u8> {
        let len = self.geometric(0.8);
        let mut out = Vec::new();
        for _ in 0..len {
            out.extend_from_slice(PIECES[self.rng.gen_range(0..PIECES.len())]);
        }
        out
    }

    /// Declared-value marker, CDATA half of the time
    pub fn marker(&mut self) -> &'static [u8] {
        if self.chance(0.5) {
            b"CDATA"
        } else {
            MARKERS[self.rng.gen_range(0..MARKERS.len())]
        }
    }

    /// Random decoded data, never empty
    pub fn data(&mut self) -> Vec<u8> {
        let mut data = self.value();
        if data.is_empty() {
            data.extend_from_slice(b"x");
        }
        data
    }

    /// One line the reader counts as unsupported (with newline)
    pub fn unsupported_line(&mut self) -> Vec<u8> {
        let mut line = UNSUPPORTED[self.rng.gen_range(0..UNSUPPORTED.len())].to_vec();
        line.push(b'\n');
        line
    }

    /// Random well-formed document in the form the ESIS writer produces
    pub fn document(&mut self) -> Vec<u8> {
        let mut out = Vec::new();
        self.element(&mut out, 0);
        out
    }

    /// Small element, for context wrapping
    pub fn fragment(&mut self) -> Vec<u8> {
        let mut out = Vec::new();
        self.element(&mut out, 3);
        out
    }

    fn element(&mut self, out: &mut Vec<u8>, depth: usize) {
        let name = self.name();
        for i in 0..self.geometric(0.4) {
            // Numbered, so names stay unique within the element
            out.push(b'A');
            out.extend(self.name());
            out.extend(i.to_string().as_bytes());
            out.push(b' ');
            let marker = self.marker();
            out.extend(marker);
            if marker != b"IMPLIED" {
                out.push(b' ');
                out.extend(escape::encode(&self.value()).as_ref());
            }
            out.push(b'\n');
        }
        out.push(b'(');
        out.extend(&name);
        out.push(b'\n');

        let children = if depth < 4 { self.geometric(0.6) } else { 0 };
        for _ in 0..children {
            if self.chance(0.5) {
                out.push(b'-');
                out.extend(escape::encode(&self.data()).as_ref());
                out.push(b'\n');
            } else {
                self.element(out, depth + 1);
            }
        }

        out.push(b')');
        out.extend(&name);
        out.push(b'\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut g1 = Gen::new(42);
        let mut g2 = Gen::new(42);

        for _ in 0..10 {
            assert_eq!(g1.name(), g2.name());
            assert_eq!(g1.document(), g2.document());
        }
    }

    #[test]
    fn test_documents_use_every_marker() {
        let mut gen = Gen::new(11);
        let mut doc = Vec::new();
        for _ in 0..500 {
            doc.extend(gen.document());
        }
        for marker in MARKERS.iter().copied().chain([&b"CDATA"[..]]) {
            let found = doc
                .split(|&b| b == b'\n')
                .filter(|l| l.first() == Some(&b'A'))
                .any(|l| l.split(|&b| b == b' ').nth(1) == Some(marker));
            assert!(found, "no {} attribute", String::from_utf8_lossy(marker));
        }
    }

    #[test]
    fn test_documents_are_line_oriented() {
        let mut gen = Gen::new(7);
        for _ in 0..20 {
            let doc = gen.document();
            assert!(doc.ends_with(b"\n"));
            for line in doc.split(|&b| b == b'\n').filter(|l| !l.is_empty()) {
                assert!(matches!(line[0], b'A' | b'(' | b'-' | b')'));
            }
        }
    }
}
