//! String interning.
//!
//! The reference design (§5) runs strictly single-threaded, so unlike a
//! general-purpose language front-end this interner does not need a
//! `DashMap`-backed concurrent table; a plain `RustcHashMap` behind a
//! single owner is sufficient and avoids paying for synchronization
//! nothing here ever needs.

use rustc_hash::FxHashMap;
use std::fmt;

/// A handle to an interned string. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Owns the interned strings; symbols are only meaningful against the
/// interner that minted them.
#[derive(Debug, Default)]
pub struct SymbolInterner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, Symbol>,
}

impl SymbolInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, text: &str) -> Symbol {
        if let Some(&sym) = self.lookup.get(text) {
            return sym;
        }
        let sym = Symbol(self.strings.len() as u32);
        let boxed: Box<str> = text.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, sym);
        sym
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_text_twice_gives_same_symbol() {
        let mut interner = SymbolInterner::new();
        let a = interner.intern("main");
        let b = interner.intern("main");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_text_gives_distinct_symbols() {
        let mut interner = SymbolInterner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        assert_ne!(a, b);
    }

    #[test]
    fn resolve_round_trips() {
        let mut interner = SymbolInterner::new();
        let sym = interner.intern("multiply");
        assert_eq!(interner.resolve(sym), "multiply");
    }
}

/// §8's round-trip property family, applied to the interner itself:
/// any text handed to `intern` resolves back to exactly that text.
#[cfg(test)]
mod round_trip_property {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn intern_then_resolve_round_trips(text: String) -> bool {
        let mut interner = SymbolInterner::new();
        let sym = interner.intern(&text);
        interner.resolve(sym) == text
    }
}
