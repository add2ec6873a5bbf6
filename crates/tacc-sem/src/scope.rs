//! Symbol scopes and function records (§3).
//!
//! Block scopes are flattened into the enclosing function scope rather
//! than pushed/popped at `{`/`}` (§9's documented simplification): there
//! is exactly one global [`Scope`] and one per [`FunctionRecord`], both
//! built as a flat, insertion-ordered table unique by name.

use indexmap::IndexMap;
use tacc_util::symbol::Symbol;

use crate::types::VarType;

/// A scope: symbols unique by interned name, in declaration order.
/// Declaration order doesn't affect lookup, but `IndexMap` keeps
/// iteration deterministic for any future diagnostic that wants to
/// list symbols. Callers intern a name through the shared
/// [`tacc_util::symbol::SymbolInterner`] before declaring or looking
/// it up here, so two mentions of the same identifier always collide
/// on the same key regardless of which scope or function they appear
/// in.
#[derive(Debug, Default)]
pub struct Scope {
    symbols: IndexMap<Symbol, VarType>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a symbol, or returns `false` if `name` is already bound in
    /// this scope (a redeclaration, which the caller reports as an
    /// error — §7's "redeclaration within a scope").
    pub fn declare(&mut self, name: Symbol, ty: VarType) -> bool {
        if self.symbols.contains_key(&name) {
            return false;
        }
        self.symbols.insert(name, ty);
        true
    }

    pub fn lookup(&self, name: Symbol) -> VarType {
        self.symbols.get(&name).copied().unwrap_or(VarType::Unknown)
    }
}

tacc_util::new_index_type!(FunctionId);

/// A function's accumulated semantic state: the declared name, its
/// inferred return type (§4.3: "default return type int", refined by
/// the first `return`), its flattened local scope, and whether a
/// `return` has been seen anywhere in its body.
#[derive(Debug)]
pub struct FunctionRecord {
    pub name: String,
    pub return_type: VarType,
    pub scope: Scope,
    pub has_return: bool,
    pub def_line: u32,
}

impl FunctionRecord {
    pub fn new(name: String, def_line: u32) -> Self {
        FunctionRecord {
            name,
            return_type: VarType::Int,
            scope: Scope::new(),
            has_return: false,
            def_line,
        }
    }
}
