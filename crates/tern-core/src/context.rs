//! Central compiler context.
//!
//! All arenas and phase state of one compilation live here and are passed
//! explicitly through the pipeline; there is no global mutable state, so
//! the core is reentrant and unit-testable.

use std::sync::Arc;

use crate::ast::Ast;
use crate::diagnostic::Diagnostics;
use crate::interner::{Interner, Name};
use crate::known::{register_base_types, BaseTypes, Keywords};
use crate::source::SourceMap;
use crate::symbols::SymbolTable;
use crate::types::Types;

/// Stores all state of one compilation: the interner, the source map, the
/// diagnostics sink, and every entity arena. The single source of truth
/// for all compiler data.
pub struct CompilerContext {
    /// String interner (shared, thread-safe).
    pub interner: Arc<Interner>,
    /// Keyword names, interned at startup.
    pub kw: Keywords,
    /// Builtin base type handles.
    pub base: BaseTypes,
    /// Source file management.
    pub source_map: SourceMap,
    /// Accumulated diagnostics.
    pub diagnostics: Diagnostics,
    /// Scopes, symbols, and symbol references.
    pub syms: SymbolTable,
    /// The type arena.
    pub types: Types,
    /// Token, expression, statement, and declaration arenas.
    pub ast: Ast,
}

impl Default for CompilerContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerContext {
    /// Create a new compiler context with keywords and base types
    /// registered.
    pub fn new() -> Self {
        Self::with_interner(Arc::new(Interner::new()))
    }

    /// Create with a shared interner.
    pub fn with_interner(interner: Arc<Interner>) -> Self {
        let kw = Keywords::intern(&interner);
        let mut types = Types::new();
        let mut syms = SymbolTable::new();
        let base = register_base_types(&interner, &mut types, &mut syms);

        Self {
            interner,
            kw,
            base,
            source_map: SourceMap::new(),
            diagnostics: Diagnostics::new(),
            syms,
            types,
            ast: Ast::new(),
        }
    }

    /// Intern a string.
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Get the string for an interned name.
    pub fn str(&self, name: Name) -> String {
        self.interner.str(name)
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Get the error count.
    pub fn error_count(&self) -> usize {
        self.diagnostics.error_count()
    }

    /// Render all diagnostics.
    pub fn render_diagnostics(&self) -> String {
        self.diagnostics.render(&self.source_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_basic() {
        let ctx = CompilerContext::new();

        let name = ctx.intern("test");
        assert_eq!(ctx.str(name), "test");
        assert!(!ctx.has_errors());
    }

    #[test]
    fn test_context_startup_registration() {
        let ctx = CompilerContext::new();

        // Keywords were interned before anything else.
        assert_eq!(ctx.intern("if"), ctx.kw.kw_if);

        // Base types are visible in the global scope.
        let int = ctx.intern("int");
        assert!(ctx.syms.lookup(ctx.syms.global_scope(), int).is_some());
    }

    #[test]
    fn test_context_shared_interner() {
        let interner = Arc::new(Interner::new());
        let name1 = interner.intern("shared");

        let ctx = CompilerContext::with_interner(interner.clone());
        let name2 = ctx.intern("shared");

        assert_eq!(name1, name2);
    }
}
