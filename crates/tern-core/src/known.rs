//! Startup interning and builtin registration.
//!
//! The keyword strings are interned once at context creation so keyword
//! recognition in the parser is a [`Name`] equality check. Base types are
//! registered the same way: a complete `Base` type plus a type symbol in
//! the global scope.

use crate::ids::TypeId;
use crate::interner::{Interner, Name};
use crate::symbols::{SymbolKind, SymbolTable};
use crate::types::Types;

/// The pre-interned keyword names.
#[derive(Debug, Clone, Copy)]
pub struct Keywords {
    pub kw_if: Name,
    pub kw_while: Name,
    pub kw_for: Name,
    pub kw_return: Name,
    pub kw_proc: Name,
    pub kw_data: Name,
    pub kw_entity: Name,
    pub kw_array: Name,
}

impl Keywords {
    pub fn intern(interner: &Interner) -> Self {
        Self {
            kw_if: interner.intern("if"),
            kw_while: interner.intern("while"),
            kw_for: interner.intern("for"),
            kw_return: interner.intern("return"),
            kw_proc: interner.intern("proc"),
            kw_data: interner.intern("data"),
            kw_entity: interner.intern("entity"),
            kw_array: interner.intern("array"),
        }
    }

    pub fn is_keyword(&self, name: Name) -> bool {
        name == self.kw_if
            || name == self.kw_while
            || name == self.kw_for
            || name == self.kw_return
            || name == self.kw_proc
            || name == self.kw_data
            || name == self.kw_entity
            || name == self.kw_array
    }
}

/// Builtin base types, registered at startup.
const BASE_TYPES: &[(&str, u32)] = &[("int", 8), ("byte", 1)];

/// Handles of the builtin base types.
#[derive(Debug, Clone, Copy)]
pub struct BaseTypes {
    pub int: TypeId,
    pub byte: TypeId,
}

/// Register the builtin base types in the global scope.
pub fn register_base_types(
    interner: &Interner,
    types: &mut Types,
    syms: &mut SymbolTable,
) -> BaseTypes {
    let global = syms.global_scope();
    let mut handles = Vec::with_capacity(BASE_TYPES.len());

    for &(name, size) in BASE_TYPES {
        let name = interner.intern(name);
        let tp = types.base(name, size);
        syms.define(global, name, SymbolKind::Type(tp))
            .expect("base type registered twice");
        handles.push(tp);
    }

    BaseTypes {
        int: handles[0],
        byte: handles[1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_recognition_is_name_equality() {
        let interner = Interner::new();
        let kw = Keywords::intern(&interner);

        assert_eq!(interner.intern("proc"), kw.kw_proc);
        assert!(kw.is_keyword(interner.intern("entity")));
        assert!(!kw.is_keyword(interner.intern("procedure")));
    }

    #[test]
    fn test_base_types_resolvable_in_global_scope() {
        let interner = Interner::new();
        let mut types = Types::new();
        let mut syms = SymbolTable::new();

        let base = register_base_types(&interner, &mut types, &mut syms);

        let int = interner.intern("int");
        let sym = syms.lookup(syms.global_scope(), int).unwrap();
        assert_eq!(syms.symbol(sym).kind, SymbolKind::Type(base.int));
        assert!(types.get(base.int).complete);
    }
}
