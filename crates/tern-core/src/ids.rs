//! Unique identifiers for compiler entities.
//!
//! Every entity lives in its own homogeneous arena and is addressed by one
//! of these `u32` newtype handles. Handles are stable for the lifetime of a
//! compilation; the nominal types make mixing handles from different arenas
//! a compile error.

use serde::Serialize;
use std::fmt;

macro_rules! define_id {
    ($(#[$attr:meta])* $name:ident, $tag:literal) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
        pub struct $name(pub u32);

        impl $name {
            pub fn new(index: u32) -> Self {
                Self(index)
            }

            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// A token in the token arena.
    TokenId,
    "tok"
);

define_id!(
    /// A type in the type arena.
    TypeId,
    "ty"
);

define_id!(
    /// A parameter-type record of a proc type (dense-linked by rank).
    ParamTypeId,
    "paramty"
);

define_id!(
    /// A named declaration bound to a scope.
    SymbolId,
    "sym"
);

define_id!(
    /// A textual reference awaiting binding to a symbol.
    SymrefId,
    "symref"
);

define_id!(
    /// A node in the lexical scope tree.
    ScopeId,
    "scope"
);

define_id!(
    /// A `data` declaration.
    DataId,
    "data"
);

define_id!(
    /// An `array` declaration.
    ArrayId,
    "array"
);

define_id!(
    /// A `proc` declaration.
    ProcId,
    "proc"
);

define_id!(
    /// A proc parameter (dense-linked by rank).
    ParamId,
    "param"
);

define_id!(
    /// An expression.
    ExprId,
    "expr"
);

define_id!(
    /// A statement.
    StmtId,
    "stmt"
);

define_id!(
    /// A compound-statement child record (dense-linked by rank).
    ChildStmtId,
    "childstmt"
);

define_id!(
    /// A call-argument record (dense-linked by rank).
    CallArgId,
    "callarg"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = SymbolId::new(42);
        assert_eq!(id.index(), 42);
        assert_eq!(id, SymbolId(42));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(TypeId::new(7).to_string(), "ty#7");
        assert_eq!(ScopeId::new(0).to_string(), "scope#0");
    }
}
