//! Tern compiler front-end
//!
//! This crate implements the front-end of the Tern compiler with:
//! - Interned strings and homogeneous, handle-addressed entity arenas
//! - A hand-written lexer and Pratt/recursive-descent parser
//! - Nested-scope symbol tables with post-parse name resolution
//! - Fixed-point type completion over reference types
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         CompilerContext                             │
//! │  ┌──────────┐ ┌─────────┐ ┌──────────┐ ┌───────┐ ┌─────────────┐   │
//! │  │ Interner │ │ Sources │ │ SymTable │ │ Types │ │ AST arenas  │   │
//! │  │ (Name)   │ │ (Span)  │ │ (Scope)  │ │ (Ty)  │ │ (Expr/Stmt) │   │
//! │  └──────────┘ └─────────┘ └──────────┘ └───────┘ └─────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//!        ↑             ↑            ↑           ↑
//!        │             │            │           │
//!   ┌────┴───┐    ┌────┴───┐   ┌────┴────┐ ┌────┴─────┐
//!   │  Lex   │ →  │ Parse  │ → │ Resolve │→│ Complete │ → consumers
//!   │(tokens)│    │(arenas)│   │(symrefs)│ │ (types)  │
//!   └────────┘    └────────┘   └─────────┘ └──────────┘
//! ```

// Core modules
pub mod ast;
pub mod compiler;
pub mod complete;
pub mod context;
pub mod diagnostic;
pub mod ids;
pub mod index_vec;
pub mod interner;
pub mod known;
pub mod pretty;
pub mod resolve;
pub mod source;
pub mod symbols;
pub mod syntax;
pub mod types;

// Re-exports
pub use ast::{Ast, Item, Unit};
pub use compiler::{CompileError, CompileResult, Compiler};
pub use complete::{complete_types, TypeError};
pub use context::CompilerContext;
pub use diagnostic::{Diagnostic, Diagnostics, Severity};
pub use ids::{
    ArrayId, CallArgId, ChildStmtId, DataId, ExprId, ParamId, ParamTypeId, ProcId, ScopeId, StmtId,
    SymbolId, SymrefId, TokenId, TypeId,
};
pub use index_vec::{Idx, IndexVec};
pub use interner::{Interner, Name};
pub use pretty::print_unit;
pub use resolve::{resolve, ResolveError};
pub use source::{Source, SourceId, SourceMap, Span};
pub use symbols::{Scope, ScopeKind, Symbol, SymbolKind, SymbolTable, Symref};
pub use syntax::{parse_unit, ParseError};
pub use types::{Type, TypeKind, Types};
