//! The abstract syntax arenas.
//!
//! Expressions, statements, and declarations are arena entities addressed
//! by handles; child lists (compound children, call arguments, proc
//! parameters) are dense-linked: a container's children occupy a
//! contiguous, rank-ordered run in their child arena, emitted when the
//! container closes.

use crate::ids::{
    ArrayId, CallArgId, ChildStmtId, DataId, ExprId, ParamId, ProcId, ScopeId, StmtId, SymbolId,
    SymrefId, TokenId, TypeId,
};
use crate::index_vec::IndexVec;
use crate::interner::Name;
use crate::source::SourceId;
use crate::syntax::token::Token;
use serde::Serialize;

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnopKind {
    InvertBits,
    Not,
    AddressOf,
    Deref,
    Negative,
    Positive,
    PreDecrement,
    PreIncrement,
    PostDecrement,
    PostIncrement,
}

impl UnopKind {
    pub fn is_prefix(self) -> bool {
        !matches!(self, UnopKind::PostDecrement | UnopKind::PostIncrement)
    }

    /// Surface spelling of the operator.
    pub fn token_str(self) -> &'static str {
        match self {
            UnopKind::InvertBits => "~",
            UnopKind::Not => "!",
            UnopKind::AddressOf => "&",
            UnopKind::Deref => "^",
            UnopKind::Negative => "-",
            UnopKind::Positive => "+",
            UnopKind::PreDecrement | UnopKind::PostDecrement => "--",
            UnopKind::PreIncrement | UnopKind::PostIncrement => "++",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinopKind {
    Assign,
    Equals,
    Minus,
    Plus,
    Mul,
    Div,
    BitAnd,
    BitOr,
    BitXor,
}

impl BinopKind {
    /// Binding strength; higher binds tighter. Assignment is lowest.
    pub fn precedence(self) -> u8 {
        match self {
            BinopKind::Assign => 1,
            BinopKind::Equals => 2,
            BinopKind::BitOr => 3,
            BinopKind::BitXor => 4,
            BinopKind::BitAnd => 5,
            BinopKind::Plus | BinopKind::Minus => 6,
            BinopKind::Mul | BinopKind::Div => 7,
        }
    }

    pub fn is_right_assoc(self) -> bool {
        matches!(self, BinopKind::Assign)
    }

    /// Surface spelling of the operator.
    pub fn token_str(self) -> &'static str {
        match self {
            BinopKind::Assign => "=",
            BinopKind::Equals => "==",
            BinopKind::Minus => "-",
            BinopKind::Plus => "+",
            BinopKind::Mul => "*",
            BinopKind::Div => "/",
            BinopKind::BitAnd => "&",
            BinopKind::BitOr => "|",
            BinopKind::BitXor => "^",
        }
    }
}

/// The kind of an expression.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// An integer or string literal.
    Literal { tok: TokenId },
    /// A name used as an expression.
    Symref { symref: SymrefId },
    Unop {
        op: UnopKind,
        tok: TokenId,
        operand: ExprId,
    },
    Binop {
        op: BinopKind,
        tok: TokenId,
        lhs: ExprId,
        rhs: ExprId,
    },
    /// `base.name`; member names are plain strings, resolved semantically.
    Member { base: ExprId, name: Name },
    Subscript { base: ExprId, index: ExprId },
    /// A call; arguments are the dense run `[first_arg, first_arg + nargs)`.
    Call {
        callee: ExprId,
        first_arg: CallArgId,
        nargs: u32,
    },
}

/// An expression entity.
///
/// `ty` is reserved for a back-end type-inference pass; the front-end
/// leaves it unset.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Option<TypeId>,
}

/// A call argument, dense-linked by rank.
#[derive(Debug, Clone)]
pub struct CallArg {
    pub call: ExprId,
    pub arg: ExprId,
    pub rank: u32,
}

/// The kind of a statement.
#[derive(Debug, Clone)]
pub enum StmtKind {
    If { cond: ExprId, body: StmtId },
    While { cond: ExprId, body: StmtId },
    For {
        init: StmtId,
        cond: ExprId,
        step: StmtId,
        body: StmtId,
    },
    Return { expr: ExprId },
    Expr { expr: ExprId },
    /// A `{ … }` block; children are the dense run
    /// `[first_child, first_child + nchildren)`.
    Compound {
        nchildren: u32,
        first_child: ChildStmtId,
    },
    Data(DataId),
    Array(ArrayId),
}

/// A statement entity.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
}

/// A compound-statement child, dense-linked by rank.
#[derive(Debug, Clone)]
pub struct ChildStmt {
    pub parent: StmtId,
    pub child: StmtId,
    pub rank: u32,
}

/// A `data` declaration.
#[derive(Debug, Clone)]
pub struct Data {
    pub scope: ScopeId,
    pub tp: TypeId,
    /// Back-link to the declaring symbol.
    pub sym: SymbolId,
}

/// An `array` declaration.
#[derive(Debug, Clone)]
pub struct Array {
    pub scope: ScopeId,
    /// The array type (index and value types live in the type arena).
    pub tp: TypeId,
    pub sym: SymbolId,
}

/// A `proc` declaration.
#[derive(Debug, Clone)]
pub struct Proc {
    /// The proc's own scope, holding its parameters.
    pub scope: ScopeId,
    /// The proc type (return and parameter types).
    pub tp: TypeId,
    pub sym: SymbolId,
    pub nparams: u32,
    /// Parameters are the dense run `[first_param, first_param + nparams)`.
    pub first_param: ParamId,
    /// The body; written once, after the body parses.
    pub body: Option<StmtId>,
}

/// A proc parameter, dense-linked by rank.
#[derive(Debug, Clone)]
pub struct Param {
    pub proc: ProcId,
    pub sym: SymbolId,
    pub tp: TypeId,
    pub rank: u32,
}

/// A top-level item, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Entity(TypeId),
    Data(DataId),
    Array(ArrayId),
    Proc(ProcId),
}

/// One parsed source file: its ordered top-level items.
#[derive(Debug, Clone)]
pub struct Unit {
    pub source: SourceId,
    pub items: Vec<Item>,
}

/// All syntax arenas of a compilation.
#[derive(Debug, Default)]
pub struct Ast {
    pub tokens: IndexVec<TokenId, Token>,
    pub exprs: IndexVec<ExprId, Expr>,
    pub call_args: IndexVec<CallArgId, CallArg>,
    pub stmts: IndexVec<StmtId, Stmt>,
    pub child_stmts: IndexVec<ChildStmtId, ChildStmt>,
    pub datas: IndexVec<DataId, Data>,
    pub arrays: IndexVec<ArrayId, Array>,
    pub procs: IndexVec<ProcId, Proc>,
    pub params: IndexVec<ParamId, Param>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// The dense child run of a compound statement.
    pub fn child_run(&self, first: ChildStmtId, count: u32) -> &[ChildStmt] {
        self.child_stmts.run(first, count)
    }

    /// The dense argument run of a call expression.
    pub fn arg_run(&self, first: CallArgId, count: u32) -> &[CallArg] {
        self.call_args.run(first, count)
    }

    /// The dense parameter run of a proc.
    pub fn param_run(&self, first: ParamId, count: u32) -> &[Param] {
        self.params.run(first, count)
    }

    /// Attach a proc's body once it has parsed.
    pub fn set_proc_body(&mut self, proc: ProcId, body: StmtId) {
        self.procs[proc].body = Some(body);
    }
}
