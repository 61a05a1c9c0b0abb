//! Name resolution.
//!
//! Binds every symbol reference recorded during parsing to a symbol, by
//! walking the scope chain from the reference's scope towards the root.
//! All symbols exist before resolution runs, so processing order does not
//! affect the outcome and re-running the phase is a no-op.

use crate::context::CompilerContext;
use crate::ids::SymrefId;
use crate::source::Span;

/// Resolution error with source location.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("unresolved symbol `{name}`")]
    Unresolved { name: String, span: Span },
}

impl ResolveError {
    pub fn span(&self) -> Span {
        match self {
            ResolveError::Unresolved { span, .. } => *span,
        }
    }
}

/// Bind every symref to its symbol.
///
/// Fatal on the first reference with no matching symbol anywhere in its
/// scope chain.
pub fn resolve(ctx: &mut CompilerContext) -> Result<(), ResolveError> {
    for i in 0..ctx.syms.num_symrefs() {
        let id = SymrefId::new(i as u32);
        let (name, ref_scope, tok) = {
            let symref = ctx.syms.symref(id);
            (symref.name, symref.ref_scope, symref.tok)
        };

        match ctx.syms.lookup(ref_scope, name) {
            Some(sym) => ctx.syms.bind(id, sym),
            None => {
                return Err(ResolveError::Unresolved {
                    name: ctx.str(name),
                    span: ctx.ast.tokens[tok].span(),
                })
            }
        }
    }

    tracing::debug!(symrefs = ctx.syms.num_symrefs(), "name resolution complete");
    Ok(())
}
