//! Error recovery (spec.md §4.2 "Recovery mode", §7 "Propagation", §9's
//! "Recovery state" design note).
//!
//! The teacher's `ori_parse::recovery` builds a `TokenSet` bitset (a `u128`
//! keyed by `discriminant_index()`) so a single resync call can target any
//! combination of a much larger token vocabulary. SD2's resync target set is
//! small and fixed — NEWLINE or a closing delimiter — so this is a direct
//! match instead of a bitset; the set never needs composing at call sites
//! the way the teacher's grammar-boundary constants (`STMT_BOUNDARY`,
//! `FUNCTION_BOUNDARY`) do.

use sd2_ir::TokenKind;

/// `true` for the tokens recovery mode resynchronizes on (spec.md §4.2:
/// "tokens are consumed until NEWLINE / `}` / `]` / `)` / EOF").
pub(crate) fn is_resync_point(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Newline
            | TokenKind::RBrace
            | TokenKind::RBracket
            | TokenKind::RParen
            | TokenKind::Eof
    )
}
