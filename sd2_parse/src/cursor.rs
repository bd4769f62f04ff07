//! Bounded-lookahead cursor over [`sd2_lexer::Lexer`]'s cooked token stream.
//!
//! Unlike the teacher's `ori_parse::Cursor<'a>`, which wraps a fully
//! pre-tokenized `&'a TokenList` plus a parallel dense tag array for O(1)
//! discriminant checks, this cursor has nothing to index into: `sd2_lexer`
//! is itself pull-based, so tokens are fetched lazily and kept in a small
//! ring buffer (spec.md §5's "lookahead ≤ 2 in practice").

use sd2_diagnostic::ErrorRecord;
use sd2_ir::{StringInterner, Token};
use sd2_lexer::Lexer;
use sd2_lexer_core::CharSource;
use std::collections::VecDeque;

const LOOKAHEAD: usize = 2;

pub(crate) struct TokenCursor<S> {
    lexer: Lexer<S>,
    buf: VecDeque<Token>,
}

impl<S: CharSource> TokenCursor<S> {
    pub(crate) fn new(lexer: Lexer<S>) -> Self {
        TokenCursor {
            lexer,
            buf: VecDeque::with_capacity(LOOKAHEAD),
        }
    }

    fn fill(&mut self, n: usize) -> Result<(), ErrorRecord> {
        while self.buf.len() < n {
            let tok = self.lexer.next()?;
            self.buf.push_back(tok);
        }
        Ok(())
    }

    /// The next token, without consuming it.
    pub(crate) fn peek(&mut self) -> Result<&Token, ErrorRecord> {
        self.fill(1)?;
        Ok(&self.buf[0])
    }

    /// The token after the next one, without consuming either.
    pub(crate) fn peek2(&mut self) -> Result<&Token, ErrorRecord> {
        self.fill(2)?;
        Ok(&self.buf[1])
    }

    /// Consume and return the next token.
    pub(crate) fn advance(&mut self) -> Result<Token, ErrorRecord> {
        self.fill(1)?;
        Ok(self.buf.pop_front().expect("just filled"))
    }

    pub(crate) fn interner(&self) -> &StringInterner {
        self.lexer.interner()
    }
}
