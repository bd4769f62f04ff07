//! Raw token tag and token type produced by the low-level scanner.
//!
//! `RawTag` is standalone and has no `sd2_*` dependencies. `sd2_lexer` maps
//! `RawToken`s to `sd2_ir::Token` in the cooking layer: classifying keywords,
//! decoding escapes, and parsing numeric text into `i64`/`f64`.

/// Raw token kind produced by the low-level scanner.
///
/// Unlike a byte-slice-backed scanner, this one has no backing buffer to
/// slice — text-bearing tags carry their decoded content directly on
/// [`RawToken`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RawTag {
    /// Identifier, not yet classified as a keyword (`true`/`false`/`null`
    /// resolution happens in the cooking layer).
    Ident,
    /// Backtick-quoted identifier; raw content between the backticks.
    Backtick,
    /// Decimal integer literal.
    Int,
    /// Decimal float literal (saw a `.` or exponent).
    Float,
    /// Hexadecimal integer literal (`0x`/`0X` prefix).
    HexInt,
    /// Binary integer literal (`0b`/`0B` prefix).
    BinInt,
    /// Simple `"…"` string; raw content with escapes still literal.
    SimpleString,
    /// Triple-quoted `"""…"""` string; raw content before dedent/normalize.
    TripleString,
    /// Foreign code block; raw content with delimiters stripped.
    At,
    /// Significant newline.
    Newline,

    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Colon,
    Equal,
    Dot,
    Lt,
    Gt,
    Hash,
    HashBang,
    Bang,
    Pipe,

    /// Backtick identifier unterminated by a closing backtick (E6002).
    UnterminatedBacktick,
    /// Foreign code block unterminated before its closer (E4001).
    UnterminatedForeign,
    /// Character after `@` is not one of `" ' [ {` (E4002).
    BadForeignDelimiter,
    /// A sign (`+`/`-`) immediately precedes a `0x`/`0b` radix prefix (E7001).
    SignedRadixPrefix,
    /// A sign (`+`/`-`) is not immediately followed by a digit (E7002).
    SignedNonDigit,
    /// Any byte not recognized by the scanner's dispatch.
    Unknown,

    /// Source exhausted.
    Eof,
}

impl RawTag {
    /// Fixed lexeme for structural tags with no variable text.
    #[must_use]
    pub fn lexeme(self) -> Option<&'static str> {
        match self {
            Self::LBrace => Some("{"),
            Self::RBrace => Some("}"),
            Self::LBracket => Some("["),
            Self::RBracket => Some("]"),
            Self::LParen => Some("("),
            Self::RParen => Some(")"),
            Self::Comma => Some(","),
            Self::Colon => Some(":"),
            Self::Equal => Some("="),
            Self::Dot => Some("."),
            Self::Lt => Some("<"),
            Self::Gt => Some(">"),
            Self::Hash => Some("#"),
            Self::HashBang => Some("#!"),
            Self::Bang => Some("!"),
            Self::Pipe => Some("|"),
            Self::Newline => Some("\n"),
            _ => None,
        }
    }

    /// Human-readable name for diagnostics, backtick-quoted for symbols.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ident => "identifier",
            Self::Backtick => "backtick identifier",
            Self::Int => "integer literal",
            Self::Float => "float literal",
            Self::HexInt => "hex integer literal",
            Self::BinInt => "binary integer literal",
            Self::SimpleString => "string literal",
            Self::TripleString => "triple-quoted string literal",
            Self::At => "foreign code block",
            Self::Newline => "newline",
            Self::LBrace => "`{`",
            Self::RBrace => "`}`",
            Self::LBracket => "`[`",
            Self::RBracket => "`]`",
            Self::LParen => "`(`",
            Self::RParen => "`)`",
            Self::Comma => "`,`",
            Self::Colon => "`:`",
            Self::Equal => "`=`",
            Self::Dot => "`.`",
            Self::Lt => "`<`",
            Self::Gt => "`>`",
            Self::Hash => "`#`",
            Self::HashBang => "`#!`",
            Self::Bang => "`!`",
            Self::Pipe => "`|`",
            Self::UnterminatedBacktick => "unterminated backtick identifier",
            Self::UnterminatedForeign => "unterminated foreign code block",
            Self::BadForeignDelimiter => "invalid foreign code delimiter",
            Self::SignedRadixPrefix => "signed hex/binary literal",
            Self::SignedNonDigit => "sign not followed by a digit",
            Self::Unknown => "unrecognized character",
            Self::Eof => "end of input",
        }
    }

    /// `true` for the error-shaped tags the cooking layer must turn into
    /// `ErrorCode`s rather than `TokenKind`s.
    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::UnterminatedBacktick
                | Self::UnterminatedForeign
                | Self::BadForeignDelimiter
                | Self::SignedRadixPrefix
                | Self::SignedNonDigit
                | Self::Unknown
        )
    }
}

/// Raw token produced by the low-level scanner: a tag, its decoded text (if
/// any), and the location of its first character.
#[derive(Clone, Debug, PartialEq)]
pub struct RawToken {
    pub tag: RawTag,
    /// Decoded text for variable-content tags; empty for fixed-lexeme tags.
    pub text: String,
    pub location: crate::raw_location::RawLocation,
    /// Whether whitespace or a comment was skipped immediately before this
    /// token. The cooking layer needs this to tell `name@"..."` (adjacent,
    /// legal) from `name @"..."` (E4003).
    pub preceded_by_trivia: bool,
}

impl RawToken {
    pub fn new(tag: RawTag, text: String, location: crate::raw_location::RawLocation) -> Self {
        RawToken {
            tag,
            text,
            location,
            preceded_by_trivia: false,
        }
    }

    #[must_use]
    pub fn with_trivia(mut self, preceded_by_trivia: bool) -> Self {
        self.preceded_by_trivia = preceded_by_trivia;
        self
    }
}
