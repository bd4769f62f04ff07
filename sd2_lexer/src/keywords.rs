//! Reserved-word classification for plain identifiers.
//!
//! Only three reserved literals exist (spec.md §3): `true`, `false`, `null`.
//! They classify as BOOL/NULL tokens when written as plain identifiers; the
//! same text written with backticks is always a plain identifier (see
//! `Cooker::cook_ident` in `lib.rs`, which only consults this table for
//! unquoted identifier text).

pub(crate) enum Reserved {
    True,
    False,
    Null,
}

pub(crate) fn lookup(text: &str) -> Option<Reserved> {
    match text {
        "true" => Some(Reserved::True),
        "false" => Some(Reserved::False),
        "null" => Some(Reserved::Null),
        _ => None,
    }
}
