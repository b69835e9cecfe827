//! Declaration-site metadata.
//!
//! The type model never inspects source text. It only carries enough
//! location information for the checker layer to point a diagnostic at the
//! declaration of a property after that property's type has been rewritten.

/// A half-open byte range `[start, end)` in a source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.end <= self.start
    }
}

/// Where a record property was declared.
///
/// Substitution copies this value onto the rebuilt property unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyDecl {
    pub file_id: u32,
    pub span: Span,
}

impl PropertyDecl {
    pub const fn new(file_id: u32, span: Span) -> Self {
        Self { file_id, span }
    }
}
