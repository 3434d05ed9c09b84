//! The token model: a closed set of token kinds, a small flags bitset, and
//! the payload each kind carries.

use cflex_util::{Span, Symbol};

/// A single lexed token: kind, source span, flags, and payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Token<'i> {
    pub kind: TokenKind,
    pub span: Span,
    pub flags: TokenFlags,
    pub payload: Payload<'i>,
    pub numeric_extra: Option<NumericExtra>,
}

impl<'i> Token<'i> {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            flags: TokenFlags::empty(),
            payload: Payload::None,
            numeric_extra: None,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// Encoding of a string or character-constant token. Exactly one of these
/// applies to any given string/char token; ranked low-to-high for the
/// concatenation promotion rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StringEncoding {
    Plain = 0,
    Utf8 = 1,
    Utf16 = 2,
    Utf32 = 3,
    Wide = 4,
}

impl StringEncoding {
    /// Bit width of one code unit in this encoding, for the non-narrowing
    /// override in the concatenation pass. `Wide`'s width depends on the
    /// target `wchar_t`, supplied separately by `Context::wchar_bits`.
    pub fn code_unit_bits(self, wchar_bits: u32) -> u32 {
        match self {
            StringEncoding::Plain | StringEncoding::Utf8 => 8,
            StringEncoding::Utf16 => 16,
            StringEncoding::Utf32 => 32,
            StringEncoding::Wide => wchar_bits,
        }
    }
}

/// Original radix of an integer-constant token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegerBase {
    Binary = 2,
    Octal = 8,
    Decimal = 10,
    Hex = 16,
}

/// Decimal vs. hexadecimal-float lexical style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatStyle {
    Decimal,
    Hex,
}

/// Canonical floating-point suffix tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatSuffix {
    None,
    F,
    L,
    F16,
    F32,
    F64,
    F128,
    F32x,
    F64x,
    F128x,
    Df,
    Dd,
    Dl,
}

/// `numeric_extra` payload for integer and floating-point constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericExtra {
    Integer { base: IntegerBase },
    Float { style: FloatStyle, suffix: FloatSuffix },
}

bitflags_like! {
    /// Flags bitset: integer-suffix presence plus the string/char
    /// encoding tag. Encoding is stored redundantly as flag bits so callers
    /// that only look at `TokenFlags` (without inspecting the payload) can
    /// still answer "what encoding is this" — the canonical source of truth
    /// remains `Payload::String`/`Payload::Character`'s own `StringEncoding`.
    pub struct TokenFlags: u16 {
        const UNSIGNED  = 1 << 0;
        const LONG      = 1 << 1;
        const LONG_LONG = 1 << 2;
        const ENC_UTF8  = 1 << 3;
        const ENC_UTF16 = 1 << 4;
        const ENC_UTF32 = 1 << 5;
        const ENC_WIDE  = 1 << 6;
    }
}

impl TokenFlags {
    pub fn from_encoding(enc: StringEncoding) -> Self {
        match enc {
            StringEncoding::Plain => TokenFlags::empty(),
            StringEncoding::Utf8 => TokenFlags::ENC_UTF8,
            StringEncoding::Utf16 => TokenFlags::ENC_UTF16,
            StringEncoding::Utf32 => TokenFlags::ENC_UTF32,
            StringEncoding::Wide => TokenFlags::ENC_WIDE,
        }
    }

    pub fn encoding(self) -> StringEncoding {
        if self.contains(TokenFlags::ENC_UTF8) {
            StringEncoding::Utf8
        } else if self.contains(TokenFlags::ENC_UTF16) {
            StringEncoding::Utf16
        } else if self.contains(TokenFlags::ENC_UTF32) {
            StringEncoding::Utf32
        } else if self.contains(TokenFlags::ENC_WIDE) {
            StringEncoding::Wide
        } else {
            StringEncoding::Plain
        }
    }
}

/// A tiny hand-rolled bitflags macro.
///
/// The flag set here is fixed (7 bits) and never grows at the caller's
/// discretion the way a general-purpose bitflags type would need to
/// support, so a small macro local to this module is clearer than pulling
/// in the `bitflags` crate for one type.
macro_rules! bitflags_like {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(const $variant:ident = $value:expr;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
        $vis struct $name($ty);

        impl $name {
            $(pub const $variant: Self = Self($value);)*

            pub const fn empty() -> Self {
                Self(0)
            }

            pub const fn bits(self) -> $ty {
                self.0
            }

            pub const fn contains(self, other: Self) -> bool {
                (self.0 & other.0) == other.0
            }

            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }
    };
}
use bitflags_like;

/// The payload carried by a token, tagged implicitly by `TokenKind`.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload<'i> {
    None,
    /// Identifier, keyword, directive name, header-name, or error message.
    Interned(Symbol<'i>),
    Integer(IntValue),
    Float(f64),
    /// A single decoded code point, packed per `StringEncoding` — multi-
    /// character literals pack MSB-first and truncate into the unit width.
    Character { value: u32, encoding: StringEncoding },
    /// An owned, null-terminated run of code units in `encoding`.
    String { units: StringUnits, encoding: StringEncoding },
}

/// Either branch of the integer payload's `unsigned`-selected union.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntValue {
    Signed(i64),
    Unsigned(u64),
}

/// Owned string-literal code units, generic over the encoding's unit width.
/// Plain/UTF-8 share one representation (bytes); UTF-16 and UTF-32/wide use
/// their own widths so no information is lost re-encoding between them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StringUnits {
    Bytes(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl StringUnits {
    /// Number of code units, *excluding* the trailing NUL every variant
    /// carries.
    pub fn len_excluding_nul(&self) -> usize {
        match self {
            StringUnits::Bytes(v) => v.len().saturating_sub(1),
            StringUnits::U16(v) => v.len().saturating_sub(1),
            StringUnits::U32(v) => v.len().saturating_sub(1),
        }
    }
}

/// The closed set of token kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Error,
    Eof,

    Identifier,
    IntegerConstant,
    FloatingConstant,
    CharacterConstant,
    StringLiteral,
    HeaderName,

    // Punctuators
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Period,
    Ellipsis,
    Arrow,

    Plus,
    PlusPlus,
    Minus,
    MinusMinus,
    Star,
    Slash,
    Percent,

    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    Neq,
    LShift,
    RShift,

    Amp,
    AmpAmp,
    Pipe,
    PipePipe,
    Caret,
    Tilde,
    Bang,

    Question,
    Colon,
    Semicolon,
    Comma,

    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    LShiftAssign,
    RShiftAssign,
    AmpAssign,
    CaretAssign,
    PipeAssign,

    // Preprocessor markers
    Hash,
    HashHash,

    // Keyword (covers both C keywords and directive-only names; the
    // specific spelling/semantic is carried in `numeric_extra`-adjacent
    // table lookup, not re-encoded into more token kinds; see `keyword`
    // module). `Payload::Interned` carries the canonical spelling.
    Keyword(Keyword),
    /// A preprocessor directive name (`include`, `define`, `if`, ...) when
    /// lexed while `in_directive` — distinct from `Keyword` because the
    /// same spelling (`if`, `else`) can mean different things depending on
    /// directive context.
    DirectiveName(Keyword),
}

/// One entry of the combined keyword/directive table. This is deliberately
/// *not* a bare `Symbol` — callers (parser, later phases) want to match on
/// a closed Rust enum rather than re-parsing spellings, matching how the
/// reference's `enum token_kind` bakes every keyword in directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Keyword {
    // C89
    Auto, Break, Case, Char, Const, Continue, Default, Do, Double, Else,
    Enum, Extern, Float, For, Goto, If, Int, Long, Register, Return, Short,
    Signed, Sizeof, Static, Struct, Switch, Typedef, Union, Unsigned, Void,
    Volatile, While,
    // C99
    Inline, Restrict, Bool, Complex, Imaginary,
    // C11
    Alignas, Alignof, Atomic, Generic, Noreturn, StaticAssert, ThreadLocal,
    // C23
    True, False, Nullptr, Typeof, TypeofUnqual, Constexpr, BitInt,
    // GNU extensions
    Asm, Typeof__, Attribute__, Extension__, Label__, Real__, Imag__,
    Thread__, Function__, AutoType__, BuiltinTypesCompatibleP,
    Const__, Signed__, Inline__, Restrict__, Volatile__, Asm__,
    Int128,
    Decimal32, Decimal64, Decimal128,
    Float16, Float32, Float64, Float128,
    TransactionAtomic, TransactionRelaxed, TransactionAcquire, TransactionRelease,

    // Preprocessor directive names (only meaningful when `in_directive`)
    Include, IncludeNext, Define, Undef, Ifdef, Ifndef, Elif, Elifdef,
    Elifndef, Endif, Line, Error, Warning, Pragma, Import, Embed,
    Defined, HasInclude, HasCAttribute, VaOpt,
}
