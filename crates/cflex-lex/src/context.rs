//! The read-only bag of flags the lexer consults on nearly every lexical
//! decision. Constructed directly by whatever embeds the lexer (driver CLI,
//! test harness) — this crate has no `.toml`/env-based configuration of its
//! own.

use cflex_util::ColorMode;

/// Target C language standard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LangStd {
    C89,
    C99,
    C11,
    C17,
    C23,
}

/// Float codegen intent; the lexer only consults this for diagnostic
/// gating of float literals, never to change how it parses them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatMode {
    Full,
    Soft,
    Disabled,
}

/// `W_*` warning categories the lexer can raise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum WarningKind {
    Pedantic = 0,
    Trigraphs = 1,
    MulticharChar = 2,
    StringWidthPromotion = 3,
    Truncation = 4,
    Deprecated = 5,
}

impl WarningKind {
    const COUNT: u32 = 6;

    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

/// A bitmask over [`WarningKind`], used for both `warning_enabled_mask` and
/// `warning_error_mask`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct WarningMask(u32);

impl WarningMask {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every warning category enabled — the common default.
    pub fn all() -> Self {
        Self((1 << WarningKind::COUNT) - 1)
    }

    pub fn with(mut self, kind: WarningKind) -> Self {
        self.0 |= kind.bit();
        self
    }

    pub fn without(mut self, kind: WarningKind) -> Self {
        self.0 &= !kind.bit();
        self
    }

    pub fn contains(self, kind: WarningKind) -> bool {
        self.0 & kind.bit() != 0
    }
}

/// Target `wchar_t` width in bits, as chosen by the compilation driver for
/// the active target triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WcharWidth {
    Bits8 = 8,
    Bits16 = 16,
    Bits32 = 32,
}

impl WcharWidth {
    pub fn bits(self) -> u32 {
        self as u32
    }

    pub fn max_value(self) -> u32 {
        match self {
            WcharWidth::Bits8 => u8::MAX as u32,
            WcharWidth::Bits16 => u16::MAX as u32,
            WcharWidth::Bits32 => u32::MAX,
        }
    }
}

/// The read-only compilation context the lexer is driven by.
#[derive(Clone, Debug)]
pub struct Context {
    pub lang_std: LangStd,
    pub gnu_extensions: bool,
    /// Extensions specific to this toolchain (distinct from GNU's), toggled
    /// independently of `gnu_extensions` and suppressed under `pedantic`.
    /// Not yet consulted by any lexical rule — carried here because later
    /// compilation phases sharing this `Context` will need it.
    pub implementation_extensions: bool,
    pub pedantic: bool,
    pub enable_trigraphs: bool,
    pub warning_enabled_mask: WarningMask,
    pub warning_error_mask: WarningMask,
    pub warnings_as_errors: bool,
    pub float_mode: FloatMode,
    pub wchar_bits: WcharWidth,
    pub color_mode: ColorMode,
    pub max_errors: usize,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            lang_std: LangStd::C23,
            gnu_extensions: false,
            implementation_extensions: true,
            pedantic: false,
            enable_trigraphs: false,
            warning_enabled_mask: WarningMask::all(),
            warning_error_mask: WarningMask::empty(),
            warnings_as_errors: false,
            float_mode: FloatMode::Full,
            wchar_bits: WcharWidth::Bits32,
            color_mode: ColorMode::Auto,
            max_errors: 20,
        }
    }
}

impl Context {
    /// Whether `kind` should be rendered as an error rather than a warning:
    /// either globally promoted (`warnings_as_errors`) or promoted for this
    /// specific category (`warning_error_mask`).
    pub fn warning_is_error(&self, kind: WarningKind) -> bool {
        self.warning_error_mask.contains(kind) || self.warnings_as_errors
    }

    pub fn warning_enabled(&self, kind: WarningKind) -> bool {
        self.warning_enabled_mask.contains(kind)
    }
}
