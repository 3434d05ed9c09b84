//! The keyword/directive table: every reserved spelling tagged with the
//! metadata needed to classify it against the active standard and dialect
//! — `{directive-only?, min-standard, gnu-only?, spelling-form,
//! c23-status}`.
//!
//! Declaration order matters for diagnostics and for the crate's own tests
//! (`cflex-lex --emit-keywords`-style tooling would want a stable listing),
//! so the table lives in an [`indexmap::IndexMap`] rather than a
//! `HashMap`, per the design note on preserving the one genuinely
//! order-sensitive lookup in this crate.

use std::sync::OnceLock;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::context::LangStd;
use crate::token::Keyword;

/// How a keyword is conventionally spelled: the neutral/official spelling
/// (`alignas`), an underscored pre-C23 spelling (`_Alignas`), or a GNU
/// double-underscore form (`__asm__`) that works regardless of dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpellingForm {
    Neutral,
    Underscored,
    Bare,
}

/// Whether a keyword is scheduled for removal or deprecation in a future
/// or the active standard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum C23Status {
    None,
    Deprecated,
    Removed,
}

#[derive(Clone, Copy, Debug)]
pub struct KeywordInfo {
    pub keyword: Keyword,
    /// The standard from which this spelling is available on its own,
    /// independent of `gnu_extensions`. `None` means the spelling is never
    /// standard — only ever available via the GNU-extension path.
    pub min_standard: Option<LangStd>,
    /// Also (or only) available when `gnu_extensions` is set, irrespective
    /// of `min_standard`.
    pub gnu_only: bool,
    pub spelling_form: SpellingForm,
    pub c23_status: C23Status,
}

impl KeywordInfo {
    /// Whether this spelling classifies as its mapped keyword under the
    /// given standard/dialect combination.
    pub fn available(&self, std: LangStd, gnu_extensions: bool) -> bool {
        self.min_standard.is_some_and(|min| std >= min) || (self.gnu_only && gnu_extensions)
    }
}

type Table = IndexMap<&'static str, KeywordInfo, FxBuildHasher>;

macro_rules! kw {
    ($k:expr, $std:expr) => {
        KeywordInfo { keyword: $k, min_standard: Some($std), gnu_only: false, spelling_form: SpellingForm::Neutral, c23_status: C23Status::None }
    };
    ($k:expr, $std:expr, gnu) => {
        KeywordInfo { keyword: $k, min_standard: Some($std), gnu_only: true, spelling_form: SpellingForm::Bare, c23_status: C23Status::None }
    };
    ($k:expr, $std:expr, underscored) => {
        KeywordInfo { keyword: $k, min_standard: Some($std), gnu_only: false, spelling_form: SpellingForm::Underscored, c23_status: C23Status::None }
    };
    (gnu_only $k:expr) => {
        KeywordInfo { keyword: $k, min_standard: None, gnu_only: true, spelling_form: SpellingForm::Bare, c23_status: C23Status::None }
    };
    ($k:expr, $std:expr, underscored, deprecated_in_c23) => {
        KeywordInfo { keyword: $k, min_standard: Some($std), gnu_only: false, spelling_form: SpellingForm::Underscored, c23_status: C23Status::Deprecated }
    };
    ($k:expr, $std:expr, underscored, removed_in_c23) => {
        KeywordInfo { keyword: $k, min_standard: Some($std), gnu_only: false, spelling_form: SpellingForm::Underscored, c23_status: C23Status::Removed }
    };
}

fn build_keywords() -> Table {
    use Keyword::*;
    use LangStd::*;

    let entries: &[(&str, KeywordInfo)] = &[
        // C89
        ("auto", kw!(Auto, C89)), ("break", kw!(Break, C89)), ("case", kw!(Case, C89)),
        ("char", kw!(Char, C89)), ("const", kw!(Const, C89)), ("continue", kw!(Continue, C89)),
        ("default", kw!(Default, C89)), ("do", kw!(Do, C89)), ("double", kw!(Double, C89)),
        ("else", kw!(Else, C89)), ("enum", kw!(Enum, C89)), ("extern", kw!(Extern, C89)),
        ("float", kw!(Float, C89)), ("for", kw!(For, C89)), ("goto", kw!(Goto, C89)),
        ("if", kw!(If, C89)), ("int", kw!(Int, C89)), ("long", kw!(Long, C89)),
        ("register", kw!(Register, C89)), ("return", kw!(Return, C89)), ("short", kw!(Short, C89)),
        ("signed", kw!(Signed, C89)), ("sizeof", kw!(Sizeof, C89)), ("static", kw!(Static, C89)),
        ("struct", kw!(Struct, C89)), ("switch", kw!(Switch, C89)), ("typedef", kw!(Typedef, C89)),
        ("union", kw!(Union, C89)), ("unsigned", kw!(Unsigned, C89)), ("void", kw!(Void, C89)),
        ("volatile", kw!(Volatile, C89)), ("while", kw!(While, C89)),
        // C99
        ("inline", kw!(Inline, C99)), ("restrict", kw!(Restrict, C99)),
        ("_Bool", kw!(Bool, C99, underscored)), ("_Complex", kw!(Complex, C99, underscored)),
        ("_Imaginary", kw!(Imaginary, C99, underscored, removed_in_c23)),
        // C11 (the CamelCase-underscored spellings are deprecated by C23 in
        // favor of the neutral keywords added below; `_Atomic`/`_Generic`
        // have no neutral replacement and so keep `C23Status::None`)
        ("_Alignas", kw!(Alignas, C11, underscored, deprecated_in_c23)),
        ("_Alignof", kw!(Alignof, C11, underscored, deprecated_in_c23)),
        ("_Atomic", kw!(Atomic, C11, underscored)), ("_Generic", kw!(Generic, C11, underscored)),
        ("_Noreturn", kw!(Noreturn, C11, underscored, deprecated_in_c23)),
        ("_Static_assert", kw!(StaticAssert, C11, underscored, deprecated_in_c23)),
        ("_Thread_local", kw!(ThreadLocal, C11, underscored, deprecated_in_c23)),
        // C23 neutral spellings / new keywords
        ("alignas", kw!(Alignas, C23)), ("alignof", kw!(Alignof, C23)),
        ("static_assert", kw!(StaticAssert, C23)), ("thread_local", kw!(ThreadLocal, C23)),
        ("true", kw!(True, C23)), ("false", kw!(False, C23)), ("nullptr", kw!(Nullptr, C23)),
        // `typeof` was a long-standing GNU extension before C23 standardized
        // it, so it is available either way.
        ("typeof", kw!(Typeof, C23, gnu)), ("typeof_unqual", kw!(TypeofUnqual, C23)),
        ("constexpr", kw!(Constexpr, C23)), ("_BitInt", kw!(BitInt, C23, underscored)),
        // GNU extensions: never standard, only available under gnu_extensions.
        ("asm", kw!(gnu_only Asm)), ("__asm__", kw!(gnu_only Asm__)),
        ("__typeof__", kw!(gnu_only Typeof__)),
        ("__attribute__", kw!(gnu_only Attribute__)),
        ("__extension__", kw!(gnu_only Extension__)),
        ("__label__", kw!(gnu_only Label__)),
        ("__real__", kw!(gnu_only Real__)), ("__imag__", kw!(gnu_only Imag__)),
        ("__thread", kw!(gnu_only Thread__)), ("__FUNCTION__", kw!(gnu_only Function__)),
        ("__auto_type", kw!(gnu_only AutoType__)),
        ("__builtin_types_compatible_p", kw!(gnu_only BuiltinTypesCompatibleP)),
        ("__const", kw!(gnu_only Const__)), ("__const__", kw!(gnu_only Const__)),
        ("__signed", kw!(gnu_only Signed__)), ("__signed__", kw!(gnu_only Signed__)),
        ("__inline", kw!(gnu_only Inline__)), ("__inline__", kw!(gnu_only Inline__)),
        ("__restrict", kw!(gnu_only Restrict__)), ("__restrict__", kw!(gnu_only Restrict__)),
        ("__volatile", kw!(gnu_only Volatile__)), ("__volatile__", kw!(gnu_only Volatile__)),
        ("__int128", kw!(gnu_only Int128)),
        ("_Decimal32", kw!(Decimal32, C23, underscored)),
        ("_Decimal64", kw!(Decimal64, C23, underscored)),
        ("_Decimal128", kw!(Decimal128, C23, underscored)),
        ("_Float16", kw!(gnu_only Float16)), ("_Float32", kw!(gnu_only Float32)),
        ("_Float64", kw!(gnu_only Float64)), ("_Float128", kw!(gnu_only Float128)),
        ("__transaction_atomic", kw!(gnu_only TransactionAtomic)),
        ("__transaction_relaxed", kw!(gnu_only TransactionRelaxed)),
        ("__transaction_acquire", kw!(gnu_only TransactionAcquire)),
        ("__transaction_release", kw!(gnu_only TransactionRelease)),
        // Contextual preprocessor operators, classified as keywords
        // anywhere (their meaning outside a `#if`/`#include` expression is
        // simply "not applicable", left for the preprocessor to diagnose).
        ("defined", kw!(Defined, C89)),
        ("__has_include", kw!(gnu_only HasInclude)),
        ("__has_c_attribute", kw!(HasCAttribute, C23)),
        ("__VA_OPT__", kw!(gnu_only VaOpt)),
    ];

    let mut table = Table::with_capacity_and_hasher(entries.len(), FxBuildHasher::default());
    for (spelling, info) in entries {
        table.insert(*spelling, *info);
    }
    table
}

fn build_directives() -> IndexMap<&'static str, Keyword, FxBuildHasher> {
    use Keyword::*;
    let entries: &[(&str, Keyword)] = &[
        ("include", Include),
        ("include_next", IncludeNext),
        ("define", Define),
        ("undef", Undef),
        ("ifdef", Ifdef),
        ("ifndef", Ifndef),
        ("if", If),
        ("elif", Elif),
        ("elifdef", Elifdef),
        ("elifndef", Elifndef),
        ("else", Else),
        ("endif", Endif),
        ("line", Line),
        ("error", Error),
        ("warning", Warning),
        ("pragma", Pragma),
        ("import", Import),
        ("embed", Embed),
    ];
    let mut table = IndexMap::with_capacity_and_hasher(entries.len(), FxBuildHasher::default());
    for (spelling, kw) in entries {
        table.insert(*spelling, *kw);
    }
    table
}

static KEYWORDS: OnceLock<Table> = OnceLock::new();
static DIRECTIVES: OnceLock<IndexMap<&'static str, Keyword, FxBuildHasher>> = OnceLock::new();

/// Looks up `spelling` as an ordinary (non-directive-name) keyword.
pub fn lookup_keyword(spelling: &str) -> Option<KeywordInfo> {
    KEYWORDS.get_or_init(build_keywords).get(spelling).copied()
}

/// Looks up `spelling` as a preprocessor directive name — only consulted
/// for the single identifier immediately following a directive-introducing
/// `#`.
pub fn lookup_directive(spelling: &str) -> Option<Keyword> {
    DIRECTIVES.get_or_init(build_directives).get(spelling).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn if_is_keyword_but_not_accidentally_directive_only() {
        assert!(lookup_keyword("if").is_some());
        assert!(lookup_directive("if").is_some());
    }

    #[test]
    fn include_is_directive_only() {
        assert!(lookup_directive("include").is_some());
        assert!(lookup_keyword("include").is_none());
    }

    #[test]
    fn unknown_spelling_is_neither() {
        assert!(lookup_keyword("frobnicate").is_none());
        assert!(lookup_directive("frobnicate").is_none());
    }

    #[test]
    fn gnu_and_standard_forms_map_to_same_keyword() {
        let std_form = lookup_keyword("_Alignas").unwrap();
        let c23_form = lookup_keyword("alignas").unwrap();
        assert_eq!(std_form.keyword, c23_form.keyword);
    }
}
