//! Token kinds produced by the scanner.
//!
//! Node kinds built by the parser continue the numbering after
//! `SyntaxKind::LastToken` (see `dtsb_parser::syntax_kind_ext`).

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u16)]
pub enum SyntaxKind {
    Unknown = 0,
    EndOfFileToken,
    // Literals
    NumericLiteral,
    BigIntLiteral,
    StringLiteral,
    NoSubstitutionTemplateLiteral,
    TemplateHead,
    TemplateMiddle,
    TemplateTail,
    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    QuestionDotToken,
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    EqualsEqualsEqualsToken,
    ExclamationEqualsEqualsToken,
    EqualsGreaterThanToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    AsteriskAsteriskToken,
    SlashToken,
    PercentToken,
    PlusPlusToken,
    MinusMinusToken,
    LessThanLessThanToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    ExclamationToken,
    TildeToken,
    AmpersandAmpersandToken,
    BarBarToken,
    QuestionToken,
    ColonToken,
    AtToken,
    QuestionQuestionToken,
    EqualsToken,
    // Identifiers
    Identifier,
    PrivateIdentifier,
    // Reserved words
    BreakKeyword,
    CaseKeyword,
    CatchKeyword,
    ClassKeyword,
    ConstKeyword,
    ContinueKeyword,
    DebuggerKeyword,
    DefaultKeyword,
    DeleteKeyword,
    DoKeyword,
    ElseKeyword,
    EnumKeyword,
    ExportKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FinallyKeyword,
    ForKeyword,
    FunctionKeyword,
    IfKeyword,
    ImportKeyword,
    InKeyword,
    InstanceOfKeyword,
    NewKeyword,
    NullKeyword,
    ReturnKeyword,
    SuperKeyword,
    SwitchKeyword,
    ThisKeyword,
    ThrowKeyword,
    TrueKeyword,
    TryKeyword,
    TypeOfKeyword,
    VarKeyword,
    VoidKeyword,
    WhileKeyword,
    WithKeyword,
    // Contextual keywords
    ImplementsKeyword,
    InterfaceKeyword,
    LetKeyword,
    PackageKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    PublicKeyword,
    StaticKeyword,
    YieldKeyword,
    AbstractKeyword,
    AccessorKeyword,
    AsKeyword,
    AssertsKeyword,
    AssertKeyword,
    AnyKeyword,
    AsyncKeyword,
    AwaitKeyword,
    BigIntKeyword,
    BooleanKeyword,
    ConstructorKeyword,
    DeclareKeyword,
    GetKeyword,
    InferKeyword,
    IntrinsicKeyword,
    IsKeyword,
    KeyOfKeyword,
    ModuleKeyword,
    NamespaceKeyword,
    NeverKeyword,
    NumberKeyword,
    ObjectKeyword,
    OutKeyword,
    ReadonlyKeyword,
    RequireKeyword,
    SatisfiesKeyword,
    SetKeyword,
    StringKeyword,
    SymbolKeyword,
    TypeKeyword,
    UndefinedKeyword,
    UniqueKeyword,
    UnknownKeyword,
    UsingKeyword,
    FromKeyword,
    GlobalKeyword,
    OfKeyword,
    OverrideKeyword,
}

impl SyntaxKind {
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::BreakKeyword;
    pub const LAST_RESERVED_WORD: SyntaxKind = SyntaxKind::WithKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::OverrideKeyword;
    pub const LAST_TOKEN: SyntaxKind = SyntaxKind::OverrideKeyword;

    /// Any keyword, reserved or contextual.
    #[inline]
    pub fn is_keyword(self) -> bool {
        self >= Self::FIRST_KEYWORD && self <= Self::LAST_KEYWORD
    }

    /// Keywords that can never name a binding.
    #[inline]
    pub fn is_reserved_word(self) -> bool {
        self >= Self::FIRST_KEYWORD && self <= Self::LAST_RESERVED_WORD
    }

    /// Identifiers, including contextual keywords used as names.
    #[inline]
    pub fn is_identifier(self) -> bool {
        self == SyntaxKind::Identifier || (self > Self::LAST_RESERVED_WORD && self <= Self::LAST_KEYWORD)
    }

    #[inline]
    pub fn is_identifier_or_keyword(self) -> bool {
        self == SyntaxKind::Identifier || self.is_keyword()
    }

    /// Keywords that may prefix a declaration or member.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::AbstractKeyword
                | SyntaxKind::AccessorKeyword
                | SyntaxKind::AsyncKeyword
                | SyntaxKind::ConstKeyword
                | SyntaxKind::DeclareKeyword
                | SyntaxKind::DefaultKeyword
                | SyntaxKind::ExportKeyword
                | SyntaxKind::InKeyword
                | SyntaxKind::OutKeyword
                | SyntaxKind::OverrideKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::PublicKeyword
                | SyntaxKind::ReadonlyKeyword
                | SyntaxKind::StaticKeyword
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::NoSubstitutionTemplateLiteral
        )
    }

    /// Convert a raw node kind back to a token kind.
    pub fn from_u16(value: u16) -> Option<SyntaxKind> {
        if value <= Self::LAST_TOKEN as u16 {
            ALL_KINDS.get(value as usize).copied()
        } else {
            None
        }
    }
}

macro_rules! keyword_table {
    ($($kind:ident => $text:literal,)*) => {
        static KEYWORD_TEXTS: &[(&str, SyntaxKind)] = &[$(($text, SyntaxKind::$kind),)*];
    };
}

keyword_table! {
    BreakKeyword => "break",
    CaseKeyword => "case",
    CatchKeyword => "catch",
    ClassKeyword => "class",
    ConstKeyword => "const",
    ContinueKeyword => "continue",
    DebuggerKeyword => "debugger",
    DefaultKeyword => "default",
    DeleteKeyword => "delete",
    DoKeyword => "do",
    ElseKeyword => "else",
    EnumKeyword => "enum",
    ExportKeyword => "export",
    ExtendsKeyword => "extends",
    FalseKeyword => "false",
    FinallyKeyword => "finally",
    ForKeyword => "for",
    FunctionKeyword => "function",
    IfKeyword => "if",
    ImportKeyword => "import",
    InKeyword => "in",
    InstanceOfKeyword => "instanceof",
    NewKeyword => "new",
    NullKeyword => "null",
    ReturnKeyword => "return",
    SuperKeyword => "super",
    SwitchKeyword => "switch",
    ThisKeyword => "this",
    ThrowKeyword => "throw",
    TrueKeyword => "true",
    TryKeyword => "try",
    TypeOfKeyword => "typeof",
    VarKeyword => "var",
    VoidKeyword => "void",
    WhileKeyword => "while",
    WithKeyword => "with",
    ImplementsKeyword => "implements",
    InterfaceKeyword => "interface",
    LetKeyword => "let",
    PackageKeyword => "package",
    PrivateKeyword => "private",
    ProtectedKeyword => "protected",
    PublicKeyword => "public",
    StaticKeyword => "static",
    YieldKeyword => "yield",
    AbstractKeyword => "abstract",
    AccessorKeyword => "accessor",
    AsKeyword => "as",
    AssertsKeyword => "asserts",
    AssertKeyword => "assert",
    AnyKeyword => "any",
    AsyncKeyword => "async",
    AwaitKeyword => "await",
    BigIntKeyword => "bigint",
    BooleanKeyword => "boolean",
    ConstructorKeyword => "constructor",
    DeclareKeyword => "declare",
    GetKeyword => "get",
    InferKeyword => "infer",
    IntrinsicKeyword => "intrinsic",
    IsKeyword => "is",
    KeyOfKeyword => "keyof",
    ModuleKeyword => "module",
    NamespaceKeyword => "namespace",
    NeverKeyword => "never",
    NumberKeyword => "number",
    ObjectKeyword => "object",
    OutKeyword => "out",
    ReadonlyKeyword => "readonly",
    RequireKeyword => "require",
    SatisfiesKeyword => "satisfies",
    SetKeyword => "set",
    StringKeyword => "string",
    SymbolKeyword => "symbol",
    TypeKeyword => "type",
    UndefinedKeyword => "undefined",
    UniqueKeyword => "unique",
    UnknownKeyword => "unknown",
    UsingKeyword => "using",
    FromKeyword => "from",
    GlobalKeyword => "global",
    OfKeyword => "of",
    OverrideKeyword => "override",
}

static KEYWORDS: Lazy<FxHashMap<&'static str, SyntaxKind>> =
    Lazy::new(|| KEYWORD_TEXTS.iter().copied().collect());

static ALL_KINDS: Lazy<Vec<SyntaxKind>> = Lazy::new(|| {
    let mut kinds = vec![SyntaxKind::Unknown; SyntaxKind::LAST_TOKEN as usize + 1];
    for (index, kind) in PUNCTUATION_AND_LITERALS.iter().enumerate() {
        kinds[index] = *kind;
    }
    for (_, kind) in KEYWORD_TEXTS {
        kinds[*kind as usize] = *kind;
    }
    kinds
});

static PUNCTUATION_AND_LITERALS: &[SyntaxKind] = &[
    SyntaxKind::Unknown,
    SyntaxKind::EndOfFileToken,
    SyntaxKind::NumericLiteral,
    SyntaxKind::BigIntLiteral,
    SyntaxKind::StringLiteral,
    SyntaxKind::NoSubstitutionTemplateLiteral,
    SyntaxKind::TemplateHead,
    SyntaxKind::TemplateMiddle,
    SyntaxKind::TemplateTail,
    SyntaxKind::OpenBraceToken,
    SyntaxKind::CloseBraceToken,
    SyntaxKind::OpenParenToken,
    SyntaxKind::CloseParenToken,
    SyntaxKind::OpenBracketToken,
    SyntaxKind::CloseBracketToken,
    SyntaxKind::DotToken,
    SyntaxKind::DotDotDotToken,
    SyntaxKind::SemicolonToken,
    SyntaxKind::CommaToken,
    SyntaxKind::QuestionDotToken,
    SyntaxKind::LessThanToken,
    SyntaxKind::GreaterThanToken,
    SyntaxKind::LessThanEqualsToken,
    SyntaxKind::EqualsEqualsToken,
    SyntaxKind::ExclamationEqualsToken,
    SyntaxKind::EqualsEqualsEqualsToken,
    SyntaxKind::ExclamationEqualsEqualsToken,
    SyntaxKind::EqualsGreaterThanToken,
    SyntaxKind::PlusToken,
    SyntaxKind::MinusToken,
    SyntaxKind::AsteriskToken,
    SyntaxKind::AsteriskAsteriskToken,
    SyntaxKind::SlashToken,
    SyntaxKind::PercentToken,
    SyntaxKind::PlusPlusToken,
    SyntaxKind::MinusMinusToken,
    SyntaxKind::LessThanLessThanToken,
    SyntaxKind::AmpersandToken,
    SyntaxKind::BarToken,
    SyntaxKind::CaretToken,
    SyntaxKind::ExclamationToken,
    SyntaxKind::TildeToken,
    SyntaxKind::AmpersandAmpersandToken,
    SyntaxKind::BarBarToken,
    SyntaxKind::QuestionToken,
    SyntaxKind::ColonToken,
    SyntaxKind::AtToken,
    SyntaxKind::QuestionQuestionToken,
    SyntaxKind::EqualsToken,
    SyntaxKind::Identifier,
    SyntaxKind::PrivateIdentifier,
];

/// Keyword kind for a word, if it is one.
pub fn text_to_keyword(text: &str) -> Option<SyntaxKind> {
    KEYWORDS.get(text).copied()
}

/// Source text of a fixed token, used in diagnostics.
pub fn token_to_text(kind: SyntaxKind) -> Option<&'static str> {
    if kind.is_keyword() {
        return KEYWORD_TEXTS
            .iter()
            .find(|(_, k)| *k == kind)
            .map(|(text, _)| *text);
    }
    let text = match kind {
        SyntaxKind::OpenBraceToken => "{",
        SyntaxKind::CloseBraceToken => "}",
        SyntaxKind::OpenParenToken => "(",
        SyntaxKind::CloseParenToken => ")",
        SyntaxKind::OpenBracketToken => "[",
        SyntaxKind::CloseBracketToken => "]",
        SyntaxKind::DotToken => ".",
        SyntaxKind::DotDotDotToken => "...",
        SyntaxKind::SemicolonToken => ";",
        SyntaxKind::CommaToken => ",",
        SyntaxKind::QuestionDotToken => "?.",
        SyntaxKind::LessThanToken => "<",
        SyntaxKind::GreaterThanToken => ">",
        SyntaxKind::LessThanEqualsToken => "<=",
        SyntaxKind::EqualsEqualsToken => "==",
        SyntaxKind::ExclamationEqualsToken => "!=",
        SyntaxKind::EqualsEqualsEqualsToken => "===",
        SyntaxKind::ExclamationEqualsEqualsToken => "!==",
        SyntaxKind::EqualsGreaterThanToken => "=>",
        SyntaxKind::PlusToken => "+",
        SyntaxKind::MinusToken => "-",
        SyntaxKind::AsteriskToken => "*",
        SyntaxKind::AsteriskAsteriskToken => "**",
        SyntaxKind::SlashToken => "/",
        SyntaxKind::PercentToken => "%",
        SyntaxKind::PlusPlusToken => "++",
        SyntaxKind::MinusMinusToken => "--",
        SyntaxKind::LessThanLessThanToken => "<<",
        SyntaxKind::AmpersandToken => "&",
        SyntaxKind::BarToken => "|",
        SyntaxKind::CaretToken => "^",
        SyntaxKind::ExclamationToken => "!",
        SyntaxKind::TildeToken => "~",
        SyntaxKind::AmpersandAmpersandToken => "&&",
        SyntaxKind::BarBarToken => "||",
        SyntaxKind::QuestionToken => "?",
        SyntaxKind::ColonToken => ":",
        SyntaxKind::AtToken => "@",
        SyntaxKind::QuestionQuestionToken => "??",
        SyntaxKind::EqualsToken => "=",
        SyntaxKind::EndOfFileToken => "end of file",
        _ => return None,
    };
    Some(text)
}
