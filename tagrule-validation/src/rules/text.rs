// Character-class, encoding and format rules for string fields

use crate::FieldContext;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALPHANUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static ALPHA_DASH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

static INT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?(?:0|[1-9][0-9]*)$").unwrap());

static FLOAT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(?:[0-9]+)?(?:\.[0-9]*)?(?:[eE][-+]?[0-9]+)?$").unwrap()
});

static HEXADECIMAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]+$").unwrap());

static HEX_COLOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());

static RGB_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    let channel = r"\s*(?:0|[1-9]\d?|1\d\d|2[0-4]\d|25[0-5])\s*";
    Regex::new(&format!(r"^rgb\({channel},{channel},{channel}\)$")).unwrap()
});

static HAS_LOWER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Ll}").unwrap());

static HAS_UPPER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Lu}").unwrap());

static FULL_WIDTH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\x{0020}-\x{007E}\x{FF61}-\x{FF9F}\x{FFA0}-\x{FFDC}\x{FFE8}-\x{FFEE}0-9a-zA-Z]")
        .unwrap()
});

static HALF_WIDTH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{0020}-\x{007E}\x{FF61}-\x{FF9F}\x{FFA0}-\x{FFDC}\x{FFE8}-\x{FFEE}0-9a-zA-Z]")
        .unwrap()
});

static BASE64_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=|[A-Za-z0-9+/]{4})$")
        .unwrap()
});

static DATA_URI_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:.+/(.+);base64$").unwrap());

static WIN_PATH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[a-zA-Z]:\\(?:[^\\/:*?"<>|\r\n]+\\)*[^\\/:*?"<>|\r\n]*$"#).unwrap()
});

static UNIX_PATH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:/[^/\x00]*)+/?$|^/$").unwrap());

static SSN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3}[- ]?\d{2}[- ]?\d{4}$").unwrap());

static CN_ID_CARD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{15}|\d{17}[0-9Xx])$").unwrap());

static CN_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").unwrap());

static CN_TEL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:0\d{2,3}-?)?[1-9]\d{6,7}$").unwrap());

// Windows limits extended-length paths to 32767 characters.
const MAX_WIN_PATH: usize = 32767;

fn matches(ctx: &FieldContext<'_>, regex: &Regex) -> bool {
    ctx.text().is_some_and(|s| regex.is_match(s))
}

/// `numeric`: digits only.
pub(crate) fn numeric(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(is_numeric_text)
}

pub(crate) fn is_numeric_text(s: &str) -> bool {
    NUMERIC_REGEX.is_match(s)
}

/// `alpha`: ASCII letters only.
pub(crate) fn alpha(ctx: &FieldContext<'_>) -> bool {
    matches(ctx, &ALPHA_REGEX)
}

/// `alphaDash`: letters, digits, `-` and `_`.
pub(crate) fn alpha_dash(ctx: &FieldContext<'_>) -> bool {
    matches(ctx, &ALPHA_DASH_REGEX)
}

/// `alphaNum`: letters and digits.
pub(crate) fn alpha_num(ctx: &FieldContext<'_>) -> bool {
    matches(ctx, &ALPHANUMERIC_REGEX)
}

/// `cnIdCard`: 15 or 18 character resident identity card number.
pub(crate) fn cn_id_card(ctx: &FieldContext<'_>) -> bool {
    matches(ctx, &CN_ID_CARD_REGEX)
}

/// `cnMobile`: 11 digit mobile number.
pub(crate) fn cn_mobile(ctx: &FieldContext<'_>) -> bool {
    matches(ctx, &CN_MOBILE_REGEX)
}

/// `cnTel`: landline number with optional area code.
pub(crate) fn cn_tel(ctx: &FieldContext<'_>) -> bool {
    matches(ctx, &CN_TEL_REGEX)
}

pub(crate) fn is_hexadecimal(ctx: &FieldContext<'_>) -> bool {
    matches(ctx, &HEXADECIMAL_REGEX)
}

pub(crate) fn is_hex_color(ctx: &FieldContext<'_>) -> bool {
    matches(ctx, &HEX_COLOR_REGEX)
}

pub(crate) fn is_rgb_color(ctx: &FieldContext<'_>) -> bool {
    matches(ctx, &RGB_COLOR_REGEX)
}

pub(crate) fn is_lower_case(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(|s| s == s.to_lowercase())
}

pub(crate) fn is_upper_case(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(|s| s == s.to_uppercase())
}

pub(crate) fn has_lower_case(ctx: &FieldContext<'_>) -> bool {
    matches(ctx, &HAS_LOWER_REGEX)
}

pub(crate) fn has_upper_case(ctx: &FieldContext<'_>) -> bool {
    matches(ctx, &HAS_UPPER_REGEX)
}

/// `isInt`: a signed integer literal without leading zeros.
pub(crate) fn is_int(ctx: &FieldContext<'_>) -> bool {
    matches(ctx, &INT_REGEX)
}

/// `isFloat`: a signed decimal literal, exponent allowed.
pub(crate) fn is_float(ctx: &FieldContext<'_>) -> bool {
    ctx.text()
        .is_some_and(|s| s.bytes().any(|b| b.is_ascii_digit()) && FLOAT_REGEX.is_match(s))
}

pub(crate) fn is_json(ctx: &FieldContext<'_>) -> bool {
    ctx.text()
        .is_some_and(|s| serde_json::from_str::<serde::de::IgnoredAny>(s).is_ok())
}

/// `isMultibyte`: at least one non-ASCII character.
pub(crate) fn is_multibyte(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(|s| !s.is_ascii())
}

pub(crate) fn is_ascii(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(str::is_ascii)
}

pub(crate) fn is_printable_ascii(ctx: &FieldContext<'_>) -> bool {
    ctx.text()
        .is_some_and(|s| s.chars().all(|c| (' '..='~').contains(&c)))
}

/// `isFullWidth`: contains at least one full-width character.
pub(crate) fn is_full_width(ctx: &FieldContext<'_>) -> bool {
    matches(ctx, &FULL_WIDTH_REGEX)
}

/// `isHalfWidth`: contains at least one half-width character.
pub(crate) fn is_half_width(ctx: &FieldContext<'_>) -> bool {
    matches(ctx, &HALF_WIDTH_REGEX)
}

/// `isVariableWidth`: mixes full-width and half-width characters.
pub(crate) fn is_variable_width(ctx: &FieldContext<'_>) -> bool {
    is_full_width(ctx) && is_half_width(ctx)
}

/// `isBase64`: padded standard alphabet that actually decodes.
pub(crate) fn is_base64(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(base64_text)
}

fn base64_text(s: &str) -> bool {
    BASE64_REGEX.is_match(s) && STANDARD.decode(s).is_ok()
}

/// `isDataURI`: `data:<mime>;base64,<payload>`.
pub(crate) fn is_data_uri(ctx: &FieldContext<'_>) -> bool {
    let Some((header, payload)) = ctx.text().and_then(|s| s.split_once(',')) else {
        return false;
    };
    DATA_URI_REGEX.is_match(header) && base64_text(payload)
}

/// `isFilePath`: a Windows or Unix absolute path.
pub(crate) fn is_file_path(ctx: &FieldContext<'_>) -> bool {
    let Some(path) = ctx.text() else {
        return false;
    };

    if WIN_PATH_REGEX.is_match(path) {
        return path.chars().count() - 3 <= MAX_WIN_PATH;
    }
    UNIX_PATH_REGEX.is_match(path)
}

/// `isHash:algorithm`: lowercase hex digest of the algorithm's length.
pub(crate) fn is_hash(ctx: &FieldContext<'_>) -> bool {
    let length = match ctx.argument.trim().to_lowercase().as_str() {
        "crc32" | "crc32b" => 8,
        "md4" | "md5" | "ripemd128" | "tiger128" => 32,
        "sha1" | "ripemd160" | "tiger160" => 40,
        "tiger192" => 48,
        "sha256" => 64,
        "sha384" => 96,
        "sha512" => 128,
        _ => return false,
    };

    ctx.text().is_some_and(|s| {
        s.len() == length && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    })
}

/// `isSSN`: US social security number.
pub(crate) fn is_ssn(ctx: &FieldContext<'_>) -> bool {
    ctx.text()
        .is_some_and(|s| s.len() == 11 && SSN_REGEX.is_match(s))
}
