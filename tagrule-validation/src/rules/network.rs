// Email, URL, address and identifier rules

use super::text::is_numeric_text;
use crate::{FieldContext, SemanticType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use url::{Host, Url};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

static DNS_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_][a-zA-Z0-9_-]{0,62}(?:\.[a-zA-Z0-9_][a-zA-Z0-9_-]{0,62})*[._]?$")
        .unwrap()
});

static MAC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[0-9A-Fa-f]{2}(?:[:-][0-9A-Fa-f]{2}){5}|[0-9A-Fa-f]{2}(?:[:-][0-9A-Fa-f]{2}){7}|[0-9A-Fa-f]{4}\.[0-9A-Fa-f]{4}\.[0-9A-Fa-f]{4})$",
    )
    .unwrap()
});

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});

static UUID3_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-3[0-9a-f]{3}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});

static UUID4_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$").unwrap()
});

static UUID5_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-5[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$").unwrap()
});

const MAX_URL_CHARS: usize = 2083;
const MIN_URL_BYTES: usize = 3;
const MAX_DNS_NAME: usize = 255;

const URL_SCHEMES: &[&str] = &["http", "https", "ftp", "ws", "wss"];

pub(crate) fn email(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(|s| EMAIL_REGEX.is_match(s))
}

/// `isURL`: an absolute web URL; a bare `host:port/path` gets `http://`.
pub(crate) fn is_url(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(url_text)
}

fn url_text(s: &str) -> bool {
    if s.chars().count() >= MAX_URL_CHARS
        || s.len() <= MIN_URL_BYTES
        || s.starts_with('.')
        || s.chars().any(char::is_whitespace)
    {
        return false;
    }

    let has_scheme = s.contains("://");
    let candidate = if has_scheme {
        s.to_string()
    } else {
        format!("http://{s}")
    };

    let Ok(url) = Url::parse(&candidate) else {
        return false;
    };
    if !URL_SCHEMES.contains(&url.scheme()) {
        return false;
    }

    match url.host() {
        Some(Host::Domain(domain)) => {
            !domain.is_empty()
                && !domain.starts_with('.')
                && (has_scheme || domain.contains('.') || domain == "localhost")
        }
        Some(_) => true,
        None => false,
    }
}

pub(crate) fn is_ip(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(|s| s.parse::<IpAddr>().is_ok())
}

pub(crate) fn is_ipv4(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(|s| s.parse::<Ipv4Addr>().is_ok())
}

/// `isIPv6`: a colon-separated IPv6 literal.
pub(crate) fn is_ipv6(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(|s| s.parse::<Ipv6Addr>().is_ok())
}

/// `isPort`: 1 to 65535, as a digit string or an integer.
pub(crate) fn is_port(ctx: &FieldContext<'_>) -> bool {
    let port = match ctx.semantic_type {
        SemanticType::String => ctx
            .text()
            .filter(|s| is_numeric_text(s))
            .and_then(|s| s.parse::<i64>().ok()),
        SemanticType::Int => ctx.value.as_i64(),
        _ => None,
    };

    port.is_some_and(|p| (1..=65535).contains(&p))
}

pub(crate) fn is_mac(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(|s| MAC_REGEX.is_match(s))
}

/// `isDNSName`: a host name that is not an IP literal.
pub(crate) fn is_dns_name(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(dns_name_text)
}

fn dns_name_text(s: &str) -> bool {
    s.replace('.', "").len() <= MAX_DNS_NAME
        && s.parse::<IpAddr>().is_err()
        && DNS_NAME_REGEX.is_match(s)
}

/// `isHost`: an IP literal or a DNS name.
pub(crate) fn is_host(ctx: &FieldContext<'_>) -> bool {
    ctx.text()
        .is_some_and(|s| s.parse::<IpAddr>().is_ok() || dns_name_text(s))
}

pub(crate) fn is_uuid(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(|s| UUID_REGEX.is_match(s))
}

pub(crate) fn is_uuid_v3(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(|s| UUID3_REGEX.is_match(s))
}

pub(crate) fn is_uuid_v4(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(|s| UUID4_REGEX.is_match(s))
}

pub(crate) fn is_uuid_v5(ctx: &FieldContext<'_>) -> bool {
    ctx.text().is_some_and(|s| UUID5_REGEX.is_match(s))
}
