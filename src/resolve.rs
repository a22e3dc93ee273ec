//! Recursive `${key}` variable expansion.
//!
//! A raw value may embed references to other keys (`"${app.master.hostname}:${app.master.port}"`).
//! Each token is replaced by the referenced key's own fully-resolved value, to
//! a fixed point, before the surrounding string is returned. Expansion walks
//! depth-first with an explicit in-progress set, so reference cycles are
//! reported instead of overflowing the stack. A `${` without a matching `}`
//! is not a token and is left literal.

use crate::error::{ConfigError, ConfigResult};
use regex_lite::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::trace;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^{}]+)\}").expect("token pattern is valid"));

/// Raw (unresolved) value lookup across all layers of a store snapshot.
pub(crate) trait RawLookup {
    fn raw(&self, key: &str) -> Option<&str>;
}

/// Fully resolve the value of `key`, expanding every embedded reference.
pub(crate) fn resolve(lookup: &impl RawLookup, key: &str) -> ConfigResult<String> {
    let mut in_progress = HashSet::new();
    resolve_key(lookup, key, &mut in_progress)
}

fn resolve_key(
    lookup: &impl RawLookup,
    key: &str,
    in_progress: &mut HashSet<String>,
) -> ConfigResult<String> {
    if !in_progress.insert(key.to_string()) {
        return Err(ConfigError::cyclic(key));
    }
    let raw = lookup
        .raw(key)
        .ok_or_else(|| ConfigError::unresolved(key))?
        .to_string();
    let resolved = expand(lookup, &raw, in_progress)?;
    in_progress.remove(key);
    Ok(resolved)
}

fn expand(
    lookup: &impl RawLookup,
    raw: &str,
    in_progress: &mut HashSet<String>,
) -> ConfigResult<String> {
    if !raw.contains("${") {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut last = 0;
    for caps in TOKEN_RE.captures_iter(raw) {
        let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let referenced = name.as_str();
        if lookup.raw(referenced).is_none() {
            return Err(ConfigError::unresolved_token(referenced, raw));
        }
        let value = resolve_key(lookup, referenced, in_progress)?;
        trace!(referenced, "substituted variable reference");
        out.push_str(&raw[last..token.start()]);
        out.push_str(&value);
        last = token.end();
    }
    out.push_str(&raw[last..]);
    Ok(out)
}
