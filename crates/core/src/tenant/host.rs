//! Hostname handling.

use super::error::TenantError;

/// Normalizes a `Host` header value for lookup.
///
/// Lower-cases, trims, drops the port and a trailing dot. IPv6 literals keep
/// their brackets (`[::1]:8080` becomes `[::1]`).
///
/// # Errors
///
/// Returns `InvalidHost` for empty values or characters not allowed in a host.
pub fn normalize_host(raw: &str) -> Result<String, TenantError> {
    let trimmed = raw.trim().to_ascii_lowercase();

    let host = if trimmed.starts_with('[') {
        match trimmed.find(']') {
            Some(end) => trimmed[..=end].to_string(),
            None => return Err(TenantError::InvalidHost(raw.to_string())),
        }
    } else {
        match trimmed.rsplit_once(':') {
            Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host.to_string(),
            Some(_) => return Err(TenantError::InvalidHost(raw.to_string())),
            None => trimmed,
        }
    };
    let host = host.trim_end_matches('.').to_string();

    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '[' | ']' | ':');
    if host.is_empty() || !host.chars().all(allowed) || host.contains("..") {
        return Err(TenantError::InvalidHost(raw.to_string()));
    }
    Ok(host)
}

/// Checks a workspace slug as a single DNS label.
///
/// # Errors
///
/// Returns `Validation` if the slug is not 1–63 of `[a-z0-9-]` without
/// leading or trailing hyphen.
pub fn validate_slug(slug: &str) -> Result<(), TenantError> {
    let ok = !slug.is_empty()
        && slug.len() <= 63
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if ok {
        Ok(())
    } else {
        Err(TenantError::Validation(format!(
            "Workspace address '{slug}' may only contain lowercase letters, digits and hyphens"
        )))
    }
}

/// Full hostname of a workspace: `<slug>.<base_domain>`.
#[must_use]
pub fn workspace_domain(slug: &str, base_domain: &str) -> String {
    format!("{slug}.{}", base_domain.trim_matches('.'))
}

/// The first label of a hostname.
#[must_use]
pub fn first_label(host: &str) -> &str {
    host.split('.').next().unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Noor.Localhost", "noor.localhost")]
    #[case("noor.localhost:8000", "noor.localhost")]
    #[case("noor.mizan.app.", "noor.mizan.app")]
    #[case(" 127.0.0.1:8080 ", "127.0.0.1")]
    #[case("[::1]:8080", "[::1]")]
    #[case("localhost", "localhost")]
    fn test_normalize_host(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_host(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case(":8080")]
    #[case("noor.localhost:http")]
    #[case("noor..localhost")]
    #[case("noor_localhost/evil")]
    #[case("[::1")]
    fn test_normalize_host_rejects(#[case] raw: &str) {
        assert!(matches!(normalize_host(raw), Err(TenantError::InvalidHost(_))));
    }

    #[rstest]
    #[case("masjid-noor", true)]
    #[case("noor2", true)]
    #[case("-noor", false)]
    #[case("noor-", false)]
    #[case("Noor", false)]
    #[case("noor.app", false)]
    #[case("", false)]
    fn test_validate_slug(#[case] slug: &str, #[case] ok: bool) {
        assert_eq!(validate_slug(slug).is_ok(), ok);
    }

    #[test]
    fn test_workspace_domain() {
        assert_eq!(workspace_domain("noor", "localhost"), "noor.localhost");
        assert_eq!(workspace_domain("noor", ".mizan.app."), "noor.mizan.app");
        assert_eq!(first_label("noor.mizan.app"), "noor");
    }
}
