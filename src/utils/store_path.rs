//! Name and version recovery from store paths.
//!
//! Store paths look like `/nix/store/<hash>-<name>-<version>`; names may
//! themselves contain dashes (`gcc-wrapper`), so the version starts at the
//! first dash that is followed by a digit.

/// Split the last path segment into `(name, version)`.
///
/// A leading 32-character store hash is dropped when the remainder is
/// non-empty. Paths without a recognizable version return the
/// whole remainder as the name.
#[must_use]
pub fn split_store_name(path: &str) -> (&str, Option<&str>) {
    let base = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path);
    let base = strip_hash_prefix(base);

    let bytes = base.as_bytes();
    for (i, window) in bytes.windows(2).enumerate() {
        if window[0] == b'-' && window[1].is_ascii_digit() && i > 0 {
            let (name, version) = (&base[..i], &base[i + 1..]);
            return (name, Some(version));
        }
    }
    (base, None)
}

const STORE_HASH_LEN: usize = 32;

fn strip_hash_prefix(base: &str) -> &str {
    match base.split_once('-') {
        Some((hash, rest))
            if !rest.is_empty()
                && hash.len() == STORE_HASH_LEN
                && hash.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()) =>
        {
            rest
        }
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_path_with_version() {
        assert_eq!(
            split_store_name("/nix/store/0123abcd4567efgh0123abcd4567efgh-libunistring-1.1"),
            ("libunistring", Some("1.1"))
        );
    }

    #[test]
    fn test_dashed_name() {
        assert_eq!(
            split_store_name("/nix/store/0123abcd4567efgh0123abcd4567efgh-gcc-wrapper-12.3.0"),
            ("gcc-wrapper", Some("12.3.0"))
        );
    }

    #[test]
    fn test_no_version() {
        assert_eq!(
            split_store_name("/nix/store/0123abcd4567efgh0123abcd4567efgh-stdenv-linux"),
            ("stdenv-linux", None)
        );
    }

    #[test]
    fn test_plain_path() {
        assert_eq!(split_store_name("A"), ("A", None));
        assert_eq!(split_store_name("/opt/hello-2.12/"), ("hello", Some("2.12")));
    }

    #[test]
    fn test_short_prefix_is_not_a_hash() {
        assert_eq!(split_store_name("foo-bar-1.0"), ("foo-bar", Some("1.0")));
        assert_eq!(
            split_store_name("/usr/lib/coreutils-9.3"),
            ("coreutils", Some("9.3"))
        );
    }
}
