//! Account-range filtering for incoming trades.
//!
//! The gateway only republishes trades for configured account ranges. The
//! range spec is a comma-separated list of `"low-high"` tokens, e.g.
//! `"1000-1999, 5000-5999"`. Reversed bounds are normalized rather than
//! rejected, so `"50-10"` accepts logins in `[10, 50]`.

use crate::error::Mt4Error;

/// An inclusive account-id range, normalized so that `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountRange {
    pub low: u64,
    pub high: u64,
}

impl AccountRange {
    /// Build a range from two bounds given in either order.
    pub fn new(a: u64, b: u64) -> Self {
        if b < a {
            Self { low: b, high: a }
        } else {
            Self { low: a, high: b }
        }
    }

    /// Whether `login` falls inside the range, bounds inclusive.
    #[inline]
    pub fn contains(&self, login: u64) -> bool {
        self.low <= login && login <= self.high
    }
}

/// Membership filter over the set of allowed account ranges.
///
/// Parsed once at startup and shared read-only afterwards. An empty range
/// set rejects every login.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    ranges: Vec<AccountRange>,
}

impl AccountFilter {
    /// Parse a comma-separated `"low-high"` range spec.
    ///
    /// Whitespace around tokens and around the dash is ignored; empty tokens
    /// are skipped. A token with the wrong shape or a non-numeric bound is a
    /// fatal configuration error; malformed ranges are never silently
    /// dropped.
    pub fn parse(spec: &str) -> Result<Self, Mt4Error> {
        let mut ranges = Vec::new();
        for token in spec.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let mut bounds = token.split('-');
            let (low, high) = match (bounds.next(), bounds.next(), bounds.next()) {
                (Some(a), Some(b), None) => (parse_bound(token, a)?, parse_bound(token, b)?),
                _ => {
                    return Err(Mt4Error::Config(format!(
                        "account range '{token}' must be a single 'low-high' pair"
                    )));
                }
            };
            ranges.push(AccountRange::new(low, high));
        }
        Ok(Self { ranges })
    }

    /// Whether `login` falls within any configured range.
    #[inline]
    pub fn is_allowed(&self, login: u64) -> bool {
        self.ranges.iter().any(|r| r.contains(login))
    }

    /// Number of configured ranges.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// True when no ranges are configured, in which case every login is
    /// rejected.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

fn parse_bound(token: &str, raw: &str) -> Result<u64, Mt4Error> {
    raw.trim().parse::<u64>().map_err(|_| {
        Mt4Error::Config(format!(
            "account range '{token}' has a non-numeric bound '{}'",
            raw.trim()
        ))
    })
}
