use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Per-dispatch correlation id backed by a ULID.
///
/// Every [`HandlerRequest`](crate::server::HandlerRequest) gets one; it is
/// attached to the dispatcher's log events so a request can be followed from
/// matching to response building.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct RequestId(ulid::Ulid);

impl RequestId {
    #[must_use]
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Use the caller's id when it parses as a ULID, otherwise mint a new one.
    #[must_use]
    pub fn from_header_or_new(header_value: Option<&str>) -> Self {
        header_value
            .and_then(|s| s.parse::<RequestId>().ok())
            .unwrap_or_default()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for RequestId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ulid::Ulid::from_string(s).map(RequestId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value_round_trips() {
        let id = RequestId::new();
        assert_eq!(RequestId::from_header_or_new(Some(&id.to_string())), id);
    }

    #[test]
    fn test_missing_or_invalid_header_mints_new_id() {
        assert_ne!(RequestId::from_header_or_new(None), RequestId::from_header_or_new(None));
        assert!("not-a-ulid".parse::<RequestId>().is_err());
    }
}
