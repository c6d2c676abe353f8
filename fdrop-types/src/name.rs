//! Display-name derivation from advertised service names.

use crate::wire::SERVICE_SUFFIX;

/// Derive the human-readable device name from a raw advertised service name.
///
/// The discovery daemon advertises devices as `<name>._fdrop._tcp.local.`;
/// this returns the portion before the first `._fdrop` marker, or the whole
/// string unchanged when the marker is absent.
///
/// Pure and total: an empty input yields an empty name, and an input that is
/// nothing but the marker yields an empty name.
pub fn realname(raw_name: &str) -> &str {
    match raw_name.find(SERVICE_SUFFIX) {
        Some(end) => &raw_name[..end],
        None => raw_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_service_suffix() {
        assert_eq!(realname("Bob._fdrop._tcp.local"), "Bob");
    }

    #[test]
    fn passes_through_without_suffix() {
        assert_eq!(realname("NoSuffixHere"), "NoSuffixHere");
    }

    #[test]
    fn bare_marker_yields_empty() {
        assert_eq!(realname("._fdrop"), "");
    }

    #[test]
    fn empty_input_yields_empty() {
        assert_eq!(realname(""), "");
    }

    #[test]
    fn only_first_marker_counts() {
        assert_eq!(realname("a._fdrop._fdrop"), "a");
    }
}
