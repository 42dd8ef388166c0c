// ABOUTME: Shared utility functions for GiveLink
// ABOUTME: Prefixed id generation for persisted records

/// Record kinds that carry a prefixed identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    Request,
    Donation,
    Donor,
    Receiver,
}

impl IdPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::Request => "req",
            IdPrefix::Donation => "don",
            IdPrefix::Donor => "dnr",
            IdPrefix::Receiver => "rcv",
        }
    }
}

/// Generate a unique id such as `req-V1StGXR8_Z5jdHi6B-myT`
pub fn generate_id(prefix: IdPrefix) -> String {
    format!("{}-{}", prefix.as_str(), nanoid::nanoid!())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id() {
        let id1 = generate_id(IdPrefix::Request);
        let id2 = generate_id(IdPrefix::Request);

        assert!(id1.starts_with("req-"));
        assert_eq!(id1.len(), "req-".len() + 21);
        assert_ne!(id1, id2);
        assert!(generate_id(IdPrefix::Donation).starts_with("don-"));
    }
}
