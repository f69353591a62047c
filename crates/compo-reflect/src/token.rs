//! Metadata tokens

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a type definition, unique only within its declaring module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataToken(pub u32);

impl MetadataToken {
    /// Raw token value
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for MetadataToken {
    fn from(value: u32) -> Self {
        MetadataToken(value)
    }
}

impl fmt::Display for MetadataToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_hex() {
        assert_eq!(MetadataToken(0x0200_0007).to_string(), "0x02000007");
        assert_eq!(MetadataToken::from(42).value(), 42);
    }
}
