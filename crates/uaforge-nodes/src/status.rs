// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA status codes.
//!
//! Only the severity bits and the node-management codes are modeled. The
//! address space reports one status per AddNodes or DeleteNodes item.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 32-bit OPC UA status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub u32);

impl StatusCode {
    /// The operation succeeded.
    pub const GOOD: Self = Self(0x0000_0000);
    /// Unexpected internal failure.
    pub const BAD_INTERNAL_ERROR: Self = Self(0x8002_0000);
    /// The operation is not supported.
    pub const BAD_NOT_SUPPORTED: Self = Self(0x803D_0000);
    /// The callback rejected the call arguments.
    pub const BAD_INVALID_ARGUMENT: Self = Self(0x80AB_0000);
    /// The node id syntax is invalid.
    pub const BAD_NODE_ID_INVALID: Self = Self(0x8033_0000);
    /// The node id refers to a node that does not exist.
    pub const BAD_NODE_ID_UNKNOWN: Self = Self(0x8034_0000);
    /// The parent node id does not refer to a valid node.
    pub const BAD_PARENT_NODE_ID_INVALID: Self = Self(0x805B_0000);
    /// The reference type id does not refer to a valid reference type.
    pub const BAD_REFERENCE_TYPE_ID_INVALID: Self = Self(0x804C_0000);
    /// The requested node id is already used by another node.
    pub const BAD_NODE_ID_EXISTS: Self = Self(0x805E_0000);
    /// The node class is not valid.
    pub const BAD_NODE_CLASS_INVALID: Self = Self(0x805F_0000);
    /// The browse name is invalid.
    pub const BAD_BROWSE_NAME_INVALID: Self = Self(0x8060_0000);
    /// The browse name is not unique among nodes that share the same parent.
    pub const BAD_BROWSE_NAME_DUPLICATED: Self = Self(0x8061_0000);
    /// The node attributes are not valid for the node class.
    pub const BAD_NODE_ATTRIBUTES_INVALID: Self = Self(0x8062_0000);
    /// The type definition node id does not reference an appropriate type node.
    pub const BAD_TYPE_DEFINITION_INVALID: Self = Self(0x8063_0000);
    /// The method id does not refer to a method for the specified object.
    pub const BAD_METHOD_INVALID: Self = Self(0x8075_0000);
    /// The client did not specify all of the input arguments for the method.
    pub const BAD_ARGUMENTS_MISSING: Self = Self(0x8076_0000);
    /// The value supplied for the attribute is not of the same type as the attribute's value.
    pub const BAD_TYPE_MISMATCH: Self = Self(0x8074_0000);

    /// Returns the raw code.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if both severity bits are clear.
    #[inline]
    pub const fn is_good(self) -> bool {
        self.0 & 0xC000_0000 == 0
    }

    /// Returns `true` if the bad severity bit is set.
    #[inline]
    pub const fn is_bad(self) -> bool {
        self.0 & 0x8000_0000 != 0
    }

    /// Returns `true` for the uncertain severity.
    #[inline]
    pub const fn is_uncertain(self) -> bool {
        self.0 & 0xC000_0000 == 0x4000_0000
    }

    /// Returns the symbolic name, if known.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::GOOD => "Good",
            Self::BAD_INTERNAL_ERROR => "BadInternalError",
            Self::BAD_NOT_SUPPORTED => "BadNotSupported",
            Self::BAD_INVALID_ARGUMENT => "BadInvalidArgument",
            Self::BAD_NODE_ID_INVALID => "BadNodeIdInvalid",
            Self::BAD_NODE_ID_UNKNOWN => "BadNodeIdUnknown",
            Self::BAD_PARENT_NODE_ID_INVALID => "BadParentNodeIdInvalid",
            Self::BAD_REFERENCE_TYPE_ID_INVALID => "BadReferenceTypeIdInvalid",
            Self::BAD_NODE_ID_EXISTS => "BadNodeIdExists",
            Self::BAD_NODE_CLASS_INVALID => "BadNodeClassInvalid",
            Self::BAD_BROWSE_NAME_INVALID => "BadBrowseNameInvalid",
            Self::BAD_BROWSE_NAME_DUPLICATED => "BadBrowseNameDuplicated",
            Self::BAD_NODE_ATTRIBUTES_INVALID => "BadNodeAttributesInvalid",
            Self::BAD_TYPE_DEFINITION_INVALID => "BadTypeDefinitionInvalid",
            Self::BAD_METHOD_INVALID => "BadMethodInvalid",
            Self::BAD_ARGUMENTS_MISSING => "BadArgumentsMissing",
            Self::BAD_TYPE_MISMATCH => "BadTypeMismatch",
            _ => return None,
        };
        Some(name)
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        Self::GOOD
    }
}

impl From<u32> for StatusCode {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} (0x{:08X})", name, self.0),
            None => write!(f, "0x{:08X}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_bits() {
        assert!(StatusCode::GOOD.is_good());
        assert!(!StatusCode::GOOD.is_bad());
        assert!(StatusCode::BAD_NODE_ID_EXISTS.is_bad());
        assert!(StatusCode(0x4000_0000).is_uncertain());
        assert!(!StatusCode(0x4000_0000).is_good());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            StatusCode::BAD_NODE_ID_EXISTS.to_string(),
            "BadNodeIdExists (0x805E0000)"
        );
        assert_eq!(StatusCode(0x8123_0000).to_string(), "0x81230000");
    }
}
