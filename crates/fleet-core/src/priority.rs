//! Request priorities
//!
//! The allocator treats priority as an opaque handle supplied by a priority
//! scheme. Requests without a priority carry `None`.

use std::any::Any;
use std::fmt::{Debug, Display};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// Trait for priorities produced by a priority scheme
pub trait Priority: Any + Debug + Send + Sync {
    /// Downcast support so a scheme can recover its own priority type
    fn as_any(&self) -> &dyn Any;
}

/// Shared, immutable priority handle
pub type ConstPriorityPtr = Arc<dyn Priority>;

/// Two-level priority scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BinaryPriority {
    Low,
    High,
}

impl BinaryPriority {
    /// Create a high priority handle
    pub fn high() -> ConstPriorityPtr {
        Arc::new(Self::High)
    }

    /// Create a low priority handle
    pub fn low() -> ConstPriorityPtr {
        Arc::new(Self::Low)
    }

    /// Numeric value (0 = low, 1 = high)
    pub fn value(&self) -> u64 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }

    /// Parse a numeric value
    pub fn from_value(value: u64) -> Result<Self, RequestError> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::High),
            other => Err(RequestError::InvalidPriority(other)),
        }
    }

    /// Recover a binary priority from an opaque handle, if it is one
    pub fn from_ptr(priority: &ConstPriorityPtr) -> Option<Self> {
        priority.as_any().downcast_ref::<Self>().copied()
    }
}

impl Priority for BinaryPriority {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for BinaryPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
        }
    }
}
