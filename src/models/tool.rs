//! Tool model.
//!
//! A tool occupies one turret slot. It carries a type id and the number of
//! uses it has left. Tool-life tables written by hand use `-1` for tools
//! that never wear out, so [`ToolLife`] serializes through `i64`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tool-type identifier.
pub type ToolId = u32;

/// Id of a retired slot. Never a valid tool type.
pub const DEAD_TOOL: ToolId = 0;

/// Initial life per tool id. Ordered so random draws are reproducible.
pub type ToolLifeTable = BTreeMap<ToolId, ToolLife>;

/// Required slot count per tool id.
pub type Distribution = BTreeMap<ToolId, usize>;

/// Remaining uses of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ToolLife {
    /// Wears out after the given number of uses.
    Finite(u32),
    /// Never wears out (`-1` in serialized tables).
    Unbounded,
}

impl TryFrom<i64> for ToolLife {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(ToolLife::Unbounded),
            n => u32::try_from(n)
                .map(ToolLife::Finite)
                .map_err(|_| format!("tool life must be -1 or a non-negative u32, got {n}")),
        }
    }
}

impl From<ToolLife> for i64 {
    fn from(life: ToolLife) -> Self {
        match life {
            ToolLife::Finite(n) => i64::from(n),
            ToolLife::Unbounded => -1,
        }
    }
}

impl fmt::Display for ToolLife {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolLife::Finite(n) => write!(f, "{n}"),
            ToolLife::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// A tool instance mounted in a turret slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool-type id ([`DEAD_TOOL`] once retired).
    pub id: ToolId,
    /// Remaining uses.
    pub life: ToolLife,
}

impl Tool {
    /// Creates a tool with the given life.
    pub fn new(id: ToolId, life: ToolLife) -> Self {
        Self { id, life }
    }

    /// Spends one use and reports whether the tool is still usable.
    ///
    /// A finite tool is usable while its life after the decrement stays
    /// above zero, so a tool rated for `n` uses serves `n - 1` of them.
    pub fn use_once(&mut self) -> bool {
        match self.life {
            ToolLife::Unbounded => true,
            ToolLife::Finite(n) => {
                let left = n.saturating_sub(1);
                self.life = ToolLife::Finite(left);
                left > 0
            }
        }
    }

    /// Marks the slot as dead.
    pub fn retire(&mut self) {
        self.id = DEAD_TOOL;
    }

    /// Whether the slot has been retired.
    pub fn is_dead(&self) -> bool {
        self.id == DEAD_TOOL
    }
}
