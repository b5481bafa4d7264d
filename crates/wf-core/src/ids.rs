//! String identifiers for nodes and edges, and the session id generator.

use core::fmt;

use chrono::Utc;

use crate::error::{CoreError, CoreResult};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier. Empty strings are rejected.
            pub fn new(raw: impl Into<String>) -> CoreResult<Self> {
                let raw = raw.into();
                if raw.is_empty() {
                    return Err(CoreError::InvalidId {
                        what: stringify!($name),
                    });
                }
                Ok(Self(raw))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id!(
    /// Identifier of a workflow node.
    NodeId
);

string_id!(
    /// Identifier of an edge between two workflow nodes.
    EdgeId
);

/// Time-based id source.
///
/// Ids look like `node_1718000000000`. Two ids requested within the same
/// millisecond get a `_<seq>` suffix so ids stay unique within a session.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last_millis: i64,
    seq: u32,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_node_id(&mut self) -> NodeId {
        NodeId(self.next_raw("node"))
    }

    /// Edge ids embed their endpoints, e.g. `edge_start_task_1718000000000`.
    pub fn next_edge_id(&mut self, source: &NodeId, target: &NodeId) -> EdgeId {
        let stamp = self.next_stamp();
        EdgeId(format!("edge_{}_{}_{}", source, target, stamp))
    }

    fn next_raw(&mut self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.next_stamp())
    }

    fn next_stamp(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        if now > self.last_millis {
            self.last_millis = now;
            self.seq = 0;
            now.to_string()
        } else {
            // Clock did not advance (or went backwards): reuse the last stamp.
            self.seq += 1;
            format!("{}_{}", self.last_millis, self.seq)
        }
    }
}
