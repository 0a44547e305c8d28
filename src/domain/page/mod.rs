//! Paginated list requests and merged page state.

pub mod state;

pub use state::PagedList;

use crate::remote::Arg;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Which way to walk from the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "Forward",
            Direction::Backward => "Backward",
        }
    }
}

/// An item with a stable unique identifier, used to deduplicate pages.
pub trait Identified {
    type Id: Eq + Hash + Clone;

    fn id(&self) -> Self::Id;
}

/// Arguments for a paginated list procedure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest<Id> {
    pub previous: Option<Id>,
    pub limit: u32,
    pub direction: Direction,
}

impl<Id> PageRequest<Id> {
    pub fn first(limit: u32) -> Self {
        Self {
            previous: None,
            limit,
            direction: Direction::Forward,
        }
    }
}

/// `{ previous: opt id, limit: nat, direction: variant }`
impl<Id: Clone + Into<Arg>> From<&PageRequest<Id>> for Arg {
    fn from(req: &PageRequest<Id>) -> Self {
        Arg::record([
            ("previous", Arg::from(req.previous.clone())),
            ("limit", Arg::from(req.limit)),
            ("direction", Arg::tag(req.direction.as_str())),
        ])
    }
}
