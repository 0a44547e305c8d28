//! Merged page state: app-owned, SDK-provided update logic.

use super::{Direction, Identified, PageRequest};
use std::collections::HashSet;

/// Items gathered across pages, deduplicated by id.
///
/// A page shorter than `limit`, or an empty page, marks the end of the list.
#[derive(Debug, Clone)]
pub struct PagedList<T: Identified> {
    items: Vec<T>,
    seen: HashSet<T::Id>,
    limit: u32,
    has_more: bool,
}

impl<T: Identified> PagedList<T> {
    pub fn new(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            limit,
            has_more: true,
        }
    }

    /// Merge a fetched page. Returns how many new items were added.
    ///
    /// Forward pages append after the existing items; backward pages are
    /// placed before them, keeping the page's own order.
    pub fn merge(&mut self, page: Vec<T>, direction: Direction) -> usize {
        self.has_more = !page.is_empty() && page.len() >= self.limit as usize;

        let fresh: Vec<T> = page
            .into_iter()
            .filter(|item| self.seen.insert(item.id()))
            .collect();
        let added = fresh.len();

        match direction {
            Direction::Forward => self.items.extend(fresh),
            Direction::Backward => {
                self.items.splice(0..0, fresh);
            }
        }
        added
    }

    /// The request for the page after (or before) what is loaded.
    pub fn next_request(&self, direction: Direction) -> PageRequest<T::Id> {
        let cursor = match direction {
            Direction::Forward => self.items.last(),
            Direction::Backward => self.items.first(),
        };
        PageRequest {
            previous: cursor.map(Identified::id),
            limit: self.limit,
            direction,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.seen.clear();
        self.has_more = true;
    }
}
