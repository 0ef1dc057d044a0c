//! Vector-backed collections

use std::{
    any::Any,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::domain::{ClassId, Collection, Entity, Paginator};

/// Plain in-memory collection
///
/// Each item type yields a distinct class, so `VecCollection<Widget>` gets
/// its own collection metadata.
#[derive(Debug, Clone, Default)]
pub struct VecCollection<T> {
    items: Vec<T>,
}

impl<T> VecCollection<T> {
    /// Wrap `items`
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> From<Vec<T>> for VecCollection<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: Entity> Collection for VecCollection<T> {
    fn items(&self) -> Box<dyn Iterator<Item = &dyn Entity> + '_> {
        Box::new(self.items.iter().map(|item| item as &dyn Entity))
    }

    fn count(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

impl<T: Entity> Entity for VecCollection<T> {
    fn class_id(&self) -> ClassId {
        ClassId::of::<Self>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        Some(self)
    }
}

/// In-memory paginator with a fixed page size
#[derive(Debug)]
pub struct VecPaginator<T> {
    items: Vec<T>,
    page_size: usize,
    current_page: AtomicUsize,
}

impl<T> VecPaginator<T> {
    /// Paginate `items` in pages of `page_size` (at least 1), starting on page 1
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            page_size: page_size.max(1),
            current_page: AtomicUsize::new(1),
        }
    }

    /// Items per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Page the paginator is positioned on
    pub fn current_page(&self) -> usize {
        self.current_page.load(Ordering::Acquire)
    }
}

impl<T: Entity> Collection for VecPaginator<T> {
    fn items(&self) -> Box<dyn Iterator<Item = &dyn Entity> + '_> {
        Box::new(self.items.iter().map(|item| item as &dyn Entity))
    }

    fn count(&self) -> Option<usize> {
        Some(self.items.len())
    }

    fn as_paginator(&self) -> Option<&dyn Paginator> {
        Some(self)
    }
}

impl<T: Entity> Paginator for VecPaginator<T> {
    fn page_count(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    fn total_item_count(&self) -> usize {
        self.items.len()
    }

    fn set_current_page_number(&self, page: usize) {
        self.current_page.store(page, Ordering::Release);
    }

    fn current_items(&self) -> Box<dyn Iterator<Item = &dyn Entity> + '_> {
        let offset = self.current_page().saturating_sub(1) * self.page_size;
        Box::new(
            self.items
                .iter()
                .skip(offset)
                .take(self.page_size)
                .map(|item| item as &dyn Entity),
        )
    }
}

impl<T: Entity> Entity for VecPaginator<T> {
    fn class_id(&self) -> ClassId {
        ClassId::of::<Self>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        Some(self)
    }
}
