// Copyright (c) 2026 rezky_nightky

use crate::canvas::Size;
use crate::element::CreationInput;

/// Fixed-length, ordered set of elements. An element's index is its id for
/// the whole session.
#[derive(Clone, Debug)]
pub struct Population<E> {
    elements: Vec<E>,
}

impl<E> Population<E> {
    pub fn create<R, F>(space: Size, count: usize, rng: &mut R, mut factory: F) -> Self
    where
        F: FnMut(CreationInput, &mut R) -> E,
    {
        let mut elements = Vec::with_capacity(count);
        for id in 0..count {
            elements.push(factory(CreationInput { id, space }, rng));
        }
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, id: usize) -> Option<&E> {
        self.elements.get(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.elements.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, E> {
        self.elements.iter_mut()
    }
}
