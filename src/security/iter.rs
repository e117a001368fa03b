//! Lazy cursors over a context and its ancestors.
//!
//! A [`PropertyIterator`] walks the current context's own store in insertion
//! order, then continues into the parent's store, and so on up the chain.
//! The optional name filter is applied at every level, so a by-name walk
//! over a chained context yields the child's matches before the parent's.
//!
//! Iterators borrow the chain immutably and keep their cursor to
//! themselves: any number of them may run concurrently over the same
//! shared context.

use super::context::AuthContext;
use super::property::Property;
use core::fmt;
use core::iter::FusedIterator;

/// Cursor over the properties visible from a context.
///
/// Obtained from [`AuthContext::property_iterator`],
/// [`AuthContext::find_properties_by_name`] or [`AuthContext::peer_identity`].
/// Once exhausted it keeps returning `None`; call the constructor again to
/// restart.
#[derive(Clone)]
pub struct PropertyIterator<'a> {
    ctx: Option<&'a AuthContext>,
    index: usize,
    name: Option<&'a [u8]>,
}

impl<'a> PropertyIterator<'a> {
    /// An iterator that yields nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            ctx: None,
            index: 0,
            name: None,
        }
    }

    /// Every property of `ctx`, then of its ancestors.
    pub(crate) const fn all(ctx: &'a AuthContext) -> Self {
        Self {
            ctx: Some(ctx),
            index: 0,
            name: None,
        }
    }

    /// Properties named `name` in `ctx`, then in its ancestors.
    pub(crate) const fn by_name(ctx: &'a AuthContext, name: &'a [u8]) -> Self {
        Self {
            ctx: Some(ctx),
            index: 0,
            name: Some(name),
        }
    }

    /// Returns `true` if this iterator filters by property name.
    #[must_use]
    pub const fn is_filtered(&self) -> bool {
        self.name.is_some()
    }
}

impl Default for PropertyIterator<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> Iterator for PropertyIterator<'a> {
    type Item = &'a Property;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ctx) = self.ctx {
            let props = ctx.properties().as_slice();
            while let Some(prop) = props.get(self.index) {
                self.index += 1;
                match self.name {
                    Some(name) if !prop.has_name(name) => {}
                    _ => return Some(prop),
                }
            }
            self.ctx = ctx.parent().map(|parent| &**parent);
            self.index = 0;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let Some(ctx) = self.ctx else {
            return (0, Some(0));
        };
        let mut upper = ctx.properties().count().saturating_sub(self.index);
        let mut cur = ctx.parent();
        while let Some(parent) = cur {
            upper += parent.properties().count();
            cur = parent.parent();
        }
        if self.name.is_some() {
            (0, Some(upper))
        } else {
            (upper, Some(upper))
        }
    }
}

impl FusedIterator for PropertyIterator<'_> {}

impl fmt::Debug for PropertyIterator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyIterator")
            .field("exhausted", &self.ctx.is_none())
            .field("index", &self.index)
            .field("name", &self.name.map(String::from_utf8_lossy))
            .finish()
    }
}
