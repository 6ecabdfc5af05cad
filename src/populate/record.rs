use std::fmt;

use crate::coerce::Slot;

/// `(source name, lookup key)` pairs declared on a field.
pub type Annotations = &'static [(&'static str, &'static str)];

/// One walkable field of a destination record.
pub struct Field<'a> {
    name: &'static str,
    settable: bool,
    annotations: Annotations,
    slot: &'a mut dyn Slot,
}

impl<'a> Field<'a> {
    pub fn new(
        name: &'static str,
        settable: bool,
        annotations: Annotations,
        slot: &'a mut dyn Slot,
    ) -> Self {
        Self {
            name,
            settable,
            annotations,
            slot,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the field is public and may be written by a population pass.
    pub fn is_settable(&self) -> bool {
        self.settable
    }

    pub fn annotations(&self) -> Annotations {
        self.annotations
    }

    /// The lookup key this field declares for `source`, if any.
    pub fn key_for(&self, source: &str) -> Option<&'static str> {
        self.annotations
            .iter()
            .find(|(name, _)| *name == source)
            .map(|(_, key)| *key)
    }

    pub fn slot(&mut self) -> &mut dyn Slot {
        &mut *self.slot
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("settable", &self.settable)
            .field("annotations", &self.annotations)
            .field("type", &self.slot.type_name())
            .finish()
    }
}

/// A structured record whose fields can be populated from sources.
///
/// Usually implemented through [`record!`](crate::record). Hand-written
/// implementations return their annotated fields in declaration order:
///
/// ```
/// use handover::{Field, Record};
///
/// struct Paging {
///     page: u32,
/// }
///
/// impl Record for Paging {
///     fn fields(&mut self) -> Vec<Field<'_>> {
///         vec![Field::new("page", true, &[("query", "page")], &mut self.page)]
///     }
/// }
/// ```
pub trait Record {
    fn fields(&mut self) -> Vec<Field<'_>>;
}

impl<R: Record + ?Sized> Record for &mut R {
    fn fields(&mut self) -> Vec<Field<'_>> {
        (**self).fields()
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn fields(&mut self) -> Vec<Field<'_>> {
        (**self).fields()
    }
}

/// Something a population pass can target. `None` is the absent
/// destination and is rejected.
pub trait Destination {
    fn record(&mut self) -> Option<&mut dyn Record>;
}

impl<R: Record> Destination for &mut R {
    fn record(&mut self) -> Option<&mut dyn Record> {
        Some(&mut **self)
    }
}

impl<R: Record> Destination for Option<&mut R> {
    fn record(&mut self) -> Option<&mut dyn Record> {
        match self {
            Some(record) => Some(&mut **record),
            None => None,
        }
    }
}
