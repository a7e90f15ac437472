use std::fmt;

/// A field name bound to the accessor that reads it.
pub struct Field<R, V: ?Sized> {
    name: &'static str,
    get: fn(&R) -> &V,
}

impl<R, V: ?Sized> Field<R, V> {
    pub const fn new(name: &'static str, get: fn(&R) -> &V) -> Self {
        Field { name, get }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn get<'r>(&self, record: &'r R) -> &'r V {
        (self.get)(record)
    }
}

/// Like [`Field`] for a field that may be unset.
pub struct OptionalField<R, V: ?Sized> {
    name: &'static str,
    get: fn(&R) -> Option<&V>,
}

impl<R, V: ?Sized> OptionalField<R, V> {
    pub const fn new(name: &'static str, get: fn(&R) -> Option<&V>) -> Self {
        OptionalField { name, get }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn get<'r>(&self, record: &'r R) -> Option<&'r V> {
        (self.get)(record)
    }
}

// Manual impls: derives would demand `R: Clone`.
impl<R, V: ?Sized> Clone for Field<R, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, V: ?Sized> Copy for Field<R, V> {}

impl<R, V: ?Sized> Clone for OptionalField<R, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, V: ?Sized> Copy for OptionalField<R, V> {}

impl<R, V: ?Sized> fmt::Debug for Field<R, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

impl<R, V: ?Sized> fmt::Debug for OptionalField<R, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OptionalField").field(&self.name).finish()
    }
}
