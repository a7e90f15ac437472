pub use self::field::{Field, OptionalField};
pub use self::value::Value;

pub mod field;
pub mod value;

/// A value with named fields that a [`Query`](crate::query::Query) can filter.
pub trait Record {
    /// Names of the fields present on this record, in declaration order.
    ///
    /// Unset optional fields are left out, so a query never sees them.
    fn field_names(&self) -> Vec<&str>;

    /// Indexed access by field name. `None` for unknown or unset fields.
    fn value(&self, field: &str) -> Option<Value>;
}

/// Records carrying a numeric id.
pub trait Identified {
    fn id(&self) -> u64;
}

/// One past the largest id in `items`, or `1` when there are none.
pub fn next_id<T: Identified>(items: &[T]) -> u64 {
    items.iter().fold(0, |max, item| item.id().max(max)) + 1
}

/// Implements [`Record`] for a struct of always-present fields, and adds
/// one [`Field`] key per field as an associated const named after it.
///
/// The keys take the visibility written before the type name.
#[macro_export]
macro_rules! impl_record {
    ($vis:vis $ty:ident { $($field:ident: $fty:ty),+ $(,)? }) => {
        impl $crate::record::Record for $ty {
            fn field_names(&self) -> Vec<&str> {
                vec![$(stringify!($field)),+]
            }

            fn value(&self, field: &str) -> Option<$crate::record::Value> {
                match field {
                    $(stringify!($field) => Some($crate::record::Value::from(self.$field.clone())),)+
                    _ => None,
                }
            }
        }

        #[allow(dead_code, non_upper_case_globals)]
        impl $ty {
            $(
                $vis const $field: $crate::record::Field<$ty, $fty> =
                    $crate::record::Field::new(stringify!($field), |record: &$ty| &record.$field);
            )+
        }
    };
}
