/// Builds a [`Values`](crate::Values) bag from any number of raw strings.
///
/// ```
/// use handover::values;
///
/// assert_eq!(values!["hello", "world"].len(), 2);
/// assert!(values![].is_empty());
/// ```
#[macro_export]
macro_rules! values {
    () => {
        $crate::Values::none()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Values::new([$(::std::string::String::from($value)),+])
    };
}

/// Defines a struct together with its [`Record`](crate::Record)
/// implementation.
///
/// Fields opt into sources with `#[from(source = "key", ...)]`, placed
/// after any doc comments. Only annotated fields are walked, and of those
/// only fields with a visibility qualifier are ever written.
///
/// ```
/// use handover::{record, Sources, Values};
///
/// record! {
///     #[derive(Debug, Default)]
///     pub struct Paging {
///         /// Page to show.
///         #[from(query = "page", header = "x-page")]
///         pub page: u32,
///         pub untouched: u32,
///     }
/// }
///
/// let mut paging = Paging::default();
/// Sources::new()
///     .with("query", |_| Ok(Values::from("4")))
///     .populate(&mut paging)?;
/// assert_eq!(paging.page, 4);
/// # Ok::<(), handover::Error>(())
/// ```
#[macro_export]
macro_rules! record {
    (@annotations ($($source:ident = $key:literal),* $(,)?)) => {
        &[$((::std::stringify!($source), $key)),*]
    };

    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                $(#[from $annotations:tt])?
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            fn fields(&mut self) -> ::std::vec::Vec<$crate::Field<'_>> {
                ::std::vec![
                    $($(
                        $crate::Field::new(
                            ::std::stringify!($field),
                            !::std::stringify!($field_vis).is_empty(),
                            $crate::record!(@annotations $annotations),
                            &mut self.$field,
                        ),
                    )?)*
                ]
            }
        }
    };
}

/// Implements [`Coerce`](crate::Coerce) for composite types that are
/// decoded from a JSON document, so fields can hold them directly.
///
/// ```
/// use handover::{impl_coerce_json, Coerce};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Filter {
///     status: String,
/// }
///
/// impl_coerce_json!(Filter);
///
/// let filter = Filter::coerce(&[r#"{"status":"open"}"#.to_string()])?;
/// assert_eq!(filter.status, "open");
/// # Ok::<(), handover::CoerceError>(())
/// ```
#[macro_export]
macro_rules! impl_coerce_json {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Coerce for $ty {
                const KIND: $crate::Kind = $crate::Kind::Json;

                fn coerce(
                    raw: &[::std::string::String],
                ) -> ::std::result::Result<Self, $crate::CoerceError> {
                    $crate::coerce::decode_json(raw)
                }
            }
        )+
    };
}
