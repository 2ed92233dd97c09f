/// Implements [`ShallowEq`](crate::ShallowEq) for a struct by comparing the
/// listed fields one level deep.
///
/// Fields are matched pairwise with their own `ShallowEq` implementations, so
/// `Arc` fields compare by pointer identity and value-like fields by value.
///
/// ```
/// use std::sync::Arc;
/// use callflow::{impl_shallow_eq, ShallowEq};
///
/// #[derive(Clone)]
/// struct Query {
///     user: u64,
///     tags: Arc<Vec<String>>,
/// }
/// impl_shallow_eq!(Query { user, tags });
///
/// let tags = Arc::new(vec!["a".to_string()]);
/// let first = Query { user: 7, tags: tags.clone() };
/// let second = Query { user: 7, tags: tags.clone() };
/// assert!(first.shallow_eq(&second));
///
/// let rebuilt = Query { user: 7, tags: Arc::new(vec!["a".to_string()]) };
/// assert!(!first.shallow_eq(&rebuilt));
/// ```
#[macro_export]
macro_rules! impl_shallow_eq {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl $crate::ShallowEq for $ty {
            fn shallow_eq(&self, other: &Self) -> bool {
                $( $crate::ShallowEq::shallow_eq(&self.$field, &other.$field) )&&+
            }
        }
    };
}
