// Copyright (c) 2018-2021 Fabian Schuiki

//! Multi-type arena allocation

#![deny(missing_docs)]

pub use typed_arena::Arena as TypedArena;

/// Allocates objects.
pub trait Alloc<'a, 't, T> {
    /// Allocate an object of type `T`.
    fn alloc(&'a self, value: T) -> &'t mut T;
}

/// Generate a collection of arenas for different types.
///
/// # Example
///
/// ```
/// #[macro_use]
/// extern crate velab_common;
/// use velab_common::arenas::Alloc;
///
/// make_arenas!(
///     pub struct Arenas {
///         ints: u32,
///         names: String,
///     }
/// );
///
/// # fn main() {
/// let arenas = Arenas::new();
/// let a: &mut u32 = arenas.alloc(42);
/// let b: &mut String = arenas.alloc("foo".to_string());
/// assert_eq!(*a, 42);
/// assert_eq!(b, "foo");
/// # }
/// ```
#[macro_export]
macro_rules! make_arenas {
    ($(#[$arena_attr:meta])* pub struct $arena_name:ident { $($name:ident: $type:ty,)* }) => {
        $crate::make_arenas!{ IMPL $($arena_attr),*; $arena_name; []; $($name: $type,)* }
    };

    ($(#[$arena_attr:meta])* pub struct $arena_name:ident<$($lt:tt),+> { $($name:ident: $type:ty,)* }) => {
        $crate::make_arenas!{ IMPL $($arena_attr),*; $arena_name; [$($lt),+]; $($name: $type,)* }
    };

    (IMPL $($arena_attr:meta),*; $arena_name:ident; [$($lt:tt),*]; $($name:ident: $type:ty,)*) => {
        $(#[$arena_attr])*
        #[allow(missing_docs)]
        pub struct $arena_name<$($lt),*> {
            $(pub $name: $crate::arenas::TypedArena<$type>,)*
        }

        $crate::make_arenas!(STRUCT_IMPL $arena_name; [$($lt),*]; $($name: $type,)*);
    };

    (STRUCT_IMPL $arena_name:ident; [$($lt:tt),*]; $($name:ident: $type:ty,)*) => {
        impl<$($lt),*> $arena_name<$($lt),*> {
            /// Create a new arena.
            pub fn new() -> $arena_name<$($lt),*> {
                $arena_name {
                    $($name: $crate::arenas::TypedArena::new(),)*
                }
            }
        }

        impl<$($lt),*> Default for $arena_name<$($lt),*> {
            fn default() -> $arena_name<$($lt),*> {
                $arena_name::new()
            }
        }

        $crate::make_arenas!(TRAIT_IMPL $arena_name; [$($lt),*]; $($name: $type,)*);
    };

    (TRAIT_IMPL $arena_name:ident; [$($lt:tt),*]; $name:ident: $type:ty, $($tail_name:ident: $tail_type:ty,)*) => {
        impl<'a, $($lt),*> $crate::arenas::Alloc<'a, 'a, $type> for $arena_name<$($lt),*> where $($lt: 'a),* {
            fn alloc(&'a self, value: $type) -> &'a mut $type {
                self.$name.alloc(value)
            }
        }

        $crate::make_arenas!(TRAIT_IMPL $arena_name; [$($lt),*]; $($tail_name: $tail_type,)*);
    };

    (TRAIT_IMPL $arena_name:ident; [$($lt:tt),*];) => {}
}
