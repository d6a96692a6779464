//! Key materialization: turning an insertion argument into the stored key.
//!
//! Every inserting operation takes an argument `A: KeyArg<K, X>`. The
//! table first probes with `A::probe()`, a borrowed view hashed and
//! compared through the equivalence policies, so nothing of type `K` is
//! built for the lookup. Only on a miss does it call
//! [`KeyArg::materialize`], exactly once, to obtain the `K` to store.
//!
//! How an argument becomes a `K` is fixed per argument type at compile
//! time by the [`ConstructionPlan`] its impl declares:
//!
//! - `PassThrough`: the argument is a `K` and is moved into the slot.
//! - `Direct`: `K` is built from the argument with one `From` conversion.
//! - `ViaExtractor`: the table's extractor `X` first decomposes the
//!   argument into the parts `K` is built from. Owned substitutes are
//!   decomposed by value (parts are moved out), borrowed ones by
//!   reference (parts are borrowed and copied by `K::from`).
//!
//! `K` gets `PassThrough` automatically and `&K` gets `Direct` (a clone)
//! when `K: Clone`. Other substitutes are registered with
//! [`key_substitute!`](crate::key_substitute); register a type as
//! `direct` whenever `K` has a `From` impl for it, and as `extract` only
//! when it does not, so the cheapest plan is the one used.
//!
//! A type that merely converts into `K` but is not in the equivalence set
//! cannot be probed without building a `K` first. The containers expose
//! that path separately as `emplace_converted`, which builds the key
//! eagerly and drops it again on a hit.

/// How an insertion argument is turned into the stored key type.
///
/// Variants are declared cheapest first, so `Ord` ranks plans by cost.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ConstructionPlan {
    PassThrough,
    Direct,
    ViaExtractor,
}

/// An argument accepted by inserting operations of a table storing `K`
/// with extractor `X`.
pub trait KeyArg<K, X = NoExtractor>: Sized {
    /// The type the lookup phase hashes and compares.
    type Probe: ?Sized;

    const PLAN: ConstructionPlan;

    fn probe(&self) -> &Self::Probe;

    /// Build the key. Called at most once, after a lookup miss.
    fn materialize(self, extractor: &X) -> K;
}

/// Decomposes a key substitute `Q` into the arguments `K::from` needs.
///
/// Implement it twice per substitute type `S`: for `S` (move the owned
/// parts out) and for `&'a S` (borrow them).
pub trait Extract<Q> {
    type Parts;

    fn extract(&self, substitute: Q) -> Self::Parts;
}

/// Extractor of tables that accept substitutes for lookup only.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NoExtractor;

impl<K, X> KeyArg<K, X> for K {
    type Probe = K;
    const PLAN: ConstructionPlan = ConstructionPlan::PassThrough;

    #[inline]
    fn probe(&self) -> &K {
        self
    }

    #[inline]
    fn materialize(self, _extractor: &X) -> K {
        self
    }
}

impl<'a, K: Clone, X> KeyArg<K, X> for &'a K {
    type Probe = K;
    const PLAN: ConstructionPlan = ConstructionPlan::Direct;

    #[inline]
    fn probe(&self) -> &K {
        self
    }

    #[inline]
    fn materialize(self, _extractor: &X) -> K {
        self.clone()
    }
}

impl<'a, X> KeyArg<String, X> for &'a str {
    type Probe = str;
    const PLAN: ConstructionPlan = ConstructionPlan::Direct;

    #[inline]
    fn probe(&self) -> &str {
        self
    }

    #[inline]
    fn materialize(self, _extractor: &X) -> String {
        String::from(self)
    }
}

/// Register a key substitute type for insertion.
///
/// `key_substitute!(Key: Sub => direct)` makes `Sub` and `&Sub` insertion
/// arguments built with `Key::from(sub)` / `Key::from(&sub)`.
///
/// `key_substitute!(Key: Sub => extract)` makes them arguments built with
/// `Key::from(x.extract(sub))` / `Key::from(x.extract(&sub))`, where `x` is
/// the table's extractor; such tables must use an extractor implementing
/// `Extract<Sub>` and `Extract<&Sub>`.
///
/// `key_substitute!(Key: ref Sub => direct)` registers only `&Sub`, which
/// is how unsized substitutes such as `str` are added.
///
/// Lookup with `&Sub` additionally needs the table's hash and equality
/// policies to cover `Sub`.
///
/// ```
/// use dense_hashmap::{key_substitute, ConstructionPlan, KeyArg};
///
/// #[derive(Clone, PartialEq, Eq, Hash)]
/// struct Id(u64);
/// struct Raw(u64);
/// impl From<Raw> for Id {
///     fn from(r: Raw) -> Id { Id(r.0) }
/// }
/// impl From<&Raw> for Id {
///     fn from(r: &Raw) -> Id { Id(r.0) }
/// }
/// key_substitute!(Id: Raw => direct);
///
/// assert_eq!(<Raw as KeyArg<Id>>::PLAN, ConstructionPlan::Direct);
/// ```
#[macro_export]
macro_rules! key_substitute {
    ($key:ty : ref $sub:ty => direct) => {
        impl<'a, X> $crate::KeyArg<$key, X> for &'a $sub {
            type Probe = $sub;
            const PLAN: $crate::ConstructionPlan = $crate::ConstructionPlan::Direct;

            #[inline]
            fn probe(&self) -> &$sub {
                *self
            }

            #[inline]
            fn materialize(self, _extractor: &X) -> $key {
                <$key>::from(self)
            }
        }
    };
    ($key:ty : $sub:ty => direct) => {
        impl<X> $crate::KeyArg<$key, X> for $sub {
            type Probe = $sub;
            const PLAN: $crate::ConstructionPlan = $crate::ConstructionPlan::Direct;

            #[inline]
            fn probe(&self) -> &$sub {
                self
            }

            #[inline]
            fn materialize(self, _extractor: &X) -> $key {
                <$key>::from(self)
            }
        }

        impl<'a, X> $crate::KeyArg<$key, X> for &'a $sub {
            type Probe = $sub;
            const PLAN: $crate::ConstructionPlan = $crate::ConstructionPlan::Direct;

            #[inline]
            fn probe(&self) -> &$sub {
                *self
            }

            #[inline]
            fn materialize(self, _extractor: &X) -> $key {
                <$key>::from(self)
            }
        }
    };
    ($key:ty : $sub:ty => extract) => {
        impl<X> $crate::KeyArg<$key, X> for $sub
        where
            X: $crate::Extract<$sub>,
            $key: ::core::convert::From<<X as $crate::Extract<$sub>>::Parts>,
        {
            type Probe = $sub;
            const PLAN: $crate::ConstructionPlan = $crate::ConstructionPlan::ViaExtractor;

            #[inline]
            fn probe(&self) -> &$sub {
                self
            }

            #[inline]
            fn materialize(self, extractor: &X) -> $key {
                <$key>::from($crate::Extract::<$sub>::extract(extractor, self))
            }
        }

        impl<'a, X> $crate::KeyArg<$key, X> for &'a $sub
        where
            X: $crate::Extract<&'a $sub>,
            $key: ::core::convert::From<<X as $crate::Extract<&'a $sub>>::Parts>,
        {
            type Probe = $sub;
            const PLAN: $crate::ConstructionPlan = $crate::ConstructionPlan::ViaExtractor;

            #[inline]
            fn probe(&self) -> &$sub {
                *self
            }

            #[inline]
            fn materialize(self, extractor: &X) -> $key {
                <$key>::from($crate::Extract::<&'a $sub>::extract(extractor, self))
            }
        }
    };
}
