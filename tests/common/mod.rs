// Instrumented key types shared by the integration suites.
//
// `A` is the stored key. It wraps a String and counts, per thread, how it
// was built: from an owned String (the buffer is moved), from a borrowed
// String (copied), from a &str, or by Clone. `B` is a key substitute that
// `A` cannot be built from directly; `BtoA` decomposes it. `HashA` and
// `EqualA` cover A, String, str and B, so all four are lookup arguments.
#![allow(dead_code)]

use dense_hashmap::{key_substitute, Extract, KeyEq, KeyHash};
use hashbrown::hash_map::DefaultHashBuilder;
use std::cell::Cell;
use std::hash::BuildHasher;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub ctor: usize,
    pub copy_ctor: usize,
    pub str_ctor: usize,
    pub str_copy: usize,
    pub str_move: usize,
}

impl Counts {
    pub const ZERO: Counts = Counts {
        ctor: 0,
        copy_ctor: 0,
        str_ctor: 0,
        str_copy: 0,
        str_move: 0,
    };
}

thread_local! {
    static COUNTS: Cell<Counts> = const { Cell::new(Counts::ZERO) };
}

fn bump(f: impl FnOnce(&mut Counts)) {
    COUNTS.with(|c| {
        let mut v = c.get();
        f(&mut v);
        c.set(v);
    });
}

pub fn reset() {
    COUNTS.with(|c| c.set(Counts::ZERO));
}

pub fn counts() -> Counts {
    COUNTS.with(Cell::get)
}

/// Constructions of any kind since the last reset.
pub fn constructed() -> usize {
    let c = counts();
    c.ctor + c.copy_ctor
}

#[derive(Debug, PartialEq, Eq)]
pub struct A(String);

impl A {
    pub fn str(&self) -> &str {
        &self.0
    }
}

impl Clone for A {
    fn clone(&self) -> A {
        bump(|c| {
            c.copy_ctor += 1;
            c.str_copy += 1;
        });
        A(self.0.clone())
    }
}

impl From<String> for A {
    fn from(s: String) -> A {
        bump(|c| {
            c.ctor += 1;
            c.str_move += 1;
        });
        A(s)
    }
}

impl From<&String> for A {
    fn from(s: &String) -> A {
        bump(|c| {
            c.ctor += 1;
            c.str_copy += 1;
        });
        A(s.clone())
    }
}

impl From<&str> for A {
    fn from(s: &str) -> A {
        bump(|c| {
            c.ctor += 1;
            c.str_ctor += 1;
        });
        A(s.to_owned())
    }
}

pub struct B {
    s: String,
}

impl B {
    pub fn new(s: &str) -> B {
        B { s: s.to_owned() }
    }

    pub fn string(&self) -> &String {
        &self.s
    }

    pub fn into_string(self) -> String {
        self.s
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BtoA;

impl Extract<B> for BtoA {
    type Parts = String;

    fn extract(&self, b: B) -> String {
        b.into_string()
    }
}

impl<'a> Extract<&'a B> for BtoA {
    type Parts = &'a String;

    fn extract(&self, b: &'a B) -> &'a String {
        b.string()
    }
}

key_substitute!(A: ref str => direct);
key_substitute!(A: String => direct);
key_substitute!(A: B => extract);

#[derive(Clone, Debug, Default)]
pub struct HashA {
    build: DefaultHashBuilder,
}

impl HashA {
    fn hash_str(&self, s: &str) -> u64 {
        self.build.hash_one(s)
    }
}

impl KeyHash<A> for HashA {
    fn hash_key(&self, a: &A) -> u64 {
        self.hash_str(&a.0)
    }
}

impl KeyHash<String> for HashA {
    fn hash_key(&self, s: &String) -> u64 {
        self.hash_str(s)
    }
}

impl KeyHash<str> for HashA {
    fn hash_key(&self, s: &str) -> u64 {
        self.hash_str(s)
    }
}

impl KeyHash<B> for HashA {
    fn hash_key(&self, b: &B) -> u64 {
        self.hash_str(&b.s)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EqualA;

impl KeyEq<A, A> for EqualA {
    fn key_eq(&self, probe: &A, stored: &A) -> bool {
        probe.0 == stored.0
    }
}

impl KeyEq<String, A> for EqualA {
    fn key_eq(&self, probe: &String, stored: &A) -> bool {
        *probe == stored.0
    }
}

impl KeyEq<str, A> for EqualA {
    fn key_eq(&self, probe: &str, stored: &A) -> bool {
        probe == stored.0
    }
}

impl KeyEq<B, A> for EqualA {
    fn key_eq(&self, probe: &B, stored: &A) -> bool {
        probe.s == stored.0
    }
}

pub fn a(s: &str) -> A {
    A(s.to_owned())
}
