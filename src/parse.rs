//! Parsing of cycle notation.
//!
//! A permutation is written as a sequence of parenthesized, comma separated cycles, e.g.
//! `(1,3)(2,4)`. Whitespace between tokens is ignored. Points not mentioned are fixed and the
//! degree of the result is the largest point mentioned, or 1 if there is none, so `()` and the
//! empty string both denote the identity of degree 1. Cycles do not need to be disjoint; they are
//! composed from left to right.
//!
//! The result stores one image per point up to the largest point mentioned, so a short input
//! naming a huge point, like `(4000000000)`, allocates that many images.
use std::str::FromStr;

use ahash::AHashMap;

use crate::error::{Error, Result};
use crate::perm::Perm;
use crate::Point;

impl<T: Point> FromStr for Perm<T> {
    type Err = Error;

    fn from_str(text: &str) -> Result<Perm<T>> {
        let cycles = Parser::<T>::new(text).cycles()?;

        let degree = cycles.iter().flatten().copied().max().unwrap_or(1);

        let mut images: Vec<T> = (1..=degree).map(T::from_point).collect();
        // preimages of the points moved so far, 0-based; other points are their own preimage
        let mut inverse: AHashMap<usize, usize> = AHashMap::new();
        let mut preimages = vec![];

        for cycle in cycles.iter() {
            preimages.clear();
            preimages.extend(cycle.iter().map(|&point| {
                inverse.get(&(point - 1)).copied().unwrap_or(point - 1)
            }));
            for (j, &preimage) in preimages.iter().enumerate() {
                let next = cycle[(j + 1) % cycle.len()];
                images[preimage] = T::from_point(next);
                inverse.insert(next - 1, preimage);
            }
        }

        Ok(Perm::from_images(images))
    }
}

struct Parser<'a, T> {
    text: &'a [u8],
    pos: usize,
    point: std::marker::PhantomData<T>,
}

impl<'a, T: Point> Parser<'a, T> {
    fn new(text: &'a str) -> Self {
        Parser {
            text: text.as_bytes(),
            pos: 0,
            point: std::marker::PhantomData,
        }
    }

    fn error(&self, reason: &'static str) -> Error {
        Error::InvalidCycleSyntax {
            position: self.pos,
            reason,
        }
    }

    fn peek(&mut self) -> Option<u8> {
        while let Some(c) = self.text.get(self.pos) {
            if c.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                return Some(*c);
            }
        }
        None
    }

    fn expect(&mut self, c: u8, reason: &'static str) -> Result<()> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(reason))
        }
    }

    fn cycles(mut self) -> Result<Vec<Vec<usize>>> {
        let mut cycles = vec![];
        while self.peek().is_some() {
            cycles.push(self.cycle()?);
        }
        Ok(cycles)
    }

    fn cycle(&mut self) -> Result<Vec<usize>> {
        self.expect(b'(', "expected `(`")?;
        let mut cycle = vec![];
        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok(cycle);
        }
        loop {
            let start = self.pos;
            let point = self.point()?;
            if cycle.contains(&point) {
                self.pos = start;
                return Err(self.error("point repeated within a cycle"));
            }
            cycle.push(point);

            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    return Ok(cycle);
                }
                Some(c) if c.is_ascii_digit() => {
                    return Err(self.error("expected `,` between points"))
                }
                Some(_) => return Err(self.error("expected `,` or `)`")),
                None => return Err(self.error("unclosed cycle")),
            }
        }
    }

    fn point(&mut self) -> Result<usize> {
        match self.peek() {
            Some(c) if c.is_ascii_digit() => {}
            _ => return Err(self.error("expected a point")),
        }
        let start = self.pos;
        let mut value: usize = 0;
        while let Some(&c) = self.text.get(self.pos) {
            if !c.is_ascii_digit() {
                break;
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(usize::from(c - b'0')))
                .ok_or_else(|| self.error("point too large"))?;
            self.pos += 1;
        }
        if value == 0 {
            self.pos = start;
            return Err(self.error("points start at 1"));
        }
        if T::from_usize(value).is_none() {
            self.pos = start;
            return Err(self.error("point does not fit the point type"));
        }
        Ok(value)
    }
}
