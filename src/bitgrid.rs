//! A dynamically sized bit grid.
//!
//! Cells are packed row-major (`idx = y * width + x`) into words of the
//! unsigned integer type `T`. Unlike a fixed-size bitboard the dimensions are
//! chosen at runtime, so any board shape fits.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign};
use core::{any, mem};
use num_traits::{PrimInt, Unsigned, Zero};
use thiserror::Error;

/// Errors returned by bit grid operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitGridError {
    /// Column or row index is outside `[0..width) × [0..height)`.
    #[error("IndexOutOfBounds: x={x}, y={y}")]
    IndexOutOfBounds { x: usize, y: usize },
    /// Two grids of different shapes were combined.
    #[error("DimensionMismatch: {left:?} vs {right:?}")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}

/// A `width × height` set of cells stored in words of `T`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitGrid<T = u64>
where
    T: PrimInt + Unsigned + Zero,
{
    width: usize,
    height: usize,
    words: Vec<T>,
}

impl<T> BitGrid<T>
where
    T: PrimInt + Unsigned + Zero,
{
    const WORD_BITS: usize = mem::size_of::<T>() * 8;

    /// Create an empty grid (all bits cleared).
    pub fn new(width: usize, height: usize) -> Self {
        let cells = width * height;
        let n_words = cells.div_ceil(Self::WORD_BITS);
        BitGrid {
            width,
            height,
            words: vec![T::zero(); n_words],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn locate(&self, x: usize, y: usize) -> (usize, usize) {
        let idx = y * self.width + x;
        (idx / Self::WORD_BITS, idx % Self::WORD_BITS)
    }

    #[inline]
    fn check_bounds(&self, x: usize, y: usize) -> Result<(), BitGridError> {
        if self.in_bounds(x, y) {
            Ok(())
        } else {
            Err(BitGridError::IndexOutOfBounds { x, y })
        }
    }

    fn check_shape(&self, other: &Self) -> Result<(), BitGridError> {
        if self.width == other.width && self.height == other.height {
            Ok(())
        } else {
            Err(BitGridError::DimensionMismatch {
                left: (self.width, self.height),
                right: (other.width, other.height),
            })
        }
    }

    /// Gets the bit at (x, y).
    pub fn get(&self, x: usize, y: usize) -> Result<bool, BitGridError> {
        self.check_bounds(x, y)?;
        Ok(self.contains(x, y))
    }

    /// Like [`BitGrid::get`] but treats out-of-bounds cells as cleared.
    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let (w, b) = self.locate(x, y);
        ((self.words[w] >> b) & T::one()) != T::zero()
    }

    /// Sets the bit at (x, y).
    pub fn set(&mut self, x: usize, y: usize) -> Result<(), BitGridError> {
        self.check_bounds(x, y)?;
        let (w, b) = self.locate(x, y);
        self.words[w] = self.words[w] | (T::one() << b);
        Ok(())
    }

    /// Clears the bit at (x, y).
    pub fn clear(&mut self, x: usize, y: usize) -> Result<(), BitGridError> {
        self.check_bounds(x, y)?;
        let (w, b) = self.locate(x, y);
        self.words[w] = self.words[w] & !(T::one() << b);
        Ok(())
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| w.is_zero())
    }

    /// True when both grids share at least one set cell.
    pub fn intersects(&self, other: &Self) -> Result<bool, BitGridError> {
        self.check_shape(other)?;
        Ok(self
            .words
            .iter()
            .zip(other.words.iter())
            .any(|(a, b)| !(*a & *b).is_zero()))
    }

    /// True when every set cell of `self` is also set in `other`.
    pub fn is_subset_of(&self, other: &Self) -> Result<bool, BitGridError> {
        self.check_shape(other)?;
        Ok(self
            .words
            .iter()
            .zip(other.words.iter())
            .all(|(a, b)| (*a & !*b).is_zero()))
    }

    /// Creates a grid from an iterator over `(x, y)` positions.
    pub fn from_cells<I>(width: usize, height: usize, iter: I) -> Result<Self, BitGridError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut grid = Self::new(width, height);
        for (x, y) in iter {
            grid.set(x, y)?;
        }
        Ok(grid)
    }

    /// Iterator over the set cells in row-major order.
    pub fn iter_set_bits(&self) -> SetBits<'_, T> {
        SetBits { grid: self, idx: 0 }
    }
}

impl<T> fmt::Debug for BitGrid<T>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "BitGrid<{}> {}x{}:",
            any::type_name::<T>(),
            self.width,
            self.height
        )?;
        writeln!(f, "{}", self)
    }
}

impl<T> fmt::Display for BitGrid<T>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let bit = if self.contains(x, y) { '■' } else { '□' };
                write!(f, "{} ", bit)?;
            }
            if y + 1 < self.height {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Iterator over the set cells of a [`BitGrid`], yielding `(x, y)`.
#[derive(Clone, Copy)]
pub struct SetBits<'a, T>
where
    T: PrimInt + Unsigned + Zero,
{
    grid: &'a BitGrid<T>,
    idx: usize,
}

impl<'a, T> Iterator for SetBits<'a, T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let bits = BitGrid::<T>::WORD_BITS;
        let area = self.grid.area();
        while self.idx < area {
            let idx = self.idx;
            let word = self.grid.words[idx / bits];
            // skip whole empty words
            if idx % bits == 0 && word.is_zero() {
                self.idx += bits;
                continue;
            }
            self.idx += 1;
            if ((word >> (idx % bits)) & T::one()) != T::zero() {
                return Some((idx % self.grid.width, idx / self.grid.width));
            }
        }
        None
    }
}

/// Bitwise AND of two equally shaped grids.
impl<T> BitAnd for &BitGrid<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = BitGrid<T>;

    fn bitand(self, rhs: Self) -> BitGrid<T> {
        debug_assert_eq!((self.width, self.height), (rhs.width, rhs.height));
        BitGrid {
            width: self.width,
            height: self.height,
            words: self
                .words
                .iter()
                .zip(rhs.words.iter())
                .map(|(a, b)| *a & *b)
                .collect(),
        }
    }
}

/// Bitwise OR of two equally shaped grids.
impl<T> BitOr for &BitGrid<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = BitGrid<T>;

    fn bitor(self, rhs: Self) -> BitGrid<T> {
        let mut out = self.clone();
        out |= rhs;
        out
    }
}

impl<T> BitOrAssign<&BitGrid<T>> for BitGrid<T>
where
    T: PrimInt + Unsigned + Zero,
{
    fn bitor_assign(&mut self, rhs: &BitGrid<T>) {
        debug_assert_eq!((self.width, self.height), (rhs.width, rhs.height));
        for (a, b) in self.words.iter_mut().zip(rhs.words.iter()) {
            *a = *a | *b;
        }
    }
}
