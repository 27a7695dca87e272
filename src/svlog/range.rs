// Copyright (c) 2016-2021 Fabian Schuiki

//! Bit ranges of declarations.
//!
//! A declared range `[left:right]` may be written in either direction. This
//! module converts between the indices a user writes and zero-based offsets
//! counted from the least or most significant end of the range.

use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// A declared bit range `[left:right]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RangeView {
    /// The left bound, which is always the most significant bit.
    pub left: isize,
    /// The right bound, which is always the least significant bit.
    pub right: isize,
}

/// Which side is greater in a range `[a:b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RangeDir {
    /// `a < b`
    Up,
    /// `a >= b`
    Down,
}

/// The direction of an indexed part-select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartSelectMode {
    /// `[base +: width]`
    Up,
    /// `[base -: width]`
    Down,
}

impl RangeView {
    /// Create a range from its left and right bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use velab_svlog::range::{RangeDir, RangeView};
    ///
    /// let a = RangeView::new(7, 0);
    /// let b = RangeView::new(0, 7);
    ///
    /// assert_eq!(a.dir(), RangeDir::Down);
    /// assert_eq!(b.dir(), RangeDir::Up);
    /// assert_eq!(format!("{}", a), "[7:0]");
    /// assert_eq!(format!("{}", b), "[0:7]");
    /// ```
    pub fn new(left: isize, right: isize) -> RangeView {
        RangeView { left, right }
    }

    /// Create the range `[size-1:0]`.
    pub fn with_size(size: usize) -> RangeView {
        RangeView::new(size as isize - 1, 0)
    }

    /// The number of bits in the range.
    ///
    /// # Example
    ///
    /// ```
    /// use velab_svlog::range::RangeView;
    ///
    /// assert_eq!(RangeView::new(7, 0).size(), 8);
    /// assert_eq!(RangeView::new(0, 7).size(), 8);
    /// assert_eq!(RangeView::new(-2, 2).size(), 5);
    /// ```
    pub fn size(&self) -> usize {
        ((self.left - self.right).abs() + 1) as usize
    }

    /// Check whether the left bound is the greater one.
    pub fn is_big_endian(&self) -> bool {
        self.left >= self.right
    }

    /// Return the direction of the range.
    pub fn dir(&self) -> RangeDir {
        if self.is_big_endian() {
            RangeDir::Down
        } else {
            RangeDir::Up
        }
    }

    /// The index of the most significant bit.
    pub fn msb(&self) -> isize {
        self.left
    }

    /// The index of the least significant bit.
    pub fn lsb(&self) -> isize {
        self.right
    }

    /// Check whether an index lies within the range.
    pub fn contains(&self, index: isize) -> bool {
        if self.is_big_endian() {
            self.right <= index && index <= self.left
        } else {
            self.left <= index && index <= self.right
        }
    }

    /// Compute the offset of an index from the least significant bit.
    ///
    /// Returns `None` if the index lies outside the range.
    ///
    /// # Example
    ///
    /// ```
    /// use velab_svlog::range::RangeView;
    ///
    /// assert_eq!(RangeView::new(7, 0).offset_from_lsb(3), Some(3));
    /// assert_eq!(RangeView::new(0, 7).offset_from_lsb(3), Some(4));
    /// assert_eq!(RangeView::new(7, 0).offset_from_lsb(8), None);
    /// ```
    pub fn offset_from_lsb(&self, index: isize) -> Option<usize> {
        if !self.contains(index) {
            return None;
        }
        Some(if self.is_big_endian() {
            (index - self.right) as usize
        } else {
            (self.right - index) as usize
        })
    }

    /// Compute the offset of an index from the most significant bit.
    ///
    /// Returns `None` if the index lies outside the range.
    pub fn offset_from_msb(&self, index: isize) -> Option<usize> {
        if !self.contains(index) {
            return None;
        }
        Some(if self.is_big_endian() {
            (self.left - index) as usize
        } else {
            (index - self.left) as usize
        })
    }

    /// Compute the index at an offset from the least significant bit.
    ///
    /// Panics if the offset is not smaller than the size of the range.
    pub fn index_from_lsb_offset(&self, offset: usize) -> isize {
        self.check_offset(offset);
        if self.is_big_endian() {
            self.lsb() + offset as isize
        } else {
            self.lsb() - offset as isize
        }
    }

    /// Compute the index at an offset from the most significant bit.
    ///
    /// Panics if the offset is not smaller than the size of the range.
    pub fn index_from_msb_offset(&self, offset: usize) -> isize {
        self.check_offset(offset);
        if self.is_big_endian() {
            self.msb() - offset as isize
        } else {
            self.msb() + offset as isize
        }
    }

    fn check_offset(&self, offset: usize) {
        if offset >= self.size() {
            bug!("offset {} outside of range {} of size {}", offset, self, self.size());
        }
    }

    /// Convert an indexed part-select into explicit `(left, right)` indices.
    ///
    /// The resulting pair follows the direction of this range, such that
    /// `[base +: width]` on a range `[7:0]` becomes `[base+width-1:base]`,
    /// and on a range `[0:7]` becomes `[base:base+width-1]`. Panics if
    /// `width` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use velab_svlog::range::{PartSelectMode, RangeView};
    ///
    /// let big = RangeView::new(15, 0);
    /// assert_eq!(big.indexed_part_select(8, 4, PartSelectMode::Up), (11, 8));
    /// assert_eq!(big.indexed_part_select(8, 4, PartSelectMode::Down), (8, 5));
    ///
    /// let little = RangeView::new(0, 15);
    /// assert_eq!(little.indexed_part_select(8, 4, PartSelectMode::Up), (8, 11));
    /// assert_eq!(little.indexed_part_select(8, 4, PartSelectMode::Down), (5, 8));
    /// ```
    pub fn indexed_part_select(
        &self,
        base: isize,
        width: usize,
        mode: PartSelectMode,
    ) -> (isize, isize) {
        if width == 0 {
            bug!("indexed part-select of zero width");
        }
        let span = width as isize - 1;
        match (self.is_big_endian(), mode) {
            (true, PartSelectMode::Up) => (base + span, base),
            (true, PartSelectMode::Down) => (base, base - span),
            (false, PartSelectMode::Up) => (base, base + span),
            (false, PartSelectMode::Down) => (base - span, base),
        }
    }

    /// Check whether `[left:right]` runs in the same direction as this range.
    ///
    /// Single-bit selects are compatible with either direction.
    pub fn is_same_order(&self, left: isize, right: isize) -> bool {
        left == right || (left > right) == self.is_big_endian()
    }
}

impl Display for RangeView {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}:{}]", self.left, self.right)
    }
}

/// The dimensions of an array declaration, such as `reg [7:0] mem [0:3][1:0]`.
///
/// Elements are laid out in row-major order: the first dimension is the most
/// significant, and within each dimension the left bound comes first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RangeArray {
    dims: Vec<RangeView>,
    elem_count: usize,
}

impl RangeArray {
    /// Create an array from its dimensions.
    pub fn new(dims: Vec<RangeView>) -> RangeArray {
        let elem_count = dims.iter().map(|d| d.size()).product();
        RangeArray { dims, elem_count }
    }

    /// The dimensions of the array.
    pub fn dims(&self) -> &[RangeView] {
        &self.dims
    }

    /// The number of dimensions.
    pub fn dim_count(&self) -> usize {
        self.dims.len()
    }

    /// The total number of elements.
    pub fn elem_count(&self) -> usize {
        self.elem_count
    }

    /// Compute the flat offset of an element.
    ///
    /// Returns `None` if the number of indices does not match the number of
    /// dimensions, or if any index is out of range.
    ///
    /// # Example
    ///
    /// ```
    /// use velab_svlog::range::{RangeArray, RangeView};
    ///
    /// let a = RangeArray::new(vec![RangeView::new(0, 3), RangeView::new(1, 0)]);
    /// assert_eq!(a.elem_count(), 8);
    /// assert_eq!(a.offset_of(&[0, 1]), Some(0));
    /// assert_eq!(a.offset_of(&[0, 0]), Some(1));
    /// assert_eq!(a.offset_of(&[3, 0]), Some(7));
    /// assert_eq!(a.offset_of(&[4, 0]), None);
    /// ```
    pub fn offset_of(&self, indices: &[isize]) -> Option<usize> {
        if indices.len() != self.dims.len() {
            return None;
        }
        let mut offset = 0;
        for (dim, &index) in self.dims.iter().zip(indices) {
            offset = offset * dim.size() + dim.offset_from_msb(index)?;
        }
        Some(offset)
    }

    /// Compute the indices of the element at a flat offset.
    ///
    /// Returns `None` if the offset is not smaller than the element count.
    pub fn indices_of(&self, offset: usize) -> Option<Vec<isize>> {
        if offset >= self.elem_count {
            return None;
        }
        let mut rest = offset;
        let mut indices = vec![0; self.dims.len()];
        for (dim, slot) in self.dims.iter().zip(indices.iter_mut()).rev() {
            *slot = dim.index_from_msb_offset(rest % dim.size());
            rest /= dim.size();
        }
        Some(indices)
    }
}

impl Display for RangeArray {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.dims.iter().format(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges() -> Vec<RangeView> {
        vec![
            RangeView::new(7, 0),
            RangeView::new(0, 7),
            RangeView::new(3, 3),
            RangeView::new(10, 5),
            RangeView::new(-4, 3),
            RangeView::new(2, -6),
        ]
    }

    #[test]
    fn round_trip() {
        for r in ranges() {
            for i in r.left.min(r.right)..=r.left.max(r.right) {
                let lsb = r.offset_from_lsb(i).unwrap();
                let msb = r.offset_from_msb(i).unwrap();
                assert_eq!(r.index_from_lsb_offset(lsb), i, "lsb of {} in {}", i, r);
                assert_eq!(r.index_from_msb_offset(msb), i, "msb of {} in {}", i, r);
            }
        }
    }

    #[test]
    fn offsets_are_complementary() {
        for r in ranges() {
            for i in r.left.min(r.right)..=r.left.max(r.right) {
                let sum = r.offset_from_lsb(i).unwrap() + r.offset_from_msb(i).unwrap();
                assert_eq!(sum, r.size() - 1);
            }
        }
    }

    #[test]
    fn both_directions() {
        let down = RangeView::new(7, 0);
        let up = RangeView::new(0, 7);
        assert_eq!(down.size(), 8);
        assert_eq!(up.size(), 8);
        assert_eq!(down.offset_from_lsb(3), Some(3));
        assert_eq!(up.offset_from_lsb(3), Some(4));
        assert_eq!(down.index_from_lsb_offset(3), 3);
        assert_eq!(up.index_from_lsb_offset(4), 3);
        assert_eq!((down.msb(), down.lsb()), (7, 0));
        assert_eq!((up.msb(), up.lsb()), (0, 7));
        assert_eq!(up.index_from_msb_offset(0), up.msb());
        assert_eq!(up.index_from_lsb_offset(0), up.lsb());
    }

    #[test]
    fn outside_indices() {
        for r in ranges() {
            let lo = r.left.min(r.right);
            let hi = r.left.max(r.right);
            assert!(!r.contains(lo - 1));
            assert!(!r.contains(hi + 1));
            assert_eq!(r.offset_from_lsb(hi + 1), None);
            assert_eq!(r.offset_from_msb(lo - 1), None);
        }
    }

    #[test]
    #[should_panic(expected = "outside of range")]
    fn lsb_offset_too_large() {
        RangeView::new(7, 0).index_from_lsb_offset(8);
    }

    #[test]
    #[should_panic(expected = "outside of range")]
    fn msb_offset_too_large() {
        RangeView::new(0, 3).index_from_msb_offset(4);
    }

    #[test]
    fn part_select_order() {
        let r = RangeView::new(7, 0);
        assert!(r.is_same_order(5, 2));
        assert!(r.is_same_order(3, 3));
        assert!(!r.is_same_order(2, 5));
        assert!(RangeView::new(0, 7).is_same_order(2, 5));
    }

    #[test]
    fn array_round_trip() {
        let a = RangeArray::new(vec![
            RangeView::new(0, 2),
            RangeView::new(3, 0),
            RangeView::new(-1, 0),
        ]);
        assert_eq!(a.elem_count(), 24);
        for offset in 0..a.elem_count() {
            let indices = a.indices_of(offset).unwrap();
            assert_eq!(a.offset_of(&indices), Some(offset));
        }
        assert_eq!(a.indices_of(24), None);
        assert_eq!(a.offset_of(&[0, 0]), None);
        assert_eq!(format!("{}", a), "[0:2][3:0][-1:0]");
    }
}
