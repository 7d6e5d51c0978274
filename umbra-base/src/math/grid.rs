use alloc::boxed::Box;
use core::fmt;
use core::ops::{Deref, DerefMut};

use crate::math::{GridCoordinate, GridIter, GridPoint, GridRect};

/// Y-major ordering: linearly adjacent elements have adjacent Y coordinates.
///
/// `[0, 0], [0, 1], [0, 2], ..., [1, 0], [1, 1], ...`
///
/// Use this type with [`Grid`] to store planar data in this order.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[expect(clippy::exhaustive_structs)]
pub struct YMaj;

/// Type for planar data stored in a slice: one element per cell of a [`GridRect`].
///
/// * `C` is some slice container type, e.g. `&[T]`, `&mut [T]`, or `Box<[T]>`.
/// * `O` specifies the choice of linearization.
///   Currently, only one choice exists, [`YMaj`].
///
/// In addition to the data, each [`Grid`] stores the [`GridRect`] defining its extent;
/// the container's length must be equal to the area of that rectangle.
///
/// Transparency samples, diagonal-blocking flags, floor passability, and the light fields
/// written by the casting functions are all stored in [`Grid`]s.
/// A cast reads and writes through borrowed forms (`Grid<&[T]>`, `Grid<&mut [T]>`),
/// obtained with [`Grid::as_ref()`] and [`Grid::as_mut()`],
/// so that the caller owns and reuses the storage.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Grid<C, O = YMaj> {
    /// Invariant: `bounds` has an area that is at most [`usize::MAX`].
    bounds: GridRect,
    ordering: O,
    /// Invariant: `contents.deref().len()` equals `bounds.area()`.
    contents: C,
}

/// Constructors from linear containers.
impl<C, O: Default, V> Grid<C, O>
where
    C: Deref<Target = [V]>,
{
    /// Constructs a `Grid<C>` containing the provided elements, which must be in the
    /// ordering specified by `O`.
    ///
    /// Returns a [`GridLengthError`] if the number of elements does not match
    /// [`bounds.area()`](GridRect::area).
    #[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
    pub fn from_elements(
        bounds: GridRect,
        elements: impl Into<C>,
    ) -> Result<Self, GridLengthError> {
        let elements = elements.into();
        if Some(elements.len()) == bounds.area() {
            Ok(Grid {
                bounds,
                ordering: O::default(),
                contents: elements,
            })
        } else {
            Err(GridLengthError {
                input_length: elements.len(),
                bounds,
            })
        }
    }
}

/// Constructors from elements not already stored linearly.
#[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
impl<C, V> Grid<C, YMaj>
where
    // Note that the Deref bound is necessary to give this a unique `V`.
    C: Deref<Target = [V]> + FromIterator<V>,
{
    /// Constructs a `Grid<C>` by using the provided function to compute a value
    /// for each cell.
    ///
    /// Panics if `bounds` has an area exceeding `usize::MAX`.
    /// (But there will likely be a memory allocation failure well below that point.)
    #[inline]
    pub fn from_fn<F>(bounds: GridRect, f: F) -> Self
    where
        F: FnMut(GridPoint) -> V,
    {
        assert!(
            bounds.area().is_some(),
            "{bounds:?} is too large to be linearized"
        );
        Grid {
            bounds,
            ordering: YMaj,
            contents: bounds.iter_cells().map(f).collect(),
        }
    }

    /// Constructs a `Grid<C>` by cloning the provided value for each cell.
    #[inline]
    pub fn repeat(bounds: GridRect, value: V) -> Self
    where
        V: Clone,
    {
        Self::from_fn(bounds, |_| value.clone())
    }

    /// Constructs a grid from nested Rust arrays in \[Y\]\[X\] order, that is, written as rows
    /// the way a map is drawn, with `[0][0]` at the north-west corner.
    /// The result's lower bounds are `origin`.
    ///
    /// Note: The current implementation requires that `V` implement [`Clone`], and will
    /// clone each element once.
    #[doc(hidden)] // used by tests to draw fixtures
    #[expect(clippy::needless_pass_by_value)]
    pub fn from_row_arrays<const W: usize, const H: usize>(
        origin: impl Into<GridPoint>,
        rows: [[V; W]; H],
    ) -> Self
    where
        V: Clone,
    {
        let origin = origin.into();
        let bounds = GridRect::from_lower_size(origin, [W as u32, H as u32]);
        Self::from_fn(bounds, |p| {
            let offset = p - origin;
            rows[offset.y as usize][offset.x as usize].clone()
        })
    }
}

impl<C, O> Grid<C, O> {
    /// Returns the [`GridRect`] specifying the bounds of this grid.
    #[inline]
    pub fn bounds(&self) -> GridRect {
        self.bounds
    }

    /// Returns the area, also known as the number of elements.
    #[inline]
    pub fn area(&self) -> usize {
        let size = self.bounds.size();
        // This will not overflow, as an invariant of the `Grid` type.
        size.width as usize * size.height as usize
    }
}

impl<C> Grid<C, YMaj> {
    /// Iterate over all cells that this contains, in the order of the linearization,
    /// without including the stored data.
    #[inline]
    pub fn iter_cells(&self) -> GridIter {
        self.bounds.iter_cells()
    }

    /// Determines whether a cell lies within this grid and, if it does, returns the
    /// linearized slice index into it.
    ///
    /// ```
    /// # extern crate umbra_base as umbra;
    /// use umbra::math::{Grid, GridPoint, GridRect};
    ///
    /// let grid = Grid::<Box<[()]>>::repeat(GridRect::from_lower_size([0, 0], [10, 10]), ());
    ///
    /// assert_eq!(grid.index(GridPoint::new(0, 0)), Some(0));
    /// assert_eq!(grid.index(GridPoint::new(1, 2)), Some(12));
    /// assert_eq!(grid.index(GridPoint::new(9, 9)), Some(99));
    /// assert_eq!(grid.index(GridPoint::new(0, -1)), None);
    /// assert_eq!(grid.index(GridPoint::new(10, 0)), None);
    /// ```
    #[inline(always)] // very hot code
    pub fn index(&self, cell: GridPoint) -> Option<usize> {
        let sizes = self.bounds.size();

        // This might overflow and wrap, but if it does, the result will still be out
        // of bounds, just in the other direction, because wrapping subtraction is an
        // injective mapping of integers, and every in-bounds maps to in-bounds, so
        // every out-of-bounds must also map to out-of-bounds.
        let lower = self.bounds.lower_bounds();
        let dx = cell.x.wrapping_sub(lower.x);
        let dy = cell.y.wrapping_sub(lower.y);

        // Bounds check, expressed as a single unsigned comparison per axis.
        if (dx as u32 >= sizes.width) | (dy as u32 >= sizes.height) {
            return None;
        }

        // Cannot overflow: both offsets are nonnegative and less than the sizes, and the
        // area fits in usize.
        Some((dx as usize).wrapping_mul(sizes.height as usize).wrapping_add(dy as usize))
    }

    /// Inverse of [`Grid::index()`]: returns the cell stored at a linear index.
    ///
    /// The result is unspecified if `index` is not less than [`Grid::area()`].
    #[inline]
    pub fn cell_at_index(&self, index: usize) -> GridPoint {
        let height = self.bounds.size().height as usize;
        let lower = self.bounds.lower_bounds();
        if height == 0 {
            return lower;
        }
        GridPoint::new(
            lower.x.wrapping_add((index / height) as GridCoordinate),
            lower.y.wrapping_add((index % height) as GridCoordinate),
        )
    }
}

/// Linear data access.
#[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
impl<C, O, V> Grid<C, O>
where
    C: Deref<Target = [V]>,
    O: Copy,
{
    /// Return a [`Grid`] that borrows the contents of this one.
    pub fn as_ref(&self) -> Grid<&[V], O> {
        Grid {
            bounds: self.bounds,
            ordering: self.ordering,
            contents: self.as_linear(),
        }
    }

    /// Return a [`Grid`] that mutably borrows the contents of this one.
    pub fn as_mut(&mut self) -> Grid<&mut [V], O>
    where
        C: DerefMut,
    {
        Grid {
            bounds: self.bounds,
            ordering: self.ordering,
            contents: self.as_linear_mut(),
        }
    }

    /// Returns the linear contents viewed as a slice.
    pub fn as_linear(&self) -> &[V] {
        let s = &*self.contents;
        debug_assert_eq!(s.len(), self.area());
        s
    }

    /// Returns the linear contents viewed as a mutable slice.
    pub fn as_linear_mut(&mut self) -> &mut [V]
    where
        C: DerefMut,
    {
        let area = self.area();
        let s = &mut *self.contents;
        debug_assert_eq!(s.len(), area);
        s
    }

    /// Overwrites every element with `value`, reusing the existing storage.
    pub fn fill(&mut self, value: V)
    where
        C: DerefMut,
        V: Clone,
    {
        self.as_linear_mut().fill(value);
    }
}

impl<'a, V> Grid<&'a [V], YMaj> {
    /// Returns the element at `position` of this grid, or [`None`] if `position` is out
    /// of bounds.
    ///
    /// This differs from [`Self::get()`] in that it inherits the lifetime of the container
    /// reference, rather than reborrowing. It is therefore only available for `Grid<&'a [V]>`.
    #[inline]
    pub fn get_ref(&self, position: impl Into<GridPoint>) -> Option<&'a V> {
        let index = self.index(position.into())?;
        Some(&self.contents[index])
    }
}

/// Element lookup operations by 2D coordinates.
#[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
impl<C, V> Grid<C, YMaj>
where
    C: Deref<Target = [V]>,
{
    /// Returns the element at `position` of this grid, or [`None`] if `position` is out
    /// of bounds.
    #[inline]
    pub fn get(&self, position: impl Into<GridPoint>) -> Option<&V> {
        let index = self.index(position.into())?;
        Some(&self.as_linear()[index])
    }

    /// Returns a mutable reference to the element at `position` of this grid,
    /// or [`None`] if `position` is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, position: impl Into<GridPoint>) -> Option<&mut V>
    where
        C: DerefMut,
    {
        let index = self.index(position.into())?;
        Some(&mut self.as_linear_mut()[index])
    }

    /// Iterates over all the cells and values in this grid, in the ordering specified
    /// by the `O` type parameter.
    pub fn iter<'s>(&'s self) -> impl Iterator<Item = (GridPoint, &'s V)> + Clone
    where
        V: 's,
    {
        self.iter_cells().zip(self.as_linear().iter())
    }

    /// Iterates by mutable reference over all the cells and values in this grid,
    /// in the ordering specified by the `O` type parameter.
    pub fn iter_mut<'s>(&'s mut self) -> impl Iterator<Item = (GridPoint, &'s mut V)>
    where
        C: DerefMut,
        V: 's,
    {
        self.iter_cells().zip(self.as_linear_mut().iter_mut())
    }
}

#[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
impl<V, O> Grid<Box<[V]>, O> {
    /// Apply `f` to each element and collect the results into the same shape and ordering.
    pub fn map<T, F>(self, f: F) -> Grid<Box<[T]>, O>
    where
        F: FnMut(V) -> T,
    {
        Grid {
            bounds: self.bounds,
            ordering: self.ordering,
            contents: self.contents.into_iter().map(f).collect(),
        }
    }
}

#[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
impl<C: fmt::Debug, O: fmt::Debug> fmt::Debug for Grid<C, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            bounds,
            ordering,
            contents,
        } = self;

        let mut ds = f.debug_struct(&format!(
            "Grid<{contents_type}, {ordering:?}>",
            contents_type = core::any::type_name::<C>(),
        ));
        ds.field("bounds", &bounds);
        let area = self.area();
        if area > 32 {
            ds.field("contents", &format_args!("[...{area} elements]"));
        } else {
            ds.field("contents", &contents);
        }
        ds.finish()
    }
}

impl<P, C, V> core::ops::Index<P> for Grid<C, YMaj>
where
    P: Into<GridPoint>,
    C: Deref<Target = [V]>,
{
    type Output = V;

    /// Returns the element at `position` of this grid,
    /// or panics if `position` is out of bounds.
    ///
    /// Use [`Grid::get()`] for a non-panicking alternative.
    #[inline(always)]
    fn index(&self, position: P) -> &Self::Output {
        let position: GridPoint = position.into();
        if let Some(index) = self.index(position) {
            &self.contents[index]
        } else {
            panic!(
                "position {:?} out of Grid bounds {:?}",
                position, self.bounds
            )
        }
    }
}
impl<P, C, V> core::ops::IndexMut<P> for Grid<C, YMaj>
where
    P: Into<GridPoint>,
    C: DerefMut<Target = [V]>,
{
    /// Returns the element at `position` of this grid,
    /// or panics if `position` is out of bounds.
    #[inline(always)]
    fn index_mut(&mut self, position: P) -> &mut Self::Output {
        let position: GridPoint = position.into();
        if let Some(index) = self.index(position) {
            &mut self.contents[index]
        } else {
            panic!(
                "position {:?} out of Grid bounds {:?}",
                position, self.bounds
            )
        }
    }
}

/// Error from [`Grid::from_elements()`] being given the wrong length.
#[derive(Clone, Copy, Debug, Eq, PartialEq, displaydoc::Display)]
#[displaydoc("data of length {input_length} cannot fill {bounds:?}")]
pub struct GridLengthError {
    /// The length of the linear data.
    input_length: usize,
    /// The attempted bounds, whose area is either unequal to `input_length` or overflowing.
    bounds: GridRect,
}

impl core::error::Error for GridLengthError {}
