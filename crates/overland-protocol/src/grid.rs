use serde::{Deserialize, Serialize};

use crate::{Direction, MapCoord, Plane};

/// Dense `[plane][y][x]` storage shared by the snapshot and every output grid.
///
/// Cells are stored plane-major, then row-major, so iteration order is stable
/// and matches the nested-array layout produced by [`PlaneGrid::to_nested`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaneGrid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T> PlaneGrid<T> {
    pub fn new(width: u32, height: u32, fill: T) -> Self
    where
        T: Clone,
    {
        let len = Self::expected_len_for(width, height);
        Self {
            width,
            height,
            cells: vec![fill; len],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(MapCoord) -> T) -> Self {
        let len = Self::expected_len_for(width, height);
        let mut cells = Vec::with_capacity(len);
        for plane in Plane::ALL {
            for y in 0..height {
                for x in 0..width {
                    cells.push(f(MapCoord::new(plane, x, y)));
                }
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Wraps caller-provided storage. Returns `None` if the length does not
    /// match `2 × width × height`.
    pub fn from_raw(width: u32, height: u32, cells: Vec<T>) -> Option<Self> {
        if cells.len() != Self::expected_len_for(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    fn expected_len_for(width: u32, height: u32) -> usize {
        Plane::COUNT * (width as usize) * (height as usize)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn expected_len(&self) -> usize {
        Self::expected_len_for(self.width, self.height)
    }

    /// Deserialized grids may carry a cell vector that disagrees with their
    /// dimensions; everything else in this type assumes they agree.
    pub fn is_well_formed(&self) -> bool {
        self.cells.len() == self.expected_len()
    }

    pub fn same_shape<U>(&self, other: &PlaneGrid<U>) -> bool {
        self.width == other.width && self.height == other.height && self.len() == other.len()
    }

    pub fn contains(&self, coord: MapCoord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    pub fn index_of(&self, coord: MapCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let plane_len = (self.width as usize) * (self.height as usize);
        let index = coord.plane.index() * plane_len
            + (coord.y as usize) * (self.width as usize)
            + coord.x as usize;
        (index < self.cells.len()).then_some(index)
    }

    pub fn coord_at(&self, index: usize) -> Option<MapCoord> {
        if index >= self.cells.len() || self.width == 0 || self.height == 0 {
            return None;
        }
        let plane_len = (self.width as usize) * (self.height as usize);
        let plane = Plane::from_index(index / plane_len)?;
        let rem = index % plane_len;
        let x = (rem % self.width as usize) as u32;
        let y = (rem / self.width as usize) as u32;
        Some(MapCoord::new(plane, x, y))
    }

    /// The cell reached by moving one step in `direction`. With
    /// `wrap_horizontal` the x-axis is cyclic; the y-axis never wraps.
    /// `PlaneShift` lands on the same (x, y) of the other plane.
    pub fn step(
        &self,
        coord: MapCoord,
        direction: Direction,
        wrap_horizontal: bool,
    ) -> Option<MapCoord> {
        if !self.contains(coord) {
            return None;
        }
        if direction == Direction::PlaneShift {
            return Some(coord.across());
        }

        let width = i64::from(self.width);
        let height = i64::from(self.height);
        let (dx, dy) = direction.offset();

        let y = i64::from(coord.y) + dy;
        if y < 0 || y >= height {
            return None;
        }

        let mut x = i64::from(coord.x) + dx;
        if wrap_horizontal {
            x = x.rem_euclid(width);
        } else if x < 0 || x >= width {
            return None;
        }

        Some(MapCoord::new(coord.plane, x as u32, y as u32))
    }

    pub fn get(&self, coord: MapCoord) -> Option<&T> {
        self.index_of(coord).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, coord: MapCoord) -> Option<&mut T> {
        self.index_of(coord).map(move |i| &mut self.cells[i])
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Cells with their coordinates, in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (MapCoord, &T)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| self.coord_at(i).map(|c| (c, cell)))
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> PlaneGrid<U> {
        PlaneGrid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// `[plane][y][x]` nested vectors for callers that index legacy arrays.
    pub fn to_nested(&self) -> Vec<Vec<Vec<T>>>
    where
        T: Clone,
    {
        let width = self.width as usize;
        let height = self.height as usize;
        let plane_len = width * height;
        (0..Plane::COUNT)
            .map(|p| {
                (0..height)
                    .map(|y| {
                        let start = p * plane_len + y * width;
                        self.cells
                            .get(start..start + width)
                            .map(<[T]>::to_vec)
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }
}
