use rand::Rng;

/// Parameters for growing one polyomino.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeParams {
    pub width: usize,
    pub height: usize,
    pub min_cubes: usize,
    pub max_cubes: usize,
    /// Consecutive failed growth attempts tolerated before giving up.
    pub max_attempts: u32,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            width: 7,
            height: 4,
            min_cubes: 2,
            max_cubes: 4,
            max_attempts: 50,
        }
    }
}

/// A `width x height` occupancy grid; row 0 is the top row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl ShapeMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[self.idx(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            let i = self.idx(x, y);
            self.cells[i] = true;
        }
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Occupied cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get(x, y))
    }

    /// Free in-bounds cells sharing an edge with an occupied cell, each
    /// listed once.
    pub fn frontier(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for (x, y) in self.occupied() {
            let mut consider = |nx: usize, ny: usize| {
                let inside = nx < self.width && ny < self.height;
                if inside && !self.get(nx, ny) && !out.contains(&(nx, ny)) {
                    out.push((nx, ny));
                }
            };
            consider(x + 1, y);
            if x > 0 {
                consider(x - 1, y);
            }
            consider(x, y + 1);
            if y > 0 {
                consider(x, y - 1);
            }
        }
        out
    }

    /// 4-connectivity of the occupied cells (flood fill from the first one).
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.occupied().next() else {
            return true;
        };
        let mut seen = vec![false; self.cells.len()];
        let mut stack = vec![start];
        seen[self.idx(start.0, start.1)] = true;
        let mut reached = 0;
        while let Some((x, y)) = stack.pop() {
            reached += 1;
            let mut push = |nx: usize, ny: usize| {
                if self.get(nx, ny) && !seen[self.idx(nx, ny)] {
                    seen[self.idx(nx, ny)] = true;
                    stack.push((nx, ny));
                }
            };
            push(x + 1, y);
            push(x, y + 1);
            if x > 0 {
                push(x - 1, y);
            }
            if y > 0 {
                push(x, y - 1);
            }
        }
        reached == self.count()
    }
}

/// Grows a random polyomino from the top-middle cell.
pub fn generate_shape<R: Rng>(params: &ShapeParams, rng: &mut R) -> ShapeMask {
    let mut shape = ShapeMask::new(params.width, params.height);
    if params.width == 0 || params.height == 0 {
        return shape;
    }
    shape.set(params.width / 2, 0);

    let lo = params.min_cubes.max(1);
    let hi = params.max_cubes.max(lo);
    let target = rng.gen_range(lo..=hi);

    let mut added = 1;
    let mut attempts = 0;
    while added < target && attempts < params.max_attempts {
        attempts += 1;
        let frontier = shape.frontier();
        if frontier.is_empty() {
            continue;
        }
        let (x, y) = frontier[rng.gen_range(0..frontier.len())];
        shape.set(x, y);
        added += 1;
        attempts = 0;
    }
    log::debug!("generated shape with {} of {} cubes", added, target);
    shape
}
