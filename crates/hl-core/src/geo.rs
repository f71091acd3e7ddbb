//! World geometry: integer block cells and continuous positions.
//!
//! Sites live on integer cells (`BlockPos`) so they can be hashed and used as
//! blacklist keys.  Agents move continuously (`WorldPos`).  The `y` axis is
//! vertical; horizontal distance is measured on `x`/`z`.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

// ── BlockPos ──────────────────────────────────────────────────────────────────

/// An integer world cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Centre of the cell as a continuous point.
    #[inline]
    pub fn center(self) -> WorldPos {
        WorldPos::new(self.x as f32 + 0.5, self.y as f32 + 0.5, self.z as f32 + 0.5)
    }

    /// Bottom-centre of the cell (where a walking agent stands).
    #[inline]
    pub fn bottom_center(self) -> WorldPos {
        WorldPos::new(self.x as f32 + 0.5, self.y as f32, self.z as f32 + 0.5)
    }

    /// `true` if `self` lies inside the box of half-extents `horizontal`
    /// (on `x` and `z`) and `vertical` (on `y`) centred on `center`.
    #[inline]
    pub fn within_box(self, center: BlockPos, horizontal: i32, vertical: i32) -> bool {
        let h = horizontal.max(0).unsigned_abs();
        let v = vertical.max(0).unsigned_abs();
        self.x.abs_diff(center.x) <= h
            && self.y.abs_diff(center.y) <= v
            && self.z.abs_diff(center.z) <= h
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// Parses the `Display` form `[x, y, z]`, or bare `x y z` / `x,y,z`.
impl FromStr for BlockPos {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s.trim();
        let inner = inner
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(inner);
        let parts: Vec<&str> = inner
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        let [x, y, z] = parts.as_slice() else {
            return Err(CoreError::Parse(format!("expected three coordinates, got {s:?}")));
        };
        let coord = |v: &str| {
            v.parse::<i32>()
                .map_err(|e| CoreError::Parse(format!("bad coordinate {v:?} in {s:?}: {e}")))
        };
        Ok(BlockPos::new(coord(*x)?, coord(*y)?, coord(*z)?))
    }
}

// ── WorldPos ──────────────────────────────────────────────────────────────────

/// A continuous world position stored as single-precision floats.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPos {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The cell containing this point.
    #[inline]
    pub fn block(self) -> BlockPos {
        BlockPos::new(self.x.floor() as i32, self.y.floor() as i32, self.z.floor() as i32)
    }

    /// Squared Euclidean distance.  Order-preserving, so used for ranking.
    #[inline]
    pub fn distance_sq(self, other: WorldPos) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    #[inline]
    pub fn distance(self, other: WorldPos) -> f32 {
        self.distance_sq(other).sqrt()
    }

    /// Linear interpolation towards `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: WorldPos, t: f32) -> WorldPos {
        let t = t.clamp(0.0, 1.0);
        WorldPos::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }
}

impl fmt::Display for WorldPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}
