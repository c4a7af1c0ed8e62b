use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
    NorthEast,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
        Direction::NorthEast,
    ];

    pub const fn unit(self) -> CubeCoord {
        match self {
            Direction::East => CubeCoord::new(1, -1, 0),
            Direction::SouthEast => CubeCoord::new(0, -1, 1),
            Direction::SouthWest => CubeCoord::new(-1, 0, 1),
            Direction::West => CubeCoord::new(-1, 1, 0),
            Direction::NorthWest => CubeCoord::new(0, 1, -1),
            Direction::NorthEast => CubeCoord::new(1, 0, -1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CubeCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CubeCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn add(self, other: CubeCoord) -> Self {
        CubeCoord::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub const fn scale(self, factor: i32) -> Self {
        CubeCoord::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn neighbor(self, direction: Direction) -> Self {
        self.add(direction.unit())
    }

    pub fn distance(self, other: CubeCoord) -> i32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()) / 2
    }
}

impl Default for CubeCoord {
    fn default() -> Self {
        CubeCoord::new(0, 0, 0)
    }
}

/// Coordinates of a hexagonal board with `layers` rings around the centre,
/// ring by ring. Each ring starts East of the centre and walks clockwise.
pub fn spiral(layers: i32) -> Vec<CubeCoord> {
    let mut coords = vec![CubeCoord::default()];
    // Walking directions for one ring once the cursor sits on its East corner.
    const WALK: [Direction; 6] = [
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
    ];
    for ring in 1..=layers {
        let mut cursor = Direction::East.unit().scale(ring);
        for direction in WALK {
            for _ in 0..ring {
                coords.push(cursor);
                cursor = cursor.neighbor(direction);
            }
        }
    }
    coords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spiral_covers_standard_board() {
        let coords = spiral(2);
        assert_eq!(coords.len(), 19);
        let unique: std::collections::HashSet<_> = coords.iter().collect();
        assert_eq!(unique.len(), 19);
        assert!(coords.iter().all(|c| c.x + c.y + c.z == 0));
        assert!(coords.iter().all(|c| c.distance(CubeCoord::default()) <= 2));
    }

    #[test]
    fn spiral_rings_are_contiguous() {
        let coords = spiral(2);
        // Every tile after the first ring entry touches the one before it.
        for window in coords[2..7].windows(2) {
            assert_eq!(window[0].distance(window[1]), 1);
        }
        for window in coords[8..19].windows(2) {
            assert_eq!(window[0].distance(window[1]), 1);
        }
    }
}
