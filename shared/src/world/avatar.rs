use crate::{
    constants::{MAP_WIDTH, PLAYFIELD_MAX, PLAYFIELD_MIN},
    types::AvatarId,
    world::bitmap::Bitmap,
};

/// A cell position on the playfield. `+y` is up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: GridPos = GridPos::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn in_bounds(&self) -> bool {
        (PLAYFIELD_MIN..PLAYFIELD_MAX).contains(&self.x)
            && (PLAYFIELD_MIN..PLAYFIELD_MAX).contains(&self.y)
    }

    /// Tilemap cell under this position, if it is on the playfield
    pub fn cell(&self) -> Option<usize> {
        if !self.in_bounds() {
            return None;
        }
        let column = (self.x - PLAYFIELD_MIN) as usize;
        let row = (self.y - PLAYFIELD_MIN) as usize;
        Some(row * MAP_WIDTH + column)
    }

    pub fn distance_squared(&self, other: &GridPos) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Avatar {
    pub id: AvatarId,
    pub source: GridPos,
    pub destination: GridPos,
    /// Step animation progress in `[0, 1]`
    pub progress: f32,
    pub appearance: Bitmap,
}

impl Avatar {
    pub fn new(id: AvatarId, position: GridPos) -> Self {
        Self {
            id,
            source: position,
            destination: position,
            progress: 1.0,
            appearance: Bitmap::new(),
        }
    }

    pub fn at_rest(&self) -> bool {
        self.source == self.destination
    }

    /// Starts a step from the current destination towards `destination`
    pub fn begin_step(&mut self, destination: GridPos) {
        self.source = self.destination;
        self.destination = destination;
        self.progress = 0.0;
    }

    /// Advances the step animation; returns `true` on arrival
    pub fn advance(&mut self, amount: f32) -> bool {
        if self.at_rest() {
            return false;
        }

        self.progress = (self.progress + amount).min(1.0);
        if self.progress >= 1.0 {
            self.source = self.destination;
            return true;
        }
        false
    }
}
