/// Axis-aligned bounding boxes and pairwise hit resolution.

use crate::entities::{Body, Bullet, Enemy, Player};

/// Rectangle with its origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Aabb { x, y, width, height }
    }
}

/// True iff both axis intervals overlap strictly.  Touching edges do not count.
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Anything that occupies a box on the playfield.
pub trait Collider {
    fn aabb(&self) -> Aabb;

    fn collides_with(&self, other: &impl Collider) -> bool
    where
        Self: Sized,
    {
        overlaps(&self.aabb(), &other.aabb())
    }
}

impl Collider for Aabb {
    fn aabb(&self) -> Aabb {
        *self
    }
}

impl Collider for Body {
    fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

impl Collider for Player {
    fn aabb(&self) -> Aabb {
        self.body.aabb()
    }
}

impl Collider for Enemy {
    fn aabb(&self) -> Aabb {
        self.body.aabb()
    }
}

impl Collider for Bullet {
    fn aabb(&self) -> Aabb {
        self.body.aabb()
    }
}

/// Indices consumed by bullet ↔ enemy hits.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hits {
    /// `(bullet, enemy)` pairs in resolution order.
    pub pairs: Vec<(usize, usize)>,
}

impl Hits {
    pub fn bullet_used(&self, index: usize) -> bool {
        self.pairs.iter().any(|&(b, _)| b == index)
    }

    pub fn enemy_killed(&self, index: usize) -> bool {
        self.pairs.iter().any(|&(_, e)| e == index)
    }
}

/// Pair bullets with enemies, mark-and-skip: bullets are scanned in pool
/// order and each takes the first enemy it overlaps that no earlier bullet
/// has already claimed.  A bullet kills at most one enemy and an enemy dies
/// at most once.
pub fn bullet_hits(bullets: &[Bullet], enemies: &[Enemy]) -> Hits {
    let mut hits = Hits::default();
    for (bi, bullet) in bullets.iter().enumerate() {
        for (ei, enemy) in enemies.iter().enumerate() {
            if !hits.enemy_killed(ei) && bullet.collides_with(enemy) {
                hits.pairs.push((bi, ei));
                break;
            }
        }
    }
    hits
}

/// Indices of enemies currently touching the player.
pub fn player_hits(player: &Player, enemies: &[Enemy]) -> Vec<usize> {
    enemies
        .iter()
        .enumerate()
        .filter(|(_, enemy)| player.collides_with(*enemy))
        .map(|(i, _)| i)
        .collect()
}
