//! The player character
//!
//! Platformer movement: horizontal acceleration with drag, a variable-height
//! jump, gravity capped at a terminal speed. Movement is resolved against the
//! tile grid one axis at a time, X first.
//!
//! `position` is the bottom-center of the sprite (the feet).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::tile::{TileCollision, TileGrid};
use crate::assets::{AssetProvider, TextureHandle};
use crate::consts::CHARACTER_FRAME_SIZE;
use crate::input::{Button, InputSource, horizontal_axis};
use crate::tuning::Tuning;

/// Overlaps thinner than this are contact, not penetration
const CONTACT_EPSILON: f32 = 0.01;

/// Collision box as a fraction of the sprite frame
const BOUNDS_WIDTH_FRACTION: f32 = 0.4;
const BOUNDS_HEIGHT_FRACTION: f32 = 0.8;

/// Below this horizontal speed the player counts as standing still
const RUN_THRESHOLD: f32 = 0.02;

/// Which way a character is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Player animation frames
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayerSprites {
    pub idle: TextureHandle,
    pub run: TextureHandle,
    pub jump: TextureHandle,
    pub die: TextureHandle,
}

impl PlayerSprites {
    pub fn load(assets: &mut impl AssetProvider) -> Self {
        Self {
            idle: assets.texture("Sprites/Player/Idle"),
            run: assets.texture("Sprites/Player/Run"),
            jump: assets.texture("Sprites/Player/Jump"),
            die: assets.texture("Sprites/Player/Die"),
        }
    }
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Bottom-center anchor
    pub position: Vec2,
    pub velocity: Vec2,
    alive: bool,
    on_ground: bool,
    /// Seconds of invincibility left
    power_up_time: f32,
    /// Area-clear trigger armed
    special: bool,
    facing: Facing,
    /// Enemy id that killed the player, `None` for falls or while alive
    killer: Option<u32>,
    size: Vec2,
    sprites: PlayerSprites,

    // Per-frame input
    movement: f32,
    is_jumping: bool,
    was_jumping: bool,
    jump_time: f32,
    previous_bottom: f32,
}

impl Player {
    pub fn new(start: Vec2, sprites: PlayerSprites) -> Self {
        Self {
            position: start,
            velocity: Vec2::ZERO,
            alive: true,
            on_ground: false,
            power_up_time: 0.0,
            special: false,
            facing: Facing::Right,
            killer: None,
            size: Vec2::new(
                CHARACTER_FRAME_SIZE * BOUNDS_WIDTH_FRACTION,
                CHARACTER_FRAME_SIZE * BOUNDS_HEIGHT_FRACTION,
            ),
            sprites,
            movement: 0.0,
            is_jumping: false,
            was_jumping: false,
            jump_time: 0.0,
            previous_bottom: start.y,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn is_powered_up(&self) -> bool {
        self.power_up_time > 0.0
    }

    pub fn power_up_time(&self) -> f32 {
        self.power_up_time
    }

    pub fn is_special(&self) -> bool {
        self.special
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn killer(&self) -> Option<u32> {
        self.killer
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::from_bottom_center(self.position, self.size)
    }

    /// Read input, tick the power-up, and move
    pub fn update(&mut self, dt: f32, input: &impl InputSource, grid: &TileGrid, tuning: &Tuning) {
        self.movement = horizontal_axis(input);
        self.is_jumping = input.is_down(Button::Jump);
        if self.movement > 0.0 {
            self.facing = Facing::Right;
        } else if self.movement < 0.0 {
            self.facing = Facing::Left;
        }

        if self.power_up_time > 0.0 {
            self.power_up_time = (self.power_up_time - dt).max(0.0);
        }

        self.apply_physics(dt, grid, tuning);

        // Input is consumed; a physics-only frame must not replay it
        self.movement = 0.0;
        self.is_jumping = false;
    }

    /// Integrate velocity and resolve against the grid
    pub fn apply_physics(&mut self, dt: f32, grid: &TileGrid, tuning: &Tuning) {
        let previous = self.position;

        self.velocity.x += self.movement * tuning.move_acceleration * dt;
        self.velocity.y = (self.velocity.y + tuning.gravity * dt)
            .clamp(-tuning.max_fall_speed, tuning.max_fall_speed);
        self.velocity.y = self.do_jump(self.velocity.y, dt, tuning);

        self.velocity.x *= if self.on_ground {
            tuning.ground_drag
        } else {
            tuning.air_drag
        };
        self.velocity.x = self.velocity.x.clamp(-tuning.max_move_speed, tuning.max_move_speed);

        self.position.x += self.velocity.x * dt;
        self.resolve_horizontal(grid);

        self.position.y += self.velocity.y * dt;
        self.resolve_vertical(grid);

        // Blocked axes lose their velocity
        if self.position.x == previous.x {
            self.velocity.x = 0.0;
        }
        if self.position.y == previous.y {
            self.velocity.y = 0.0;
        }
        self.previous_bottom = self.position.y;
    }

    /// Jump velocity curve: full launch at takeoff, fading as `jump_time`
    /// approaches the maximum. Releasing the button ends the ascent.
    fn do_jump(&mut self, velocity_y: f32, dt: f32, tuning: &Tuning) -> f32 {
        let mut velocity_y = velocity_y;
        if self.is_jumping {
            if (!self.was_jumping && self.on_ground) || self.jump_time > 0.0 {
                self.jump_time += dt;
            }
            if self.jump_time > 0.0 && self.jump_time <= tuning.max_jump_time {
                velocity_y = tuning.jump_launch_velocity
                    * (1.0 - (self.jump_time / tuning.max_jump_time).powf(tuning.jump_control_power));
            } else {
                self.jump_time = 0.0;
            }
        } else {
            self.jump_time = 0.0;
        }
        self.was_jumping = self.is_jumping;
        velocity_y
    }

    /// Push out of impassable tiles along X
    fn resolve_horizontal(&mut self, grid: &TileGrid) {
        let (x0, y0, x1, y1) = grid.cells_overlapping(&self.bounding_rect());
        for y in y0..=y1 {
            for x in x0..=x1 {
                if grid.collision_at(x, y) != TileCollision::Impassable {
                    continue;
                }
                let tile = grid.bounds_of(x, y);
                let bounds = self.bounding_rect();
                let Some(overlap) = bounds.overlap(&tile) else {
                    continue;
                };
                if overlap.y <= CONTACT_EPSILON {
                    continue;
                }
                let half_width = self.size.x / 2.0;
                let push_left = if self.velocity.x != 0.0 {
                    self.velocity.x > 0.0
                } else {
                    bounds.center().x < tile.center().x
                };
                self.position.x = if push_left {
                    tile.left - half_width
                } else {
                    tile.right() + half_width
                };
            }
        }
    }

    /// Land on floors and platforms, bump heads on ceilings
    fn resolve_vertical(&mut self, grid: &TileGrid) {
        self.on_ground = false;
        let (x0, y0, x1, y1) = grid.cells_overlapping(&self.bounding_rect());
        for y in y0..=y1 {
            for x in x0..=x1 {
                let collision = grid.collision_at(x, y);
                if collision == TileCollision::Passable {
                    continue;
                }
                let tile = grid.bounds_of(x, y);
                let Some(overlap) = self.bounding_rect().overlap(&tile) else {
                    continue;
                };
                if overlap.x <= CONTACT_EPSILON {
                    continue;
                }
                let falling = self.velocity.y >= 0.0;
                match collision {
                    TileCollision::Impassable if falling => self.land_on(tile.top),
                    TileCollision::Impassable => {
                        self.position.y = tile.bottom() + self.size.y;
                        self.velocity.y = 0.0;
                        self.jump_time = 0.0;
                    }
                    TileCollision::Platform
                        if falling && self.previous_bottom <= tile.top + CONTACT_EPSILON =>
                    {
                        self.land_on(tile.top)
                    }
                    _ => {}
                }
            }
        }
    }

    fn land_on(&mut self, top: f32) {
        self.position.y = top;
        self.velocity.y = 0.0;
        self.on_ground = true;
    }

    /// Die. Returns `false` if already dead.
    pub fn on_killed(&mut self, killer: Option<u32>) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.killer = killer;
        true
    }

    /// Back to life at `start` for a new attempt
    pub fn reset(&mut self, start: Vec2) {
        self.position = start;
        self.velocity = Vec2::ZERO;
        self.alive = true;
        self.on_ground = false;
        self.power_up_time = 0.0;
        self.special = false;
        self.killer = None;
        self.movement = 0.0;
        self.is_jumping = false;
        self.was_jumping = false;
        self.jump_time = 0.0;
        self.previous_bottom = start.y;
    }

    pub fn power_up(&mut self, secs: f32) {
        self.power_up_time = secs;
    }

    pub fn arm_special(&mut self) {
        self.special = true;
    }

    pub fn clear_special(&mut self) {
        self.special = false;
    }

    /// Current animation frame
    pub fn sprite(&self) -> TextureHandle {
        if !self.alive {
            self.sprites.die
        } else if !self.on_ground {
            self.sprites.jump
        } else if self.velocity.x.abs() > RUN_THRESHOLD {
            self.sprites.run
        } else {
            self.sprites.idle
        }
    }

    /// Alternates while powered up (drawn with a highlight tint)
    pub fn is_flashing(&self) -> bool {
        self.is_powered_up() && (self.power_up_time * 6.0) as i32 % 2 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::HandleTable;
    use crate::input::InputSnapshot;
    use crate::sim::layout::parse_level;

    const DT: f32 = 1.0 / 60.0;

    fn grid(source: &str) -> (TileGrid, Vec2) {
        let layout = parse_level(source, Vec2::new(40.0, 32.0), &mut HandleTable::new()).unwrap();
        (layout.grid, layout.start)
    }

    fn run(player: &mut Player, grid: &TileGrid, input: InputSnapshot, frames: usize) {
        let tuning = Tuning::default();
        for _ in 0..frames {
            player.update(DT, &input, grid, &tuning);
        }
    }

    #[test]
    fn test_lands_on_floor() {
        let (grid, start) = grid("1....X\n######");
        let mut player = Player::new(start, PlayerSprites::default());
        run(&mut player, &grid, InputSnapshot::default(), 30);
        assert!(player.is_on_ground());
        assert_eq!(player.position.y, 32.0);
    }

    #[test]
    fn test_walks_right_and_faces() {
        let (grid, start) = grid("1....X\n######");
        let mut player = Player::new(start, PlayerSprites::default());
        run(&mut player, &grid, InputSnapshot::default().with(Button::Right), 30);
        assert!(player.position.x > start.x + 40.0);
        assert_eq!(player.facing(), Facing::Right);
        run(&mut player, &grid, InputSnapshot::default().with(Button::Left), 5);
        assert_eq!(player.facing(), Facing::Left);
        assert!(player.is_on_ground());
    }

    #[test]
    fn test_wall_stops_movement() {
        let (grid, start) = grid("1.#..X\n######");
        let mut player = Player::new(start, PlayerSprites::default());
        run(&mut player, &grid, InputSnapshot::default().with(Button::Right), 120);
        let half = player.bounding_rect().width / 2.0;
        assert!((player.position.x - (80.0 - half)).abs() < 1e-3);
    }

    #[test]
    fn test_left_edge_of_level_is_solid() {
        let (grid, start) = grid("1....X\n######");
        let mut player = Player::new(start, PlayerSprites::default());
        run(&mut player, &grid, InputSnapshot::default().with(Button::Left), 120);
        assert!(player.bounding_rect().left >= -1e-3);
    }

    #[test]
    fn test_jump_leaves_ground() {
        let (grid, start) = grid("......\n1....X\n######");
        let mut player = Player::new(start, PlayerSprites::default());
        run(&mut player, &grid, InputSnapshot::default(), 10);
        assert!(player.is_on_ground());
        run(&mut player, &grid, InputSnapshot::default().with(Button::Jump), 5);
        assert!(!player.is_on_ground());
        assert!(player.position.y < start.y);
    }

    #[test]
    fn test_platform_is_one_way() {
        // Platform above the start: jumping passes up through it, then lands on it
        let (grid, start) = grid("......\n--....\n1....X\n######");
        let mut player = Player::new(start, PlayerSprites::default());
        run(&mut player, &grid, InputSnapshot::default(), 10);
        run(&mut player, &grid, InputSnapshot::default().with(Button::Jump), 20);
        run(&mut player, &grid, InputSnapshot::default(), 60);
        assert!(player.is_on_ground());
        assert_eq!(player.position.y, 32.0);
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut player = Player::new(Vec2::ZERO, PlayerSprites::default());
        assert!(player.on_killed(Some(4)));
        assert!(!player.on_killed(None));
        assert_eq!(player.killer(), Some(4));
        assert!(!player.is_alive());
    }

    #[test]
    fn test_reset_restores_state() {
        let mut player = Player::new(Vec2::ZERO, PlayerSprites::default());
        player.power_up(6.0);
        player.arm_special();
        player.velocity = Vec2::new(100.0, 50.0);
        player.on_killed(None);
        player.reset(Vec2::new(20.0, 32.0));
        assert!(player.is_alive());
        assert!(!player.is_powered_up());
        assert!(!player.is_special());
        assert_eq!(player.velocity, Vec2::ZERO);
        assert_eq!(player.position, Vec2::new(20.0, 32.0));
        assert_eq!(player.killer(), None);
    }

    #[test]
    fn test_power_up_counts_down() {
        let (grid, start) = grid("1....X\n######");
        let mut player = Player::new(start, PlayerSprites::default());
        player.power_up(0.5);
        run(&mut player, &grid, InputSnapshot::default(), 20);
        assert!(player.is_powered_up());
        run(&mut player, &grid, InputSnapshot::default(), 20);
        assert!(!player.is_powered_up());
    }
}
