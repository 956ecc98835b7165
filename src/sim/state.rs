//! Game state and core simulation types
//!
//! Everything the renderer and HUD read lives here. The per-type stat tables
//! for enemies and weapons are closed enums, so adding a kind is a compile error
//! until every table covers it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start command
    Ready,
    /// Active gameplay
    Running,
    /// Game is paused (cooldowns and spawn timers frozen)
    Paused,
    /// Level-up choice pending; the world is frozen until resolved
    LevelingUp,
    /// Player health reached zero
    GameOver,
}

/// Play area in pixels, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a box center so the whole box stays inside.
    /// A box larger than the area is pinned to its center.
    pub fn clamp_box(&self, pos: Vec2, half: Vec2) -> Vec2 {
        let clamp_axis = |v: f32, h: f32, extent: f32| {
            if extent - h < h {
                extent / 2.0
            } else {
                v.clamp(h, extent - h)
            }
        };
        Vec2::new(
            clamp_axis(pos.x, half.x, self.width),
            clamp_axis(pos.y, half.y, self.height),
        )
    }

    /// Strict containment in the area grown by `margin` on every side
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x > -margin
            && pos.x < self.width + margin
            && pos.y > -margin
            && pos.y < self.height + margin
    }
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Full width/height
    pub size: Vec2,
    /// Pixels per nominal frame
    pub speed: f32,
    /// May dip below zero on the step that ends the run
    pub health: f32,
    pub max_health: f32,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next_level: u32,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        let p = &tuning.player;
        Self {
            pos,
            size: Vec2::splat(p.size),
            speed: p.speed,
            health: p.max_health,
            max_health: p.max_health,
            level: 1,
            experience: 0,
            experience_to_next_level: experience_threshold(1),
        }
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        self.size / 2.0
    }

    /// Health in [0, 1] for display
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Progress toward the next level in [0, 1]
    pub fn experience_fraction(&self) -> f32 {
        if self.experience_to_next_level == 0 {
            return 1.0;
        }
        (self.experience as f32 / self.experience_to_next_level as f32).min(1.0)
    }
}

/// Experience needed to leave `level`: floor(100 * 1.2^(level-1))
pub fn experience_threshold(level: u32) -> u32 {
    let exponent = level.saturating_sub(1) as i32;
    (BASE_EXPERIENCE_THRESHOLD * EXPERIENCE_GROWTH.powi(exponent)).floor() as u32
}

/// Enemy types, unlocked progressively by game time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
}

/// Fixed per-type enemy stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub health: f32,
    /// Pixels per nominal frame
    pub speed: f32,
    /// Contact damage per second
    pub damage: f32,
    pub size: f32,
    pub experience: u32,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Basic, EnemyKind::Fast, EnemyKind::Tank];

    pub const fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Basic => EnemyStats {
                health: 30.0,
                speed: 2.0,
                damage: 10.0,
                size: 40.0,
                experience: 10,
            },
            EnemyKind::Fast => EnemyStats {
                health: 20.0,
                speed: 3.0,
                damage: 5.0,
                size: 30.0,
                experience: 15,
            },
            EnemyKind::Tank => EnemyStats {
                health: 100.0,
                speed: 1.0,
                damage: 20.0,
                size: 50.0,
                experience: 30,
            },
        }
    }
}

/// A pursuing enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub damage: f32,
    pub experience_value: u32,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            pos,
            size: Vec2::splat(stats.size),
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            damage: stats.damage,
            experience_value: stats.experience,
        }
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        self.size / 2.0
    }

    pub fn health_fraction(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }
}

/// Weapon types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Basic,
    Spread,
    Piercing,
    Homing,
    Explosive,
}

/// Level-1 stats a weapon type starts from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    pub fire_rate_ms: f32,
    pub damage: f32,
    /// Projectile pixels per nominal frame
    pub speed: f32,
    pub projectile_count: u32,
    pub spread_degrees: f32,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::Basic,
        WeaponKind::Spread,
        WeaponKind::Piercing,
        WeaponKind::Homing,
        WeaponKind::Explosive,
    ];

    pub const fn stats(self) -> WeaponStats {
        match self {
            WeaponKind::Basic => WeaponStats {
                fire_rate_ms: 400.0,
                damage: 10.0,
                speed: 5.0,
                projectile_count: 1,
                spread_degrees: 0.0,
            },
            WeaponKind::Spread => WeaponStats {
                fire_rate_ms: 800.0,
                damage: 5.0,
                speed: 4.0,
                projectile_count: 3,
                spread_degrees: 30.0,
            },
            WeaponKind::Piercing => WeaponStats {
                fire_rate_ms: 1000.0,
                damage: 15.0,
                speed: 6.0,
                projectile_count: 1,
                spread_degrees: 0.0,
            },
            WeaponKind::Homing => WeaponStats {
                fire_rate_ms: 1200.0,
                damage: 20.0,
                speed: 3.0,
                projectile_count: 1,
                spread_degrees: 0.0,
            },
            WeaponKind::Explosive => WeaponStats {
                fire_rate_ms: 1500.0,
                damage: 30.0,
                speed: 3.0,
                projectile_count: 1,
                spread_degrees: 0.0,
            },
        }
    }

    /// Shots of this type survive enemy hits
    pub const fn pierces(self) -> bool {
        matches!(self, WeaponKind::Piercing)
    }

    pub const fn name(self) -> &'static str {
        match self {
            WeaponKind::Basic => "Basic Shot",
            WeaponKind::Spread => "Spread Shot",
            WeaponKind::Piercing => "Piercing Shot",
            WeaponKind::Homing => "Homing Shot",
            WeaponKind::Explosive => "Explosive Shot",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            WeaponKind::Basic => "A simple but effective shot",
            WeaponKind::Spread => "Fires multiple projectiles in a spread pattern",
            WeaponKind::Piercing => "Shots pass through enemies",
            WeaponKind::Homing => "Projectiles track nearby enemies",
            WeaponKind::Explosive => "Creates an explosion on impact",
        }
    }

    /// Short tag used in option ids
    pub const fn tag(self) -> &'static str {
        match self {
            WeaponKind::Basic => "basic",
            WeaponKind::Spread => "spread",
            WeaponKind::Piercing => "piercing",
            WeaponKind::Homing => "homing",
            WeaponKind::Explosive => "explosive",
        }
    }
}

/// An owned weapon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    /// 1..=MAX_WEAPON_LEVEL
    pub level: u32,
    /// Minimum game time between volleys (ms)
    pub fire_rate: f32,
    /// Game time of the last volley (ms)
    pub last_fired: f32,
    pub damage: f32,
    pub speed: f32,
    pub projectile_count: u32,
    pub spread_degrees: f32,
}

impl Weapon {
    /// A freshly unlocked weapon at its table stats
    pub fn new(kind: WeaponKind) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            level: 1,
            fire_rate: stats.fire_rate_ms,
            last_fired: 0.0,
            damage: stats.damage,
            speed: stats.speed,
            projectile_count: stats.projectile_count,
            spread_degrees: stats.spread_degrees,
        }
    }

    /// The basic gun every run starts with (slower cadence, faster shots than the table)
    pub fn starter() -> Self {
        Self {
            fire_rate: 500.0,
            speed: 8.0,
            ..Self::new(WeaponKind::Basic)
        }
    }

    /// Cooldown elapsed at game time `now`
    #[inline]
    pub fn ready(&self, now: f32) -> bool {
        now - self.last_fired >= self.fire_rate
    }

    pub fn can_upgrade(&self) -> bool {
        self.level < MAX_WEAPON_LEVEL
    }

    /// Apply one upgrade. Returns false at max level.
    pub fn upgrade(&mut self) -> bool {
        if !self.can_upgrade() {
            return false;
        }
        self.level += 1;
        self.damage *= UPGRADE_DAMAGE_FACTOR;
        self.fire_rate *= UPGRADE_FIRE_RATE_FACTOR;
        if self.kind == WeaponKind::Spread {
            self.projectile_count += SPREAD_UPGRADE_COUNT;
            self.spread_degrees += SPREAD_UPGRADE_DEGREES;
        }
        true
    }
}

/// A projectile in flight toward the aim point captured when it was fired
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: WeaponKind,
    pub pos: Vec2,
    /// Never changes after launch
    pub aim: Vec2,
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
}

impl Projectile {
    /// Unit travel direction (zero once at the aim point)
    pub fn heading(&self) -> Vec2 {
        (self.aim - self.pos).normalize_or_zero()
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Experience,
}

/// A pickup entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub radius: f32,
    pub value: u32,
}

/// What a level-up option does when chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelUpChoice {
    Upgrade(WeaponKind),
    NewWeapon(WeaponKind),
    HealthBoost,
}

/// Icon shown next to an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionIcon {
    Upgrade,
    Weapon,
    Heart,
}

/// One of the choices offered on level-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelUpOption {
    pub choice: LevelUpChoice,
    pub name: String,
    pub description: String,
    pub icon: OptionIcon,
}

impl LevelUpOption {
    pub fn new(choice: LevelUpChoice) -> Self {
        let (name, description, icon) = match choice {
            LevelUpChoice::Upgrade(kind) => (
                format!("Upgrade {}", kind.name()),
                format!("Increase {} damage and effects", kind.name()),
                OptionIcon::Upgrade,
            ),
            LevelUpChoice::NewWeapon(kind) => (
                format!("New: {}", kind.name()),
                kind.description().to_string(),
                OptionIcon::Weapon,
            ),
            LevelUpChoice::HealthBoost => (
                "Health Boost".to_string(),
                "Increase maximum health by 20%".to_string(),
                OptionIcon::Heart,
            ),
        };
        Self {
            choice,
            name,
            description,
            icon,
        }
    }

    /// Stable identifier, e.g. `spread_new`
    pub fn id(&self) -> String {
        match self.choice {
            LevelUpChoice::Upgrade(kind) => format!("{}_upgrade", kind.tag()),
            LevelUpChoice::NewWeapon(kind) => format!("{}_new", kind.tag()),
            LevelUpChoice::HealthBoost => "health_boost".to_string(),
        }
    }
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state (seeded, serializable apart from the RNG position)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub bounds: Bounds,
    pub phase: GamePhase,
    /// Accumulated game time (ms); only advances while Running
    pub game_time: f32,
    /// Game time since the last spawn (ms)
    pub spawn_timer: f32,
    pub score: u64,
    pub kills: u32,
    pub player: Player,
    pub weapons: Vec<Weapon>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    /// Offered choices while LevelingUp, empty otherwise
    pub level_up_options: Vec<LevelUpOption>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new run in the Ready phase, player centered, starter weapon equipped
    pub fn new(seed: u64, bounds: Bounds, tuning: Tuning) -> Self {
        let player = Player::new(bounds.center(), &tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            bounds,
            phase: GamePhase::Ready,
            game_time: 0.0,
            spawn_timer: 0.0,
            score: 0,
            kills: 0,
            player,
            weapons: vec![Weapon::starter()],
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            level_up_options: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Viewport changed: adopt the new bounds and keep the player inside
    pub fn resize(&mut self, width: f32, height: f32) {
        self.bounds = Bounds::new(width, height);
        self.player.pos = self.bounds.clamp_box(self.player.pos, self.player.half_size());
    }

    pub fn owns(&self, kind: WeaponKind) -> bool {
        self.weapons.iter().any(|w| w.kind == kind)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
