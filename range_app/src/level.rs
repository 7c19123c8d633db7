//! Level description loaded from TOML

use std::path::Path;

use actor_kernel::foundation::math::{constants, Vec3};
use actor_kernel::input::KeyCode;
use serde::Deserialize;

use crate::error::AppError;

/// Grid of floor tiles
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FloorDesc {
    /// Coordinate of the first tile center on both axes
    pub start: f32,
    /// Distance between tile centers
    pub size: f32,
    /// Tiles per row and per column
    pub count: u32,
    /// Z of the floor
    pub height: f32,
}

impl Default for FloorDesc {
    fn default() -> Self {
        Self {
            start: -1250.0,
            size: 250.0,
            count: 10,
            height: -100.0,
        }
    }
}

/// Ring of wall tiles around the floor
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WallDesc {
    /// Distance of each wall from the origin
    pub distance: f32,
    /// Z of the wall tile centers
    pub height: f32,
}

impl Default for WallDesc {
    fn default() -> Self {
        Self {
            distance: 1500.0,
            height: 300.0,
        }
    }
}

/// Player placement and movement limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerDesc {
    pub position: [f32; 3],
    pub max_forward_speed: f32,
    pub max_angular_speed: f32,
}

impl Default for PlayerDesc {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            max_forward_speed: 400.0,
            max_angular_speed: constants::PI,
        }
    }
}

/// Projectile settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BallDesc {
    pub speed: f32,
    /// Seconds before a ball removes itself
    pub lifetime: f32,
    pub radius: f32,
}

impl Default for BallDesc {
    fn default() -> Self {
        Self {
            speed: 1500.0,
            lifetime: 2.0,
            radius: 10.0,
        }
    }
}

/// One target
#[derive(Debug, Clone, Deserialize)]
pub struct TargetDesc {
    pub position: [f32; 3],
    /// Rotation about +Z in radians
    #[serde(default = "default_target_yaw")]
    pub yaw: f32,
}

fn default_target_yaw() -> f32 {
    constants::PI
}

/// A ball fired on a given frame
#[derive(Debug, Clone, Deserialize)]
pub struct ShotDesc {
    pub frame: u32,
}

/// Keys held down for frames `start..=end`
#[derive(Debug, Clone, Deserialize)]
pub struct InputDesc {
    pub start: u32,
    pub end: u32,
    pub keys: Vec<KeyCode>,
}

/// A complete range layout plus the scripted session played on it
#[derive(Debug, Clone, Deserialize)]
pub struct Level {
    /// Number of frames to simulate
    pub frames: u32,
    #[serde(default)]
    pub hit_sound: Option<String>,
    #[serde(default)]
    pub shot_sound: Option<String>,
    #[serde(default)]
    pub floor: FloorDesc,
    #[serde(default)]
    pub walls: Option<WallDesc>,
    #[serde(default)]
    pub player: PlayerDesc,
    #[serde(default)]
    pub ball: BallDesc,
    #[serde(default)]
    pub targets: Vec<TargetDesc>,
    #[serde(default)]
    pub shots: Vec<ShotDesc>,
    #[serde(default)]
    pub inputs: Vec<InputDesc>,
}

impl Level {
    /// Read and validate a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| AppError::LevelIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate level text
    pub fn from_toml_str(contents: &str) -> Result<Self, AppError> {
        let level: Self = toml::from_str(contents)?;
        level.validate()?;
        Ok(level)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.frames == 0 {
            return Err(AppError::InvalidLevel("frames must be positive".to_string()));
        }
        if self.floor.size <= 0.0 {
            return Err(AppError::InvalidLevel("floor tiles need a positive size".to_string()));
        }
        if self.ball.speed <= 0.0 || self.ball.lifetime <= 0.0 {
            return Err(AppError::InvalidLevel(
                "balls need a positive speed and lifetime".to_string(),
            ));
        }
        if let Some(input) = self.inputs.iter().find(|input| input.start > input.end) {
            return Err(AppError::InvalidLevel(format!(
                "input window {}..={} is reversed",
                input.start, input.end
            )));
        }
        Ok(())
    }

    /// Keys held on `frame`
    pub fn keys_on(&self, frame: u32) -> Vec<KeyCode> {
        let mut keys: Vec<KeyCode> = self
            .inputs
            .iter()
            .filter(|input| (input.start..=input.end).contains(&frame))
            .flat_map(|input| input.keys.iter().copied())
            .collect();
        keys.dedup();
        keys
    }

    /// Whether a ball is fired on `frame`
    pub fn fires_on(&self, frame: u32) -> bool {
        self.shots.iter().any(|shot| shot.frame == frame)
    }

    /// Player start position
    pub fn player_position(&self) -> Vec3 {
        Vec3::from(self.player.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
frames = 30

[[targets]]
position = [100.0, 0.0, 0.0]

[[shots]]
frame = 2

[[inputs]]
start = 5
end = 8
keys = ["W", "D"]
"#;

    #[test]
    fn test_minimal_level_uses_defaults() {
        let level = Level::from_toml_str(MINIMAL).unwrap();

        assert_eq!(level.frames, 30);
        assert_eq!(level.floor.count, 10);
        assert!(level.walls.is_none());
        assert_eq!(level.targets.len(), 1);
        assert_eq!(level.targets[0].yaw, constants::PI);
        assert_eq!(level.player_position(), Vec3::zeros());
    }

    #[test]
    fn test_script_lookup() {
        let level = Level::from_toml_str(MINIMAL).unwrap();

        assert!(level.fires_on(2));
        assert!(!level.fires_on(3));
        assert!(level.keys_on(4).is_empty());
        assert_eq!(level.keys_on(5), vec![KeyCode::W, KeyCode::D]);
        assert_eq!(level.keys_on(8), vec![KeyCode::W, KeyCode::D]);
        assert!(level.keys_on(9).is_empty());
    }

    #[test]
    fn test_reversed_input_window_is_rejected() {
        let text = "frames = 10\n[[inputs]]\nstart = 5\nend = 2\nkeys = [\"A\"]\n";
        assert!(matches!(Level::from_toml_str(text), Err(AppError::InvalidLevel(_))));
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let text = "frames = 10\n[[inputs]]\nstart = 0\nend = 2\nkeys = [\"Banana\"]\n";
        assert!(matches!(Level::from_toml_str(text), Err(AppError::LevelParse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Level::load("definitely/not/here.toml");
        assert!(matches!(result, Err(AppError::LevelIo { .. })));
    }
}
