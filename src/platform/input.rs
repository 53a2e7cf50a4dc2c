//! Input mapping
//!
//! Browser events are turned into aim updates and commands here so the wasm
//! glue only forwards raw keys and coordinates.

use glam::Vec2;

use crate::consts::{ANGLE_STEP, MAX_DRAG_DISTANCE, MAX_POWER, POWER_STEP};
use crate::sim::AimState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AngleUp,
    AngleDown,
    PowerUp,
    PowerDown,
    Launch,
    TogglePause,
    Reset,
    ToggleSound,
}

/// Map a `KeyboardEvent.key` value to a command
pub fn command_for_key(key: &str) -> Option<Command> {
    let cmd = match key {
        "ArrowUp" | "w" | "W" => Command::AngleUp,
        "ArrowDown" | "s" | "S" => Command::AngleDown,
        "ArrowRight" | "d" | "D" => Command::PowerUp,
        "ArrowLeft" | "a" | "A" => Command::PowerDown,
        " " | "Spacebar" | "Enter" => Command::Launch,
        "p" | "P" | "Escape" => Command::TogglePause,
        "r" | "R" => Command::Reset,
        "m" | "M" => Command::ToggleSound,
        _ => return None,
    };
    Some(cmd)
}

impl Command {
    /// Adjusted aim for aim commands, `None` for the rest
    pub fn apply_to(self, aim: AimState) -> Option<AimState> {
        let adjusted = match self {
            Command::AngleUp => aim.with_angle(aim.angle_degrees() + ANGLE_STEP),
            Command::AngleDown => aim.with_angle(aim.angle_degrees() - ANGLE_STEP),
            Command::PowerUp => aim.with_power(aim.power() + POWER_STEP),
            Command::PowerDown => aim.with_power(aim.power() - POWER_STEP),
            _ => return None,
        };
        Some(adjusted)
    }
}

/// Aim pointing from the launcher toward `point` (canvas coordinates, Y down)
pub fn aim_from_pointer(origin: Vec2, point: Vec2) -> AimState {
    let delta = Vec2::new(point.x - origin.x, origin.y - point.y);
    let angle = delta.y.atan2(delta.x).to_degrees();
    let power = delta.length() / MAX_DRAG_DISTANCE * MAX_POWER;
    AimState::new(angle, power)
}

/// Map client coordinates into canvas space given the element's bounding rect
pub fn to_canvas(client: Vec2, rect_origin: Vec2, rect_size: Vec2, canvas_size: Vec2) -> Vec2 {
    if rect_size.x <= 0.0 || rect_size.y <= 0.0 {
        return client - rect_origin;
    }
    (client - rect_origin) / rect_size * canvas_size
}

/// Press-drag-release aiming. Release means launch.
#[derive(Debug, Clone, Default)]
pub struct Drag {
    active: bool,
}

impl Drag {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn press(&mut self, origin: Vec2, point: Vec2) -> AimState {
        self.active = true;
        aim_from_pointer(origin, point)
    }

    /// New aim while the pointer is held
    pub fn movement(&self, origin: Vec2, point: Vec2) -> Option<AimState> {
        self.active.then(|| aim_from_pointer(origin, point))
    }

    /// True if a drag was in progress (the caller launches)
    pub fn release(&mut self) -> bool {
        std::mem::take(&mut self.active)
    }
}
